//! GPX-backed track model and parser adapter.
//!
//! [`Track`] wraps a parsed [`gpx::Gpx`] document rather than copying the
//! points into a bespoke structure. Operations that do not rebuild the file
//! (trimming, metadata stamping) therefore keep whatever per-point data the
//! upload carried (timestamps, extensions), while the reduction pipeline
//! deliberately rebuilds a geometry-only file.
//!
//! Saving uses an atomic rewrite: the new document is written to
//! `<path>.tmp`, the original is deleted, and the temp file is renamed into
//! place. Each step fails with its own [`TrackFileError`] variant so the
//! caller can log which filesystem step went wrong.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use geo::Point;
use gpx::{Gpx, GpxVersion, Link, Metadata, Person, TrackSegment, Waypoint};
use log::{debug, warn};

use crate::error::{Result, TrackFileError};

/// Check that a filename carries the `.gpx` extension (case-insensitive).
///
/// Upload handlers gate on this before anything touches the parser.
pub fn has_gpx_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"))
}

/// A GPS track backed by a GPX document.
///
/// Created by parsing a file ([`Track::load`]) or fresh
/// ([`Track::new`]); mutated by the trim and reduction operations; written
/// back with [`Track::save`].
#[derive(Debug, Clone)]
pub struct Track {
    gpx: Gpx,
}

impl Track {
    /// Create a clean track with one empty segment, named `route_name`.
    ///
    /// This is the shell the reduction pipeline migrates retained points
    /// into.
    pub fn new(route_name: &str) -> Self {
        let mut gpx = Gpx {
            version: GpxVersion::Gpx11,
            creator: Some("route-geometry".to_string()),
            ..Gpx::default()
        };

        let mut track = gpx::Track::default();
        track.name = Some(route_name.to_string());
        track.segments.push(TrackSegment::default());
        gpx.tracks.push(track);

        Self { gpx }
    }

    /// Wrap an already-parsed GPX document.
    pub fn from_gpx(gpx: Gpx) -> Self {
        Self { gpx }
    }

    /// Load a track from a GPX file.
    ///
    /// The path is checked for existence before parsing. A missing
    /// backing file is a common real-world failure (an uploaded file later
    /// deleted out-of-band) and gets its own error so the caller can show
    /// a friendly message rather than a parse failure.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TrackFileError::NotFound {
                path: path.display().to_string(),
            });
        }

        let file = fs::File::open(path).map_err(|e| TrackFileError::Parse {
            path: path.display().to_string(),
            message: format!("failed to open file: {e}"),
        })?;

        let gpx = gpx::read(BufReader::new(file)).map_err(|e| TrackFileError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let track = Self { gpx };
        debug!(
            "Loaded '{}' ({} points)",
            path.display(),
            track.point_count()
        );
        Ok(track)
    }

    /// Write the track back to `path`, replacing any existing file.
    ///
    /// Sequence: serialize to `<path>.tmp`, delete the original, rename
    /// the temp file into place. A failure in any step stops processing
    /// and reports that step; the original file survives every failure
    /// except a failed rename, which happens after the delete.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp_path = PathBuf::from(format!("{}.tmp", path.display()));

        // A leftover temp file means an earlier rewrite died mid-way;
        // clear it so the write below starts clean.
        if tmp_path.exists() {
            warn!("Stale temp file '{}' found, removing", tmp_path.display());
            fs::remove_file(&tmp_path).map_err(|e| TrackFileError::Write {
                path: tmp_path.display().to_string(),
                message: format!("failed to clear stale temp file: {e}"),
            })?;
        }

        // Step 1: write the new document out to the temp file.
        let mut buffer = Vec::new();
        gpx::write(&self.gpx, &mut buffer).map_err(|e| TrackFileError::Write {
            path: tmp_path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(&tmp_path, &buffer).map_err(|e| TrackFileError::Write {
            path: tmp_path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Wrote temp file '{}'", tmp_path.display());

        // Step 2: delete the original (skipped for a first-time save).
        if path.exists() {
            fs::remove_file(path).map_err(|e| TrackFileError::Delete {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        }

        // Step 3: promote the temp file.
        // TODO: a crash between the delete above and this rename leaves no
        // valid file on disk; switching to a plain overwriting rename would
        // close that window.
        fs::rename(&tmp_path, path).map_err(|e| TrackFileError::Rename {
            from: tmp_path.display().to_string(),
            to: path.display().to_string(),
            message: e.to_string(),
        })?;

        debug!(
            "Saved '{}' ({} points)",
            path.display(),
            self.point_count()
        );
        Ok(())
    }

    /// The display name of the route, if the file carries one.
    pub fn display_name(&self) -> Option<&str> {
        self.gpx.tracks.first().and_then(|t| t.name.as_deref())
    }

    /// Stamp route metadata onto the document ahead of a rewrite: file and
    /// track name, author, link, and the "cycling" track type that route
    /// planners pick up.
    pub fn set_route_metadata(&mut self, route_name: &str, author_name: &str, link: &str) {
        let metadata = self.gpx.metadata.get_or_insert_with(Metadata::default);
        metadata.name = Some(route_name.to_string());
        metadata.author = Some(Person {
            name: Some(author_name.to_string()),
            email: None,
            link: Some(Link {
                href: link.to_string(),
                text: None,
                type_: None,
            }),
        });

        if let Some(track) = self.gpx.tracks.first_mut() {
            track.name = Some(route_name.to_string());
            track.links = vec![Link {
                href: link.to_string(),
                text: None,
                type_: None,
            }];
            track.type_ = Some("cycling".to_string());
        }
    }

    /// Append a point to the first segment, creating track and segment if
    /// the document is empty.
    pub fn append_point(&mut self, latitude: f64, longitude: f64, elevation: Option<f64>) {
        let mut wp = Waypoint::new(Point::new(longitude, latitude));
        wp.elevation = elevation;

        if self.gpx.tracks.is_empty() {
            self.gpx.tracks.push(gpx::Track::default());
        }
        let track = &mut self.gpx.tracks[0];
        if track.segments.is_empty() {
            track.segments.push(TrackSegment::default());
        }
        track.segments[0].points.push(wp);
    }

    /// Iterate over every segment of every track, in file order.
    pub fn segments(&self) -> impl Iterator<Item = &TrackSegment> {
        self.gpx.tracks.iter().flat_map(|t| t.segments.iter())
    }

    /// The first segment of the first track, if any.
    ///
    /// Trim operations and the edge-marker windows work on this segment
    /// only; later segments are left untouched.
    pub fn first_segment(&self) -> Option<&TrackSegment> {
        self.gpx.tracks.first().and_then(|t| t.segments.first())
    }

    /// Mutable access to the first segment of the first track.
    pub fn first_segment_mut(&mut self) -> Option<&mut TrackSegment> {
        self.gpx
            .tracks
            .first_mut()
            .and_then(|t| t.segments.first_mut())
    }

    /// Total number of points across all segments.
    pub fn point_count(&self) -> usize {
        self.segments().map(|s| s.points.len()).sum()
    }

    /// The underlying GPX document.
    pub fn gpx(&self) -> &Gpx {
        &self.gpx
    }
}
