//! POI proximity/association engine.
//!
//! Walks a track and a set of points of interest (cafes, in the original
//! deployment) and reports, for each POI, the closest the route comes to
//! it and how far along the route that closest approach happens. A POI is
//! associated with a route when the closest approach is within the
//! configured threshold.
//!
//! The engine reports current-pass results only; it does not diff against
//! previously stored associations. When a POI that used to be associated
//! falls outside the threshold on a later pass, removing the stale record
//! is the caller's job.

use log::info;

use crate::geo_utils::{distance_km, Bounds};
use crate::track::Track;
use crate::{Association, GeoPoint, GeometryConfig, Poi};

/// Closest approach of a track to a point.
///
/// `dist_km` is the minimum distance from any track point to the POI;
/// `range_km` is the cumulative along-track distance at which that minimum
/// occurs. Neither value is rounded. An empty track yields an infinite
/// `dist_km`, which no threshold accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    pub dist_km: f64,
    pub range_km: f64,
}

/// Find the closest approach of a track to a single POI.
///
/// Scans every point of every segment. The along-track cursor restarts at
/// each segment's first point (the same convention the reduction stats
/// use), so a gap between segments contributes no distance. When two
/// points tie for the minimum, the first one scanned wins.
pub fn nearest_approach(track: &Track, poi: &Poi) -> ClosestApproach {
    let target = poi.position();

    let mut min_km = f64::INFINITY;
    let mut min_range_km = 0.0;
    let mut along_km = 0.0;

    for segment in track.segments() {
        let Some(first) = segment.points.first() else {
            continue;
        };
        let mut last = GeoPoint::from(first);

        for wp in &segment.points {
            let point = GeoPoint::from(wp);

            // How far along the route we are
            along_km += distance_km(&last, &point);

            // How far the POI is from this point
            let range = distance_km(&target, &point);
            if range < min_km {
                min_km = range;
                min_range_km = along_km;
            }

            last = point;
        }
    }

    ClosestApproach {
        dist_km: min_km,
        range_km: min_range_km,
    }
}

/// Associate a set of POIs with one track.
///
/// Returns an [`Association`] for every POI whose closest approach is
/// within `config.poi_threshold_km`. POIs that previously had a stored
/// association but are absent from the result must be removed by the
/// caller.
///
/// A bounding-box prefilter skips POIs that cannot possibly come within
/// the threshold of any track point, so the full O(points) scan only runs
/// for plausible candidates.
pub fn associate_pois(track: &Track, pois: &[Poi], config: &GeometryConfig) -> Vec<Association> {
    let Some(bounds) = track_bounds(track) else {
        return Vec::new();
    };

    let mut associations = Vec::new();

    for poi in pois {
        if !bounds.contains_buffered(&poi.position(), config.poi_threshold_km) {
            continue;
        }

        let approach = nearest_approach(track, poi);
        if approach.dist_km <= config.poi_threshold_km {
            info!(
                "Route passes within {:.1} km of POI {} after {:.1} km",
                approach.dist_km, poi.id, approach.range_km
            );
            associations.push(Association {
                poi_id: poi.id,
                dist_km: approach.dist_km,
                range_km: approach.range_km,
            });
        }
    }

    associations
}

/// Mirror sweep: associate one POI with a set of tracks.
///
/// Used when a new POI is added and every stored route must be checked
/// against it. Returns `(index, approach)` pairs for the tracks whose
/// closest approach is within the threshold; indices refer to the input
/// slice, which the caller maps back onto its own route identifiers.
pub fn associate_tracks(
    poi: &Poi,
    tracks: &[Track],
    config: &GeometryConfig,
) -> Vec<(usize, ClosestApproach)> {
    let mut matches = Vec::new();

    for (index, track) in tracks.iter().enumerate() {
        let in_range = track_bounds(track)
            .is_some_and(|b| b.contains_buffered(&poi.position(), config.poi_threshold_km));
        if !in_range {
            continue;
        }

        let approach = nearest_approach(track, poi);
        if approach.dist_km <= config.poi_threshold_km {
            info!(
                "POI {} is {:.1} km from track {} at {:.1} km along",
                poi.id, approach.dist_km, index, approach.range_km
            );
            matches.push((index, approach));
        }
    }

    matches
}

/// Serialize an association list to the JSON array the caller persists:
/// `[{"poi_id": .., "dist_km": .., "range_km": ..}, ...]`.
pub fn associations_to_json(associations: &[Association]) -> serde_json::Result<String> {
    serde_json::to_string(associations)
}

/// Parse an association list from its persisted JSON form.
pub fn associations_from_json(json: &str) -> serde_json::Result<Vec<Association>> {
    serde_json::from_str(json)
}

fn track_bounds(track: &Track) -> Option<Bounds> {
    Bounds::from_points(
        track
            .segments()
            .flat_map(|s| s.points.iter().map(GeoPoint::from)),
    )
}
