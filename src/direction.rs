//! Loop direction classifier.
//!
//! For a circular route it is worth telling riders whether the loop runs
//! clockwise or counter-clockwise, since the cafe stop lands differently. The
//! classifier compares the bearing from the start to a point a quarter of
//! the way round against the bearing to a point three quarters of the way
//! round: on a clockwise loop the outward bearing leads the return
//! bearing.
//!
//! Routes whose start and finish are further apart than the closing
//! tolerance are not loops, and get [`Direction::NotCircular`] rather
//! than an error.

use std::fmt;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geo_utils::{bearing_deg, distance_km};
use crate::track::Track;
use crate::{GeoPoint, GeometryConfig};

/// Rotational direction of a route, as persisted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "CW")]
    Clockwise,
    #[serde(rename = "CCW")]
    CounterClockwise,
    #[serde(rename = "Not Circular")]
    NotCircular,
    #[serde(rename = "Missing File")]
    MissingFile,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Direction::Clockwise => "CW",
            Direction::CounterClockwise => "CCW",
            Direction::NotCircular => "Not Circular",
            Direction::MissingFile => "Missing File",
        };
        write!(f, "{tag}")
    }
}

/// Classify the direction of a loaded track.
///
/// Samples the first segment at its start, 25%, 75% and final points.
/// An empty track classifies as [`Direction::NotCircular`]; a single-point
/// segment compares equal bearings and lands on
/// [`Direction::CounterClockwise`] rather than erroring.
pub fn classify_direction(track: &Track, config: &GeometryConfig) -> Direction {
    let Some(segment) = track.first_segment() else {
        return Direction::NotCircular;
    };
    let points = &segment.points;
    if points.is_empty() {
        return Direction::NotCircular;
    }

    let count = points.len();
    let start = GeoPoint::from(&points[0]);
    let outward = GeoPoint::from(&points[(count as f64 * 0.25).floor() as usize]);
    let ret = GeoPoint::from(&points[(count as f64 * 0.75).floor() as usize]);
    let last = GeoPoint::from(&points[count - 1]);

    loop_direction(&start, &outward, &ret, &last, config.closing_tolerance_km)
}

/// Classify the direction of a route's backing file.
///
/// A missing file yields `Ok(Direction::MissingFile)`, checked before any
/// parsing is attempted, since this is an expected state rather than a
/// fault. A file that exists but fails to parse is an error.
pub fn classify_route_file(path: &Path, config: &GeometryConfig) -> Result<Direction> {
    if !path.exists() {
        debug!("Direction: no file at '{}'", path.display());
        return Ok(Direction::MissingFile);
    }

    let track = Track::load(path)?;
    Ok(classify_direction(&track, config))
}

/// Core direction decision over the four sampled points.
///
/// Bearings come out of `atan2` in (−180°, 180°]; when the outward and
/// return bearings straddle the ±180° discontinuity, 360° is added to the
/// smaller one before comparing, in either direction.
pub fn loop_direction(
    start: &GeoPoint,
    outward: &GeoPoint,
    ret: &GeoPoint,
    last: &GeoPoint,
    closing_tolerance_km: f64,
) -> Direction {
    // Only loops have a rotational direction
    if distance_km(last, start) > closing_tolerance_km {
        return Direction::NotCircular;
    }

    let mut outward_deg = bearing_deg(start, outward);
    let mut return_deg = bearing_deg(start, ret);

    // The two vectors can span the 180/-180 line in either direction
    if outward_deg > 90.0 && return_deg < -90.0 {
        return_deg += 360.0;
    }
    if return_deg > 90.0 && outward_deg < -90.0 {
        outward_deg += 360.0;
    }

    if outward_deg > return_deg {
        Direction::Clockwise
    } else {
        Direction::CounterClockwise
    }
}
