//! Track reduction pipeline.
//!
//! Raw consumer GPS recordings carry thousands of near-duplicate points
//! plus extension data (heart rate, power, cadence) the site has no use
//! for, and which some downstream consumers choke on. Reduction walks the
//! raw file once and produces:
//!
//! - total length and total ascent, computed at full input resolution
//! - a fresh geometry-only track keeping just the points spaced at least
//!   `min_resolution_km` apart
//!
//! Stats use a per-segment cursor: distance does not accumulate across a
//! segment boundary, and ascent only counts positive elevation deltas
//! (descents are ignored, giving the usual "total climb" figure).

use log::info;

use crate::geo_utils::distance_km;
use crate::track::Track;
use crate::{GeoPoint, GeometryConfig};

/// Outcome of reducing a track.
///
/// The two totals are unrounded; rounding to 1 decimal place is the
/// caller's concern at persistence time. `geometry_changed` tells the
/// caller whether any stored POI associations for this route must be
/// recomputed.
#[derive(Debug)]
pub struct ReductionResult {
    /// Geometry-only track containing the retained points, as a single
    /// segment named after the route.
    pub track: Track,
    /// Total route length in kilometres, at full input resolution.
    pub length_km: f64,
    /// Total ascent in metres (positive elevation deltas only).
    pub ascent_m: f64,
    /// Point count of the input.
    pub points_before: usize,
    /// Point count of the reduced output.
    pub points_after: usize,
    /// True when the output geometry differs from the input.
    pub geometry_changed: bool,
}

/// Reduce a raw track to route stats plus a minimum-spacing point set.
///
/// Every input point contributes to the running length and ascent totals,
/// whether or not it is retained. Retention uses a second, coarser cursor:
/// a point is kept once it is at least `config.min_resolution_km` from the
/// previously kept point. The coarse cursor starts at (0, 0), far from
/// any real coordinate, so the first point of each segment is always
/// kept. Retained points carry only latitude, longitude and elevation;
/// timestamps and extension data do not survive.
///
/// # Example
///
/// ```rust
/// use route_geometry::{reduce_track, GeometryConfig, Track};
///
/// let mut raw = Track::new("upload");
/// raw.append_point(52.2000, 0.1200, Some(10.0));
/// raw.append_point(52.2001, 0.1200, Some(11.0)); // ~11 m on: dropped
/// raw.append_point(52.2100, 0.1200, Some(25.0));
///
/// let result = reduce_track(&raw, "Sunday loop", &GeometryConfig::default());
/// assert_eq!(result.points_before, 3);
/// assert_eq!(result.points_after, 2);
/// assert!(result.ascent_m > 0.0);
/// ```
pub fn reduce_track(track: &Track, route_name: &str, config: &GeometryConfig) -> ReductionResult {
    let mut reduced = Track::new(route_name);
    let mut length_km = 0.0;
    let mut ascent_m = 0.0;
    let mut points_before = 0usize;
    let mut points_after = 0usize;

    for segment in track.segments() {
        let Some(first) = segment.points.first() else {
            continue;
        };

        // Full-resolution stats cursor, restarted at every segment.
        let mut last = GeoPoint::from(first);
        let mut last_elevation = first.elevation;

        // Coarse cursor for retained points; see function docs for the seed.
        let mut saved = GeoPoint::new(0.0, 0.0);

        for wp in &segment.points {
            let point = GeoPoint::from(wp);
            points_before += 1;

            // Route stats come from the original points (higher resolution).
            length_km += distance_km(&last, &point);

            if let (Some(prev_ele), Some(ele)) = (last_elevation, wp.elevation) {
                if ele > prev_ele {
                    ascent_m += ele - prev_ele;
                }
            }

            last = point;
            if wp.elevation.is_some() {
                last_elevation = wp.elevation;
            }

            // Far enough from the previously kept point?
            if distance_km(&saved, &point) >= config.min_resolution_km {
                reduced.append_point(point.latitude, point.longitude, wp.elevation);
                points_after += 1;
                saved = point;
            }
        }
    }

    info!(
        "Reduced '{}' from {} to {} points ({:.1} km, {:.0} m ascent)",
        route_name, points_before, points_after, length_km, ascent_m
    );

    ReductionResult {
        track: reduced,
        length_km,
        ascent_m,
        points_before,
        points_after,
        geometry_changed: points_after != points_before,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpx::{Gpx, GpxVersion, TrackSegment, Waypoint};

    fn build_track(segments: &[&[(f64, f64, Option<f64>)]]) -> Track {
        let mut gpx_track = gpx::Track::default();
        for points in segments {
            let mut segment = TrackSegment::default();
            for &(lat, lon, ele) in *points {
                let mut wp = Waypoint::new(geo::Point::new(lon, lat));
                wp.elevation = ele;
                segment.points.push(wp);
            }
            gpx_track.segments.push(segment);
        }
        let mut gpx = Gpx {
            version: GpxVersion::Gpx11,
            ..Gpx::default()
        };
        gpx.tracks.push(gpx_track);
        Track::from_gpx(gpx)
    }

    #[test]
    fn test_ascent_ignores_descents() {
        // 100 -> 90 descent ignored, 90 -> 120 counted
        let track = build_track(&[&[
            (52.20, 0.12, Some(100.0)),
            (52.21, 0.12, Some(90.0)),
            (52.22, 0.12, Some(120.0)),
        ]]);
        let result = reduce_track(&track, "hills", &GeometryConfig::default());
        assert!((result.ascent_m - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_reduction_is_monotonic_and_keeps_first_point() {
        // Points ~11 m apart, well under the 50 m resolution
        let points: Vec<(f64, f64, Option<f64>)> = (0..50)
            .map(|i| (52.20 + i as f64 * 0.0001, 0.12, Some(10.0)))
            .collect();
        let track = build_track(&[&points]);

        let result = reduce_track(&track, "dense", &GeometryConfig::default());
        assert!(result.points_after <= result.points_before);
        assert!(result.points_after < 50);
        assert!(result.geometry_changed);

        // First input point is always retained
        let seg = result.track.first_segment().unwrap();
        assert_eq!(seg.points[0].point().y(), 52.20);
        assert_eq!(seg.points[0].point().x(), 0.12);
    }

    #[test]
    fn test_stats_use_full_resolution() {
        // Dropped points still count towards length
        let track = build_track(&[&[
            (52.2000, 0.12, Some(10.0)),
            (52.2001, 0.12, Some(10.0)),
            (52.2002, 0.12, Some(10.0)),
            (52.2003, 0.12, Some(10.0)),
        ]]);
        let result = reduce_track(&track, "short", &GeometryConfig::default());

        // ~0.0001 deg lat = ~11.1 m each, three hops
        assert!((result.length_km - 0.0334).abs() < 0.002);
        assert_eq!(result.points_after, 1);
    }

    #[test]
    fn test_segment_boundary_resets_cursor() {
        // Two segments 11 km apart: the gap must not count as distance
        let track = build_track(&[
            &[(52.20, 0.12, Some(10.0)), (52.21, 0.12, Some(10.0))],
            &[(52.30, 0.12, Some(10.0)), (52.31, 0.12, Some(10.0))],
        ]);
        let result = reduce_track(&track, "two-parts", &GeometryConfig::default());

        // Each segment spans ~1.11 km; the 10 km inter-segment gap is excluded
        assert!((result.length_km - 2.22).abs() < 0.05);
        // Both segment-leading points are retained
        assert_eq!(result.points_after, 4);
    }

    #[test]
    fn test_missing_elevation_is_skipped() {
        let track = build_track(&[&[
            (52.20, 0.12, Some(100.0)),
            (52.21, 0.12, None),
            (52.22, 0.12, Some(130.0)),
        ]]);
        let result = reduce_track(&track, "gaps", &GeometryConfig::default());
        // The None gap contributes nothing; 100 -> 130 across it does
        assert!((result.ascent_m - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_track() {
        let track = build_track(&[]);
        let result = reduce_track(&track, "empty", &GeometryConfig::default());
        assert_eq!(result.points_before, 0);
        assert_eq!(result.points_after, 0);
        assert_eq!(result.length_km, 0.0);
        assert!(!result.geometry_changed);
    }
}
