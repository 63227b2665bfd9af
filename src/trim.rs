//! Start/end trim operations.
//!
//! Riders' GPS recordings routinely start before the ride does and end
//! after it (garage fiddling, cafe stops, the roll home). The trim
//! operations crop that noise using a 1-based point index chosen on the
//! interactive map ("Point 47"), matching the edge-marker windows in
//! [`crate::markers`].
//!
//! Both operations act on the first segment only; any later segments are
//! left untouched. Along-track distances stored against the route assume
//! segment-0 edits, so this asymmetry is load-bearing.

use log::info;

use crate::track::Track;

/// Audit record for a trim operation.
///
/// `geometry_changed` is the caller's cue to invalidate and recompute any
/// stored POI associations for this route: trimming shifts the
/// distance-along-track of every remaining association and may add or
/// remove near-endpoint POIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimResult {
    pub points_before: usize,
    pub points_after: usize,
    pub geometry_changed: bool,
}

/// Remove points from the front of the first segment so the route starts
/// at the 1-based `keep_from_index`.
///
/// `keep_from_index` of 1 (or 0) keeps everything; an index past the end
/// empties the segment rather than panicking.
pub fn trim_start(track: &mut Track, keep_from_index: usize) -> TrimResult {
    let Some(segment) = track.first_segment_mut() else {
        return TrimResult {
            points_before: 0,
            points_after: 0,
            geometry_changed: false,
        };
    };

    let points_before = segment.points.len();
    let remove = keep_from_index.saturating_sub(1).min(points_before);
    segment.points.drain(0..remove);
    let points_after = segment.points.len();

    info!(
        "Trim start: length was {}, now {} (keep from point {})",
        points_before, points_after, keep_from_index
    );

    TrimResult {
        points_before,
        points_after,
        geometry_changed: points_after != points_before,
    }
}

/// Remove points from the back of the first segment so the route ends at
/// the 1-based `keep_up_to_count`.
///
/// Keeps the first `keep_up_to_count` points; a count at or past the
/// current length is a no-op (the remove count never goes negative).
pub fn trim_end(track: &mut Track, keep_up_to_count: usize) -> TrimResult {
    let Some(segment) = track.first_segment_mut() else {
        return TrimResult {
            points_before: 0,
            points_after: 0,
            geometry_changed: false,
        };
    };

    let points_before = segment.points.len();
    segment.points.truncate(keep_up_to_count);
    let points_after = segment.points.len();

    info!(
        "Trim end: length was {}, now {} (keep up to point {})",
        points_before, points_after, keep_up_to_count
    );

    TrimResult {
        points_before,
        points_after,
        geometry_changed: points_after != points_before,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpx::{Gpx, GpxVersion, TrackSegment, Waypoint};

    fn build_track(segments: &[usize]) -> Track {
        let mut gpx_track = gpx::Track::default();
        for &count in segments {
            let mut segment = TrackSegment::default();
            for i in 0..count {
                let wp = Waypoint::new(geo::Point::new(0.12, 52.20 + i as f64 * 0.001));
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
    fn test_trim_start_removes_leading_points() {
        let mut track = build_track(&[10]);
        let result = trim_start(&mut track, 4);

        assert_eq!(result.points_before, 10);
        assert_eq!(result.points_after, 7);
        assert!(result.geometry_changed);

        // Point 4 (index 3) is the new first point
        let seg = track.first_segment().unwrap();
        assert!((seg.points[0].point().y() - 52.203).abs() < 1e-9);
    }

    #[test]
    fn test_trim_start_index_one_is_noop() {
        let mut track = build_track(&[10]);
        let result = trim_start(&mut track, 1);
        assert_eq!(result.points_after, 10);
        assert!(!result.geometry_changed);

        // Index 0 must not underflow either
        let result = trim_start(&mut track, 0);
        assert_eq!(result.points_after, 10);
    }

    #[test]
    fn test_trim_start_past_end_clamps() {
        let mut track = build_track(&[5]);
        let result = trim_start(&mut track, 99);
        assert_eq!(result.points_after, 0);
    }

    #[test]
    fn test_trim_end_keeps_count() {
        let mut track = build_track(&[10]);
        let result = trim_end(&mut track, 6);
        assert_eq!(result.points_before, 10);
        assert_eq!(result.points_after, 6);
        assert!(result.geometry_changed);
    }

    #[test]
    fn test_trim_end_is_idempotent_at_bound() {
        let mut track = build_track(&[10]);
        trim_end(&mut track, 6);

        // Second trim with a count >= remaining points is a no-op
        let result = trim_end(&mut track, 6);
        assert_eq!(result.points_after, 6);
        assert!(!result.geometry_changed);

        let result = trim_end(&mut track, 100);
        assert_eq!(result.points_after, 6);
        assert!(!result.geometry_changed);
    }

    #[test]
    fn test_trim_touches_first_segment_only() {
        let mut track = build_track(&[10, 8]);
        trim_start(&mut track, 5);
        trim_end(&mut track, 3);

        let segments: Vec<usize> = track.segments().map(|s| s.points.len()).collect();
        assert_eq!(segments, vec![3, 8]);
    }

    #[test]
    fn test_trim_empty_track() {
        let mut track = Track::from_gpx(Gpx {
            version: GpxVersion::Gpx11,
            ..Gpx::default()
        });
        let result = trim_start(&mut track, 5);
        assert_eq!(result.points_before, 0);
        assert!(!result.geometry_changed);
    }
}
