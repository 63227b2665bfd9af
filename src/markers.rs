//! Map marker sub-sampling.
//!
//! Plotting every raw point puts an icon on every few metres of road and
//! makes the map a mess, so display markers are spaced out by a minimum
//! step. Two flavours:
//!
//! - [`markers_for_display`]: a sparse marker per route for the overview
//!   map, with the first and last point of each segment always present.
//! - [`edge_markers`]: dense markers over just the first and last couple
//!   of kilometres, each carrying the 1-based point index the trim
//!   operations take ("Start Here! (Point 47)").

use serde::{Deserialize, Serialize};

use crate::geo_utils::distance_km;
use crate::track::Track;
use crate::{GeoPoint, GeometryConfig};

/// A display-only map marker. Regenerated on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

/// A marker on the interactive start/end trim maps.
///
/// `index` is the 1-based position of the point within the first segment,
/// the value [`crate::trim_start`] and [`crate::trim_end`] take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub index: usize,
}

/// Marker sets for the two trim maps, with the coordinate each map should
/// centre on (the mean of its markers; `None` when a window is empty).
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMarkers {
    pub start: Vec<TrimMarker>,
    pub end: Vec<TrimMarker>,
    pub start_center: Option<GeoPoint>,
    pub end_center: Option<GeoPoint>,
}

/// Produce a sparse marker set for rendering a route on a map.
///
/// Walks each segment emitting the first point, then a point whenever the
/// cumulative distance since the last emitted marker exceeds
/// `config.display_step_km`, and finally the segment's last point
/// regardless of spacing. The two navigationally important points are
/// never dropped, even on a segment shorter than the step.
///
/// Markers are labelled with the route's display name.
pub fn markers_for_display(track: &Track, config: &GeometryConfig) -> Vec<Marker> {
    let label = track.display_name().unwrap_or_default().to_string();
    let mut markers = Vec::new();

    for segment in track.segments() {
        let Some(first) = segment.points.first() else {
            continue;
        };

        let start = GeoPoint::from(first);
        markers.push(Marker {
            latitude: start.latitude,
            longitude: start.longitude,
            label: label.clone(),
        });

        let mut prev = start;
        let mut since_last_marker_km = 0.0;
        let mut last_emitted = 0;

        for (i, wp) in segment.points.iter().enumerate().skip(1) {
            let point = GeoPoint::from(wp);
            since_last_marker_km += distance_km(&prev, &point);
            prev = point;

            if since_last_marker_km > config.display_step_km {
                markers.push(Marker {
                    latitude: point.latitude,
                    longitude: point.longitude,
                    label: label.clone(),
                });
                since_last_marker_km = 0.0;
                last_emitted = i;
            }
        }

        // The endpoint marker is never dropped
        let last_index = segment.points.len() - 1;
        if last_index != last_emitted && last_index != 0 {
            let end = GeoPoint::from(&segment.points[last_index]);
            markers.push(Marker {
                latitude: end.latitude,
                longitude: end.longitude,
                label: label.clone(),
            });
        }
    }

    markers
}

/// Produce the marker sets for the interactive start/end trim maps.
///
/// Both windows cover the first segment only (the segment the trim
/// operations edit). The start window walks forward from the first point,
/// the end window backwards from the last, each stopping once the
/// along-track distance reaches `config.trim_window_km`. End markers are
/// ordered nearest-the-end first.
pub fn edge_markers(track: &Track, config: &GeometryConfig) -> EdgeMarkers {
    let mut start = Vec::new();
    let mut end = Vec::new();

    if let Some(segment) = track.first_segment() {
        if let Some(first) = segment.points.first() {
            let mut last = GeoPoint::from(first);
            let mut total_km = 0.0;

            for (i, wp) in segment.points.iter().enumerate() {
                let point = GeoPoint::from(wp);
                total_km += distance_km(&last, &point);
                if total_km >= config.trim_window_km {
                    break;
                }
                start.push(trim_marker(point, i + 1));
                last = point;
            }
        }

        if let Some(final_point) = segment.points.last() {
            let count = segment.points.len();
            let mut last = GeoPoint::from(final_point);
            let mut total_km = 0.0;

            for (offset, wp) in segment.points.iter().rev().enumerate() {
                let point = GeoPoint::from(wp);
                total_km += distance_km(&last, &point);
                if total_km >= config.trim_window_km {
                    break;
                }
                end.push(trim_marker(point, count - offset));
                last = point;
            }
        }
    }

    let start_center = center_of(&start);
    let end_center = center_of(&end);

    EdgeMarkers {
        start,
        end,
        start_center,
        end_center,
    }
}

fn trim_marker(point: GeoPoint, index: usize) -> TrimMarker {
    TrimMarker {
        latitude: point.latitude,
        longitude: point.longitude,
        label: format!("Point {index}"),
        index,
    }
}

fn center_of(markers: &[TrimMarker]) -> Option<GeoPoint> {
    if markers.is_empty() {
        return None;
    }
    let n = markers.len() as f64;
    let sum_lat: f64 = markers.iter().map(|m| m.latitude).sum();
    let sum_lon: f64 = markers.iter().map(|m| m.longitude).sum();
    Some(GeoPoint::new(sum_lat / n, sum_lon / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpx::{Gpx, GpxVersion, TrackSegment, Waypoint};

    fn build_track(name: &str, segments: &[&[(f64, f64)]]) -> Track {
        let mut gpx_track = gpx::Track::default();
        gpx_track.name = Some(name.to_string());
        for points in segments {
            let mut segment = TrackSegment::default();
            for &(lat, lon) in *points {
                segment.points.push(Waypoint::new(geo::Point::new(lon, lat)));
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
    fn test_short_segment_keeps_both_endpoints() {
        // Two points ~110 m apart, far below the 0.5 km step
        let track = build_track("short", &[&[(52.200, 0.05), (52.201, 0.05)]]);
        let markers = markers_for_display(&track, &GeometryConfig::default());

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].latitude, 52.200);
        assert_eq!(markers[1].latitude, 52.201);
        assert_eq!(markers[0].label, "short");
    }

    #[test]
    fn test_single_point_segment_yields_one_marker() {
        let track = build_track("dot", &[&[(52.2, 0.05)]]);
        let markers = markers_for_display(&track, &GeometryConfig::default());
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn test_display_markers_are_sparse() {
        // 50 points, ~111 m apart: ~5.5 km of track
        let points: Vec<(f64, f64)> = (0..50).map(|i| (52.0 + i as f64 * 0.001, 0.05)).collect();
        let track = build_track("long", &[&points]);

        let markers = markers_for_display(&track, &GeometryConfig::default());

        // Sub-sampled well below the input density, endpoints included
        assert!(markers.len() < 20);
        assert!(markers.len() >= 2);
        assert_eq!(markers.first().unwrap().latitude, 52.0);
        assert!((markers.last().unwrap().latitude - 52.049).abs() < 1e-9);
    }

    #[test]
    fn test_each_segment_contributes_markers() {
        let track = build_track(
            "split",
            &[
                &[(52.00, 0.05), (52.001, 0.05)],
                &[(52.10, 0.05), (52.101, 0.05)],
            ],
        );
        let markers = markers_for_display(&track, &GeometryConfig::default());
        assert_eq!(markers.len(), 4);
    }

    #[test]
    fn test_edge_markers_window_and_indices() {
        // 40 points ~111 m apart: ~4.3 km, so each window covers ~18 points
        let points: Vec<(f64, f64)> = (0..40).map(|i| (52.0 + i as f64 * 0.001, 0.05)).collect();
        let track = build_track("ride", &[&points]);

        let edges = edge_markers(&track, &GeometryConfig::default());

        // Start window: 1-based indices from the front
        assert_eq!(edges.start.first().unwrap().index, 1);
        assert_eq!(edges.start.first().unwrap().label, "Point 1");
        assert!(edges.start.len() < 40);
        assert!(edges.start.len() > 10);

        // End window: nearest the end first
        assert_eq!(edges.end.first().unwrap().index, 40);
        assert!(edges.end.len() < 40);
        assert!(edges.end.len() > 10);

        // Windows centre on their markers
        let center = edges.start_center.unwrap();
        assert!(center.latitude > 52.0);
        assert!(center.latitude < 52.01);
    }

    #[test]
    fn test_edge_markers_empty_track() {
        let track = build_track("empty", &[]);
        let edges = edge_markers(&track, &GeometryConfig::default());
        assert!(edges.start.is_empty());
        assert!(edges.end.is_empty());
        assert!(edges.start_center.is_none());
        assert!(edges.end_center.is_none());
    }
}
