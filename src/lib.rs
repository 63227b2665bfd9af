//! # Route Geometry
//!
//! GPX route geometry for club route libraries: track reduction, cafe/POI
//! proximity, interactive start/end trimming and loop-direction analysis.
//!
//! This library provides:
//! - A GPX-backed track model with atomic file rewrite
//! - Track reduction (distance/ascent stats + minimum-spacing sub-sampling)
//! - POI proximity and association against a route
//! - Start/end trim operations with audit counts
//! - Map marker sub-sampling and elevation profiles
//! - Clockwise / counter-clockwise loop classification
//!
//! Every operation is stateless: it takes a [`Track`] (or POI set) and
//! returns a new value or a derived result. Nothing blocks on the network;
//! file I/O is synchronous and local. Serializing writes to the *same*
//! backing file is the caller's responsibility; the library provides no
//! file locking of its own.
//!
//! ## Quick Start
//!
//! ```rust
//! use route_geometry::{markers_for_display, GeometryConfig, Track};
//!
//! let mut track = Track::new("Sunday loop");
//! track.append_point(52.2053, 0.1218, Some(12.0));
//! track.append_point(52.2103, 0.1218, Some(14.0));
//! track.append_point(52.2103, 0.1318, Some(15.0));
//! track.append_point(52.2053, 0.1218, Some(12.0));
//!
//! let config = GeometryConfig::default();
//! let markers = markers_for_display(&track, &config);
//! assert!(!markers.is_empty());
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackFileError};

// Geographic utilities (distance, bearing, bounds)
pub mod geo_utils;
pub use geo_utils::{bearing_deg, distance_km};

// GPX-backed track model and parser adapter
pub mod track;
pub use track::{has_gpx_extension, Track};

// Track reduction pipeline (stats + sub-sampled rewrite)
pub mod reduce;
pub use reduce::{reduce_track, ReductionResult};

// Start/end trim operations
pub mod trim;
pub use trim::{trim_end, trim_start, TrimResult};

// POI proximity/association engine
pub mod proximity;
pub use proximity::{
    associate_pois, associate_tracks, associations_from_json, associations_to_json,
    nearest_approach, ClosestApproach,
};

// Map marker sub-sampling and trim windows
pub mod markers;
pub use markers::{edge_markers, markers_for_display, EdgeMarkers, Marker, TrimMarker};

// Elevation profile series
pub mod profile;
pub use profile::{elevation_profile, poi_profile_points, PoiProfilePoint, ProfilePoint};

// Loop direction classifier
pub mod direction;
pub use direction::{classify_direction, classify_route_file, Direction};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude, in degrees.
///
/// # Example
/// ```
/// use route_geometry::GeoPoint;
/// let point = GeoPoint::new(52.2053, 0.1218); // Cambridge
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

impl From<&gpx::Waypoint> for GeoPoint {
    fn from(wp: &gpx::Waypoint) -> Self {
        // gpx stores points as (x, y) = (lon, lat)
        Self {
            latitude: wp.point().y(),
            longitude: wp.point().x(),
        }
    }
}

/// A point of interest (e.g. a cafe) supplied by the caller.
///
/// The library does not own POIs; it consumes their coordinates and
/// identifiers and returns associations. Any caller-side store exposing
/// `(id, lat, lon)` per element can be mapped onto this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Poi {
    pub fn new(id: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
        }
    }

    /// The POI's coordinate.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A POI associated with a route.
///
/// Field names match the JSON shape the caller persists:
/// `{"poi_id": .., "dist_km": .., "range_km": ..}` where `dist_km` is the
/// closest approach of the route to the POI and `range_km` is the distance
/// along the route at which that closest approach occurs. Values are not
/// rounded here; rounding (to 1 decimal place for display) is applied by
/// the caller at persistence time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Association {
    pub poi_id: i64,
    pub dist_km: f64,
    pub range_km: f64,
}

/// Configuration for the geometry operations.
#[derive(Debug, Clone)]
pub struct GeometryConfig {
    /// Maximum closest-approach distance for a POI to be associated with a
    /// route. Default: 1.0 km
    pub poi_threshold_km: f64,

    /// Minimum spacing between retained points when reducing a raw track.
    /// Raw consumer GPS recordings can contain thousands of near-duplicate
    /// points. Default: 0.05 km (50 m)
    pub min_resolution_km: f64,

    /// Minimum spacing between map display markers. Plotting every raw
    /// point makes the map a mess. Default: 0.5 km
    pub display_step_km: f64,

    /// Length of the start/end windows offered on the interactive trim
    /// maps. Default: 2.0 km
    pub trim_window_km: f64,

    /// Maximum start-to-finish separation for a route to count as a loop
    /// when classifying direction. Default: 10.0 km
    pub closing_tolerance_km: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            poi_threshold_km: 1.0,
            min_resolution_km: 0.05,
            display_step_km: 0.5,
            trim_window_km: 2.0,
            closing_tolerance_km: 10.0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
