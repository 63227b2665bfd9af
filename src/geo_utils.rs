//! # Geographic Utilities
//!
//! Core geographic computation utilities for GPS track analysis.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`distance_km`] | Great-circle distance between two points |
//! | [`bearing_deg`] | Planar bearing from one point to another |
//! | [`km_to_degrees`] | Convert kilometres to approximate degrees at a latitude |
//! | [`Bounds`] | Bounding box over a set of points |
//!
//! ## Algorithm Notes
//!
//! ### Haversine Formula
//!
//! The haversine formula calculates the great-circle distance between two
//! points on a sphere. It's the standard method for GPS distance
//! calculation, accurate to within 0.3% for most practical applications.
//!
//! ### Coordinate System
//!
//! All functions expect WGS84 coordinates (latitude/longitude in degrees),
//! which is the standard used by GPS receivers and mapping services.
//! Coordinates are not range-validated; NaN input propagates to NaN output.

use crate::GeoPoint;
use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

// =============================================================================
// Distance & Bearing
// =============================================================================

/// Calculate the great-circle distance between two points in kilometres.
///
/// Uses the haversine formula on a spherical Earth (radius 6,371 km).
/// Symmetric in its arguments; zero for identical points.
///
/// # Example
///
/// ```rust
/// use route_geometry::{distance_km, GeoPoint};
///
/// let london = GeoPoint::new(51.5074, -0.1278);
/// let paris = GeoPoint::new(48.8566, 2.3522);
///
/// let distance = distance_km(&london, &paris);
/// assert!((distance - 343.5).abs() < 5.0); // ~344 km
/// ```
#[inline]
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let p1 = Point::new(a.longitude, a.latitude);
    let p2 = Point::new(b.longitude, b.latitude);
    Haversine::distance(p1, p2) / 1000.0
}

/// Planar bearing from one point to another, in degrees.
///
/// Computed as `atan2(Δlat, Δlon)`, so 0° points due east and 90° due
/// north, with results in (−180°, 180°]. This is the flat-earth angle the
/// loop-direction classifier compares: adequate over the few degrees a
/// route spans, and deliberately not a true great-circle bearing.
///
/// Identical points yield 0° (`atan2(0, 0)`), which keeps single-point
/// segments stable rather than erroring.
#[inline]
pub fn bearing_deg(from: &GeoPoint, to: &GeoPoint) -> f64 {
    (to.latitude - from.latitude)
        .atan2(to.longitude - from.longitude)
        .to_degrees()
}

/// Convert kilometres to approximate degrees at a given latitude.
///
/// At the equator, 1 degree ≈ 111.32 km; the longitude scale shrinks with
/// `cos(latitude)`. The cosine is floored so the conversion stays finite
/// near the poles. The returned value is deliberately generous (it uses
/// the shrunken longitude scale for both axes), which suits its use as a
/// bounding-box buffer: a point inside the true range is never excluded.
#[inline]
pub fn km_to_degrees(km: f64, latitude: f64) -> f64 {
    let lat_rad = latitude.to_radians();
    let km_per_degree = 111.32 * lat_rad.cos().max(0.1);
    km / km_per_degree
}

// =============================================================================
// Bounding Box
// =============================================================================

/// Bounding box over a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Compute bounds from an iterator of points.
    ///
    /// Returns `None` for empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;

        let mut bounds = Bounds {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        };

        for p in iter {
            bounds.min_lat = bounds.min_lat.min(p.latitude);
            bounds.max_lat = bounds.max_lat.max(p.latitude);
            bounds.min_lon = bounds.min_lon.min(p.longitude);
            bounds.max_lon = bounds.max_lon.max(p.longitude);
        }

        Some(bounds)
    }

    /// Check whether a point lies within the bounds expanded by
    /// `buffer_km` on every side.
    ///
    /// Useful for quick spatial filtering before an expensive
    /// point-by-point scan: a POI outside the buffered bounds cannot come
    /// within `buffer_km` of any point the bounds were computed from.
    pub fn contains_buffered(&self, point: &GeoPoint, buffer_km: f64) -> bool {
        // Use the widest latitude in the box so the buffer is never too small.
        let reference_lat = self.min_lat.abs().max(self.max_lat.abs());
        let buffer_deg = km_to_degrees(buffer_km, reference_lat);

        point.latitude >= self.min_lat - buffer_deg
            && point.latitude <= self.max_lat + buffer_deg
            && point.longitude >= self.min_lon - buffer_deg
            && point.longitude <= self.max_lon + buffer_deg
    }

    /// The centre of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
