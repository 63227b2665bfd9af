//! Elevation profile series.
//!
//! The elevation chart wants full input resolution, so unlike the map
//! markers nothing is sub-sampled here: one sample per track point, with
//! the cumulative along-track distance as the x-axis.

use serde::{Deserialize, Serialize};

use crate::geo_utils::distance_km;
use crate::track::Track;
use crate::{Association, GeoPoint};

/// One sample of the elevation profile. Points without elevation read as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub distance_km: f64,
    pub elevation_m: f64,
}

/// A POI placed on the elevation profile: the elevation of the profile
/// sample nearest to the POI's distance along the route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoiProfilePoint {
    pub poi_id: i64,
    pub distance_km: f64,
    pub elevation_m: f64,
}

/// Build the elevation profile for a track.
///
/// One sample per input point. The distance cursor restarts at each
/// segment's first point, so inter-segment gaps contribute nothing, while
/// the accumulated distance itself carries across segments. Values are
/// unrounded; display rounding is the caller's concern.
pub fn elevation_profile(track: &Track) -> Vec<ProfilePoint> {
    let mut profile = Vec::new();
    let mut along_km = 0.0;

    for segment in track.segments() {
        let Some(first) = segment.points.first() else {
            continue;
        };
        let mut last = GeoPoint::from(first);

        for wp in &segment.points {
            let point = GeoPoint::from(wp);
            along_km += distance_km(&last, &point);

            profile.push(ProfilePoint {
                distance_km: along_km,
                elevation_m: wp.elevation.unwrap_or(0.0),
            });

            last = point;
        }
    }

    profile
}

/// Place associated POIs on an elevation profile.
///
/// For each association, finds the profile sample whose distance is
/// nearest the association's `range_km` and uses that sample's elevation.
/// An empty profile places POIs at elevation 0.
pub fn poi_profile_points(
    profile: &[ProfilePoint],
    associations: &[Association],
) -> Vec<PoiProfilePoint> {
    associations
        .iter()
        .map(|assoc| {
            let mut closest_km = f64::INFINITY;
            let mut elevation_m = 0.0;

            for sample in profile {
                let delta_km = (sample.distance_km - assoc.range_km).abs();
                if delta_km < closest_km {
                    closest_km = delta_km;
                    elevation_m = sample.elevation_m;
                }
            }

            PoiProfilePoint {
                poi_id: assoc.poi_id,
                distance_km: assoc.range_km,
                elevation_m,
            }
        })
        .collect()
}
