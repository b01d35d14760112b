// src/matching/geo.rs
use crate::models::location::{LocationType, RawLocation};
use crate::utils::constants::{EARTH_RADIUS_KM, MAX_MERGE_DISTANCE_KM};

const AIRPORT_RADIUS_KM: f64 = 8.0;
const DOWNTOWN_RADIUS_KM: f64 = 2.0;
const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Score used when either side has no usable coordinates.
pub const NEUTRAL_GPS_SCORE: f64 = 0.5;

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let (delta_phi, delta_lambda) = ((lat2 - lat1).to_radians(), (lon2 - lon1).to_radians());
    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Airports sprawl, city-centre offices sit close together.
pub fn merge_radius_km(a: LocationType, b: LocationType) -> f64 {
    if a == LocationType::Airport || b == LocationType::Airport {
        AIRPORT_RADIUS_KM
    } else if a == LocationType::Downtown || b == LocationType::Downtown {
        DOWNTOWN_RADIUS_KM
    } else {
        DEFAULT_RADIUS_KM
    }
}

/// Piecewise distance score: gentle decay inside the radius, steep decay up to
/// twice the radius, a small tail to 50 km, then nothing.
pub fn distance_score(distance_km: f64, radius_km: f64) -> f64 {
    if distance_km <= radius_km {
        1.0 - (distance_km / radius_km) * 0.3
    } else if distance_km <= radius_km * 2.0 {
        0.5 - ((distance_km - radius_km) / radius_km) * 0.3
    } else if distance_km <= MAX_MERGE_DISTANCE_KM {
        0.2 - distance_km / 250.0
    } else {
        0.0
    }
}

pub fn gps_similarity(
    a: &RawLocation,
    b: &RawLocation,
    type_a: LocationType,
    type_b: LocationType,
) -> f64 {
    let ((lat1, lon1), (lat2, lon2)) = match (a.coordinates(), b.coordinates()) {
        (Some(pa), Some(pb)) => (pa, pb),
        _ => return NEUTRAL_GPS_SCORE,
    };
    if lat1 == lat2 && lon1 == lon2 {
        return 1.0;
    }
    let distance = haversine_km(lat1, lon1, lat2, lon2);
    distance_score(distance, merge_radius_km(type_a, type_b))
}
