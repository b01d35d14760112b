// src/utils/constants.rs

/// Minimum pairwise score for a record to join a seed's cluster.
pub const SIMILARITY_THRESHOLD: f64 = 0.75;

/// `source` value used by the operator's own catalog.
pub const INTERNAL_SOURCE: &str = "internal";

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Beyond this distance two records are never considered the same place.
pub const MAX_MERGE_DISTANCE_KM: f64 = 50.0;

pub const DEFAULT_UNIFIED_LOCATIONS_PATH: &str = "unified_locations.json";

/// Below this many candidates a seed is scored on the calling thread.
pub const MIN_PARALLEL_CANDIDATES: usize = 64;
