// src/lib.rs
pub mod aggregation;
pub mod catalog;
pub mod clustering;
pub mod matching;
pub mod models;
pub mod unification;
pub mod utils;

pub use aggregation::manager::{run_aggregation_pipeline, AggregationOutcome};
pub use matching::scorer::LocationMatcher;
pub use models::location::{CanonicalSet, LocationType, ProviderMapping, RawLocation, UnifiedLocation};
