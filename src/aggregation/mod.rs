pub mod config;
pub mod input;
pub mod manager;

pub use config::AggregationConfig;
pub use manager::{run_aggregation_pipeline, run_aggregation_with_matcher, AggregationOutcome};
