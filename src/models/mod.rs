pub mod location;
pub mod stats_models;
