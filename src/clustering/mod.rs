pub mod location_clustering;

pub use location_clustering::{cluster_locations, ClusteringConfig};
