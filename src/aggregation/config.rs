// src/aggregation/config.rs
use log::info;
use std::path::PathBuf;

use crate::clustering::ClusteringConfig;
use crate::utils::constants::{DEFAULT_UNIFIED_LOCATIONS_PATH, MIN_PARALLEL_CANDIDATES};
use crate::utils::env::{env_list, env_or};
use crate::utils::provider_filter::ProviderFilterConfig;

/// Everything one aggregation run needs to know besides the records themselves.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// JSON arrays of raw listings, one file per supplier export.
    pub input_files: Vec<PathBuf>,
    /// Where the canonical set snapshot is written.
    pub output_path: PathBuf,
    pub clustering: ClusteringConfig,
    /// Size of the rayon pool used for scoring and building.
    pub scoring_threads: usize,
    pub provider_filter: ProviderFilterConfig,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            input_files: Vec::new(),
            output_path: PathBuf::from(DEFAULT_UNIFIED_LOCATIONS_PATH),
            clustering: ClusteringConfig::default(),
            scoring_threads: num_cpus::get(),
            provider_filter: ProviderFilterConfig::default(),
        }
    }
}

impl AggregationConfig {
    pub fn from_env() -> Self {
        let input_files = env_list("RAW_LOCATION_FILES")
            .into_iter()
            .map(PathBuf::from)
            .collect();
        let output_path = PathBuf::from(env_or(
            "UNIFIED_LOCATIONS_PATH",
            DEFAULT_UNIFIED_LOCATIONS_PATH.to_string(),
        ));
        let clustering = ClusteringConfig {
            parallel: env_or("PARALLEL_SCORING", true),
            min_parallel_candidates: env_or("PARALLEL_MIN_CANDIDATES", MIN_PARALLEL_CANDIDATES),
        };
        let scoring_threads = env_or("SCORING_THREADS", num_cpus::get()).max(1);

        Self {
            input_files,
            output_path,
            clustering,
            scoring_threads,
            provider_filter: ProviderFilterConfig::from_env(),
        }
    }

    pub fn log_config(&self) {
        info!("Input files: {:?}", self.input_files);
        info!("Snapshot path: {}", self.output_path.display());
        info!(
            "Scoring: parallel={}, threads={}, min candidates for parallel scoring={}",
            self.clustering.parallel, self.scoring_threads, self.clustering.min_parallel_candidates
        );
        self.provider_filter.log_config();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AggregationConfig::default();
        assert!(config.input_files.is_empty());
        assert_eq!(config.output_path, PathBuf::from("unified_locations.json"));
        assert!(config.clustering.parallel);
        assert!(config.scoring_threads >= 1);
        assert!(!config.provider_filter.is_active());
    }
}
