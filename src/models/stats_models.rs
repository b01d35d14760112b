// src/models/stats_models.rs
use chrono::NaiveDateTime;
use serde::Serialize;

/// Counters and timings for a single aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct AggregationStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub total_records: usize,
    pub records_filtered_out: usize,
    pub internal_duplicates_dropped: usize,
    pub records_clustered: usize,
    pub clusters_created: usize,
    pub merged_count: usize,
    pub multi_member_clusters: usize,
    pub largest_cluster_size: usize,
    pub filtering_time: f64,
    pub clustering_time: f64,
    pub building_time: f64,
    pub total_processing_time: f64,
}

impl AggregationStats {
    pub fn new(run_id: String, run_timestamp: NaiveDateTime) -> Self {
        Self {
            run_id,
            run_timestamp,
            total_records: 0,
            records_filtered_out: 0,
            internal_duplicates_dropped: 0,
            records_clustered: 0,
            clusters_created: 0,
            merged_count: 0,
            multi_member_clusters: 0,
            largest_cluster_size: 0,
            filtering_time: 0.0,
            clustering_time: 0.0,
            building_time: 0.0,
            total_processing_time: 0.0,
        }
    }

    /// Share of clustered records that were folded into another record's cluster.
    pub fn merge_ratio(&self) -> f64 {
        if self.records_clustered == 0 {
            0.0
        } else {
            self.merged_count as f64 / self.records_clustered as f64
        }
    }
}
