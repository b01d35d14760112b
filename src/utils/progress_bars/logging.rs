// src/utils/progress_bars/logging.rs - Logging helpers for the aggregation run
use log::{info, warn};
use std::time::Instant;

#[derive(Clone)]
pub struct AggregationLogger {
    tag: &'static str,
    emoji: &'static str,
    start_time: Instant,
}

impl Default for AggregationLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregationLogger {
    pub fn new() -> Self {
        Self {
            tag: "UNIFY",
            emoji: "📍",
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, run_id: &str, parallel: bool) {
        info!(
            "[{}] {} 🚀 Starting location unification (run ID: {}){}",
            self.tag,
            self.emoji,
            run_id,
            if parallel { " with parallel scoring" } else { " (sequential scoring)" }
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.tag, self.emoji, phase, details, elapsed.as_secs_f32()
            ),
            None => info!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.tag, self.emoji, phase, elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_data_loaded(&self, count: usize, data_type: &str) {
        info!(
            "[{}] {} 📊 Loaded {} {} records",
            self.tag, self.emoji, count, data_type
        );
    }

    pub fn log_filtering_results(&self, original: usize, filtered_out: usize, internal_duplicates: usize) {
        let remaining = original.saturating_sub(filtered_out + internal_duplicates);
        info!(
            "[{}] {} 🎯 Input filtering: {} total → {} remaining",
            self.tag, self.emoji, original, remaining
        );
        if filtered_out + internal_duplicates > 0 {
            info!(
                "[{}] {} 🚫 Dropped: {} by provider filter, {} duplicate internal listings",
                self.tag, self.emoji, filtered_out, internal_duplicates
            );
        }
    }

    pub fn log_clustering_complete(&self, records: usize, clusters: usize, multi_member: usize) {
        info!(
            "[{}] {} ✅ Clustering complete: {} raw records → {} clusters ({} with 2+ records, {} merged)",
            self.tag,
            self.emoji,
            records,
            clusters,
            multi_member,
            records.saturating_sub(clusters)
        );
    }

    pub fn log_completion(&self, unified: usize, providers_mapped: usize) {
        let duration = self.start_time.elapsed();
        info!(
            "[{}] {} 🎉 COMPLETED: {} unified locations built in {:.2?}",
            self.tag, self.emoji, unified, duration
        );
        info!(
            "[{}] {} 📊 Results: {} provider mappings across the canonical set",
            self.tag, self.emoji, providers_mapped
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] {} ⚠️  {}", self.tag, self.emoji, message);
    }
}
