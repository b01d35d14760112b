// src/aggregation/manager.rs - Raw listings in, canonical set out
use chrono::Utc;
use indicatif::MultiProgress;
use log::{debug, info};
use rayon::prelude::*;
use std::time::Instant;
use uuid::Uuid;

use crate::aggregation::config::AggregationConfig;
use crate::aggregation::input::dedupe_internal_locations;
use crate::clustering::cluster_locations;
use crate::matching::phonetic::PhoneticEncoder;
use crate::matching::scorer::LocationMatcher;
use crate::models::location::{CanonicalSet, RawLocation, UnifiedLocation};
use crate::models::stats_models::AggregationStats;
use crate::unification::UnifiedLocationBuilder;
use crate::utils::progress_bars::logging::AggregationLogger;
use crate::utils::progress_bars::progress_config::add_bar;

#[derive(Debug, Clone)]
pub struct AggregationOutcome {
    pub canonical_set: CanonicalSet,
    pub stats: AggregationStats,
}

/// Runs the full pipeline with the default matcher.
pub fn run_aggregation_pipeline(
    records: Vec<RawLocation>,
    config: &AggregationConfig,
    multi_progress: Option<&MultiProgress>,
) -> AggregationOutcome {
    run_aggregation_with_matcher(&LocationMatcher::new(), records, config, multi_progress)
}

/// Provider filter, internal de-duplication, clustering, then one unified
/// location per cluster in cluster order. Never fails; empty input gives an empty set.
pub fn run_aggregation_with_matcher<E: PhoneticEncoder>(
    matcher: &LocationMatcher<E>,
    records: Vec<RawLocation>,
    config: &AggregationConfig,
    multi_progress: Option<&MultiProgress>,
) -> AggregationOutcome {
    let logger = AggregationLogger::new();
    let run_start = Instant::now();
    let mut stats = AggregationStats::new(Uuid::new_v4().to_string(), Utc::now().naive_utc());
    logger.log_start(&stats.run_id, config.clustering.parallel);
    stats.total_records = records.len();

    // Phase 1: input filtering
    let phase_start = Instant::now();
    logger.log_phase("Filtering input", None);
    let (records, filtered_out) = config.provider_filter.apply(records);
    let (records, internal_duplicates) = dedupe_internal_locations(records);
    stats.records_filtered_out = filtered_out;
    stats.internal_duplicates_dropped = internal_duplicates;
    stats.records_clustered = records.len();
    stats.filtering_time = phase_start.elapsed().as_secs_f64();
    logger.log_filtering_results(stats.total_records, filtered_out, internal_duplicates);

    if records.is_empty() {
        logger.log_warning("No raw locations left to unify, producing an empty canonical set");
        stats.total_processing_time = run_start.elapsed().as_secs_f64();
        return AggregationOutcome {
            canonical_set: CanonicalSet::default(),
            stats,
        };
    }

    // Phase 2: clustering
    let phase_start = Instant::now();
    logger.log_phase(
        "Clustering",
        Some(&format!("{} records, threshold {:.2}", records.len(), matcher.threshold())),
    );
    let cluster_pb = add_bar(multi_progress, records.len() as u64, "Clustering");
    let clusters = cluster_locations(matcher, &records, &config.clustering, cluster_pb.as_ref());
    if let Some(pb) = &cluster_pb {
        pb.finish_with_message(format!("{} clusters", clusters.len()));
    }
    stats.clusters_created = clusters.len();
    stats.merged_count = records.len() - clusters.len();
    stats.multi_member_clusters = clusters.iter().filter(|c| c.len() > 1).count();
    stats.largest_cluster_size = clusters.iter().map(Vec::len).max().unwrap_or(0);
    stats.clustering_time = phase_start.elapsed().as_secs_f64();
    logger.log_clustering_complete(records.len(), clusters.len(), stats.multi_member_clusters);

    // Phase 3: building
    let phase_start = Instant::now();
    logger.log_phase("Building unified locations", None);
    let builder = UnifiedLocationBuilder::new(*matcher.classifier());
    let unified: Vec<UnifiedLocation> = if config.clustering.parallel {
        clusters
            .par_iter()
            .filter_map(|cluster| builder.build(cluster))
            .collect()
    } else {
        clusters
            .iter()
            .filter_map(|cluster| builder.build(cluster))
            .collect()
    };
    stats.building_time = phase_start.elapsed().as_secs_f64();
    debug!("Built {} unified locations", unified.len());

    let providers_mapped: usize = unified.iter().map(|u| u.providers.len()).sum();
    stats.total_processing_time = run_start.elapsed().as_secs_f64();
    logger.log_completion(unified.len(), providers_mapped);
    info!(
        "Merge ratio {:.1}% ({} largest cluster)",
        stats.merge_ratio() * 100.0,
        stats.largest_cluster_size
    );

    AggregationOutcome {
        canonical_set: CanonicalSet::new(unified),
        stats,
    }
}
