use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

use unification_lib::aggregation::input::load_raw_locations;
use unification_lib::aggregation::{run_aggregation_pipeline, AggregationConfig};
use unification_lib::catalog::save_snapshot;
use unification_lib::utils::env::load_env;
use unification_lib::utils::get_memory_usage;
use unification_lib::utils::progress_bars::logging::AggregationLogger;
use unification_lib::utils::progress_bars::progress_config::ProgressConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw location JSON files (overrides RAW_LOCATION_FILES)
    #[arg(long, value_delimiter = ',')]
    input: Vec<PathBuf>,

    /// Snapshot output path (overrides UNIFIED_LOCATIONS_PATH)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Score candidates on a single thread
    #[arg(long)]
    sequential: bool,

    /// Worker threads for scoring and building
    #[arg(long)]
    threads: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting location unification pipeline");
    load_env();
    let args = Args::parse();

    let mut config = AggregationConfig::from_env();
    if !args.input.is_empty() {
        config.input_files = args.input;
    }
    if let Some(output) = args.output {
        config.output_path = output;
    }
    if args.sequential {
        config.clustering.parallel = false;
    }
    if let Some(threads) = args.threads {
        config.scoring_threads = threads.max(1);
    }
    config.log_config();

    if config.input_files.is_empty() {
        anyhow::bail!("No input files given; pass --input or set RAW_LOCATION_FILES");
    }

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.scoring_threads)
        .build_global()
    {
        warn!("Could not size the rayon pool, using its defaults: {}", e);
    }

    let progress_config = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, detailed={}",
        progress_config.enabled, progress_config.detailed
    );
    let multi_progress = progress_config.create_multi_progress();
    let main_pb = multi_progress.as_ref().map(|mp| {
        let pb = mp.add(ProgressBar::new(3));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb.set_message("Loading raw locations...");
        pb
    });

    let logger = AggregationLogger::new();

    // Phase 1: load supplier exports
    logger.log_phase("Loading raw locations", None);
    let phase1_start = Instant::now();
    let records = load_raw_locations(&config.input_files)
        .await
        .context("Failed to load raw locations")?;
    logger.log_data_loaded(records.len(), "raw location");
    let phase1_duration = phase1_start.elapsed();
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.set_message("Unifying locations...");
    }

    // Phase 2: cluster and build, off the async runtime
    let phase2_start = Instant::now();
    let pipeline_config = config.clone();
    let pipeline_progress = if progress_config.should_show_detailed() {
        multi_progress.clone()
    } else {
        None
    };
    let outcome = tokio::task::spawn_blocking(move || {
        run_aggregation_pipeline(records, &pipeline_config, pipeline_progress.as_ref())
    })
    .await
    .context("Aggregation task panicked")?;
    let phase2_duration = phase2_start.elapsed();
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.set_message("Saving snapshot...");
    }

    // Phase 3: persist
    logger.log_phase("Saving snapshot", Some(&config.output_path.display().to_string()));
    let phase3_start = Instant::now();
    save_snapshot(&config.output_path, &outcome.canonical_set)
        .await
        .context("Failed to save unified locations snapshot")?;
    let phase3_duration = phase3_start.elapsed();
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.finish_with_message(format!(
            "Done: {} unified locations",
            outcome.canonical_set.len()
        ));
    }

    let stats = &outcome.stats;
    let total_time = phase1_duration + phase2_duration + phase3_duration;
    info!("=== Unification Summary ===");
    info!("Run ID: {}", stats.run_id);
    if config.provider_filter.is_active() {
        info!("🔍 Provider Filter: ACTIVE ({:?})", config.provider_filter.allowed_providers);
    }
    info!("Raw records: {}", stats.total_records);
    info!("Dropped by provider filter: {}", stats.records_filtered_out);
    info!("Duplicate internal listings dropped: {}", stats.internal_duplicates_dropped);
    info!("Clusters created: {}", stats.clusters_created);
    info!("Records merged: {} ({:.1}%)", stats.merged_count, stats.merge_ratio() * 100.0);
    info!("Largest cluster: {}", stats.largest_cluster_size);
    info!("=== Timing Breakdown ===");
    info!("Phase 1 (Loading): {:.2?}", phase1_duration);
    info!("Phase 2 (Unification): {:.2?}", phase2_duration);
    info!("  Clustering: {:.2}s, building: {:.2}s", stats.clustering_time, stats.building_time);
    info!("Phase 3 (Snapshot): {:.2?}", phase3_duration);
    info!("Total execution time: {:.2?}", total_time);

    if progress_config.should_show_memory() {
        let final_memory_mb = get_memory_usage().await;
        info!("Final memory usage: {} MB", final_memory_mb);
    }

    info!("Unification completed successfully!");
    Ok(())
}
