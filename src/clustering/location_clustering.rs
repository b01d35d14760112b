// src/clustering/location_clustering.rs - Seed-based greedy clustering of raw listings

use indicatif::ProgressBar;
use log::{debug, info};
use rayon::prelude::*;
use std::time::Instant;

use crate::matching::phonetic::PhoneticEncoder;
use crate::matching::scorer::LocationMatcher;
use crate::models::location::RawLocation;
use crate::utils::constants::MIN_PARALLEL_CANDIDATES;

#[derive(Debug, Clone)]
pub struct ClusteringConfig {
    /// Score a seed's candidates on the rayon pool.
    pub parallel: bool,
    /// Seeds with fewer open candidates than this are scored inline.
    pub min_parallel_candidates: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_candidates: MIN_PARALLEL_CANDIDATES,
        }
    }
}

impl ClusteringConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}

/// Groups `records` into clusters of listings for the same physical place.
///
/// Records are visited in input order. Each record not yet assigned seeds a new
/// cluster, and every later unassigned record joins it when its score against
/// the seed reaches the matcher's threshold. Members are never compared with
/// each other, so membership is not transitive and depends on input order.
pub fn cluster_locations<E: PhoneticEncoder>(
    matcher: &LocationMatcher<E>,
    records: &[RawLocation],
    config: &ClusteringConfig,
    progress: Option<&ProgressBar>,
) -> Vec<Vec<RawLocation>> {
    let start = Instant::now();
    let threshold = matcher.threshold();
    let mut assigned = vec![false; records.len()];
    let mut clusters: Vec<Vec<RawLocation>> = Vec::new();
    let mut comparisons = 0usize;

    for seed_idx in 0..records.len() {
        if assigned[seed_idx] {
            continue;
        }
        assigned[seed_idx] = true;
        let seed = &records[seed_idx];

        let candidates: Vec<usize> = ((seed_idx + 1)..records.len())
            .filter(|&idx| !assigned[idx])
            .collect();
        comparisons += candidates.len();

        // Scores may be computed out of order; assignment below walks them in input order.
        let scores: Vec<f64> =
            if config.parallel && candidates.len() >= config.min_parallel_candidates {
                candidates
                    .par_iter()
                    .map(|&idx| matcher.score(seed, &records[idx]))
                    .collect()
            } else {
                candidates
                    .iter()
                    .map(|&idx| matcher.score(seed, &records[idx]))
                    .collect()
            };

        let mut cluster = vec![seed.clone()];
        for (&idx, &score) in candidates.iter().zip(scores.iter()) {
            if score >= threshold {
                assigned[idx] = true;
                cluster.push(records[idx].clone());
            }
        }

        if cluster.len() > 1 {
            debug!(
                "Seed '{}' ({}) absorbed {} listings",
                seed.name,
                seed.id,
                cluster.len() - 1
            );
        }
        if let Some(pb) = progress {
            pb.inc(cluster.len() as u64);
        }
        clusters.push(cluster);
    }

    info!(
        "Clustered {} records into {} clusters ({} merged, {} comparisons) in {:.2?}",
        records.len(),
        clusters.len(),
        records.len() - clusters.len(),
        comparisons,
        start.elapsed()
    );
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::SIMILARITY_THRESHOLD as SIMILARITY;

    fn ids(clusters: &[Vec<RawLocation>]) -> Vec<Vec<&str>> {
        clusters
            .iter()
            .map(|c| c.iter().map(|r| r.id.as_str()).collect())
            .collect()
    }

    /// A-B and B-C score above the threshold, A-C does not.
    fn chain() -> (RawLocation, RawLocation, RawLocation) {
        let make = |id: &str, lat: f64| {
            RawLocation::new(id, "usave", "Lakeside Rentals")
                .with_city("Lakeview")
                .with_coordinates(lat, 20.0)
        };
        (make("A", 10.0), make("B", 10.054), make("C", 10.108))
    }

    #[test]
    fn test_chain_scores_straddle_threshold() {
        let matcher = LocationMatcher::new();
        let (a, b, c) = chain();
        assert!(matcher.score(&a, &b) >= SIMILARITY);
        assert!(matcher.score(&b, &c) >= SIMILARITY);
        assert!(matcher.score(&a, &c) < SIMILARITY);
    }

    #[test]
    fn test_clustering_is_seed_based_and_order_dependent() {
        let matcher = LocationMatcher::new();
        let (a, b, c) = chain();
        let config = ClusteringConfig::sequential();

        let forward = cluster_locations(&matcher, &[a.clone(), b.clone(), c.clone()], &config, None);
        assert_eq!(ids(&forward), vec![vec!["A", "B"], vec!["C"]]);

        let reordered = cluster_locations(&matcher, &[b, a, c], &config, None);
        assert_eq!(ids(&reordered), vec![vec!["B", "A", "C"]]);
    }

    #[test]
    fn test_parallel_scoring_matches_sequential() {
        let matcher = LocationMatcher::new();
        let (a, b, c) = chain();
        let mut records = vec![a, b, c];
        for i in 0..40 {
            records.push(
                RawLocation::new(format!("far_{}", i), "greenmotion", "Lakeside Rentals")
                    .with_city("Lakeview")
                    .with_coordinates(30.0 + i as f64 * 0.03, 20.0),
            );
        }
        let parallel = ClusteringConfig {
            parallel: true,
            min_parallel_candidates: 0,
        };
        let seq = cluster_locations(&matcher, &records, &ClusteringConfig::sequential(), None);
        let par = cluster_locations(&matcher, &records, &parallel, None);
        assert_eq!(seq, par);
        assert_eq!(seq.iter().map(Vec::len).sum::<usize>(), records.len());
    }

    #[test]
    fn test_terminals_never_cluster() {
        let matcher = LocationMatcher::new();
        let records: Vec<RawLocation> = (1..=2)
            .map(|t| {
                RawLocation::new(format!("t{}", t), "usave", format!("Dubai Airport Terminal {}", t))
                    .with_city("Dubai")
                    .with_coordinates(25.2532, 55.3657)
            })
            .collect();
        let clusters = cluster_locations(&matcher, &records, &ClusteringConfig::default(), None);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let matcher = LocationMatcher::new();
        let pb = ProgressBar::hidden();
        assert!(cluster_locations(&matcher, &[], &ClusteringConfig::default(), Some(&pb)).is_empty());
    }
}
