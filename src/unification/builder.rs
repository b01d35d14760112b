// src/unification/builder.rs - Merges one cluster of raw listings into a unified location
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::matching::location_type::LocationTypeClassifier;
use crate::models::location::{ProviderMapping, RawLocation, UnifiedLocation};

/// Names ending in a postcode or numeric code are poor display names.
static TRAILING_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4,5}$").unwrap());

#[derive(Debug, Clone, Default)]
pub struct UnifiedLocationBuilder {
    classifier: LocationTypeClassifier,
}

impl UnifiedLocationBuilder {
    pub fn new(classifier: LocationTypeClassifier) -> Self {
        Self { classifier }
    }

    /// `None` only for an empty cluster. Deterministic for a given member order.
    pub fn build(&self, cluster: &[RawLocation]) -> Option<UnifiedLocation> {
        let first = cluster.first()?;

        let (best_name, seed) = best_name(cluster).unwrap_or(("", first));
        let location_type = self.classifier.resolve(seed);

        let mut name = best_name.trim().to_string();
        if !location_type.is_unknown() {
            if let Some(city) = seed.city.as_deref().map(str::trim) {
                if !city.is_empty() && name.to_lowercase() == city.to_lowercase() {
                    name = format!("{} {}", city, location_type.title());
                }
            }
        }

        let aliases = collect_aliases(cluster, &name);
        let (providers, our_location_id) = collect_providers(cluster);
        let (latitude, longitude) = centroid(cluster, seed);

        let unified = UnifiedLocation {
            unified_location_id: unified_id(&name),
            name,
            aliases,
            city: seed.city.clone(),
            country: seed.country.clone(),
            latitude,
            longitude,
            location_type,
            providers,
            our_location_id,
        };
        debug!(
            "Built unified location {} '{}' from {} listings ({} providers)",
            unified.unified_location_id,
            unified.name,
            cluster.len(),
            unified.providers.len()
        );
        Some(unified)
    }
}

/// Stable id derived from the display name: CRC-32 (IEEE) of its lower-cased form.
pub fn unified_id(name: &str) -> u32 {
    crc32fast::hash(name.to_lowercase().as_bytes())
}

/// Longest name (in characters) that does not end in a numeric code; the first wins ties.
fn best_name(cluster: &[RawLocation]) -> Option<(&str, &RawLocation)> {
    let mut best: Option<(&str, &RawLocation, usize)> = None;
    for location in cluster {
        if location.name.is_empty() || TRAILING_CODE.is_match(&location.name) {
            continue;
        }
        let len = location.name.chars().count();
        if best.map_or(true, |(_, _, best_len)| len > best_len) {
            best = Some((location.name.as_str(), location, len));
        }
    }
    best.map(|(name, location, _)| (name, location))
}

fn collect_aliases(cluster: &[RawLocation], name: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    cluster
        .iter()
        .map(|l| l.name.as_str())
        .filter(|n| !n.is_empty() && *n != name)
        .filter(|n| seen.insert(*n))
        .map(str::to_string)
        .collect()
}

fn collect_providers(cluster: &[RawLocation]) -> (Vec<ProviderMapping>, Option<String>) {
    let mut providers = Vec::new();
    let mut seen = HashSet::new();
    let mut our_location_id = None;

    for location in cluster {
        if location.is_internal() {
            our_location_id = Some(location.id.clone());
            continue;
        }
        let pickup_id = match location.provider_location_id.as_deref() {
            Some(pid) if !pid.is_empty() => pid,
            _ => continue,
        };
        if seen.insert((location.source.as_str(), pickup_id)) {
            providers.push(ProviderMapping {
                provider: location.source.clone(),
                pickup_id: pickup_id.to_string(),
                original_name: location.name.clone(),
            });
        }
    }
    (providers, our_location_id)
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Mean of the members' usable coordinates; the seed's raw values when none have any.
fn centroid(cluster: &[RawLocation], seed: &RawLocation) -> (f64, f64) {
    let points: Vec<(f64, f64)> = cluster.iter().filter_map(RawLocation::coordinates).collect();
    if points.is_empty() {
        return (
            round6(seed.latitude.unwrap_or(0.0)),
            round6(seed.longitude.unwrap_or(0.0)),
        );
    }
    let n = points.len() as f64;
    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(la, lo), (lat, lon)| (la + lat, lo + lon));
    (round6(lat_sum / n), round6(lon_sum / n))
}
