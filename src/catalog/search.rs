// src/catalog/search.rs - Keyword search and exact lookups over a canonical set
use std::cmp::Ordering;

use crate::matching::normalize::normalize;
use crate::models::location::{CanonicalSet, UnifiedLocation};

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const MAX_SEARCH_LIMIT: usize = 50;
const MIN_TERM_CHARS: usize = 2;
const MAX_PROVIDER_BOOST: usize = 5;

/// Relevance of `location` for an already-normalized, non-empty term. Zero means no match.
fn relevance(location: &UnifiedLocation, term: &str) -> usize {
    let name = normalize(&location.name);
    let city = normalize(location.city.as_deref().unwrap_or(""));
    let country = normalize(location.country.as_deref().unwrap_or(""));

    let score = if name == term {
        90
    } else if name.starts_with(term) {
        80
    } else if city == term {
        70
    } else if city.starts_with(term) {
        60
    } else if name.contains(term) {
        50
    } else if city.contains(term) {
        40
    } else if country.contains(term) {
        20
    } else if location.aliases.iter().any(|a| normalize(a).contains(term)) {
        30
    } else if location
        .providers
        .iter()
        .any(|p| !p.original_name.is_empty() && normalize(&p.original_name).contains(term))
    {
        25
    } else {
        0
    };

    if score == 0 {
        0
    } else {
        score + location.providers.len().min(MAX_PROVIDER_BOOST)
    }
}

/// Best matches for a free-text term, most relevant first, ties broken by name.
/// Terms shorter than two characters match nothing; `limit` is capped at 50.
pub fn search<'a>(set: &'a CanonicalSet, term: &str, limit: usize) -> Vec<&'a UnifiedLocation> {
    let term = term.trim();
    if term.chars().count() < MIN_TERM_CHARS {
        return Vec::new();
    }
    let normalized = normalize(term);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &UnifiedLocation)> = set
        .iter()
        .map(|location| (relevance(location, &normalized), location))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| match b.0.cmp(&a.0) {
        Ordering::Equal => a.1.name.cmp(&b.1.name),
        other => other,
    });
    scored
        .into_iter()
        .take(limit.min(MAX_SEARCH_LIMIT))
        .map(|(_, location)| location)
        .collect()
}

pub fn find_by_unified_id(set: &CanonicalSet, id: u32) -> Option<&UnifiedLocation> {
    set.iter().find(|l| l.unified_location_id == id)
}

/// The unified location bookable with `provider` under `pickup_id`.
pub fn find_by_provider<'a>(
    set: &'a CanonicalSet,
    provider: &str,
    pickup_id: &str,
) -> Option<&'a UnifiedLocation> {
    set.iter()
        .find(|l| l.provider_entry(provider, pickup_id).is_some())
}
