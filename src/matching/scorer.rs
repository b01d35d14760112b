// src/matching/scorer.rs - Pairwise similarity between raw location records
use log::debug;
use serde::Serialize;

use crate::matching::geo::gps_similarity;
use crate::matching::location_type::LocationTypeClassifier;
use crate::matching::name::{has_terminal_conflict, levenshtein_similarity, name_similarity};
use crate::matching::normalize::normalize;
use crate::matching::phonetic::{MetaphoneEncoder, PhoneticEncoder};
use crate::models::location::{LocationType, RawLocation};
use crate::utils::constants::SIMILARITY_THRESHOLD;

const GPS_WEIGHT: f64 = 0.40;
const NAME_WEIGHT: f64 = 0.30;
const CITY_WEIGHT: f64 = 0.15;
const TYPE_WEIGHT: f64 = 0.15;

/// Below this GPS score the records are too far apart for anything else to matter.
const MIN_GPS_SCORE: f64 = 0.1;

const CITY_CONTAINED_SCORE: f64 = 0.9;
const SAME_COUNTRY_SCORE: f64 = 0.5;
const NO_CITY_SCORE: f64 = 0.3;
const TYPE_UNKNOWN_SCORE: f64 = 0.7;
const TYPE_MISMATCH_SCORE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreOutcome {
    /// Same normalized name, city and country.
    ExactKey,
    /// Different terminal numbers at the same airport.
    TerminalConflict,
    /// GPS score under the cutoff.
    TooFar,
    Weighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    pub gps: f64,
    pub name: f64,
    pub city: f64,
    pub location_type: f64,
    pub total: f64,
    pub outcome: ScoreOutcome,
}

impl SimilarityBreakdown {
    fn decided(total: f64, outcome: ScoreOutcome) -> Self {
        Self {
            gps: 0.0,
            name: 0.0,
            city: 0.0,
            location_type: 0.0,
            total,
            outcome,
        }
    }
}

/// Scores pairs of raw records. Pure and symmetric; never fails.
#[derive(Debug, Clone, Default)]
pub struct LocationMatcher<E: PhoneticEncoder = MetaphoneEncoder> {
    encoder: E,
    classifier: LocationTypeClassifier,
}

impl LocationMatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: PhoneticEncoder> LocationMatcher<E> {
    pub fn with_encoder(encoder: E) -> Self {
        Self::with_parts(encoder, LocationTypeClassifier::default())
    }

    pub fn with_parts(encoder: E, classifier: LocationTypeClassifier) -> Self {
        Self { encoder, classifier }
    }

    pub fn classifier(&self) -> &LocationTypeClassifier {
        &self.classifier
    }

    pub fn threshold(&self) -> f64 {
        SIMILARITY_THRESHOLD
    }

    pub fn score(&self, a: &RawLocation, b: &RawLocation) -> f64 {
        self.score_breakdown(a, b).total
    }

    pub fn is_match(&self, a: &RawLocation, b: &RawLocation) -> bool {
        self.score(a, b) >= self.threshold()
    }

    pub fn score_breakdown(&self, a: &RawLocation, b: &RawLocation) -> SimilarityBreakdown {
        let key_a = exact_key(a);
        if !key_a.is_empty() && key_a == exact_key(b) {
            debug!("Exact key match {} ~ {} ({})", a.id, b.id, key_a);
            return SimilarityBreakdown::decided(1.0, ScoreOutcome::ExactKey);
        }

        if has_terminal_conflict(&a.name, &b.name) {
            debug!(
                "Terminal conflict between '{}' ({}) and '{}' ({})",
                a.name, a.id, b.name, b.id
            );
            return SimilarityBreakdown::decided(0.0, ScoreOutcome::TerminalConflict);
        }

        let type_a = self.classifier.classify_record(a);
        let type_b = self.classifier.classify_record(b);

        let gps = gps_similarity(a, b, type_a, type_b);
        if gps < MIN_GPS_SCORE {
            debug!("Rejecting {} ~ {}: too far apart (gps {:.3})", a.id, b.id, gps);
            return SimilarityBreakdown {
                gps,
                ..SimilarityBreakdown::decided(0.0, ScoreOutcome::TooFar)
            };
        }

        let name = name_similarity(&self.encoder, &a.name, &b.name);
        let city = city_similarity(a, b);
        let location_type = type_similarity(type_a, type_b);
        let total = GPS_WEIGHT * gps
            + NAME_WEIGHT * name
            + CITY_WEIGHT * city
            + TYPE_WEIGHT * location_type;

        debug!(
            "{} ~ {}: total {:.3} (gps {:.3}, name {:.3}, city {:.3}, type {:.3}) -> {}",
            a.id,
            b.id,
            total,
            gps,
            name,
            city,
            location_type,
            if total >= SIMILARITY_THRESHOLD { "merge" } else { "keep apart" }
        );

        SimilarityBreakdown {
            gps,
            name,
            city,
            location_type,
            total,
            outcome: ScoreOutcome::Weighted,
        }
    }

    /// Every other record scoring at or above the threshold against `probe`, best first.
    pub fn find_similar<'a>(
        &self,
        probe: &RawLocation,
        all: &'a [RawLocation],
    ) -> Vec<(&'a RawLocation, f64)> {
        let mut similar: Vec<(&RawLocation, f64)> = all
            .iter()
            .filter(|other| !(other.id == probe.id && other.source == probe.source))
            .map(|other| (other, self.score(probe, other)))
            .filter(|(_, score)| *score >= self.threshold())
            .collect();
        similar.sort_by(|a, b| b.1.total_cmp(&a.1));
        similar
    }
}

/// `name|city|country`, or empty when any part normalizes to nothing.
fn exact_key(location: &RawLocation) -> String {
    let parts = [
        normalize(&location.name),
        normalize(location.city_str()),
        normalize(location.country_str()),
    ];
    if parts.iter().any(|p| p.is_empty()) {
        return String::new();
    }
    parts.join("|")
}

fn city_similarity(a: &RawLocation, b: &RawLocation) -> f64 {
    let city_a = normalize(a.city_str());
    let city_b = normalize(b.city_str());
    if city_a.is_empty() || city_b.is_empty() {
        let country_a = normalize(a.country_str());
        return if !country_a.is_empty() && country_a == normalize(b.country_str()) {
            SAME_COUNTRY_SCORE
        } else {
            NO_CITY_SCORE
        };
    }
    if city_a == city_b {
        1.0
    } else if city_a.contains(&city_b) || city_b.contains(&city_a) {
        CITY_CONTAINED_SCORE
    } else {
        levenshtein_similarity(&city_a, &city_b)
    }
}

fn type_similarity(a: LocationType, b: LocationType) -> f64 {
    if a == b {
        1.0
    } else if a.is_unknown() || b.is_unknown() {
        TYPE_UNKNOWN_SCORE
    } else {
        TYPE_MISMATCH_SCORE
    }
}
