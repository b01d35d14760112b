// src/matching/location_type.rs
use crate::models::location::{LocationType, RawLocation};

type KeywordTable = &'static [(LocationType, &'static [&'static str])];

/// Checked in order; the first table with a keyword contained in the name wins.
const DEFAULT_KEYWORDS: KeywordTable = &[
    (
        LocationType::Airport,
        &[
            "airport",
            "aeropuerto",
            "aeroport",
            "aéroport",
            "aeroporto",
            "flughafen",
            "terminal",
        ],
    ),
    (
        LocationType::Downtown,
        &[
            "downtown",
            "centro",
            "city center",
            "city centre",
            "centre ville",
            "centre-ville",
            "zentrum",
            "central",
        ],
    ),
    (
        LocationType::Port,
        &["port", "puerto", "porto", "harbour", "harbor", "ferry"],
    ),
    (
        LocationType::Train,
        &[
            "train",
            "station",
            "railway",
            "gare",
            "bahnhof",
            "estacion",
            "estación",
        ],
    ),
];

/// Keyword-based location type detection over lower-cased names.
#[derive(Debug, Clone, Copy)]
pub struct LocationTypeClassifier {
    keywords: KeywordTable,
}

impl Default for LocationTypeClassifier {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS,
        }
    }
}

impl LocationTypeClassifier {
    pub fn with_rules(keywords: KeywordTable) -> Self {
        Self { keywords }
    }

    pub fn classify(&self, name: &str) -> LocationType {
        let lowered = name.to_lowercase();
        self.keywords
            .iter()
            .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
            .map(|(location_type, _)| *location_type)
            .unwrap_or(LocationType::Unknown)
    }

    pub fn classify_record(&self, location: &RawLocation) -> LocationType {
        self.classify(&location.name)
    }

    /// The record's own tag when it carries a known one, otherwise the name-based guess.
    pub fn resolve(&self, location: &RawLocation) -> LocationType {
        match location.location_type {
            Some(tag) if !tag.is_unknown() => tag,
            _ => self.classify_record(location),
        }
    }
}
