// src/matching/name.rs - Location name normalization and similarity
use once_cell::sync::Lazy;
use regex::Regex;
use strsim::levenshtein;

use crate::matching::normalize::strip_diacritics;
use crate::matching::phonetic::PhoneticEncoder;

/// Noise removed from names before comparison, applied in order.
static NAME_NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(international|intl|int'l)\b",
        r"\bterminal\s*\d*\b",
        r"\bt\d\b",
        r"[,.\-/\\]+",
        r"\b\d{4,5}\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static NON_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
static TERMINAL_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)terminal\s*(\d+)").unwrap());
static TERMINAL_SHORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bt\s*(\d+)\b").unwrap());

const NEAR_IDENTICAL_NAME: f64 = 0.9;
const NEAR_IDENTICAL_BOOST: f64 = 1.1;
const PHONETIC_EXACT_SCORE: f64 = 0.95;
const PHONETIC_PARTIAL_WEIGHT: f64 = 0.8;

/// Reduces a location name to the words that identify the place:
/// "Málaga Airport, Terminal 2 (AGP) 29004" -> "malaga airport agp".
pub fn normalize_location_name(name: &str) -> String {
    let mut normalized = name.to_lowercase();
    for re in NAME_NOISE_PATTERNS.iter() {
        normalized = re.replace_all(&normalized, " ").into_owned();
    }
    normalized = strip_diacritics(&normalized);
    normalized = NON_NAME_CHARS.replace_all(&normalized, "").into_owned();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Terminal number from "Terminal 2" / "terminal2" or a standalone "T2".
pub fn extract_terminal_number(name: &str) -> Option<u32> {
    TERMINAL_WORD
        .captures(name)
        .or_else(|| TERMINAL_SHORT.captures(name))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Both names name a terminal and the numbers differ.
pub fn has_terminal_conflict(a: &str, b: &str) -> bool {
    matches!(
        (extract_terminal_number(a), extract_terminal_number(b)),
        (Some(ta), Some(tb)) if ta != tb
    )
}

/// `1 - distance / longest`, lengths in characters.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

pub fn phonetic_similarity<E: PhoneticEncoder + ?Sized>(encoder: &E, a: &str, b: &str) -> f64 {
    let code_a = encoder.encode(a);
    let code_b = encoder.encode(b);
    // two names with no phonetic information still encode equal
    if code_a == code_b {
        PHONETIC_EXACT_SCORE
    } else if code_a.is_empty() || code_b.is_empty() {
        0.0
    } else {
        levenshtein_similarity(&code_a, &code_b) * PHONETIC_PARTIAL_WEIGHT
    }
}

/// Similarity of two raw location names in `[0, 1]`.
pub fn name_similarity<E: PhoneticEncoder + ?Sized>(encoder: &E, a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }
    let na = normalize_location_name(a);
    let nb = normalize_location_name(b);

    let score = if na == nb {
        1.0
    } else if !na.is_empty() && !nb.is_empty() && (na.contains(&nb) || nb.contains(&na)) {
        let (la, lb) = (na.chars().count() as f64, nb.chars().count() as f64);
        la.min(lb) / la.max(lb)
    } else {
        levenshtein_similarity(&na, &nb).max(phonetic_similarity(encoder, &na, &nb))
    };

    if score > NEAR_IDENTICAL_NAME {
        (score * NEAR_IDENTICAL_BOOST).min(1.0)
    } else {
        score
    }
}
