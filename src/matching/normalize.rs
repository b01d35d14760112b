// src/matching/normalize.rs
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// NFKD-decomposes `s` and drops the combining marks ("Málaga" -> "Malaga").
pub fn strip_diacritics(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Generic comparison key: lowercase, diacritics stripped, ASCII alphanumerics only.
/// Letters without an ASCII decomposition ("ł", "ß") are dropped.
pub fn normalize(s: &str) -> String {
    strip_diacritics(&s.to_lowercase())
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("Málaga"), "Malaga");
        assert_eq!(strip_diacritics("Zürich Flughafen"), "Zurich Flughafen");
        assert_eq!(strip_diacritics("Aéroport"), "Aeroport");
    }

    #[test]
    fn test_normalize_keeps_alphanumerics_only() {
        assert_eq!(normalize("São Paulo - Centro"), "saopaulocentro");
        assert_eq!(normalize("Terminal 2, Gate B"), "terminal2gateb");
        assert_eq!(normalize("  ...  "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_drops_letters_without_ascii_form() {
        assert_eq!(normalize("Łódź"), "odz");
        assert_eq!(normalize("Straße"), "strae");
        assert_eq!(normalize("Ålesund"), "alesund");
    }
}
