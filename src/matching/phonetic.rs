// src/matching/phonetic.rs
use log::warn;
use rphonetic::{DoubleMetaphone, Encoder};

/// Sound-alike key for a name. An empty key means "no phonetic information".
pub trait PhoneticEncoder: Send + Sync {
    fn encode(&self, input: &str) -> String;
}

/// Double Metaphone primary code per word, concatenated.
///
/// Encoding word by word keeps multi-word names from being cut at the
/// encoder's code length after the first word.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaphoneEncoder;

impl MetaphoneEncoder {
    fn encode_word(word: &str) -> String {
        // rphonetic has panicked on unusual input before; treat that as "no code".
        match std::panic::catch_unwind(|| DoubleMetaphone::default().encode(word)) {
            Ok(code) => code,
            Err(_) => {
                warn!("DoubleMetaphone panicked on input: {:?}", word);
                String::new()
            }
        }
    }
}

impl PhoneticEncoder for MetaphoneEncoder {
    fn encode(&self, input: &str) -> String {
        input
            .split_whitespace()
            .map(|word| {
                word.chars()
                    .filter(|c| c.is_ascii_alphabetic())
                    .collect::<String>()
            })
            .filter(|word| !word.is_empty())
            .map(|word| Self::encode_word(&word))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_alike_words_share_a_code() {
        let encoder = MetaphoneEncoder;
        assert_eq!(encoder.encode("smith"), encoder.encode("smyth"));
        assert!(!encoder.encode("smith").is_empty());
    }

    #[test]
    fn test_every_word_contributes() {
        let encoder = MetaphoneEncoder;
        let one = encoder.encode("rome");
        let two = encoder.encode("rome fiumicino");
        assert!(two.starts_with(&one));
        assert!(two.len() > one.len());
    }

    #[test]
    fn test_non_alphabetic_input_has_no_code() {
        let encoder = MetaphoneEncoder;
        assert_eq!(encoder.encode("1234 56"), "");
        assert_eq!(encoder.encode(""), "");
    }
}
