//! Number Parser - workspace numbers from digits or French number words

use crate::normalizer::{is_filler, normalize};
use regex::Regex;
use std::sync::OnceLock;

/// French number words, including common mis-hearings ("de" for "deux").
const NUMBER_WORDS: &[(&str, u32)] = &[
    ("zero", 0),
    ("un", 1),
    ("une", 1),
    ("de", 2),
    ("deux", 2),
    ("trois", 3),
    ("quatre", 4),
    ("cinq", 5),
    ("six", 6),
    ("sept", 7),
    ("huit", 8),
    ("neuf", 9),
    ("dix", 10),
    ("onze", 11),
    ("douze", 12),
    ("treize", 13),
    ("quatorze", 14),
    ("quinze", 15),
    ("seize", 16),
    ("vingt", 20),
];

fn word_value(token: &str) -> Option<u32> {
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, value)| *value)
}

fn digit_run() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\b(\d{1,3})\b").expect("digit pattern is valid"))
}

/// Extract a small number from a spoken phrase.
///
/// Digits win over words. "zero" alone yields nothing, workspaces start at 1.
pub fn parse_number(text: &str) -> Option<u32> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return None;
    }

    if let Some(caps) = digit_run().captures(&normalized) {
        return caps[1].parse().ok();
    }

    // Filler words are noise here unless they double as number words ("un", "de")
    let toks: Vec<&str> = normalized
        .split(' ')
        .filter(|t| !t.is_empty() && (!is_filler(t) || word_value(t).is_some()))
        .collect();

    // "dix sept" .. "dix neuf"
    if let [first, second, ..] = toks.as_slice() {
        if *first == "dix" && matches!(*second, "sept" | "huit" | "neuf") {
            return word_value(second).map(|unit| 10 + unit);
        }
    }

    toks.iter()
        .filter_map(|t| word_value(t))
        .find(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits() {
        assert_eq!(parse_number("3"), Some(3));
        assert_eq!(parse_number("numero 12 stp"), Some(12));
        assert_eq!(parse_number("bureau 007"), Some(7));
        assert_eq!(parse_number("1234"), None);
    }

    #[test]
    fn test_words() {
        assert_eq!(parse_number("trois"), Some(3));
        assert_eq!(parse_number("Deux"), Some(2));
        assert_eq!(parse_number("un"), Some(1));
        assert_eq!(parse_number("vingt"), Some(20));
        assert_eq!(parse_number("seize"), Some(16));
    }

    #[test]
    fn test_compound_teens() {
        assert_eq!(parse_number("dix sept"), Some(17));
        assert_eq!(parse_number("dix-huit"), Some(18));
        assert_eq!(parse_number("le dix neuf"), Some(19));
        assert_eq!(parse_number("dix"), Some(10));
    }

    #[test]
    fn test_zero_and_garbage() {
        assert_eq!(parse_number("zero"), None);
        assert_eq!(parse_number("zero quatre"), Some(4));
        assert_eq!(parse_number("banane"), None);
        assert_eq!(parse_number(""), None);
    }
}
