//! Text Normalizer - canonical form for spoken text
//!
//! Every comparison in the engine happens on normalized text: lowercase ASCII
//! letters, digits and single spaces. Accents are decomposed and dropped so
//! that "démarre" and "demarre" are the same word.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Short function words that speech-to-text injects around app names.
pub const FILLER_TOKENS: &[&str] = &[
    // Articles / prepositions / conjunctions
    "a", "au", "aux", "de", "des", "du", "d", "l", "le", "la", "les", "un", "une",
    "et", "ou", "en", "dans", "sur", "pour", "avec",
    // Transcription noise
    "ce", "ca", "cela", "c", "est", "s", "soeur", "soeurs",
];

/// Normalize arbitrary text into the comparable form.
pub fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for ch in lowered.nfkd().filter(|c| !is_combining_mark(*c)) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            // Whitespace and every other character collapse into one separator
            pending_space = true;
        }
    }

    out
}

/// Whether a token is a filler word.
pub fn is_filler(token: &str) -> bool {
    FILLER_TOKENS.contains(&token)
}

/// Normalize, then drop filler tokens.
pub fn strip_fillers(text: &str) -> String {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty() && !is_filler(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokens of an already normalized string.
pub fn tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_accents() {
        assert_eq!(normalize("  Démarre FÉNÊTRE  "), "demarre fenetre");
        assert_eq!(normalize("Ça"), "ca");
        assert_eq!(normalize("Élève"), "eleve");
    }

    #[test]
    fn test_punctuation_collapses_to_single_space() {
        assert_eq!(normalize("ouvre,   le -- navigateur!!"), "ouvre le navigateur");
        assert_eq!(normalize("l'éditeur"), "l editeur");
        assert_eq!(normalize("\tbureau\n3\r\n"), "bureau 3");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!…"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Ouvre  Firefox",
            "va au BUREAU dix-sept",
            "Prusa-Slicer 2.0",
            "Élève à l'école",
            "日本語 text",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_strip_fillers() {
        assert_eq!(strip_fillers("le navigateur"), "navigateur");
        assert_eq!(strip_fillers("prusse a cela et"), "prusse");
        assert_eq!(strip_fillers("de la"), "");
    }
}
