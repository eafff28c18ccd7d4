//! Fuzzy App Resolver - spoken app name -> registry entry
//!
//! Matching is staged from cheap and safe to expensive and lenient:
//!
//! 1. exact key lookup
//! 2. substring containment
//! 3. fuzzy scoring (edit distance, spacing-insensitive, phonetic skeleton)
//!
//! followed by an acceptance gate that refuses weak guesses.

use crate::aliases::AppRegistry;
use crate::normalizer::{normalize, strip_fillers, tokens};
use crate::types::{IntentConfig, ResolvedMatch};
use std::collections::HashSet;

/// Score given to a substring hit in the containment stage.
const SUBSTRING_SCORE: f64 = 0.90;
/// Floor given to a substring relationship inside fuzzy scoring.
const SUBSTRING_BASE: f64 = 0.88;
/// Shortest candidate allowed to match by containment.
const MIN_SUBSTRING_LEN: usize = 4;

const CHAR_WEIGHT: f64 = 0.80;
const TOKEN_WEIGHT: f64 = 0.20;

/// Acceptance thresholds for fuzzy guesses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub match_threshold: f64,
    pub short_input_threshold: f64,
    pub min_meaningful_len: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(&IntentConfig::default())
    }
}

impl From<&IntentConfig> for Thresholds {
    fn from(config: &IntentConfig) -> Self {
        Self {
            match_threshold: config.match_threshold,
            short_input_threshold: config.short_input_threshold,
            min_meaningful_len: config.min_meaningful_len,
        }
    }
}

/// Resolve spoken text to an app registry entry.
pub fn resolve_app(spoken: &str, registry: &AppRegistry, thresholds: &Thresholds) -> Option<ResolvedMatch> {
    let key = normalize(spoken);
    if key.is_empty() {
        return None;
    }

    let key_clean = strip_fillers(&key);
    let mut candidates = vec![key.as_str()];
    if !key_clean.is_empty() && key_clean != key {
        candidates.push(key_clean.as_str());
    }

    // 1. Exact
    for candidate in &candidates {
        if let Some(command) = registry.get(candidate) {
            log::debug!("App '{}' matched exactly as '{}'", spoken, candidate);
            return Some(ResolvedMatch {
                canonical_key: candidate.to_string(),
                command: command.to_string(),
                score: 1.0,
                exact: *candidate == key,
            });
        }
    }

    // 2. Containment
    for candidate in &candidates {
        for (name, command) in registry.iter() {
            if is_containment(candidate, name) {
                log::debug!("App '{}' matched by containment: '{}'", spoken, name);
                return Some(ResolvedMatch {
                    canonical_key: name.to_string(),
                    command: command.to_string(),
                    score: SUBSTRING_SCORE,
                    exact: false,
                });
            }
        }
    }

    // 3. Fuzzy
    let mut best: Option<ResolvedMatch> = None;
    for candidate in &candidates {
        for (name, command) in registry.iter() {
            let score = match_score(candidate, name);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(ResolvedMatch {
                    canonical_key: name.to_string(),
                    command: command.to_string(),
                    score,
                    exact: false,
                });
            }
        }
    }
    let best = best?;

    // 4. Acceptance gate
    let meaningful = if key_clean.is_empty() { &key } else { &key_clean };
    if meaningful.len() < thresholds.min_meaningful_len && best.score < thresholds.short_input_threshold {
        log::debug!(
            "Rejected short input '{}' (best '{}', score {:.2})",
            spoken, best.canonical_key, best.score
        );
        return None;
    }
    if best.score < thresholds.match_threshold {
        log::debug!(
            "Rejected weak match '{}' (best '{}', score {:.2})",
            spoken, best.canonical_key, best.score
        );
        return None;
    }

    log::debug!("App '{}' guessed as '{}' (score {:.2})", spoken, best.canonical_key, best.score);
    Some(best)
}

fn is_containment(candidate: &str, name: &str) -> bool {
    candidate == name
        || (candidate.len() >= MIN_SUBSTRING_LEN && (name.contains(candidate) || candidate.contains(name)))
}

/// Fuzzy score in [0, 1] between a spoken candidate and a registry key.
pub fn match_score(spoken: &str, app_key: &str) -> f64 {
    let spoken = strip_fillers(spoken);
    let app_key = normalize(app_key);
    if spoken.is_empty() || app_key.is_empty() {
        return 0.0;
    }

    let base = if spoken.len() >= MIN_SUBSTRING_LEN
        && (app_key.contains(spoken.as_str()) || spoken.contains(app_key.as_str()))
    {
        SUBSTRING_BASE
    } else {
        0.0
    };

    let char_sim = similarity(&spoken, &app_key)
        .max(similarity(&spoken.replace(' ', ""), &app_key.replace(' ', "")))
        .max(similarity(&skeleton(&spoken), &skeleton(&app_key)));

    // Never below char_sim ("fire fox" vs "firefox")
    let combined = CHAR_WEIGHT * char_sim + TOKEN_WEIGHT * token_jaccard(&spoken, &app_key);
    base.max(combined).max(char_sim)
}

/// Normalized edit-distance similarity, 0.0 when either side is empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b)
}

/// Jaccard index over the token sets of two normalized strings.
pub fn token_jaccard(a: &str, b: &str) -> f64 {
    let left: HashSet<&str> = tokens(a).into_iter().collect();
    let right: HashSet<&str> = tokens(b).into_iter().collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let total = left.union(&right).count();
    shared as f64 / total as f64
}

/// Coarse phonetic signature used to survive cross-language mis-transcription.
///
/// "prusa slicer" -> "prslkr"; a French rendering such as "prusse a cela" keeps
/// most of the same consonant structure.
pub fn skeleton(text: &str) -> String {
    let joined = normalize(text).replace(' ', "");
    if joined.is_empty() {
        return joined;
    }

    let folded = joined
        .replace("ph", "f")
        .replace("qu", "k")
        .replace("ck", "k")
        .replace('c', "k")
        .replace('q', "k")
        .replace('z', "s")
        .replace('v', "f");

    let mut out = String::with_capacity(folded.len());
    let mut last: Option<char> = None;
    for ch in folded.chars().filter(|c| !"aeiouy".contains(*c)) {
        if last != Some(ch) {
            out.push(ch);
            last = Some(ch);
        }
    }
    out
}
