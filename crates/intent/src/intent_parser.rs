//! Intent Parser - normalized utterance -> Intent
//!
//! A fixed, ordered list of regex patterns; the first group that matches
//! decides the intent. Verbs cover French and the English words that French
//! speech models still produce.

use crate::types::Intent;
use regex::Regex;

/// Which intent a pattern group produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntentKind {
    Open,
    Close,
    Workspace,
    Maximize,
    Delete,
}

/// Ordered regex patterns for command recognition
struct CommandPatterns {
    groups: Vec<(IntentKind, Vec<Regex>)>,
}

impl Default for CommandPatterns {
    fn default() -> Self {
        const MAXIMIZE_VERBS: &str = "maximise|maximiser|agrandis|agrandir|maximize";

        let groups: Vec<(IntentKind, Vec<String>)> = vec![
            (
                IntentKind::Open,
                vec![r"^(?:ouvre|lance|demarre|open|launch|start|run)\s+(?P<arg>.+)$".to_string()],
            ),
            (
                IntentKind::Close,
                vec![r"^(?:ferme|quitte|arrete|stop|close|quit|exit|kill)\s+(?P<arg>.+)$".to_string()],
            ),
            (
                IntentKind::Workspace,
                vec![
                    r"^(?:va|aller)\s+(?:au|a|en)\s+(?:bureau|workspace|desktop)\s+(?P<arg>.+)$".to_string(),
                    r"^(?:bureau|workspace|desktop)\s+(?P<arg>.+)$".to_string(),
                    r"^go\s+to\s+(?:workspace|desktop)\s+(?P<arg>.+)$".to_string(),
                ],
            ),
            (
                IntentKind::Maximize,
                vec![
                    format!(r"^(?:{})\b(?:\s+la\s+fenetre|\s+fenetre|\s+window)?$", MAXIMIZE_VERBS),
                    format!(r"^(?:{})\b.*(?:fenetre|window).*$", MAXIMIZE_VERBS),
                ],
            ),
            (
                IntentKind::Delete,
                vec![r"^(?:supprime|efface|delete)\s+(?P<arg>.+)$".to_string()],
            ),
        ];

        Self {
            groups: groups
                .into_iter()
                .map(|(kind, patterns)| (kind, patterns.iter().map(|p| compile(p)).collect()))
                .collect(),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("intent patterns are valid regexes")
}

/// Classifies normalized utterances into intents
pub struct IntentParser {
    patterns: CommandPatterns,
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentParser {
    pub fn new() -> Self {
        Self {
            patterns: CommandPatterns::default(),
        }
    }

    /// Classify already-normalized text.
    ///
    /// Returns [`Intent::None`] when nothing matches; that is the "ignore this
    /// utterance" signal, not an error.
    pub fn classify(&self, text: &str) -> Intent {
        if text.is_empty() {
            return Intent::None;
        }

        for (kind, patterns) in &self.patterns.groups {
            for re in patterns {
                if let Some(caps) = re.captures(text) {
                    let arg = caps
                        .name("arg")
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_default();
                    return Self::build(*kind, arg);
                }
            }
        }

        if text == "aide" || text == "help" {
            return Intent::Help;
        }

        Intent::None
    }

    fn build(kind: IntentKind, arg: String) -> Intent {
        match kind {
            IntentKind::Open => Intent::Open { app: arg },
            IntentKind::Close => Intent::Close { app: arg },
            IntentKind::Workspace => Intent::SetWorkspace { number: arg },
            IntentKind::Maximize => Intent::Maximize,
            IntentKind::Delete => Intent::Delete { alias: arg },
        }
    }
}
