//! voxdesk Intent - Core Data Structures
//!
//! Types shared by the classifier, the resolvers and the dispatcher.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Intent recognized in a normalized utterance.
///
/// Only the captured free text is carried; resolution to a concrete command,
/// workspace number or path happens downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Launch an application
    Open { app: String },

    /// Close an application
    Close { app: String },

    /// Switch virtual desktop (raw number phrase)
    SetWorkspace { number: String },

    /// Maximize the active window
    Maximize,

    /// Delete a configured target
    Delete { alias: String },

    /// Show the command summary
    Help,

    /// No recognizable instruction, callers ignore the utterance
    None,
}

impl Intent {
    /// Short name used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Open { .. } => "open",
            Intent::Close { .. } => "close",
            Intent::SetWorkspace { .. } => "workspace",
            Intent::Maximize => "maximize",
            Intent::Delete { .. } => "delete",
            Intent::Help => "help",
            Intent::None => "none",
        }
    }
}

/// Result of resolving spoken text against the app registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMatch {
    /// Registry key that matched (may be a generated alias)
    pub canonical_key: String,
    pub command: String,
    pub score: f64, // 0.0 - 1.0
    /// True only when the unmodified normalized input was a key verbatim
    pub exact: bool,
}

/// Outcome of a handled utterance or of a delegated desktop action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub ok: bool,
    pub message: String,
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }

    /// Successful no-op reported when the cooldown suppresses an action.
    pub fn cooldown() -> Self {
        Self::success(COOLDOWN_MESSAGE)
    }

    pub fn is_cooldown(&self) -> bool {
        self.ok && self.message == COOLDOWN_MESSAGE
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.ok { "ok" } else { "error" };
        write!(f, "[{}] {}", mark, self.message)
    }
}

pub const COOLDOWN_MESSAGE: &str = "(cooldown)";

/// Tuning knobs for resolution and debouncing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Minimum delay between two accepted actions
    pub cooldown_ms: u64,

    /// Minimum fuzzy score to accept an app guess
    #[serde(alias = "app_match_threshold")]
    pub match_threshold: f64,

    /// Minimum score required when the spoken text is very short
    #[serde(alias = "app_short_threshold")]
    pub short_input_threshold: f64,

    /// Below this many characters, the short-input threshold applies
    #[serde(alias = "app_min_len")]
    pub min_meaningful_len: usize,

    /// Hyprland dispatcher used to maximize the active window
    pub maximize_command: String,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 800,
            match_threshold: 0.72,
            short_input_threshold: 0.90,
            min_meaningful_len: 4,
            maximize_command: String::new(),
        }
    }
}
