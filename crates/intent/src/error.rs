//! Error taxonomy
//!
//! Nothing here is fatal: every `IntentError` is turned into a failed
//! [`Outcome`] whose message is shown to the user as-is.

use crate::types::Outcome;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("App inconnue: {0}")]
    UnknownApp(String),

    #[error("Alias suppression inconnu: {0}")]
    UnknownDeleteAlias(String),

    #[error("Numéro de bureau invalide: {0}")]
    InvalidWorkspaceNumber(String),

    #[error("Commande vide")]
    EmptyInput,

    #[error("Refusé (hors base): {}", .0.display())]
    DeleteOutsideBase(PathBuf),

    #[error("Refusé: aucun dossier de base pour la suppression")]
    NoDeleteBase,

    #[error("Introuvable: {}", .0.display())]
    DeleteNotFound(PathBuf),

    #[error("Erreur suppression: {0}")]
    DeleteIo(#[source] io::Error),

    #[error("Erreur lancement: {0}")]
    Execution(String),
}

impl From<IntentError> for Outcome {
    fn from(err: IntentError) -> Self {
        Outcome::failure(err.to_string())
    }
}

/// Errors raised while loading or validating a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
