//! Configuration file model and loading
//!
//! JSON is the default format; files ending in `.toml` are read as TOML. Map
//! order from the file is kept, since alias tie-breaks follow it.

use crate::error::ConfigError;
use crate::types::IntentConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything the engine needs from a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Canonical app name -> launch command
    pub apps: IndexMap<String, String>,

    /// Canonical app name -> extra spellings heard for it
    pub app_aliases: IndexMap<String, Vec<String>>,

    /// Spoken alias -> path that "supprime <alias>" deletes
    pub delete_aliases: IndexMap<String, String>,

    /// Every delete target must live inside this directory
    pub delete_base_dir: Option<PathBuf>,

    #[serde(flatten)]
    pub intent: IntentConfig,
}

impl VoiceConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let config = if is_toml {
            Self::from_toml_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::from_json_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?
        };

        config.validate()?;
        log::debug!(
            "Config: {} apps, {} delete aliases",
            config.apps.len(),
            config.delete_aliases.len()
        );
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reject settings the engine cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("match_threshold", self.intent.match_threshold),
            ("short_input_threshold", self.intent.short_input_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }

        let has_base = self
            .delete_base_dir
            .as_ref()
            .is_some_and(|dir| !dir.as_os_str().is_empty());
        if !self.delete_aliases.is_empty() && !has_base {
            return Err(ConfigError::Invalid(
                "delete_aliases requires delete_base_dir".to_string(),
            ));
        }

        Ok(())
    }
}

/// Default config location: `$XDG_CONFIG_HOME/voxdesk/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("voxdesk").join("config.json"))
}

/// Builder for [`IntentConfig`]
pub struct IntentConfigBuilder {
    config: IntentConfig,
}

impl IntentConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: IntentConfig::default(),
        }
    }

    pub fn cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.config.cooldown_ms = cooldown_ms;
        self
    }

    pub fn match_threshold(mut self, threshold: f64) -> Self {
        self.config.match_threshold = threshold;
        self
    }

    pub fn short_input_threshold(mut self, threshold: f64) -> Self {
        self.config.short_input_threshold = threshold;
        self
    }

    pub fn min_meaningful_len(mut self, len: usize) -> Self {
        self.config.min_meaningful_len = len;
        self
    }

    pub fn maximize_command(mut self, command: impl Into<String>) -> Self {
        self.config.maximize_command = command.into();
        self
    }

    pub fn build(self) -> IntentConfig {
        self.config
    }
}

impl Default for IntentConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const JSON: &str = r#"{
        "apps": {"zotero": "zotero", "firefox": "firefox", "Prusa Slicer": "prusa-slicer"},
        "app_aliases": {"prusa slicer": ["prusse a cela"]},
        "delete_aliases": {"rapport": "/home/user/trash/rapport.pdf"},
        "delete_base_dir": "/home/user/trash",
        "cooldown_ms": 500,
        "app_match_threshold": 0.8,
        "maximize_command": "fullscreen 0"
    }"#;

    #[test]
    fn test_json_keeps_order_and_aliases() {
        let config = VoiceConfig::from_json_str(JSON).unwrap();

        let names: Vec<&str> = config.apps.keys().map(String::as_str).collect();
        assert_eq!(names, ["zotero", "firefox", "Prusa Slicer"]);
        assert_eq!(config.intent.cooldown_ms, 500);
        assert_eq!(config.intent.match_threshold, 0.8);
        // unspecified values keep their defaults
        assert_eq!(config.intent.short_input_threshold, 0.90);
        assert_eq!(config.intent.min_meaningful_len, 4);
        assert_eq!(config.intent.maximize_command, "fullscreen 0");
        assert_eq!(config.delete_base_dir, Some(PathBuf::from("/home/user/trash")));
    }

    #[test]
    fn test_toml() {
        let content = r#"
            delete_base_dir = "/tmp/trash"
            cooldown_ms = 300

            [apps]
            zotero = "zotero"
            firefox = "firefox"

            [app_aliases]
            firefox = ["fire fox"]
        "#;
        let config = VoiceConfig::from_toml_str(content).unwrap();

        let names: Vec<&str> = config.apps.keys().map(String::as_str).collect();
        assert_eq!(names, ["zotero", "firefox"]);
        assert_eq!(config.intent.cooldown_ms, 300);
        assert_eq!(config.app_aliases["firefox"], vec!["fire fox".to_string()]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(JSON.as_bytes()).unwrap();

        let config = VoiceConfig::load(file.path()).unwrap();
        assert_eq!(config.apps.len(), 3);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = VoiceConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = VoiceConfig::load(Path::new("/nonexistent/voxdesk.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_validate_thresholds() {
        let mut config = VoiceConfig::default();
        config.intent.match_threshold = 1.5;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_delete_aliases_need_base_dir() {
        let mut config = VoiceConfig::default();
        config.delete_aliases.insert("rapport".into(), "/tmp/rapport.pdf".into());
        assert!(config.validate().is_err());

        config.delete_base_dir = Some(PathBuf::from("/tmp"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = IntentConfigBuilder::new()
            .cooldown_ms(0)
            .match_threshold(0.9)
            .short_input_threshold(0.95)
            .min_meaningful_len(3)
            .maximize_command("fullscreen 1")
            .build();

        assert_eq!(config.cooldown_ms, 0);
        assert_eq!(config.match_threshold, 0.9);
        assert_eq!(config.short_input_threshold, 0.95);
        assert_eq!(config.min_meaningful_len, 3);
        assert_eq!(config.maximize_command, "fullscreen 1");
    }
}
