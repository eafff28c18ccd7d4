//! voxdesk Intent - voice commands for the desktop
//!
//! Turns noisy speech-to-text output (French, with some English) into desktop
//! actions: launch or close an app, switch workspace, maximize the focused
//! window, delete a configured file.
//!
//! # Architecture
//!
//! - **Normalizer**: accent folding, punctuation removal, filler words
//! - **Intent Parser**: ordered regex patterns -> [`Intent`]
//! - **Resolvers**: fuzzy app names, spoken numbers, delete aliases
//! - **Cooldown Gate**: debounces duplicate recognizer results
//! - **Actions**: [`DesktopActions`] backends doing the actual work
//!
//! # Usage
//!
//! ```rust,no_run
//! use voxdesk_intent::{DryRunActions, IntentContext, VoiceConfig};
//!
//! let config = VoiceConfig::from_json_str(r#"{"apps": {"firefox": "firefox"}}"#).unwrap();
//! let mut context = IntentContext::new(&config);
//! let mut actions = DryRunActions::new();
//!
//! if let Some(outcome) = context.dispatch("Ouvre Firefox !", &mut actions) {
//!     println!("{}", outcome);
//! }
//! ```

pub mod actions;
pub mod aliases;
pub mod config;
pub mod cooldown;
pub mod delete_alias;
pub mod error;
pub mod intent_parser;
pub mod normalizer;
pub mod numbers;
pub mod resolver;
pub mod types;

pub use actions::{DesktopActions, DryRunActions, HyprlandActions};
pub use aliases::AppRegistry;
pub use config::{IntentConfigBuilder, VoiceConfig};
pub use delete_alias::DeleteAliasTable;
pub use error::{ConfigError, IntentError};
pub use types::*;

use cooldown::CooldownGate;
use intent_parser::IntentParser;
use normalizer::normalize;
use resolver::Thresholds;

use parking_lot::Mutex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reply to "aide" / "help".
pub const HELP_MESSAGE: &str =
    "Commandes: 'ouvre <app>' | 'ferme <app>' | 'va au bureau <n>' | 'maximise la fenetre' | 'supprime <alias>'";

/// What an utterance would do, without doing it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Normalized utterance
    pub text: String,
    pub intent: Intent,
    /// Resolved app for open/close intents
    pub app: Option<ResolvedMatch>,
    /// Parsed number for workspace intents
    pub workspace: Option<u32>,
    /// Configured target for delete intents
    pub delete_target: Option<PathBuf>,
}

/// Everything needed to turn utterances into actions
///
/// Built once from configuration. Only the cooldown timestamp changes while
/// handling utterances, so one context serves a whole session.
pub struct IntentContext {
    registry: AppRegistry,
    delete_aliases: DeleteAliasTable,
    delete_base_dir: Option<PathBuf>,
    config: IntentConfig,
    thresholds: Thresholds,
    cooldown: CooldownGate,
    parser: IntentParser,
}

impl IntentContext {
    pub fn new(config: &VoiceConfig) -> Self {
        let registry = aliases::build_app_registry(&config.apps, &config.app_aliases);
        let delete_aliases = DeleteAliasTable::new(&config.delete_aliases);
        log::info!(
            "Intent context ready: {} apps, {} aliases, {} delete targets",
            config.apps.len(),
            registry.len(),
            delete_aliases.len()
        );

        Self::from_parts(
            registry,
            delete_aliases,
            config.delete_base_dir.clone(),
            config.intent.clone(),
        )
    }

    pub fn from_parts(
        registry: AppRegistry,
        delete_aliases: DeleteAliasTable,
        delete_base_dir: Option<PathBuf>,
        config: IntentConfig,
    ) -> Self {
        Self {
            registry,
            delete_aliases,
            delete_base_dir,
            thresholds: Thresholds::from(&config),
            cooldown: CooldownGate::from_millis(config.cooldown_ms),
            config,
            parser: IntentParser::new(),
        }
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn delete_aliases(&self) -> &DeleteAliasTable {
        &self.delete_aliases
    }

    pub fn delete_base_dir(&self) -> Option<&Path> {
        self.delete_base_dir.as_deref()
    }

    pub fn config(&self) -> &IntentConfig {
        &self.config
    }

    /// Classify raw text into an intent.
    pub fn classify(&self, raw: &str) -> Intent {
        self.parser.classify(&normalize(raw))
    }

    /// Classify raw text and resolve its argument, without acting on it.
    pub fn explain(&self, raw: &str) -> Classification {
        let text = normalize(raw);
        let intent = self.parser.classify(&text);

        let mut classification = Classification {
            text,
            intent: intent.clone(),
            app: None,
            workspace: None,
            delete_target: None,
        };

        match &intent {
            Intent::Open { app } | Intent::Close { app } => {
                classification.app = resolver::resolve_app(app, &self.registry, &self.thresholds);
            }
            Intent::SetWorkspace { number } => {
                classification.workspace = numbers::parse_number(number);
            }
            Intent::Delete { alias } => {
                classification.delete_target = self.delete_aliases.resolve(alias).map(Path::to_path_buf);
            }
            Intent::Maximize | Intent::Help | Intent::None => {}
        }

        classification
    }

    /// Handle one utterance.
    ///
    /// Returns `None` when the utterance is empty or carries no recognizable
    /// instruction; the backend is not called in that case.
    pub fn dispatch(&mut self, raw: &str, actions: &mut dyn DesktopActions) -> Option<Outcome> {
        let text = normalize(raw);
        if text.is_empty() {
            return None;
        }

        let intent = self.parser.classify(&text);
        log::debug!("'{}' -> {}", text, intent.kind());

        let outcome = match intent {
            Intent::None => return None,
            Intent::Open { app } => self.handle_app(&app, actions, AppAction::Launch),
            Intent::Close { app } => self.handle_app(&app, actions, AppAction::Close),
            Intent::SetWorkspace { number } => self.handle_workspace(&number, actions),
            Intent::Maximize => self.gated(|ctx| actions.maximize_active_window(&ctx.config.maximize_command)),
            Intent::Delete { alias } => self.handle_delete(&alias, actions),
            Intent::Help => Outcome::success(HELP_MESSAGE),
        };

        if outcome.ok {
            log::info!("{}", outcome.message);
        } else {
            log::warn!("{}", outcome.message);
        }
        Some(outcome)
    }

    fn handle_app(&mut self, spoken: &str, actions: &mut dyn DesktopActions, action: AppAction) -> Outcome {
        let Some(resolved) = resolver::resolve_app(spoken, &self.registry, &self.thresholds) else {
            return IntentError::UnknownApp(spoken.to_string()).into();
        };

        let outcome = self.gated(|_| match action {
            AppAction::Launch => actions.execute_command(&resolved.command),
            AppAction::Close => actions.close_app(&resolved.command),
        });

        if resolved.exact || outcome.is_cooldown() {
            return outcome;
        }
        annotate(outcome, spoken, &resolved)
    }

    fn handle_workspace(&mut self, number: &str, actions: &mut dyn DesktopActions) -> Outcome {
        match numbers::parse_number(number) {
            Some(n) => self.gated(|_| actions.set_workspace(n)),
            None => IntentError::InvalidWorkspaceNumber(number.to_string()).into(),
        }
    }

    fn handle_delete(&mut self, alias: &str, actions: &mut dyn DesktopActions) -> Outcome {
        let Some(target) = self.delete_aliases.resolve(alias).map(Path::to_path_buf) else {
            return IntentError::UnknownDeleteAlias(alias.to_string()).into();
        };
        let Some(base_dir) = self.delete_base_dir.clone() else {
            return IntentError::NoDeleteBase.into();
        };

        self.gated(|_| actions.delete_path(&target, &base_dir))
    }

    /// Run `action` only if the cooldown gate lets it through.
    fn gated<F>(&mut self, action: F) -> Outcome
    where
        F: FnOnce(&Self) -> Outcome,
    {
        if !self.cooldown.try_acquire() {
            log::debug!("Suppressed by cooldown ({:?})", self.cooldown.window());
            return Outcome::cooldown();
        }
        action(self)
    }
}

#[derive(Debug, Clone, Copy)]
enum AppAction {
    Launch,
    Close,
}

/// Append the guess behind a non-exact match to an outcome message.
fn annotate(outcome: Outcome, spoken: &str, resolved: &ResolvedMatch) -> Outcome {
    let label = if outcome.ok { "deviné" } else { "tenté" };
    Outcome {
        ok: outcome.ok,
        message: format!(
            "{} ({}: '{}' -> '{}', score={:.2})",
            outcome.message, label, spoken, resolved.canonical_key, resolved.score
        ),
    }
}

struct EngineState {
    context: IntentContext,
    actions: Box<dyn DesktopActions + Send>,
}

/// Thread-safe handle over one context and one action backend
///
/// Utterances from any thread are handled one at a time, so the cooldown
/// holds across threads too.
#[derive(Clone)]
pub struct IntentEngine {
    state: Arc<Mutex<EngineState>>,
}

impl IntentEngine {
    pub fn new(context: IntentContext, actions: Box<dyn DesktopActions + Send>) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState { context, actions })),
        }
    }

    /// Build from configuration with the given backend.
    pub fn from_config(config: &VoiceConfig, actions: Box<dyn DesktopActions + Send>) -> Self {
        Self::new(IntentContext::new(config), actions)
    }

    /// Handle one utterance, see [`IntentContext::dispatch`].
    pub fn handle(&self, raw: &str) -> Option<Outcome> {
        let mut state = self.state.lock();
        let EngineState { context, actions } = &mut *state;
        context.dispatch(raw, &mut **actions)
    }

    pub fn explain(&self, raw: &str) -> Classification {
        self.state.lock().context.explain(raw)
    }

    /// Swap in a context built from a new configuration.
    pub fn reload(&self, config: &VoiceConfig) {
        let context = IntentContext::new(config);
        self.state.lock().context = context;
        log::info!("Intent context reloaded");
    }
}
