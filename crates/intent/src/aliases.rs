//! Alias Expander - builds the app registry
//!
//! Speech-to-text rarely produces the exact configured app name. Each
//! canonical app therefore gets a family of generated aliases: article
//! prefixes ("le firefox"), plural drift ("client"/"clients"), role words
//! ("navigateur firefox"), partial names ("prusa" for "prusa slicer").
//!
//! The registry is insertion-ordered. Canonical names go in first and are
//! never overwritten; among generated aliases the first insertion wins. The
//! fuzzy resolver relies on this order to break ties deterministically.

use crate::normalizer::{normalize, tokens};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// French articles that commonly precede an app name.
const ARTICLES: &[&str] = &["le", "la", "les", "un", "une", "du", "de", "des", "mon", "ma", "mes"];

/// Words describing what an app is rather than which app it is.
const ROLE_WORDS: &[&str] = &[
    "browser", "navigateur", "client", "launcher", "slicer", "sliceur", "editor", "editeur",
];

const KNOWN_BROWSERS: &[&str] = &["firefox", "chromium", "brave", "brave browser"];
const BROWSER_WORDS: &[&str] = &["browser", "navigateur", "navigateur web"];
const SLICER_WORDS: &[&str] = &["slicer", "sliceur"];

/// Normalized alias -> launch command, in insertion order
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppRegistry {
    entries: IndexMap<String, String>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the alias is empty or already present.
    ///
    /// Returns true when the alias was added.
    pub fn insert_if_absent(&mut self, alias: String, command: &str) -> bool {
        if alias.is_empty() || self.entries.contains_key(&alias) {
            return false;
        }
        self.entries.insert(alias, command.to_string());
        true
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the registry from configured apps and optional user aliases.
///
/// `apps` maps a canonical app name to its launch command; `user_aliases`
/// maps a canonical app name to extra spellings. Both keep configuration
/// order.
pub fn build_app_registry(
    apps: &IndexMap<String, String>,
    user_aliases: &IndexMap<String, Vec<String>>,
) -> AppRegistry {
    let mut registry = AppRegistry::new();

    // Explicit keys first, protected from every generated alias below.
    // Names colliding after normalization keep the first position and the last command.
    let mut explicit: IndexMap<String, &str> = IndexMap::with_capacity(apps.len());
    for (name, command) in apps {
        let key = normalize(name);
        if key.is_empty() {
            log::warn!("Ignoring app with empty normalized name: {:?}", name);
            continue;
        }
        if let Some(previous) = explicit.insert(key, command.as_str()) {
            log::warn!("Duplicate app name after normalization: {:?} replaces {:?}", name, previous);
        }
    }
    for (key, command) in &explicit {
        registry.insert_if_absent(key.clone(), command);
    }

    let user_aliases = normalize_alias_keys(user_aliases);

    for (key, command) in &explicit {
        let mut added = 0usize;
        for alias in generate_app_aliases(key) {
            if registry.insert_if_absent(alias, command) {
                added += 1;
            }
        }

        let compact = key.replace(' ', "");
        let configured = user_aliases
            .get(key.as_str())
            .or_else(|| user_aliases.get(compact.as_str()));
        if let Some(list) = configured {
            for raw in list.iter() {
                if registry.insert_if_absent(normalize(raw), command) {
                    added += 1;
                }
            }
        }

        log::debug!("App '{}' -> '{}': {} aliases added", key, command, added);
    }

    log::debug!("App registry built with {} entries", registry.len());
    registry
}

/// Index user alias lists by normalized canonical name (first list wins).
fn normalize_alias_keys(user_aliases: &IndexMap<String, Vec<String>>) -> IndexMap<String, &[String]> {
    let mut out: IndexMap<String, &[String]> = IndexMap::new();
    for (name, list) in user_aliases {
        let key = normalize(name);
        if !key.is_empty() {
            out.entry(key).or_insert(list.as_slice());
        }
    }
    out
}

/// Generate every alias for one canonical key, in a deterministic order.
pub fn generate_app_aliases(canonical_key: &str) -> IndexSet<String> {
    let key = normalize(canonical_key);
    let mut variants: IndexSet<String> = IndexSet::new();
    if key.is_empty() {
        return variants;
    }

    let toks = tokens(&key);

    // Base forms
    variants.insert(key.clone());
    variants.insert(key.replace(' ', ""));

    // "ouvre le firefox"
    for article in ARTICLES {
        variants.insert(format!("{} {}", article, key));
    }

    // Plural drift on every token
    variants.extend(plural_variants(&toks));

    // Without role words ("brave browser" -> "brave")
    let base_tokens: Vec<&str> = toks.iter().copied().filter(|t| !ROLE_WORDS.contains(t)).collect();
    let base = if base_tokens.is_empty() {
        key.clone()
    } else {
        base_tokens.join(" ")
    };
    if base != key {
        variants.insert(base.clone());
        variants.insert(base.replace(' ', ""));
    }

    let is_browser = KNOWN_BROWSERS.contains(&key.as_str())
        || toks.contains(&"browser")
        || toks.contains(&"navigateur");
    if is_browser {
        for word in BROWSER_WORDS {
            variants.insert(format!("{} {}", base, word));
            variants.insert(format!("{} {}", word, base));
        }
    }

    let is_slicer = toks.contains(&"slicer")
        || toks.contains(&"sliceur")
        || key.contains("slicer")
        || key.contains("sliceur");
    if is_slicer {
        for word in SLICER_WORDS {
            variants.insert(format!("{} {}", base, word));
            variants.insert(format!("{} {}", word, base));
        }
    }

    // Partial names for multi-word apps
    if toks.len() >= 2 {
        variants.insert(toks[0].to_string());
        variants.insert(toks[..2].join(" "));
        variants.insert(toks[toks.len() - 2..].join(" "));
    }

    variants
        .into_iter()
        .map(|v| normalize(&v))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Singular/plural forms of a single token. Tokens of two chars or less are kept as-is.
fn plural_toggle(token: &str) -> Vec<String> {
    if token.len() <= 2 {
        return vec![token.to_string()];
    }
    match token.strip_suffix('s') {
        Some(stem) => vec![token.to_string(), stem.to_string()],
        None => vec![token.to_string(), format!("{}s", token)],
    }
}

/// Cartesian product of per-token plural toggles, joined back into phrases.
fn plural_variants(toks: &[&str]) -> Vec<String> {
    if toks.is_empty() {
        return Vec::new();
    }

    let mut phrases: Vec<Vec<String>> = vec![Vec::new()];
    for token in toks {
        let choices = plural_toggle(token);
        let mut next = Vec::with_capacity(phrases.len() * choices.len());
        for phrase in &phrases {
            for choice in &choices {
                let mut extended = phrase.clone();
                extended.push(choice.clone());
                next.push(extended);
            }
        }
        phrases = next;
    }

    phrases.into_iter().map(|p| p.join(" ")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apps(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_article_and_plural_aliases() {
        let aliases = generate_app_aliases("steam client");

        assert!(aliases.contains("steam client"));
        assert!(aliases.contains("steamclient"));
        assert!(aliases.contains("le steam client"));
        assert!(aliases.contains("mes steam client"));
        assert!(aliases.contains("steams clients"));
        assert!(aliases.contains("steam clients"));
        // role word stripped
        assert!(aliases.contains("steam"));
        // partials
        assert!(aliases.contains("steam client"));
    }

    #[test]
    fn test_short_tokens_not_pluralized() {
        let aliases = generate_app_aliases("vs code");

        assert!(aliases.contains("vs code"));
        assert!(aliases.contains("vs codes"));
        assert!(!aliases.contains("v code"));
        assert!(!aliases.contains("vss code"));
    }

    #[test]
    fn test_browser_aliases() {
        let aliases = generate_app_aliases("firefox");

        assert!(aliases.contains("firefox navigateur"));
        assert!(aliases.contains("navigateur firefox"));
        assert!(aliases.contains("navigateur web firefox"));
        assert!(aliases.contains("browser firefox"));

        let aliases = generate_app_aliases("brave browser");
        assert!(aliases.contains("brave"));
        assert!(aliases.contains("navigateur brave"));
    }

    #[test]
    fn test_slicer_aliases() {
        let aliases = generate_app_aliases("prusa slicer");

        assert!(aliases.contains("prusa"));
        assert!(aliases.contains("prusa sliceur"));
        assert!(aliases.contains("sliceur prusa"));
        assert!(aliases.contains("prusaslicer"));
    }

    #[test]
    fn test_role_only_key_keeps_itself() {
        let aliases = generate_app_aliases("editor");

        assert!(aliases.contains("editor"));
        assert!(aliases.contains("editors"));
        assert!(!aliases.contains(""));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a: Vec<String> = generate_app_aliases("prusa slicer").into_iter().collect();
        let b: Vec<String> = generate_app_aliases("prusa slicer").into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a[0], "prusa slicer");
    }

    #[test]
    fn test_explicit_keys_never_overwritten() {
        // "brave" is generated from "brave browser" but is also an explicit app
        let registry = build_app_registry(
            &apps(&[("Brave Browser", "brave-browser"), ("Brave", "brave-nightly")]),
            &IndexMap::new(),
        );

        assert_eq!(registry.get("brave"), Some("brave-nightly"));
        assert_eq!(registry.get("brave browser"), Some("brave-browser"));
        assert_eq!(registry.get("navigateur brave"), Some("brave-browser"));
    }

    #[test]
    fn test_duplicate_app_name_takes_last_command() {
        let registry = build_app_registry(
            &apps(&[("Firefox", "firefox"), ("zotero", "zotero"), ("firefox", "firefox-esr")]),
            &IndexMap::new(),
        );

        assert_eq!(registry.get("firefox"), Some("firefox-esr"));
        assert_eq!(registry.get("le firefox"), Some("firefox-esr"));
        // position of the first occurrence is kept
        assert_eq!(registry.iter().next(), Some(("firefox", "firefox-esr")));
    }

    #[test]
    fn test_first_generated_alias_wins() {
        let registry = build_app_registry(
            &apps(&[("prusa slicer", "prusa-slicer"), ("prusa link", "prusa-link")]),
            &IndexMap::new(),
        );

        assert_eq!(registry.get("prusa"), Some("prusa-slicer"));
        assert_eq!(registry.iter().next(), Some(("prusa slicer", "prusa-slicer")));
    }

    #[test]
    fn test_user_aliases_are_normalized() {
        let mut user = IndexMap::new();
        user.insert("Prusa Slicer".to_string(), vec!["Prusse À Cela".to_string(), "  ".to_string()]);

        let registry = build_app_registry(&apps(&[("prusa slicer", "prusa-slicer")]), &user);

        assert_eq!(registry.get("prusse a cela"), Some("prusa-slicer"));
        assert!(!registry.contains(""));
    }

    #[test]
    fn test_user_alias_key_without_spaces() {
        let mut user = IndexMap::new();
        user.insert("vscode".to_string(), vec!["visual".to_string()]);

        let registry = build_app_registry(&apps(&[("vs code", "code")]), &user);

        assert_eq!(registry.get("visual"), Some("code"));
    }

    #[test]
    fn test_empty_names_skipped() {
        let registry = build_app_registry(&apps(&[("!!", "noop"), ("gimp", "gimp")]), &IndexMap::new());

        assert!(!registry.contains(""));
        assert_eq!(registry.get("gimp"), Some("gimp"));
    }
}
