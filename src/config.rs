//! Runtime configuration
//!
//! Settings come from three layers, later ones winning: a JSON file, `TERMINEX_*`
//! environment variables, and command-line flags (applied by the binary).
//!
//! ```json
//! {
//!     "terminology": "terminologies/",
//!     "toolkit": "linguistic",
//!     "overlap_policy": "longest_first",
//!     "max_phrase_words": 5,
//!     "source_locale": "en"
//! }
//! ```
//!
//! The translation provider's API key is read separately from `GOOGLE_TRANSLATE_API_KEY`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{TerminexError, TerminexResult};
use crate::nlp::{DEFAULT_MAX_PHRASE_WORDS, ToolkitKind};
use crate::pipeline::OverlapPolicy;

pub const ENV_TERMINOLOGY: &str = "TERMINEX_TERMINOLOGY";
pub const ENV_TOOLKIT: &str = "TERMINEX_TOOLKIT";
pub const ENV_OVERLAP: &str = "TERMINEX_OVERLAP";
pub const ENV_MAX_PHRASE_WORDS: &str = "TERMINEX_MAX_PHRASE_WORDS";
pub const ENV_SOURCE_LOCALE: &str = "TERMINEX_SOURCE_LOCALE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSV file or directory of CSV files
    pub terminology: Option<PathBuf>,
    pub toolkit: ToolkitKind,
    pub overlap_policy: OverlapPolicy,
    pub max_phrase_words: usize,
    /// Overrides the language inferred from the terminology sources
    pub source_locale: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            terminology: None,
            toolkit: ToolkitKind::default(),
            overlap_policy: OverlapPolicy::default(),
            max_phrase_words: DEFAULT_MAX_PHRASE_WORDS,
            source_locale: None,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> TerminexResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| TerminexError::Config(format!("Invalid configuration: {}", e)))
    }

    pub fn from_json_file(path: &Path) -> TerminexResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| TerminexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content).map_err(|e| match e {
            TerminexError::Config(msg) => {
                TerminexError::Config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Overlay settings from the process environment.
    pub fn apply_env(self) -> TerminexResult<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay settings from any key lookup; unset or blank keys leave values unchanged.
    pub fn apply_vars<F>(mut self, lookup: F) -> TerminexResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_TERMINOLOGY) {
            self.terminology = Some(PathBuf::from(path));
        }
        if let Some(kind) = get(ENV_TOOLKIT) {
            self.toolkit = kind
                .parse()
                .map_err(|e| TerminexError::Config(format!("{}: {}", ENV_TOOLKIT, e)))?;
        }
        if let Some(policy) = get(ENV_OVERLAP) {
            self.overlap_policy = policy
                .parse()
                .map_err(|e| TerminexError::Config(format!("{}: {}", ENV_OVERLAP, e)))?;
        }
        if let Some(words) = get(ENV_MAX_PHRASE_WORDS) {
            self.max_phrase_words = words.trim().parse().map_err(|_| {
                TerminexError::Config(format!(
                    "{}: expected a positive integer, got '{}'",
                    ENV_MAX_PHRASE_WORDS, words
                ))
            })?;
        }
        if let Some(locale) = get(ENV_SOURCE_LOCALE) {
            self.source_locale = Some(locale.trim().to_string());
        }
        self.validate()
    }

    pub fn validate(self) -> TerminexResult<Self> {
        if self.max_phrase_words == 0 {
            return Err(TerminexError::Config(
                "max_phrase_words must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.terminology, None);
        assert_eq!(config.toolkit, ToolkitKind::Linguistic);
        assert_eq!(config.overlap_policy, OverlapPolicy::LongestFirst);
        assert_eq!(config.max_phrase_words, 5);
    }

    #[test]
    fn test_partial_json() {
        let config =
            Config::from_json_str(r#"{"toolkit": "minimal", "terminology": "terms"}"#).unwrap();
        assert_eq!(config.toolkit, ToolkitKind::Minimal);
        assert_eq!(config.terminology, Some(PathBuf::from("terms")));
        assert_eq!(config.max_phrase_words, 5);
    }

    #[test]
    fn test_invalid_json() {
        let result = Config::from_json_str(r#"{"toolkit": "neural"}"#);
        assert!(matches!(result, Err(TerminexError::Config(_))));
    }

    #[test]
    fn test_env_overlay() {
        let config = Config::default()
            .apply_vars(vars(&[
                (ENV_TERMINOLOGY, "/srv/terms"),
                (ENV_TOOLKIT, "minimal"),
                (ENV_OVERLAP, "trust"),
                (ENV_MAX_PHRASE_WORDS, "3"),
                (ENV_SOURCE_LOCALE, " de "),
            ]))
            .unwrap();
        assert_eq!(config.terminology, Some(PathBuf::from("/srv/terms")));
        assert_eq!(config.toolkit, ToolkitKind::Minimal);
        assert_eq!(config.overlap_policy, OverlapPolicy::TrustExtractor);
        assert_eq!(config.max_phrase_words, 3);
        assert_eq!(config.source_locale.as_deref(), Some("de"));
    }

    #[test]
    fn test_env_blank_values_ignored() {
        let config = Config::default()
            .apply_vars(vars(&[(ENV_TOOLKIT, "  ")]))
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_invalid_values() {
        assert!(
            Config::default()
                .apply_vars(vars(&[(ENV_TOOLKIT, "neural")]))
                .is_err()
        );
        assert!(
            Config::default()
                .apply_vars(vars(&[(ENV_MAX_PHRASE_WORDS, "0")]))
                .is_err()
        );
        assert!(
            Config::default()
                .apply_vars(vars(&[(ENV_MAX_PHRASE_WORDS, "many")]))
                .is_err()
        );
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terminex.json");
        let config = Config {
            overlap_policy: OverlapPolicy::TrustExtractor,
            ..Config::default()
        };
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(Config::from_json_file(&path).unwrap(), config);
    }
}
