//! Mock Machine Translator for testing
//!
//! A deterministic, API-free translator for exercising the terminology pipeline
//! without network access, including providers that misbehave with placeholders.
//!
//! # Example
//!
//! ```ignore
//! use terminex::mt::{MachineTranslator, MockTranslator, MockMode};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("the <1> is down", "en", "es").await.unwrap();
//!     assert_eq!(result, "the <1> is down_es");
//! }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::translator::MachineTranslator;
use crate::error::{TerminexError, TerminexResult};
use crate::pipeline::placeholder::PLACEHOLDER_RE;

/// Mock translation modes
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Return input unchanged
    NoOp,

    /// Append the target locale: "hello" → "hello_es"
    Suffix,

    /// Predefined (text, target_locale) → translation, falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Reverse word order, moving placeholders around like an SOV target language would
    Reorder,

    /// Delete every placeholder token, like a provider that mangles markup
    DropPlaceholders,

    /// Fail every call
    Error(String),
}

/// Mock translator simulating well-behaved and misbehaving providers
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    /// Simulated network delay (in milliseconds)
    delay_ms: u64,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self { mode, delay_ms: 0 }
    }

    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self { mode, delay_ms }
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, text: &str, target: &str) -> TerminexResult<String> {
        match &self.mode {
            MockMode::NoOp => Ok(text.to_string()),
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Reorder => Ok(text.split_whitespace().rev().collect::<Vec<_>>().join(" ")),
            MockMode::DropPlaceholders => Ok(PLACEHOLDER_RE.replace_all(text, "").into_owned()),
            MockMode::Error(msg) => Err(TerminexError::Translation(msg.clone())),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_locale: &str,
        target_locale: &str,
    ) -> TerminexResult<String> {
        self.apply_delay().await;
        self.apply_translation(text, target_locale)
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        _source_locale: &str,
        target_locale: &str,
    ) -> TerminexResult<Vec<String>> {
        // One delay per batch, not per string
        self.apply_delay().await;
        texts
            .iter()
            .map(|text| self.apply_translation(text, target_locale))
            .collect()
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
