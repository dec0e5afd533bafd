//! Google Translate API provider
//!
//! Talks to the Google Translate v2 REST API. Requests use `format=text`, so the
//! service treats `<1>` as literal text instead of an HTML tag and returns it unescaped.
//!
//! # Authentication
//!
//! The API key is read from the `GOOGLE_TRANSLATE_API_KEY` environment variable.
//!
//! # Example
//!
//! ```ignore
//! use terminex::mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let result = provider.translate("The <1> is down", "en", "es").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::translator::{MachineTranslator, normalize_locale, validate_locale};
use crate::error::{TerminexError, TerminexResult};

pub const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Translate API v2 provider
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Google Translate v2 accepts up to 128 texts per request
    const MAX_BATCH_SIZE: usize = 128;

    /// Per-text limit enforced before sending
    const MAX_CHARS_PER_STRING: usize = 30_000;

    pub fn new(api_key: String) -> TerminexResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TerminexError::Config("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| TerminexError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn from_env() -> TerminexResult<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            TerminexError::Config(format!("{} environment variable not set", API_KEY_ENV))
        })?;
        Self::new(api_key)
    }

    /// Point the provider at a different endpoint (proxy, self-hosted gateway)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn check_length(texts: &[String]) -> TerminexResult<()> {
        for (i, text) in texts.iter().enumerate() {
            if text.chars().count() > Self::MAX_CHARS_PER_STRING {
                return Err(TerminexError::Translation(format!(
                    "Text at index {} exceeds maximum length of {} characters",
                    i,
                    Self::MAX_CHARS_PER_STRING
                )));
            }
        }
        Ok(())
    }

    async fn translate_chunk(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> TerminexResult<Vec<String>> {
        let url = format!("{}?key={}", self.base_url, self.api_key);
        let body = json!({
            "q": texts,
            "source": normalize_locale(source_locale),
            "target": normalize_locale(target_locale),
            "format": "text"
        });

        debug!("Sending {} texts to Google Translate", texts.len());
        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(if status.is_client_error() {
                TerminexError::Config(format!("API client error ({}): {}", status, error_text))
            } else {
                TerminexError::Translation(format!("API server error ({}): {}", status, error_text))
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            TerminexError::Translation(format!("Failed to parse API response: {}", e))
        })?;
        parse_translations(&json, texts.len())
    }
}

/// Pull `data.translations[*].translatedText` out of an API response
fn parse_translations(json: &serde_json::Value, expected: usize) -> TerminexResult<Vec<String>> {
    let translations = json["data"]["translations"].as_array().ok_or_else(|| {
        TerminexError::Translation(
            "Invalid API response: missing 'data.translations' array".to_string(),
        )
    })?;

    let results = translations
        .iter()
        .map(|t| {
            t["translatedText"]
                .as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| {
                    TerminexError::Translation(
                        "Invalid API response: missing 'translatedText' field".to_string(),
                    )
                })
        })
        .collect::<TerminexResult<Vec<String>>>()?;

    if results.len() != expected {
        return Err(TerminexError::Translation(format!(
            "API returned {} translations for {} texts",
            results.len(),
            expected
        )));
    }
    Ok(results)
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TerminexResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        let texts = [text.to_string()];
        Self::check_length(&texts)?;
        let results = self
            .translate_chunk(&texts, source_locale, target_locale)
            .await?;
        Ok(results.into_iter().next().unwrap_or_default())
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> TerminexResult<Vec<String>> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Self::check_length(texts)?;

        let mut all_results = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(Self::MAX_BATCH_SIZE) {
            let chunk_results = self
                .translate_chunk(chunk, source_locale, target_locale)
                .await?;
            all_results.extend(chunk_results);
        }
        Ok(all_results)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
