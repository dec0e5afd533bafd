//! Machine Translation trait and locale utilities
//!
//! The terminology pipeline never translates anything itself. It hands protected
//! text to a `MachineTranslator` and expects every `<N>` placeholder back verbatim.
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
//!     println!("{}", result); // "El <1> está caído"
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use icu_locale::Locale;

use crate::error::{TerminexError, TerminexResult};

/// Generic trait for machine translation providers
///
/// Implementations must treat placeholder tokens (`<1>`, `<42>`) as opaque text.
/// Terminology restoration tolerates lost placeholders, but the protected term is
/// then missing from the output.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text from `source_locale` to `target_locale`
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TerminexResult<String>;

    /// Translate several texts; output order and length match the input
    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> TerminexResult<Vec<String>>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}

/// Reduce a locale code to its base language
///
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `pt_BR` → `pt`
///
/// Codes ICU cannot parse fall back to the text before the first separator.
pub fn normalize_locale(locale: &str) -> String {
    let candidate = locale.trim().replace('_', "-");
    match Locale::try_from_str(&candidate) {
        Ok(parsed) => parsed.id.language.as_str().to_string(),
        Err(_) => candidate
            .split('-')
            .next()
            .unwrap_or(&candidate)
            .to_lowercase(),
    }
}

/// Reject locale codes that are empty or contain characters outside `[A-Za-z0-9_-]`
pub fn validate_locale(locale: &str) -> TerminexResult<()> {
    if locale.is_empty() {
        return Err(TerminexError::InvalidLocale(
            "Locale code is empty".to_string(),
        ));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(TerminexError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
