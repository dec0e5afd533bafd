/// Error types for terminology loading and translation
///
/// The placeholder pipeline itself never fails: unresolvable spans, empty stores and
/// unknown placeholders all degrade to pass-through. Errors only come from the edges,
/// i.e. reading term sources and talking to a translation provider.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TerminexError {
    /// A term source or config file could not be read
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A term source is not valid CSV
    #[error("Malformed terminology source '{source_name}': {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
    /// A term source lacks one of the required columns
    #[error("Terminology source '{source_name}' has no '{column}' column")]
    MissingColumn { source_name: String, column: String },
    /// Locale code rejected before reaching a provider
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Bad or missing configuration (API keys, config files, flags)
    #[error("Configuration error: {0}")]
    Config(String),
    /// Transport failure talking to a provider
    #[error("Network error: {0}")]
    Network(String),
    /// The provider answered but the translation is unusable
    #[error("Translation error: {0}")]
    Translation(String),
}

impl From<reqwest::Error> for TerminexError {
    fn from(err: reqwest::Error) -> Self {
        TerminexError::Network(err.to_string())
    }
}

/// Result type for fallible terminex operations
pub type TerminexResult<T> = Result<T, TerminexError>;
