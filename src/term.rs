use serde::{Deserialize, Serialize};

/// Domain tag used when a term source does not provide one
pub const DEFAULT_DOMAIN: &str = "general";

/// Language code used when neither the source name nor the record names one
pub const DEFAULT_LANGUAGE: &str = "en";

/// A source-language phrase with a fixed target-language translation.
///
/// `term` is always stored normalized (see [`normalize`]) so it doubles as the
/// lookup key in [`crate::TermStore`]. `translation` keeps the casing it was
/// loaded with; case adjustment happens at restoration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: u64,
    pub term: String,
    pub translation: String,
    pub domain: String,
    pub language: String,
}

impl Term {
    pub fn new(id: u64, term: &str, translation: &str) -> Self {
        Term {
            id,
            term: normalize(term),
            translation: translation.trim().to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = domain.to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_lowercase();
        self
    }
}

/// Lowercase and trim text before it is used as a term key.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
