//! Language capabilities used by the placeholder pipeline
//!
//! Term matching needs two things from the outside world: candidate phrases in the
//! input text, and a way to strip stopwords from a phrase before retrying a lookup.
//! Both come from a [`Toolkit`], chosen once at configuration time:
//!
//! - [`Toolkit::linguistic`] chunks text into phrase candidates (multi-word terms are
//!   found) and strips stopwords with a tokenizer that understands possessives.
//! - [`Toolkit::minimal`] only offers single known words and a small fixed stopword set.
//!
//! Both obey the same contract, so the pipeline is correct with either; the minimal
//! variant simply finds fewer terms.

pub mod extractor;
pub mod stopwords;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pipeline::span::CandidateSpan;
use crate::store::TermStore;

pub use extractor::{ChunkExtractor, DEFAULT_MAX_PHRASE_WORDS, KnownWordExtractor};
pub use stopwords::{BasicStopwords, LinguisticStopwords};

/// Removes stopwords from a phrase so that "the load balancer" can resolve to "load balancer"
pub trait StopwordRemover: Send + Sync + fmt::Debug {
    /// Whether a single lowercase word is a stopword
    fn is_stopword(&self, word: &str) -> bool;

    /// Return the phrase lowercased with stopwords removed and words joined by single spaces
    fn remove_stopwords(&self, phrase: &str) -> String;
}

/// Finds candidate terminology phrases in raw text
///
/// Offsets are byte offsets into `text`. Implementations may return overlapping spans;
/// span selection decides what to do with them.
pub trait PhraseExtractor: Send + Sync + fmt::Debug {
    fn extract(&self, text: &str, store: &TermStore) -> Vec<CandidateSpan>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Which capability set a [`Toolkit`] provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolkitKind {
    #[default]
    Linguistic,
    Minimal,
}

impl FromStr for ToolkitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linguistic" | "rich" | "full" => Ok(ToolkitKind::Linguistic),
            "minimal" | "basic" | "fallback" => Ok(ToolkitKind::Minimal),
            other => Err(format!(
                "unknown toolkit '{}', expected 'linguistic' or 'minimal'",
                other
            )),
        }
    }
}

impl fmt::Display for ToolkitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolkitKind::Linguistic => write!(f, "linguistic"),
            ToolkitKind::Minimal => write!(f, "minimal"),
        }
    }
}

/// Phrase extraction and stopword removal, bundled and passed to the pipeline explicitly
#[derive(Debug)]
pub struct Toolkit {
    kind: ToolkitKind,
    extractor: Box<dyn PhraseExtractor>,
    stopwords: Box<dyn StopwordRemover>,
}

impl Toolkit {
    pub fn linguistic(max_phrase_words: usize) -> Self {
        Toolkit {
            kind: ToolkitKind::Linguistic,
            extractor: Box::new(ChunkExtractor::new(max_phrase_words)),
            stopwords: Box::new(LinguisticStopwords::new()),
        }
    }

    pub fn minimal() -> Self {
        Toolkit {
            kind: ToolkitKind::Minimal,
            extractor: Box::new(KnownWordExtractor::new()),
            stopwords: Box::new(BasicStopwords::new()),
        }
    }

    pub fn from_kind(kind: ToolkitKind, max_phrase_words: usize) -> Self {
        match kind {
            ToolkitKind::Linguistic => Toolkit::linguistic(max_phrase_words),
            ToolkitKind::Minimal => Toolkit::minimal(),
        }
    }

    pub fn kind(&self) -> ToolkitKind {
        self.kind
    }

    pub fn extractor(&self) -> &dyn PhraseExtractor {
        self.extractor.as_ref()
    }

    pub fn stopwords(&self) -> &dyn StopwordRemover {
        self.stopwords.as_ref()
    }
}

impl Default for Toolkit {
    fn default() -> Self {
        Toolkit::linguistic(DEFAULT_MAX_PHRASE_WORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolkit_kind_from_str() {
        assert_eq!(
            "linguistic".parse::<ToolkitKind>(),
            Ok(ToolkitKind::Linguistic)
        );
        assert_eq!("MINIMAL".parse::<ToolkitKind>(), Ok(ToolkitKind::Minimal));
        assert_eq!("fallback".parse::<ToolkitKind>(), Ok(ToolkitKind::Minimal));
        assert!("neural".parse::<ToolkitKind>().is_err());
    }

    #[test]
    fn test_from_kind() {
        assert_eq!(
            Toolkit::from_kind(ToolkitKind::Minimal, 3).kind(),
            ToolkitKind::Minimal
        );
        assert_eq!(Toolkit::default().kind(), ToolkitKind::Linguistic);
        assert_eq!(Toolkit::minimal().extractor().name(), "known-words");
        assert_eq!(Toolkit::linguistic(4).extractor().name(), "phrase-chunks");
    }

    #[test]
    fn test_kind_serde_names() {
        let kind: ToolkitKind = serde_json::from_str("\"minimal\"").unwrap();
        assert_eq!(kind, ToolkitKind::Minimal);
        assert_eq!(
            serde_json::to_string(&ToolkitKind::Linguistic).unwrap(),
            "\"linguistic\""
        );
    }
}
