/// Placeholder Substitution Pipeline
///
/// Protects known terms during machine translation and restores their controlled
/// translations afterwards:
///
/// 1. **Span selection** - candidate phrases from the toolkit's extractor are resolved
///    against the [`TermStore`] and ordered rightmost first
/// 2. **Placeholder encoding** - every selected span becomes `<id>`, recording the term
///    and the original surface text
/// 3. *(external)* - the protected text goes through a translation provider
/// 4. **Restoration** - each `<id>` becomes the term's translation in the case pattern
///    of the original surface text
///
/// # Example
///
/// ```ignore
/// use terminex::{Term, TermStore, TerminologyManager, Toolkit};
///
/// let store: TermStore = [Term::new(1, "server", "servidor")].into_iter().collect();
/// let manager = TerminologyManager::new(store, Toolkit::minimal());
///
/// let protected = manager.preprocess("The Server is down");
/// assert_eq!(protected.text, "The <1> is down");
///
/// let translated = "El <1> está caído";
/// assert_eq!(protected.restore(translated), "El Servidor está caído");
/// ```
pub mod placeholder;
pub mod restore;
pub mod span;

pub use placeholder::{PlaceholderMapping, PlaceholderToken, Preprocessed, encode_placeholders};
pub use restore::{CasePattern, missing_placeholders, restore_placeholders};
pub use span::{CandidateSpan, OverlapPolicy, SpanMatch, select_spans};

use tracing::debug;

use crate::config::Config;
use crate::loader::LoadReport;
use crate::nlp::Toolkit;
use crate::store::TermStore;
use crate::term::Term;

/// Owns the term store and the language toolkit; all calls borrow it immutably
#[derive(Debug)]
pub struct TerminologyManager {
    store: TermStore,
    toolkit: Toolkit,
    overlap_policy: OverlapPolicy,
}

impl TerminologyManager {
    pub fn new(store: TermStore, toolkit: Toolkit) -> Self {
        TerminologyManager {
            store,
            toolkit,
            overlap_policy: OverlapPolicy::default(),
        }
    }

    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Build the toolkit and load the configured terminology.
    ///
    /// Without a terminology path the store is empty and the pipeline is a no-op.
    pub fn from_config(config: &Config) -> (Self, LoadReport) {
        let (store, report) = match &config.terminology {
            Some(path) => TermStore::from_sources(&[path]),
            None => (TermStore::new(), LoadReport::default()),
        };
        let toolkit = Toolkit::from_kind(config.toolkit, config.max_phrase_words);
        let manager = TerminologyManager::new(store, toolkit)
            .with_overlap_policy(config.overlap_policy);
        (manager, report)
    }

    pub fn store(&self) -> &TermStore {
        &self.store
    }

    pub fn toolkit(&self) -> &Toolkit {
        &self.toolkit
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap_policy
    }

    /// Source language of the loaded terminology
    pub fn language(&self) -> &str {
        self.store.language()
    }

    /// Exact lookup, then lookup with stopwords removed
    pub fn find_matching_term(&self, phrase: &str) -> Option<&Term> {
        self.store.lookup_normalized(phrase, self.toolkit.stopwords())
    }

    /// Replace known terms in `text` with placeholders, using the toolkit's extractor.
    pub fn preprocess(&self, text: &str) -> Preprocessed {
        if self.store.is_empty() || text.is_empty() {
            return Preprocessed::passthrough(text);
        }
        let candidates = self.toolkit.extractor().extract(text, &self.store);
        debug!(
            "{} produced {} candidate spans",
            self.toolkit.extractor().name(),
            candidates.len()
        );
        self.preprocess_spans(text, candidates)
    }

    /// Replace known terms using candidate spans supplied by the caller.
    pub fn preprocess_spans(&self, text: &str, candidates: Vec<CandidateSpan>) -> Preprocessed {
        if self.store.is_empty() {
            return Preprocessed::passthrough(text);
        }
        let matches = select_spans(
            text,
            candidates,
            &self.store,
            self.toolkit.stopwords(),
            self.overlap_policy,
        );
        encode_placeholders(text, &matches)
    }

    /// Substitute placeholders in translated text with case-adjusted term translations.
    pub fn postprocess(&self, text: &str, mapping: &PlaceholderMapping) -> String {
        restore_placeholders(text, mapping)
    }
}
