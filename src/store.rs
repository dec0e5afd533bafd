//! In-memory terminology store
//!
//! Maps normalized term text to its [`Term`] record. The store is filled once
//! (see [`crate::loader`]) and is read-only afterwards, so it can be shared
//! between concurrent preprocess/postprocess calls without locking.

use std::collections::HashMap;
use std::path::Path;

use crate::loader::{self, LoadReport};
use crate::nlp::StopwordRemover;
use crate::term::{DEFAULT_LANGUAGE, Term, normalize};

#[derive(Debug, Clone, Default)]
pub struct TermStore {
    terms: HashMap<String, Term>,
    language: Option<String>,
}

impl TermStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from terminology files or directories.
    ///
    /// Failures are collected in the returned report; whatever could be read is kept.
    pub fn from_sources<P: AsRef<Path>>(sources: &[P]) -> (Self, LoadReport) {
        let mut store = TermStore::new();
        let report = store.load(sources);
        (store, report)
    }

    /// Load one or more CSV files or directories of CSV files into the store.
    ///
    /// Later records replace earlier ones with the same normalized term.
    pub fn load<P: AsRef<Path>>(&mut self, sources: &[P]) -> LoadReport {
        let mut report = LoadReport::default();
        for source in sources {
            report.merge(loader::load_path(self, source.as_ref()));
        }
        report
    }

    /// Insert a term under its normalized text, returning the record it replaced.
    ///
    /// Records with an empty term or translation are ignored.
    pub fn insert(&mut self, mut term: Term) -> Option<Term> {
        let key = normalize(&term.term);
        if key.is_empty() || term.translation.trim().is_empty() {
            return None;
        }
        term.term = key.clone();
        self.terms.insert(key, term)
    }

    pub fn lookup_exact(&self, text: &str) -> Option<&Term> {
        self.terms.get(&normalize(text))
    }

    /// Exact lookup, retried on the stopword-stripped phrase when it misses.
    pub fn lookup_normalized(&self, text: &str, stopwords: &dyn StopwordRemover) -> Option<&Term> {
        if let Some(term) = self.lookup_exact(text) {
            return Some(term);
        }
        let cleaned = stopwords.remove_stopwords(&normalize(text));
        if cleaned.is_empty() {
            return None;
        }
        self.terms.get(&cleaned)
    }

    /// Language of the most recently loaded source, `"en"` when nothing was loaded.
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub(crate) fn set_language(&mut self, language: &str) {
        self.language = Some(language.to_string());
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lookup_exact(text).is_some()
    }

    pub fn get_terms(&self) -> &HashMap<String, Term> {
        &self.terms
    }

    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromIterator<Term> for TermStore {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut store = TermStore::new();
        for term in iter {
            store.insert(term);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{BasicStopwords, LinguisticStopwords};

    fn sample_store() -> TermStore {
        [
            Term::new(1, "server", "servidor"),
            Term::new(2, "database", "base de datos"),
            Term::new(3, "load balancer", "balanceador de carga"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lookup_exact_normalizes() {
        let store = sample_store();
        assert_eq!(store.lookup_exact("Server").map(|t| t.id), Some(1));
        assert_eq!(store.lookup_exact("  DATABASE ").map(|t| t.id), Some(2));
        assert!(store.lookup_exact("router").is_none());
    }

    #[test]
    fn test_lookup_exact_is_repeatable() {
        let store = sample_store();
        let first = store.lookup_exact("Load Balancer").cloned();
        let second = store.lookup_exact("load balancer").cloned();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_lookup_normalized_strips_stopwords() {
        let store = sample_store();
        let basic = BasicStopwords::new();
        assert_eq!(
            store.lookup_normalized("the Load Balancer", &basic).map(|t| t.id),
            Some(3)
        );

        let linguistic = LinguisticStopwords::new();
        assert_eq!(
            store.lookup_normalized("our server's", &linguistic).map(|t| t.id),
            Some(1)
        );
    }

    #[test]
    fn test_lookup_normalized_prefers_exact() {
        let mut store = sample_store();
        store.insert(Term::new(9, "the server", "el servidor"));
        let basic = BasicStopwords::new();
        assert_eq!(
            store.lookup_normalized("The Server", &basic).map(|t| t.id),
            Some(9)
        );
    }

    #[test]
    fn test_lookup_normalized_only_stopwords() {
        let store = sample_store();
        let basic = BasicStopwords::new();
        assert!(store.lookup_normalized("the", &basic).is_none());
    }

    #[test]
    fn test_insert_last_wins_and_skips_empty() {
        let mut store = TermStore::new();
        assert!(store.insert(Term::new(1, "server", "servidor")).is_none());
        let replaced = store.insert(Term::new(5, "SERVER", "servidor web"));
        assert_eq!(replaced.map(|t| t.id), Some(1));
        assert_eq!(store.lookup_exact("server").map(|t| t.id), Some(5));

        store.insert(Term::new(6, "   ", "vacío"));
        store.insert(Term::new(7, "cache", "  "));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_normalizes_hand_built_terms() {
        let mut store = TermStore::new();
        store.insert(Term {
            id: 4,
            term: " Firewall ".to_string(),
            translation: "cortafuegos".to_string(),
            domain: "network".to_string(),
            language: "en".to_string(),
        });
        assert_eq!(
            store.lookup_exact("firewall").map(|t| t.term.as_str()),
            Some("firewall")
        );
    }

    #[test]
    fn test_default_language() {
        let store = TermStore::new();
        assert_eq!(store.language(), "en");
        assert!(store.is_empty());
    }
}
