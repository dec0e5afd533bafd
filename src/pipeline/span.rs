//! Span selection: which candidate phrases get replaced, and in what order
//!
//! Candidates come from a [`crate::nlp::PhraseExtractor`] in any order and possibly
//! overlapping. Selection keeps only spans that resolve to a stored term, removes
//! overlaps according to the [`OverlapPolicy`], and returns the survivors rightmost
//! first. Splicing in that order never invalidates the offsets of spans further left.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nlp::StopwordRemover;
use crate::store::TermStore;
use crate::term::Term;

/// A substring of the input text proposed as a terminology candidate
///
/// `start` and `end` are byte offsets, `text` is expected to equal `input[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl CandidateSpan {
    pub fn new(text: &str, start: usize, end: usize) -> Self {
        CandidateSpan {
            text: text.to_string(),
            start,
            end,
        }
    }

    /// Build a span from offsets, taking its text from `source`
    pub fn from_range(source: &str, start: usize, end: usize) -> Option<Self> {
        source
            .get(start..end)
            .map(|text| CandidateSpan::new(text, start, end))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &CandidateSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether the span names a valid, non-empty slice of `source` holding exactly `text`
    pub fn is_valid_for(&self, source: &str) -> bool {
        !self.is_empty() && source.get(self.start..self.end) == Some(self.text.as_str())
    }
}

/// What to do with overlapping candidates that all resolve to terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Greedy: longest span first (leftmost on ties), drop anything overlapping an accepted span
    #[default]
    LongestFirst,
    /// Assume the extractor never overlaps; only order the spans
    TrustExtractor,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "longest" | "longest_first" => Ok(OverlapPolicy::LongestFirst),
            "trust" | "trust_extractor" => Ok(OverlapPolicy::TrustExtractor),
            other => Err(format!(
                "unknown overlap policy '{}', expected 'longest' or 'trust'",
                other
            )),
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::LongestFirst => write!(f, "longest"),
            OverlapPolicy::TrustExtractor => write!(f, "trust"),
        }
    }
}

/// A candidate span together with the term it resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct SpanMatch<'a> {
    pub span: CandidateSpan,
    pub term: &'a Term,
}

/// Resolve candidates against the store and order the survivors rightmost first.
pub fn select_spans<'a>(
    text: &str,
    candidates: Vec<CandidateSpan>,
    store: &'a TermStore,
    stopwords: &dyn StopwordRemover,
    policy: OverlapPolicy,
) -> Vec<SpanMatch<'a>> {
    let mut seen = HashSet::new();
    let mut matches: Vec<SpanMatch<'a>> = Vec::new();

    for span in candidates {
        if !span.is_valid_for(text) {
            debug!(
                "Discarding candidate {:?} at {}..{}: does not match the input text",
                span.text, span.start, span.end
            );
            continue;
        }
        if !seen.insert((span.start, span.end)) {
            continue;
        }
        if let Some(term) = store.lookup_normalized(&span.text, stopwords) {
            matches.push(SpanMatch { span, term });
        }
    }

    if policy == OverlapPolicy::LongestFirst {
        matches = resolve_overlaps(matches);
    }

    matches.sort_by(|a, b| b.span.start.cmp(&a.span.start));
    debug!("Selected {} term spans", matches.len());
    matches
}

fn resolve_overlaps(mut matches: Vec<SpanMatch<'_>>) -> Vec<SpanMatch<'_>> {
    matches.sort_by(|a, b| {
        b.span
            .len()
            .cmp(&a.span.len())
            .then_with(|| a.span.start.cmp(&b.span.start))
    });

    let mut accepted: Vec<SpanMatch<'_>> = Vec::with_capacity(matches.len());
    for candidate in matches {
        if accepted.iter().any(|kept| kept.span.overlaps(&candidate.span)) {
            debug!(
                "Dropping overlapping span {:?} at {}..{}",
                candidate.span.text, candidate.span.start, candidate.span.end
            );
            continue;
        }
        accepted.push(candidate);
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{BasicStopwords, LinguisticStopwords};

    fn store() -> TermStore {
        [
            Term::new(1, "server", "servidor"),
            Term::new(2, "database", "base de datos"),
            Term::new(3, "database server", "servidor de base de datos"),
        ]
        .into_iter()
        .collect()
    }

    fn span(text: &str, start: usize) -> CandidateSpan {
        CandidateSpan::new(text, start, start + text.len())
    }

    #[test]
    fn test_unmatched_spans_are_dropped() {
        let store = store();
        let text = "The Server is down";
        let spans = vec![span("The Server", 0), span("down", 14)];
        let selected = select_spans(
            text,
            spans,
            &store,
            &LinguisticStopwords::new(),
            OverlapPolicy::default(),
        );
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].term.id, 1);
        assert_eq!(selected[0].span.text, "The Server");
    }

    #[test]
    fn test_rightmost_first_order() {
        let store = store();
        let text = "server and database and server";
        let spans = vec![span("server", 0), span("server", 24), span("database", 11)];
        let selected = select_spans(
            text,
            spans,
            &store,
            &BasicStopwords::new(),
            OverlapPolicy::TrustExtractor,
        );
        let starts: Vec<usize> = selected.iter().map(|m| m.span.start).collect();
        assert_eq!(starts, vec![24, 11, 0]);
    }

    #[test]
    fn test_longest_first_resolves_overlaps() {
        let store = store();
        let text = "restart the database server now";
        let spans = vec![
            span("database", 12),
            span("server", 21),
            span("database server", 12),
        ];
        let selected = select_spans(
            text,
            spans,
            &store,
            &BasicStopwords::new(),
            OverlapPolicy::LongestFirst,
        );
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].term.id, 3);
    }

    #[test]
    fn test_trust_keeps_overlaps() {
        let store = store();
        let text = "restart the database server now";
        let spans = vec![span("database", 12), span("database server", 12)];
        let selected = select_spans(
            text,
            spans,
            &store,
            &BasicStopwords::new(),
            OverlapPolicy::TrustExtractor,
        );
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_invalid_and_duplicate_spans() {
        let store = store();
        let text = "server";
        let spans = vec![
            span("server", 0),
            span("server", 0),
            CandidateSpan::new("server", 2, 8),
            CandidateSpan::new("servers", 0, 7),
            CandidateSpan::new("", 3, 3),
        ];
        let selected = select_spans(
            text,
            spans,
            &store,
            &BasicStopwords::new(),
            OverlapPolicy::TrustExtractor,
        );
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_non_char_boundary_is_rejected() {
        let text = "núcleo";
        // byte 2 falls inside 'ú'
        assert!(!CandidateSpan::new("ú", 1, 2).is_valid_for(text));
        assert!(CandidateSpan::from_range(text, 1, 2).is_none());
        assert_eq!(
            CandidateSpan::from_range(text, 0, 7).map(|s| s.text),
            Some("núcleo".to_string())
        );
    }

    #[test]
    fn test_overlaps() {
        let a = CandidateSpan::new("ab", 0, 2);
        let b = CandidateSpan::new("bc", 1, 3);
        let c = CandidateSpan::new("cd", 2, 4);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "trust".parse::<OverlapPolicy>(),
            Ok(OverlapPolicy::TrustExtractor)
        );
        assert_eq!(
            "longest-first".parse::<OverlapPolicy>(),
            Ok(OverlapPolicy::LongestFirst)
        );
        assert!("random".parse::<OverlapPolicy>().is_err());
        assert_eq!(OverlapPolicy::default().to_string(), "longest");
    }
}
