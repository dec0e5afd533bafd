/// Placeholder tokens protecting terms during machine translation
///
/// Each selected term span is replaced by `<N>`, where N is the term id. The angle
/// brackets delimit the number, so `<1>` can never be found inside `<12>`, and MT
/// providers leave such tokens alone when asked for plain-text output.
///
/// Encoding walks the matches rightmost first and splices tokens in place, recording
/// for every token the term it stands for and the exact surface text it replaced.
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::restore::restore_placeholders;
use super::span::SpanMatch;
use crate::term::Term;

pub(crate) static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(\d+)>").expect("placeholder regex"));

/// A placeholder token tied to a term id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderToken {
    pub term_id: u64,
    pub token: String,
}

impl PlaceholderToken {
    pub fn new(term_id: u64) -> Self {
        PlaceholderToken {
            term_id,
            token: format!("<{}>", term_id),
        }
    }

    /// Parse a complete token such as `<42>`
    pub fn parse(token: &str) -> Option<Self> {
        let digits = token.strip_prefix('<')?.strip_suffix('>')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(PlaceholderToken::new)
    }
}

/// Per-call mapping from placeholder token to term and to original surface text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderMapping {
    terms: HashMap<String, Term>,
    originals: HashMap<String, String>,
}

impl PlaceholderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: &str, term: Term, original: &str) {
        self.terms.insert(token.to_string(), term);
        self.originals.insert(token.to_string(), original.to_string());
    }

    pub fn term(&self, token: &str) -> Option<&Term> {
        self.terms.get(token)
    }

    /// Surface text the token replaced, exactly as it appeared in the input
    pub fn original(&self, token: &str) -> Option<&str> {
        self.originals.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.terms.contains_key(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.terms.iter().map(|(token, term)| (token.as_str(), term))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Output of a preprocess call: protected text plus the mapping needed to undo it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preprocessed {
    pub text: String,
    pub mapping: PlaceholderMapping,
}

impl Preprocessed {
    /// Input returned untouched, nothing to restore
    pub fn passthrough(text: &str) -> Self {
        Preprocessed {
            text: text.to_string(),
            mapping: PlaceholderMapping::new(),
        }
    }

    pub fn has_placeholders(&self) -> bool {
        !self.mapping.is_empty()
    }

    /// Restore the translated text with this call's mapping, consuming it
    pub fn restore(self, translated: &str) -> String {
        restore_placeholders(translated, &self.mapping)
    }
}

/// Replace each matched span with its term's placeholder token.
///
/// `matches` must be ordered rightmost first, as returned by
/// [`super::span::select_spans`]. A span that would overlap one already replaced is
/// left alone, as is a term whose token already occurs in the input or whose id is
/// claimed by a different term in this call.
pub fn encode_placeholders(text: &str, matches: &[SpanMatch<'_>]) -> Preprocessed {
    if matches.is_empty() {
        return Preprocessed::passthrough(text);
    }

    let mut working = text.to_string();
    let mut mapping = PlaceholderMapping::new();
    let mut boundary = text.len();

    for SpanMatch { span, term } in matches {
        if !span.is_valid_for(text) {
            debug!(
                "Skipping span {}..{} outside the input",
                span.start, span.end
            );
            continue;
        }
        if span.end > boundary {
            warn!(
                "Skipping span {:?} at {}..{}: overlaps a replaced span",
                span.text, span.start, span.end
            );
            continue;
        }

        let placeholder = PlaceholderToken::new(term.id);
        if text.contains(&placeholder.token) {
            warn!(
                "Not protecting '{}': token {} already occurs in the input",
                term.term, placeholder.token
            );
            continue;
        }
        if let Some(claimed) = mapping.term(&placeholder.token) {
            if claimed.term != term.term {
                warn!(
                    "Not protecting '{}': id {} is already used by '{}'",
                    term.term, term.id, claimed.term
                );
                continue;
            }
        }

        working.replace_range(span.start..span.end, &placeholder.token);
        mapping.insert(
            &placeholder.token,
            (*term).clone(),
            &text[span.start..span.end],
        );
        boundary = span.start;
    }

    Preprocessed {
        text: working,
        mapping,
    }
}
