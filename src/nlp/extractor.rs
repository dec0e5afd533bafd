//! Candidate phrase extraction
//!
//! # Phrase chunks
//!
//! [`ChunkExtractor`] approximates noun-phrase chunking without a tagger. Text is cut
//! into chunks at punctuation and at stopwords; a determiner ("the", "our", ...) may
//! open a chunk instead of ending one:
//!
//! ```text
//! "The primary database server is down, restart the load balancer."
//!  [The primary database server] is down, [restart] [the load balancer].
//! ```
//!
//! For every chunk it yields the whole chunk and each contiguous run of content words
//! up to `max_phrase_words` long, so "primary database server" also offers
//! "database server", "database", "server" and so on. These candidates overlap on
//! purpose; span selection keeps the best non-overlapping subset of those that resolve.
//!
//! # Known words
//!
//! [`KnownWordExtractor`] is the degraded variant: every word that is itself a stored
//! term, at its real position. It cannot find multi-word terms.

use once_cell::sync::Lazy;
use regex::Regex;

use super::stopwords::{DETERMINERS, LinguisticStopwords, WordToken, word_tokens};
use super::{PhraseExtractor, StopwordRemover};
use crate::pipeline::span::CandidateSpan;
use crate::store::TermStore;

/// Longest run of content words offered as a single candidate by default
pub const DEFAULT_MAX_PHRASE_WORDS: usize = 5;

static SIMPLE_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("word regex"));

/// Phrase chunker built on the linguistic tokenizer and stopword list
#[derive(Debug, Clone)]
pub struct ChunkExtractor {
    max_phrase_words: usize,
    stopwords: LinguisticStopwords,
}

/// Words of one chunk: optional opening determiner plus content words
#[derive(Debug, Default)]
struct Chunk<'a> {
    opener: Option<WordToken<'a>>,
    words: Vec<WordToken<'a>>,
}

impl ChunkExtractor {
    pub fn new(max_phrase_words: usize) -> Self {
        ChunkExtractor {
            max_phrase_words: max_phrase_words.max(1),
            stopwords: LinguisticStopwords::new(),
        }
    }

    pub fn max_phrase_words(&self) -> usize {
        self.max_phrase_words
    }

    fn chunks<'a>(&self, text: &'a str) -> Vec<Chunk<'a>> {
        let mut chunks = Vec::new();
        let mut current = Chunk::default();
        let mut previous_end: Option<usize> = None;

        for token in word_tokens(text) {
            // Punctuation or a dropped clitic between two words ends the chunk
            if let Some(end) = previous_end {
                if text[end..token.start].chars().any(|c| !c.is_whitespace()) {
                    chunks.push(std::mem::take(&mut current));
                }
            }
            previous_end = Some(token.end);

            let lowered = token.text.to_lowercase();
            if DETERMINERS.contains(&lowered.as_str()) {
                chunks.push(std::mem::take(&mut current));
                current.opener = Some(token);
            } else if self.stopwords.is_stopword(&lowered) {
                chunks.push(std::mem::take(&mut current));
            } else {
                current.words.push(token);
            }
        }
        chunks.push(current);
        chunks.retain(|chunk| !chunk.words.is_empty());
        chunks
    }
}

impl Default for ChunkExtractor {
    fn default() -> Self {
        ChunkExtractor::new(DEFAULT_MAX_PHRASE_WORDS)
    }
}

impl PhraseExtractor for ChunkExtractor {
    fn extract(&self, text: &str, _store: &TermStore) -> Vec<CandidateSpan> {
        let mut spans = Vec::new();
        for chunk in self.chunks(text) {
            let words = &chunk.words;
            if let (Some(opener), Some(last)) = (chunk.opener, words.last()) {
                spans.push(CandidateSpan::new(
                    &text[opener.start..last.end],
                    opener.start,
                    last.end,
                ));
            }
            for i in 0..words.len() {
                let longest = (i + self.max_phrase_words).min(words.len());
                for j in i..longest {
                    let (start, end) = (words[i].start, words[j].end);
                    spans.push(CandidateSpan::new(&text[start..end], start, end));
                }
            }
        }
        spans
    }

    fn name(&self) -> &str {
        "phrase-chunks"
    }
}

/// Fallback extractor: single words that are already known terms
#[derive(Debug, Clone, Default)]
pub struct KnownWordExtractor;

impl KnownWordExtractor {
    pub fn new() -> Self {
        KnownWordExtractor
    }
}

impl PhraseExtractor for KnownWordExtractor {
    fn extract(&self, text: &str, store: &TermStore) -> Vec<CandidateSpan> {
        SIMPLE_WORD_RE
            .find_iter(text)
            .filter(|m| store.contains(m.as_str()))
            .map(|m| CandidateSpan::new(m.as_str(), m.start(), m.end()))
            .collect()
    }

    fn name(&self) -> &str {
        "known-words"
    }
}
