//! Stopword removal
//!
//! [`LinguisticStopwords`] tokenizes properly (punctuation is not part of a word,
//! possessive `'s` is split off and dropped) and filters against a full English list.
//! [`BasicStopwords`] splits on whitespace and filters a handful of function words.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::StopwordRemover;

/// Words that may open a noun phrase. They are stopwords, but they do not end a chunk.
pub(crate) const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her", "its", "our",
    "their", "some", "any", "each", "every", "no",
];

/// Whitespace-separated
const ENGLISH_STOPWORDS: &str = "\
    a about above across after afterwards again against all almost alone along already \
    also although always am among amongst an and another any anyhow anyone anything \
    anyway anywhere are around as at be became because become becomes becoming been \
    before beforehand behind being below beside besides between beyond both but by can \
    cannot could did do does doing done down due during each either else elsewhere \
    enough even ever every everyone everything everywhere except few for former formerly \
    from further had has have having he hence her here hereafter hereby herein hers \
    herself him himself his how however i if in indeed into is it its itself just last \
    latter least less many may me meanwhile might mine more moreover most mostly much \
    must my myself neither never nevertheless next no nobody none noone nor not nothing \
    now nowhere of off often on once only onto or other others otherwise our ours \
    ourselves out over own per perhaps please quite rather really same seem seemed \
    seeming seems several she should since so some somehow someone something sometime \
    sometimes somewhere still such than that the their theirs them themselves then \
    thence there thereafter thereby therefore therein thereupon these they this those \
    though through throughout thru thus to together too toward towards under unless \
    until up upon us very via was we well were what whatever when whence whenever where \
    whereafter whereas whereby wherein whereupon wherever whether which while whither \
    who whoever whole whom whose why will with within without would yet you your yours \
    yourself yourselves";

const BASIC_STOPWORDS: &[&str] = &[
    "a", "an", "the", "of", "in", "on", "at", "to", "for", "by", "with", "from", "and", "or", "is",
    "are", "was", "were",
];

static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:[-_'’][\p{L}\p{N}]+)*['’]?").expect("word token regex")
});

/// A word token with its byte range in the source text, possessive clitic excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WordToken<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

/// Split text into word tokens. `"server's"` yields `"server"`; the clitic is dropped.
pub(crate) fn word_tokens(text: &str) -> Vec<WordToken<'_>> {
    WORD_RE
        .find_iter(text)
        .filter_map(|m| {
            let word = strip_possessive(m.as_str());
            if word.is_empty() {
                return None;
            }
            Some(WordToken {
                start: m.start(),
                end: m.start() + word.len(),
                text: word,
            })
        })
        .collect()
}

fn strip_possessive(word: &str) -> &str {
    for clitic in ["'s", "'S", "’s", "’S", "'", "’"] {
        if let Some(stem) = word.strip_suffix(clitic) {
            return stem;
        }
    }
    word
}

/// Full English stopword list with a clitic-aware tokenizer
#[derive(Debug, Clone)]
pub struct LinguisticStopwords {
    words: HashSet<&'static str>,
}

impl LinguisticStopwords {
    pub fn new() -> Self {
        LinguisticStopwords {
            words: ENGLISH_STOPWORDS.split_whitespace().collect(),
        }
    }
}

impl Default for LinguisticStopwords {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwordRemover for LinguisticStopwords {
    fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    fn remove_stopwords(&self, phrase: &str) -> String {
        let lowered = phrase.to_lowercase();
        word_tokens(&lowered)
            .into_iter()
            .map(|token| token.text)
            .filter(|word| !self.is_stopword(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Fixed set of function words, whitespace tokenization
#[derive(Debug, Clone)]
pub struct BasicStopwords {
    words: HashSet<&'static str>,
}

impl BasicStopwords {
    pub fn new() -> Self {
        BasicStopwords {
            words: BASIC_STOPWORDS.iter().copied().collect(),
        }
    }
}

impl Default for BasicStopwords {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwordRemover for BasicStopwords {
    fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    fn remove_stopwords(&self, phrase: &str) -> String {
        phrase
            .to_lowercase()
            .split_whitespace()
            .filter(|word| !self.is_stopword(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
