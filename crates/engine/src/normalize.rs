use std::collections::{BTreeMap, BTreeSet};

use crate::config::Vocabulary;

/// Tokens this short carry no signal (single letters, connectors).
const MIN_TOKEN_LEN: usize = 3;

/// Turns raw facility/posting names into canonical token sets.
pub struct Normalizer {
    /// Abbreviation → pre-split expansion words.
    expansions: BTreeMap<String, Vec<String>>,
    stopwords: BTreeSet<String>,
}

impl Normalizer {
    pub fn new(vocab: &Vocabulary) -> Self {
        let expansions = vocab
            .abbreviations
            .iter()
            .map(|(abbr, expansion)| {
                (
                    abbr.clone(),
                    expansion.split_whitespace().map(str::to_string).collect(),
                )
            })
            .collect();
        Self {
            expansions,
            stopwords: vocab.stopwords.clone(),
        }
    }

    /// Lowercase, expand abbreviations by whole token, keep maximal ASCII
    /// alphanumeric runs of length >= 3.
    ///
    /// Expansion runs before the length filter so two-letter abbreviations
    /// like `rh` and `dh` still expand; an abbreviation embedded in a longer
    /// token never fires.
    pub fn tokens(&self, text: &str) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for raw in raw_tokens(text) {
            match self.expansions.get(&raw) {
                Some(words) => {
                    for word in words {
                        if word.len() >= MIN_TOKEN_LEN {
                            out.insert(word.clone());
                        }
                    }
                }
                None => {
                    if raw.len() >= MIN_TOKEN_LEN {
                        out.insert(raw);
                    }
                }
            }
        }
        out
    }

    /// `tokens` minus the stopword set: the significant vocabulary of a name.
    pub fn key_tokens(&self, text: &str) -> BTreeSet<String> {
        let mut tokens = self.tokens(text);
        tokens.retain(|t| !self.stopwords.contains(t));
        tokens
    }
}

/// Maximal runs of ASCII letters/digits, lowercased, in input order.
fn raw_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            current.push(ch.to_ascii_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
