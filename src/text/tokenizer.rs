//! Word-level vocabulary.
//!
//! Text is lowercased, every filter character becomes a space, and the
//! result is split on whitespace. Ids start at 1 (0 is padding) and are
//! assigned by descending frequency; equally frequent words keep the order
//! in which they first appeared in the corpus.

use std::collections::HashMap;

use crate::config::TokenizerConfig;
use crate::{Error, Result};

/// Id reserved for padding. Never assigned to a word.
pub const PAD_ID: u32 = 0;

/// Bidirectional word ↔ id mapping.
pub trait Vocabulary {
    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Look up the word for an id. `None` for padding and unknown ids.
    fn decode(&self, id: u32) -> Option<&str>;

    /// Look up the id of a single word.
    fn id_of(&self, word: &str) -> Option<u32>;

    /// Number of ids, including the padding id.
    fn vocab_size(&self) -> usize;
}

/// Vocabulary fitted on a corpus of sentences.
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    cfg: TokenizerConfig,
    word_index: HashMap<String, u32>,
    /// `index_word[id - 1]` is the word for `id`.
    index_word: Vec<String>,
}

impl WordTokenizer {
    /// Build a vocabulary from the given sentences.
    pub fn fit<S: AsRef<str>>(texts: &[S], cfg: TokenizerConfig) -> Self {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut position: HashMap<String, usize> = HashMap::new();

        for text in texts {
            for word in split_words(text.as_ref(), &cfg) {
                match position.get(&word) {
                    Some(&i) => counts[i].1 += 1,
                    None => {
                        position.insert(word.clone(), counts.len());
                        counts.push((word, 1));
                    }
                }
            }
        }

        // Stable sort keeps first-occurrence order among equal counts.
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let mut index_word = Vec::with_capacity(counts.len() + 1);
        if let Some(oov) = &cfg.oov_token {
            index_word.push(oov.clone());
        }
        index_word.extend(
            counts
                .into_iter()
                .map(|(w, _)| w)
                .filter(|w| cfg.oov_token.as_deref() != Some(w.as_str())),
        );

        let word_index = index_word
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i as u32 + 1))
            .collect();

        tracing::debug!("Fitted vocabulary with {} words", index_word.len());

        Self {
            cfg,
            word_index,
            index_word,
        }
    }

    /// Split text into normalized words without looking them up.
    pub fn words(&self, text: &str) -> Vec<String> {
        split_words(text, &self.cfg)
    }

    /// Id that unknown words map to, if an OOV token is configured.
    pub fn oov_id(&self) -> Option<u32> {
        self.cfg.oov_token.as_ref().map(|_| 1)
    }

    /// Encode each sentence.
    pub fn encode_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<u32>> {
        texts.iter().map(|t| self.encode(t.as_ref())).collect()
    }
}

impl Vocabulary for WordTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        let oov = self.oov_id();
        split_words(text, &self.cfg)
            .into_iter()
            .filter_map(|w| self.word_index.get(&w).copied().or(oov))
            .collect()
    }

    fn decode(&self, id: u32) -> Option<&str> {
        if id == PAD_ID {
            return None;
        }
        self.index_word.get(id as usize - 1).map(String::as_str)
    }

    fn id_of(&self, word: &str) -> Option<u32> {
        self.word_index.get(word).copied()
    }

    fn vocab_size(&self) -> usize {
        self.index_word.len() + 1
    }
}

/// Start/end-of-sequence ids in a target vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinels {
    pub start: u32,
    pub end: u32,
}

impl Sentinels {
    /// Look up both sentinel words; both must be in the vocabulary.
    pub fn resolve(vocab: &impl Vocabulary, start: &str, end: &str) -> Result<Self> {
        let lookup = |word: &str| {
            vocab
                .id_of(word)
                .ok_or_else(|| Error::Vocabulary(format!("sentinel {word:?} not in vocabulary")))
        };
        Ok(Self {
            start: lookup(start)?,
            end: lookup(end)?,
        })
    }
}

fn split_words(text: &str, cfg: &TokenizerConfig) -> Vec<String> {
    let text = if cfg.lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };
    let cleaned: String = text
        .chars()
        .map(|c| if cfg.filters.contains(c) { ' ' } else { c })
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}
