//! Parallel sentence corpus.
//!
//! The built-in corpus is a handful of English → French pairs. A JSON file
//! of `[{"source": "...", "target": "..."}]` objects can replace it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const BUILTIN_PAIRS: &[(&str, &str)] = &[
    ("hello", "hi"),
    ("how are you", "i am fine"),
    ("what is your name", "i am a bot"),
    ("bye", "goodbye"),
    ("thank you", "you are welcome"),
    ("what time is it", "i do not know"),
    ("where do you live", "i live on the internet"),
];

/// One source sentence and its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    pub source: String,
    pub target: String,
}

/// Non-empty list of sentence pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    pairs: Vec<SentencePair>,
}

impl Corpus {
    /// Build a corpus, rejecting empty lists and blank sentences.
    pub fn new(pairs: Vec<SentencePair>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(Error::Corpus("corpus has no sentence pairs".into()));
        }
        if let Some((i, _)) = pairs
            .iter()
            .enumerate()
            .find(|(_, p)| p.source.trim().is_empty() || p.target.trim().is_empty())
        {
            return Err(Error::Corpus(format!("pair {i} has an empty sentence")));
        }
        Ok(Self { pairs })
    }

    /// Build from parallel source/target lists of equal length.
    pub fn from_parallel<S: AsRef<str>, T: AsRef<str>>(sources: &[S], targets: &[T]) -> Result<Self> {
        if sources.len() != targets.len() {
            return Err(Error::Corpus(format!(
                "{} source sentences but {} target sentences",
                sources.len(),
                targets.len()
            )));
        }
        let pairs = sources
            .iter()
            .zip(targets)
            .map(|(s, t)| SentencePair {
                source: s.as_ref().to_string(),
                target: t.as_ref().to_string(),
            })
            .collect();
        Self::new(pairs)
    }

    /// The English → French toy corpus.
    pub fn builtin() -> Self {
        Self {
            pairs: BUILTIN_PAIRS
                .iter()
                .map(|(s, t)| SentencePair {
                    source: s.to_string(),
                    target: t.to_string(),
                })
                .collect(),
        }
    }

    /// Load pairs from a JSON array file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading corpus from {:?}", path);
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let pairs: Vec<SentencePair> = serde_json::from_str(raw)?;
        Self::new(pairs)
    }

    pub fn pairs(&self) -> &[SentencePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn sources(&self) -> Vec<&str> {
        self.pairs.iter().map(|p| p.source.as_str()).collect()
    }

    /// Target sentences wrapped in the start/end sentinel words.
    pub fn framed_targets(&self, start: &str, end: &str) -> Vec<String> {
        self.pairs
            .iter()
            .map(|p| format!("{start} {} {end}", p.target))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_corpus() {
        let c = Corpus::builtin();
        assert_eq!(c.len(), 7);
        assert_eq!(c.pairs()[1].source, "how are you");
        assert_eq!(c.pairs()[1].target, "i am fine");
    }

    #[test]
    fn test_framed_targets() {
        let c = Corpus::builtin();
        let framed = c.framed_targets("<start>", "<end>");
        assert_eq!(framed[0], "<start> hi <end>");
    }

    #[test]
    fn test_from_json() {
        let c = Corpus::from_json_str(r#"[{"source": "yes", "target": "oui"}]"#).unwrap();
        assert_eq!(c.sources(), vec!["yes"]);
    }

    #[test]
    fn test_rejects_empty_and_mismatched() {
        assert!(matches!(Corpus::from_json_str("[]"), Err(Error::Corpus(_))));
        assert!(matches!(
            Corpus::from_parallel(&["a", "b"], &["x"]),
            Err(Error::Corpus(_))
        ));
        assert!(Corpus::from_parallel(&["a"], &["  "]).is_err());
        assert!(matches!(Corpus::from_json_str("{"), Err(Error::Json(_))));
    }
}
