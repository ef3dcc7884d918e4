//! Configuration for the translator.
//!
//! Every section deserializes from JSON with per-field defaults, so a config
//! file only needs to name the values it overrides:
//!
//! ```json
//! { "training": { "epochs": 500 }, "decoding": { "max_repeats": 1 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Characters replaced by spaces before splitting source text.
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Start-of-sequence sentinel word in the target vocabulary.
pub const DEFAULT_START_TOKEN: &str = "<start>";

/// End-of-sequence sentinel word in the target vocabulary.
pub const DEFAULT_END_TOKEN: &str = "<end>";

/// Encoder/decoder layer sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub embedding_dim: usize,
    pub latent_dim: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 64,
            latent_dim: 128,
        }
    }
}

/// Training-loop hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Seed for the per-epoch batch shuffle.
    pub seed: u64,
    /// Log mean loss every this many epochs (and at the first and last).
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 300,
            batch_size: 2,
            learning_rate: 1e-3,
            seed: 42,
            log_every: 50,
        }
    }
}

/// Greedy decoding limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingConfig {
    /// Consecutive repeats of the same word tolerated before halting.
    pub max_repeats: usize,
    /// Halt once the output reaches the length cap instead of one word past it.
    pub strict_length_cap: bool,
    /// Overrides the cap derived from the longest training target.
    pub max_target_length: Option<usize>,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            max_repeats: 2,
            strict_length_cap: false,
            max_target_length: None,
        }
    }
}

/// Word tokenizer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Every character in this string is treated as a word separator.
    pub filters: String,
    pub lowercase: bool,
    /// When set, unknown words encode to this token (id 1) instead of being dropped.
    pub oov_token: Option<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            filters: DEFAULT_FILTERS.to_string(),
            lowercase: true,
            oov_token: None,
        }
    }
}

impl TokenizerConfig {
    /// Tokenizer that keeps punctuation, so `<start>`/`<end>` survive.
    pub fn unfiltered() -> Self {
        Self {
            filters: String::new(),
            ..Default::default()
        }
    }
}

/// Top-level translator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub model: ModelConfig,
    pub training: TrainingConfig,
    pub decoding: DecodingConfig,
    pub source_tokenizer: TokenizerConfig,
    pub target_tokenizer: TokenizerConfig,
    pub start_token: String,
    pub end_token: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            training: TrainingConfig::default(),
            decoding: DecodingConfig::default(),
            source_tokenizer: TokenizerConfig::default(),
            target_tokenizer: TokenizerConfig::unfiltered(),
            start_token: DEFAULT_START_TOKEN.to_string(),
            end_token: DEFAULT_END_TOKEN.to_string(),
        }
    }
}

impl TranslatorConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the model or trainer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.model.embedding_dim == 0 || self.model.latent_dim == 0 {
            return Err(Error::Config(format!(
                "model dims must be positive, got embedding_dim={} latent_dim={}",
                self.model.embedding_dim, self.model.latent_dim
            )));
        }
        if self.training.batch_size == 0 {
            return Err(Error::Config("batch_size must be positive".into()));
        }
        if !(self.training.learning_rate > 0.0) {
            return Err(Error::Config(format!(
                "learning_rate must be positive, got {}",
                self.training.learning_rate
            )));
        }
        if self.start_token.is_empty() || self.end_token.is_empty() {
            return Err(Error::Config("sentinel tokens must be non-empty".into()));
        }
        if self.start_token == self.end_token {
            return Err(Error::Config(format!(
                "start and end tokens must differ, both are {:?}",
                self.start_token
            )));
        }
        // A sentinel containing a target filter character would be split apart.
        let filters = &self.target_tokenizer.filters;
        if self
            .start_token
            .chars()
            .chain(self.end_token.chars())
            .any(|c| filters.contains(c) || c.is_whitespace())
        {
            return Err(Error::Config(
                "sentinel tokens must not contain target filter characters or whitespace".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = TranslatorConfig::default();
        assert_eq!(cfg.model.embedding_dim, 64);
        assert_eq!(cfg.model.latent_dim, 128);
        assert_eq!(cfg.training.epochs, 300);
        assert_eq!(cfg.training.batch_size, 2);
        assert_eq!(cfg.decoding.max_repeats, 2);
        assert!(!cfg.decoding.strict_length_cap);
        assert!(cfg.target_tokenizer.filters.is_empty());
        assert!(cfg.source_tokenizer.filters.contains('?'));
        cfg.validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: TranslatorConfig =
            serde_json::from_str(r#"{"training": {"epochs": 5}, "decoding": {"max_repeats": 0}}"#)
                .unwrap();
        assert_eq!(cfg.training.epochs, 5);
        assert_eq!(cfg.training.batch_size, 2);
        assert_eq!(cfg.decoding.max_repeats, 0);
        assert_eq!(cfg.model, ModelConfig::default());
        assert_eq!(cfg.end_token, "<end>");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = TranslatorConfig::default();
        cfg.training.batch_size = 0;
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));

        let mut cfg = TranslatorConfig::default();
        cfg.training.learning_rate = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = TranslatorConfig::default();
        cfg.model.latent_dim = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = TranslatorConfig::default();
        cfg.end_token = cfg.start_token.clone();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_filtered_sentinels() {
        let mut cfg = TranslatorConfig::default();
        cfg.target_tokenizer = TokenizerConfig::default();
        // Default filters contain '<' and '>'
        assert!(cfg.validate().is_err());
    }
}
