//! End-to-end translation pipeline.
//!
//! 1. Fit source and target vocabularies (targets framed with `<start>`/`<end>`)
//! 2. Pad sequences to the corpus maxima
//! 3. Train the LSTM encoder-decoder
//! 4. Translate with the greedy decoder

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};

use crate::config::TranslatorConfig;
use crate::corpus::Corpus;
use crate::decoding::{ConsecutiveRepeatGuard, DecodeTrace, GreedyConfig, GreedyDecoder};
use crate::model::Seq2Seq;
use crate::text::{Sentinels, Vocabulary, WordTokenizer};
use crate::train::{TrainingData, TrainingReport, train};
use crate::{Error, Result};

/// Corpus-specific translator: vocabularies are fixed at construction,
/// the model is filled in by [`Translator::train`].
pub struct Translator {
    cfg: TranslatorConfig,
    source_vocab: WordTokenizer,
    target_vocab: WordTokenizer,
    sentinels: Sentinels,
    data: TrainingData,
    max_source_len: usize,
    max_target_len: usize,
    model: Option<Seq2Seq>,
}

impl Translator {
    /// Fit vocabularies and prepare padded training data.
    pub fn new(corpus: &Corpus, cfg: TranslatorConfig) -> Result<Self> {
        cfg.validate()?;

        let sources = corpus.sources();
        let targets = corpus.framed_targets(&cfg.start_token, &cfg.end_token);

        let source_vocab = WordTokenizer::fit(&sources, cfg.source_tokenizer.clone());
        let target_vocab = WordTokenizer::fit(&targets, cfg.target_tokenizer.clone());
        let sentinels = Sentinels::resolve(&target_vocab, &cfg.start_token, &cfg.end_token)?;

        let source_seqs = source_vocab.encode_batch(&sources);
        let target_seqs = target_vocab.encode_batch(&targets);

        let max_source_len = source_seqs.iter().map(Vec::len).max().unwrap_or(0);
        let max_target_len = target_seqs.iter().map(Vec::len).max().unwrap_or(0);
        if max_source_len == 0 {
            return Err(Error::Corpus(
                "no source sentence has a word left after filtering".into(),
            ));
        }

        let data = TrainingData::build(&source_seqs, &target_seqs, max_source_len, max_target_len)?;

        tracing::info!(
            "Source vocab: {} ids, target vocab: {} ids, max lengths {}/{}",
            source_vocab.vocab_size(),
            target_vocab.vocab_size(),
            max_source_len,
            max_target_len
        );

        Ok(Self {
            cfg,
            source_vocab,
            target_vocab,
            sentinels,
            data,
            max_source_len,
            max_target_len,
            model: None,
        })
    }

    /// Build a fresh model on `device` and train it. Retraining replaces the model.
    pub fn train(&mut self, device: &Device) -> Result<TrainingReport> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let model = Seq2Seq::new(
            self.source_vocab.vocab_size(),
            self.target_vocab.vocab_size(),
            self.max_source_len,
            &self.cfg.model,
            vb,
        )?;

        let report = train(&model, &varmap, &self.data, &self.cfg.training)?;
        if let Some(loss) = report.final_loss() {
            tracing::info!("Training finished, final loss {:.4}", loss);
        }

        self.model = Some(model);
        Ok(report)
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Translate one sentence. Fails with [`Error::NotTrained`] before [`Translator::train`].
    pub fn translate(&self, text: &str) -> Result<String> {
        Ok(self.translate_with_trace(text)?.text())
    }

    pub fn translate_with_trace(&self, text: &str) -> Result<DecodeTrace> {
        let model = self.model.as_ref().ok_or(Error::NotTrained)?;
        let decoder = GreedyDecoder::new(
            model,
            &self.source_vocab,
            &self.target_vocab,
            self.sentinels,
            self.greedy_config(),
            ConsecutiveRepeatGuard::new(self.cfg.decoding.max_repeats),
        );
        decoder.translate_with_trace(text)
    }

    /// Decoding limits; the length cap defaults to the longest framed target.
    pub fn greedy_config(&self) -> GreedyConfig {
        GreedyConfig {
            max_target_length: self
                .cfg
                .decoding
                .max_target_length
                .unwrap_or(self.max_target_len),
            strict_length_cap: self.cfg.decoding.strict_length_cap,
        }
    }

    pub fn source_vocab(&self) -> &WordTokenizer {
        &self.source_vocab
    }

    pub fn target_vocab(&self) -> &WordTokenizer {
        &self.target_vocab
    }

    pub fn sentinels(&self) -> Sentinels {
        self.sentinels
    }

    /// Longest encoded source sentence.
    pub fn max_source_len(&self) -> usize {
        self.max_source_len
    }

    /// Longest encoded target sentence, sentinels included.
    pub fn max_target_len(&self) -> usize {
        self.max_target_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelConfig, TrainingConfig};
    use crate::decoding::HaltReason;

    fn small_config(epochs: usize) -> TranslatorConfig {
        TranslatorConfig {
            model: ModelConfig {
                embedding_dim: 16,
                latent_dim: 32,
            },
            training: TrainingConfig {
                epochs,
                learning_rate: 1e-2,
                log_every: 0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_vocab_and_lengths_from_builtin_corpus() {
        let t = Translator::new(&Corpus::builtin(), TranslatorConfig::default()).unwrap();
        assert_eq!(t.sentinels(), Sentinels { start: 1, end: 2 });
        // "where do you live" / "what is your name"
        assert_eq!(t.max_source_len(), 4);
        // "<start> i live on the internet <end>"
        assert_eq!(t.max_target_len(), 7);
        assert_eq!(t.greedy_config().max_target_length, 7);
        assert!(t.source_vocab().id_of("you").is_some());
        assert!(t.target_vocab().id_of("bonjour").is_none());
    }

    #[test]
    fn test_translate_before_train_fails() {
        let t = Translator::new(&Corpus::builtin(), TranslatorConfig::default()).unwrap();
        assert!(!t.is_trained());
        assert!(matches!(t.translate("how are you"), Err(Error::NotTrained)));
    }

    #[test]
    fn test_max_length_override() {
        let mut cfg = TranslatorConfig::default();
        cfg.decoding.max_target_length = Some(3);
        cfg.decoding.strict_length_cap = true;
        let t = Translator::new(&Corpus::builtin(), cfg).unwrap();
        let g = t.greedy_config();
        assert_eq!(g.max_target_length, 3);
        assert!(g.strict_length_cap);
    }

    #[test]
    fn test_rejects_corpus_without_source_words() {
        let corpus = Corpus::from_parallel(&["?!"], &["oui"]).unwrap();
        assert!(matches!(
            Translator::new(&corpus, TranslatorConfig::default()),
            Err(Error::Corpus(_))
        ));
    }

    #[test]
    fn test_train_then_translate() {
        let mut t = Translator::new(&Corpus::builtin(), small_config(60)).unwrap();
        let report = t.train(&Device::Cpu).unwrap();
        assert!(report.final_loss().unwrap() < report.epoch_losses[0]);

        let trace = t.translate_with_trace("how are you").unwrap();
        let bound = (t.max_target_len() + 2) * 3;
        assert!(trace.steps <= bound);
        assert!(trace.words.len() <= t.max_target_len() + 1);
        assert!(!trace.words.iter().any(|w| w == "<start>" || w == "<end>"));
        if trace.halt == HaltReason::EndOfSequence {
            assert!(!trace.text().contains("<end>"));
        }

        // Same model, same input → same output.
        assert_eq!(t.translate("how are you").unwrap(), trace.text());
        // Entirely unknown input still decodes.
        assert!(t.translate("zzz qqq").is_ok());
    }
}
