//! Teacher-forced training for [`Seq2Seq`].
//!
//! Each target sequence `<start> w1 .. wn <end>` is split into
//!
//! ```text
//! decoder input:  <start> w1 .. wn
//! decoder target: w1 .. wn <end>
//! ```
//!
//! both post-padded to `max_target_len - 1`. Loss is cross-entropy over every
//! position, padding included, optimized with Adam.

use candle_core::{Device, Tensor};
use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarMap};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::config::TrainingConfig;
use crate::model::Seq2Seq;
use crate::text::{Padding, Truncating, pad_sequences};
use crate::{Error, Result};

/// Padded, row-aligned training arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingData {
    pub encoder_input: Vec<Vec<u32>>,
    pub decoder_input: Vec<Vec<u32>>,
    pub decoder_target: Vec<Vec<u32>>,
}

impl TrainingData {
    /// Build from encoded source and (sentinel-framed) target sequences.
    pub fn build(
        source: &[Vec<u32>],
        target: &[Vec<u32>],
        max_source_len: usize,
        max_target_len: usize,
    ) -> Result<Self> {
        if source.is_empty() || source.len() != target.len() {
            return Err(Error::Corpus(format!(
                "need matching non-empty sequences, got {} source / {} target",
                source.len(),
                target.len()
            )));
        }
        if max_target_len < 2 {
            return Err(Error::Corpus(format!(
                "target sequences need at least 2 tokens, longest has {max_target_len}"
            )));
        }

        let dec_len = max_target_len - 1;
        let shifted_in: Vec<Vec<u32>> = target
            .iter()
            .map(|t| t[..t.len().saturating_sub(1)].to_vec())
            .collect();
        let shifted_out: Vec<Vec<u32>> = target
            .iter()
            .map(|t| t.iter().skip(1).copied().collect())
            .collect();

        Ok(Self {
            encoder_input: pad_sequences(source, max_source_len, Padding::Post, Truncating::Pre),
            decoder_input: pad_sequences(&shifted_in, dec_len, Padding::Post, Truncating::Pre),
            decoder_target: pad_sequences(&shifted_out, dec_len, Padding::Post, Truncating::Pre),
        })
    }

    pub fn len(&self) -> usize {
        self.encoder_input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoder_input.is_empty()
    }

    fn batch(&self, rows: &[usize], device: &Device) -> Result<(Tensor, Tensor, Tensor)> {
        Ok((
            gather(&self.encoder_input, rows, device)?,
            gather(&self.decoder_input, rows, device)?,
            gather(&self.decoder_target, rows, device)?,
        ))
    }
}

fn gather(data: &[Vec<u32>], rows: &[usize], device: &Device) -> Result<Tensor> {
    let width = data.first().map_or(0, Vec::len);
    let flat: Vec<u32> = rows.iter().flat_map(|&r| data[r].iter().copied()).collect();
    Ok(Tensor::from_vec(flat, (rows.len(), width), device)?)
}

/// Per-epoch mean loss.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingReport {
    pub epoch_losses: Vec<f32>,
}

impl TrainingReport {
    pub fn final_loss(&self) -> Option<f32> {
        self.epoch_losses.last().copied()
    }
}

/// Fit `model` (whose parameters live in `varmap`) on `data`.
pub fn train(
    model: &Seq2Seq,
    varmap: &VarMap,
    data: &TrainingData,
    cfg: &TrainingConfig,
) -> Result<TrainingReport> {
    if data.is_empty() {
        return Err(Error::Corpus("no training examples".into()));
    }
    if cfg.batch_size == 0 {
        return Err(Error::Config("batch_size must be positive".into()));
    }

    let params = ParamsAdamW {
        lr: cfg.learning_rate,
        weight_decay: 0.0,
        ..Default::default()
    };
    let mut opt = AdamW::new(varmap.all_vars(), params)?;
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let device = model.device();
    let vocab = model.target_vocab_size();

    tracing::info!(
        "Training on {} pairs for {} epochs (batch size {})",
        data.len(),
        cfg.epochs,
        cfg.batch_size
    );

    let mut order: Vec<usize> = (0..data.len()).collect();
    let mut report = TrainingReport::default();

    for epoch in 0..cfg.epochs {
        order.shuffle(&mut rng);
        let mut total = 0f32;
        let mut batches = 0usize;

        for rows in order.chunks(cfg.batch_size) {
            let (src, tgt_in, tgt_out) = data.batch(rows, device)?;
            let logits = model.forward_train(&src, &tgt_in)?;
            let (b, t, _) = logits.dims3()?;
            let loss = candle_nn::loss::cross_entropy(
                &logits.reshape((b * t, vocab))?,
                &tgt_out.reshape(b * t)?,
            )?;
            opt.backward_step(&loss)?;
            total += loss.to_scalar::<f32>()?;
            batches += 1;
        }

        let mean = total / batches as f32;
        report.epoch_losses.push(mean);

        let last = epoch + 1 == cfg.epochs;
        if epoch == 0 || last || (cfg.log_every > 0 && (epoch + 1) % cfg.log_every == 0) {
            tracing::info!("epoch {}/{}: loss {:.4}", epoch + 1, cfg.epochs, mean);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use candle_core::DType;
    use candle_nn::VarBuilder;

    #[test]
    fn test_build_shifts_and_pads() {
        // <start>=1, <end>=2
        let source = vec![vec![5], vec![6, 7]];
        let target = vec![vec![1, 3, 2], vec![1, 3, 4, 2]];
        let data = TrainingData::build(&source, &target, 2, 4).unwrap();
        assert_eq!(data.encoder_input, vec![vec![5, 0], vec![6, 7]]);
        assert_eq!(data.decoder_input, vec![vec![1, 3, 0], vec![1, 3, 4]]);
        assert_eq!(data.decoder_target, vec![vec![3, 2, 0], vec![3, 4, 2]]);
    }

    #[test]
    fn test_build_rejects_bad_input() {
        assert!(TrainingData::build(&[], &[], 1, 3).is_err());
        assert!(TrainingData::build(&[vec![1]], &[], 1, 3).is_err());
        assert!(TrainingData::build(&[vec![1]], &[vec![1]], 1, 1).is_err());
    }

    #[test]
    fn test_training_reduces_loss() {
        let dev = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &dev);
        let model_cfg = ModelConfig {
            embedding_dim: 8,
            latent_dim: 16,
        };
        let model = Seq2Seq::new(5, 6, 2, &model_cfg, vb).unwrap();

        let source = vec![vec![1, 2], vec![3], vec![4, 1]];
        let target = vec![vec![1, 3, 2], vec![1, 4, 5, 2], vec![1, 5, 2]];
        let data = TrainingData::build(&source, &target, 2, 4).unwrap();

        let cfg = TrainingConfig {
            epochs: 40,
            batch_size: 2,
            learning_rate: 1e-2,
            seed: 7,
            log_every: 0,
        };
        let report = train(&model, &varmap, &data, &cfg).unwrap();
        assert_eq!(report.epoch_losses.len(), 40);
        let first = report.epoch_losses[0];
        let last = report.final_loss().unwrap();
        assert!(last < first, "loss did not drop: {first} → {last}");
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let dev = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &dev);
        let model = Seq2Seq::new(3, 4, 1, &ModelConfig::default(), vb).unwrap();
        let data = TrainingData::build(&[vec![1]], &[vec![1, 2]], 1, 2).unwrap();
        let cfg = TrainingConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(train(&model, &varmap, &data, &cfg), Err(Error::Config(_))));
    }
}
