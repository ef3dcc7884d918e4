//! LSTM encoder-decoder.
//!
//! ```text
//! src [B, S] → Encoder ──(h, c)──┐
//!                                ↓
//! tgt_in [B, T] → Decoder ──→ logits [B, T, tgt_vocab]
//! ```
//!
//! Inference reuses the trained decoder layers step by step through
//! [`SequenceModel`].

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_nn::rnn::LSTMState;

use super::SequenceModel;
use super::decoder::Seq2SeqDecoder;
use super::encoder::Seq2SeqEncoder;
use crate::config::ModelConfig;
use crate::text::{Padding, Truncating, pad_sequence};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Seq2Seq {
    encoder: Seq2SeqEncoder,
    decoder: Seq2SeqDecoder,
    /// Source length seen in training; inference inputs are padded to it.
    source_len: usize,
    target_vocab_size: usize,
    device: Device,
}

impl Seq2Seq {
    pub fn new(
        source_vocab_size: usize,
        target_vocab_size: usize,
        source_len: usize,
        cfg: &ModelConfig,
        vb: VarBuilder,
    ) -> Result<Self> {
        if source_vocab_size == 0 || target_vocab_size == 0 {
            return Err(Error::Config("vocabulary sizes must be positive".into()));
        }
        let device = vb.device().clone();
        let encoder = Seq2SeqEncoder::new(source_vocab_size, cfg, vb.pp("encoder"))?;
        let decoder = Seq2SeqDecoder::new(target_vocab_size, cfg, vb.pp("decoder"))?;
        Ok(Self {
            encoder,
            decoder,
            source_len,
            target_vocab_size,
            device,
        })
    }

    /// Teacher-forced forward pass, returns logits `[B, T, tgt_vocab]`.
    pub fn forward_train(&self, src: &Tensor, tgt_in: &Tensor) -> Result<Tensor> {
        let state = self.encoder.forward(src)?;
        Ok(self.decoder.forward(tgt_in, &state)?)
    }

    pub fn source_len(&self) -> usize {
        self.source_len
    }

    pub fn target_vocab_size(&self) -> usize {
        self.target_vocab_size
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl SequenceModel for Seq2Seq {
    type State = LSTMState;

    fn init_state(&self, source: &[u32]) -> Result<LSTMState> {
        let padded = pad_sequence(source, self.source_len, Padding::Post, Truncating::Pre);
        let src = Tensor::from_vec(padded, (1, self.source_len), &self.device)?;
        Ok(self.encoder.forward(&src)?)
    }

    fn step(&self, token: u32, state: &LSTMState) -> Result<(Vec<f32>, LSTMState)> {
        let token = Tensor::new(&[token], &self.device)?;
        let (logits, next) = self.decoder.step(&token, state)?;
        let probs = candle_nn::ops::softmax_last_dim(&logits)?
            .squeeze(0)?
            .to_dtype(DType::F32)?
            .to_vec1::<f32>()?;
        Ok((probs, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_nn::VarMap;

    fn tiny_model(dev: &Device) -> Seq2Seq {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, dev);
        let cfg = ModelConfig {
            embedding_dim: 8,
            latent_dim: 16,
        };
        Seq2Seq::new(6, 9, 4, &cfg, vb).unwrap()
    }

    #[test]
    fn test_forward_train_shape() {
        let dev = Device::Cpu;
        let model = tiny_model(&dev);
        let src = Tensor::new(&[[1u32, 2, 0, 0], [3, 4, 5, 0]], &dev).unwrap();
        let tgt = Tensor::new(&[[1u32, 3, 4], [1, 5, 6]], &dev).unwrap();
        let logits = model.forward_train(&src, &tgt).unwrap();
        assert_eq!(logits.dims(), &[2, 3, 9]);
    }

    #[test]
    fn test_step_returns_probability_distribution() {
        let dev = Device::Cpu;
        let model = tiny_model(&dev);
        let state = model.init_state(&[1, 2]).unwrap();
        let (probs, next) = model.step(1, &state).unwrap();
        assert_eq!(probs.len(), 9);
        assert!(probs.iter().all(|&p| p >= 0.0));
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-4, "sum = {total}");
        assert_eq!(next.h().dims(), &[1, 16]);
    }

    #[test]
    fn test_init_state_accepts_empty_and_overlong_sources() {
        let dev = Device::Cpu;
        let model = tiny_model(&dev);
        assert!(model.init_state(&[]).is_ok());
        assert!(model.init_state(&[1, 2, 3, 4, 5, 1, 2]).is_ok());
    }

    #[test]
    fn test_rejects_empty_vocab() {
        let dev = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &dev);
        let res = Seq2Seq::new(0, 5, 3, &ModelConfig::default(), vb);
        assert!(matches!(res, Err(Error::Config(_))));
    }
}
