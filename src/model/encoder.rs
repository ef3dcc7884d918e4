//! Source encoder — token embedding followed by a single LSTM layer.
//!
//! Only the final recurrent state is kept; it becomes the decoder's initial
//! (h, c). Padding ids are embedded like any other token.

use candle_core::{Module, Result, Tensor};
use candle_nn::rnn::{LSTMState, RNN};
use candle_nn::{self as nn, VarBuilder};

use crate::config::ModelConfig;

#[derive(Debug, Clone)]
pub struct Seq2SeqEncoder {
    embedding: nn::Embedding,
    lstm: nn::LSTM,
}

impl Seq2SeqEncoder {
    pub fn new(vocab_size: usize, cfg: &ModelConfig, vb: VarBuilder) -> Result<Self> {
        let embedding = nn::embedding(vocab_size, cfg.embedding_dim, vb.pp("embedding"))?;
        let lstm = nn::lstm(
            cfg.embedding_dim,
            cfg.latent_dim,
            nn::LSTMConfig::default(),
            vb.pp("lstm"),
        )?;
        Ok(Self { embedding, lstm })
    }

    /// Encode source ids `[B, S]` (u32) into the final LSTM state (`h`, `c`: `[B, latent]`).
    pub fn forward(&self, src: &Tensor) -> Result<LSTMState> {
        let (batch, seq_len) = src.dims2()?;
        if seq_len == 0 {
            return self.lstm.zero_state(batch);
        }
        let emb = self.embedding.forward(src)?;
        let states = self.lstm.seq(&emb)?;
        match states.into_iter().last() {
            Some(state) => Ok(state),
            None => self.lstm.zero_state(batch),
        }
    }
}
