//! Target decoder — embedding → LSTM → vocabulary projection.
//!
//! Runs in two modes:
//! - teacher-forced over a whole `[B, T]` sequence for training
//! - one token at a time for greedy inference

use candle_core::{Module, Result, Tensor};
use candle_nn::rnn::{LSTMState, RNN};
use candle_nn::{self as nn, VarBuilder};

use crate::config::ModelConfig;

#[derive(Debug, Clone)]
pub struct Seq2SeqDecoder {
    embedding: nn::Embedding,
    lstm: nn::LSTM,
    dense: nn::Linear,
}

impl Seq2SeqDecoder {
    pub fn new(vocab_size: usize, cfg: &ModelConfig, vb: VarBuilder) -> Result<Self> {
        let embedding = nn::embedding(vocab_size, cfg.embedding_dim, vb.pp("embedding"))?;
        let lstm = nn::lstm(
            cfg.embedding_dim,
            cfg.latent_dim,
            nn::LSTMConfig::default(),
            vb.pp("lstm"),
        )?;
        let dense = nn::linear(cfg.latent_dim, vocab_size, vb.pp("dense"))?;
        Ok(Self {
            embedding,
            lstm,
            dense,
        })
    }

    /// Teacher-forced pass.
    ///
    /// - `tgt_in`: `[B, T]` u32 — target ids shifted right (starting at `<start>`)
    /// - `init`: encoder state, `[B, latent]` each
    ///
    /// Returns logits `[B, T, vocab]`.
    pub fn forward(&self, tgt_in: &Tensor, init: &LSTMState) -> Result<Tensor> {
        let emb = self.embedding.forward(tgt_in)?;
        let states = self.lstm.seq_init(&emb, init)?;
        let hidden = self.lstm.states_to_tensor(&states)?;
        self.dense.forward(&hidden)
    }

    /// Single step: feed `token` and return logits `[1, vocab]` plus the new state.
    pub fn step(&self, token: &Tensor, state: &LSTMState) -> Result<(Tensor, LSTMState)> {
        // token: [1] → [1, embedding_dim]
        let emb = self.embedding.forward(token)?;
        let next = self.lstm.step(&emb, state)?;
        let logits = self.dense.forward(next.h())?;
        Ok((logits, next))
    }
}
