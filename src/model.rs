//! Model components for the translator.
//!
//! ## Components
//!
//! - [`encoder`] — source Embedding → LSTM, final (h, c) seeds the decoder
//! - [`decoder`] — target Embedding → LSTM → Linear over the target vocabulary
//! - [`seq2seq`] — the two halves joined, for training and step-wise inference
//!
//! The greedy decoder only sees models through [`SequenceModel`], so it can
//! be driven by scripted mocks in tests.

pub mod decoder;
pub mod encoder;
pub mod seq2seq;

pub use seq2seq::Seq2Seq;

use crate::Result;

/// Autoregressive model queried one token at a time.
pub trait SequenceModel {
    /// Recurrent state carried between steps.
    type State;

    /// Encode a source token sequence into the initial decoder state.
    fn init_state(&self, source: &[u32]) -> Result<Self::State>;

    /// Feed one token and return the next-token distribution (indexed by
    /// token id, one weight per target vocabulary entry) with the new state.
    fn step(&self, token: u32, state: &Self::State) -> Result<(Vec<f32>, Self::State)>;
}
