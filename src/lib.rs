//! Tiny sequence-to-sequence translation in pure Rust.
//!
//! A candle-based LSTM encoder-decoder trained on a handful of sentence
//! pairs, with a greedy decoder that suppresses repeated words.
//!
//! ## Architecture
//!
//! ```text
//! source text → WordTokenizer → pad ──→ LSTM encoder ──┐ (h, c)
//!                                                      ↓
//! <start> → Embedding → LSTM decoder → Linear → softmax → argmax ─┐
//!    ↑                                                            │
//!    └──────────── next token (greedy, repetition guard) ─────────┘
//! ```
//!
//! ## Modules
//!
//! - [`text`] — word-level vocabulary and sequence padding
//! - [`corpus`] — parallel sentence pairs (built-in or JSON)
//! - [`model`] — LSTM encoder-decoder and the [`model::SequenceModel`] seam
//! - [`train`] — teacher-forced training loop
//! - [`decoding`] — greedy decoding with stop and repetition policies
//! - [`pipeline`] — end-to-end [`pipeline::Translator`]

pub mod config;
pub mod corpus;
pub mod decoding;
pub mod model;
pub mod pipeline;
pub mod text;
pub mod train;

mod error;

pub use error::{Error, Result};
