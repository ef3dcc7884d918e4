//! Text preprocessing: word vocabularies and fixed-length padding.

mod padding;
mod tokenizer;

pub use padding::{Padding, Truncating, pad_sequence, pad_sequences};
pub use tokenizer::{PAD_ID, Sentinels, Vocabulary, WordTokenizer};
