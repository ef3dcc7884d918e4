//! Error types for tiny-seq2seq.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Candle tensor/model error.
    #[error("candle: {0}")]
    Candle(#[from] candle_core::Error),

    /// Invalid configuration.
    #[error("config: {0}")]
    Config(String),

    /// Vocabulary construction or lookup error (e.g. missing sentinel word).
    #[error("vocabulary: {0}")]
    Vocabulary(String),

    /// Malformed parallel corpus.
    #[error("corpus: {0}")]
    Corpus(String),

    /// `translate` was called before the model was trained.
    #[error("model not trained: call `train` before `translate`")]
    NotTrained,

    /// I/O error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
