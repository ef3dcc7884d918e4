//! Train the toy English → French model and translate one sentence.
//!
//! Training runs from scratch on every invocation (a few seconds on CPU for
//! the built-in corpus). Output goes to stdout:
//!
//! ```text
//! English: how are you
//! French : i am fine
//! ```
//!
//! Exit code 0 on success, non-zero on error.

use clap::Parser;
use tiny_seq2seq::{config::TranslatorConfig, corpus::Corpus, pipeline::Translator};

#[derive(Parser, Debug)]
#[command(
    name = "translate",
    about = "Tiny LSTM sequence-to-sequence translator",
    long_about = "Trains an LSTM encoder-decoder on a small parallel corpus, then\n\
                  greedily decodes a translation of --text."
)]
struct Args {
    /// Sentence to translate.
    #[arg(long, short = 't', default_value = "how are you")]
    text: String,

    /// JSON corpus: [{"source": "...", "target": "..."}, ...]. Defaults to the built-in pairs.
    #[arg(long)]
    corpus: Option<String>,

    /// JSON config file; missing fields take their defaults.
    #[arg(long)]
    config: Option<String>,

    /// Override the number of training epochs.
    #[arg(long, short = 'e')]
    epochs: Option<usize>,

    /// Override the batch-shuffle seed.
    #[arg(long, short = 's')]
    seed: Option<u64>,

    /// Run on CPU even if a GPU is available.
    #[arg(long)]
    cpu: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => TranslatorConfig::from_json_file(path)
            .map_err(|e| anyhow::anyhow!("failed to load config {path}: {e}"))?,
        None => TranslatorConfig::default(),
    };
    if let Some(epochs) = args.epochs {
        cfg.training.epochs = epochs;
    }
    if let Some(seed) = args.seed {
        cfg.training.seed = seed;
    }

    let corpus = match &args.corpus {
        Some(path) => Corpus::from_json_file(path)
            .map_err(|e| anyhow::anyhow!("failed to load corpus {path}: {e}"))?,
        None => Corpus::builtin(),
    };

    let device = if args.cpu {
        candle_core::Device::Cpu
    } else {
        candle_core::Device::cuda_if_available(0)?
    };
    tracing::info!("Using device: {:?}", device);

    let mut translator = Translator::new(&corpus, cfg)?;
    translator
        .train(&device)
        .map_err(|e| anyhow::anyhow!("training failed: {e}"))?;

    let trace = translator.translate_with_trace(&args.text)?;
    tracing::debug!("Decoding halted on {:?} after {} steps", trace.halt, trace.steps);

    println!("English: {}", args.text);
    println!("French : {}", trace.text());

    Ok(())
}
