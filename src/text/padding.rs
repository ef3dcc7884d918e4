//! Fixed-length padding for token sequences.

use super::tokenizer::PAD_ID;

/// Where padding ids go when a sequence is too short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    Pre,
    #[default]
    Post,
}

/// Which end is cut when a sequence is too long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Truncating {
    /// Drop leading tokens.
    #[default]
    Pre,
    /// Drop trailing tokens.
    Post,
}

/// Pad or truncate one sequence to exactly `maxlen` ids.
pub fn pad_sequence(seq: &[u32], maxlen: usize, padding: Padding, truncating: Truncating) -> Vec<u32> {
    let kept = if seq.len() > maxlen {
        match truncating {
            Truncating::Pre => &seq[seq.len() - maxlen..],
            Truncating::Post => &seq[..maxlen],
        }
    } else {
        seq
    };

    let fill = maxlen - kept.len();
    let mut out = Vec::with_capacity(maxlen);
    if padding == Padding::Pre {
        out.extend(std::iter::repeat_n(PAD_ID, fill));
    }
    out.extend_from_slice(kept);
    if padding == Padding::Post {
        out.extend(std::iter::repeat_n(PAD_ID, fill));
    }
    out
}

/// Pad or truncate every sequence to `maxlen` ids.
pub fn pad_sequences(
    seqs: &[Vec<u32>],
    maxlen: usize,
    padding: Padding,
    truncating: Truncating,
) -> Vec<Vec<u32>> {
    seqs.iter()
        .map(|s| pad_sequence(s, maxlen, padding, truncating))
        .collect()
}
