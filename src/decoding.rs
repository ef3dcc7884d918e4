//! Greedy autoregressive decoding with repetition suppression.
//!
//! Starting from `<start>` and the encoder state, each step feeds the last
//! sampled token back into the model and takes the argmax of the returned
//! distribution. Checked in order, every step:
//!
//! 1. **Stop test** — halt on `<end>`, on an id with no word (`<start>`
//!    counts as one), or once the output already holds more than
//!    `max_target_length` words.
//! 2. **Repetition policy** — decide whether to append the word, skip it,
//!    or give up.
//!
//! The length check looks at the output *before* the new word is appended,
//! so with the default lenient cap up to `max_target_length + 1` words can
//! be emitted. [`GreedyConfig::strict_length_cap`] stops at exactly
//! `max_target_length`.

use crate::model::SequenceModel;
use crate::text::{Sentinels, Vocabulary};
use crate::Result;

/// What the repetition policy wants done with a sampled word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Append,
    Skip,
    Halt,
}

/// Per-translation repetition heuristic.
///
/// The decoder clones the configured policy at the start of every
/// `translate` call, so implementations can keep counters in `self`.
/// A policy must eventually return [`Admission::Append`] or
/// [`Admission::Halt`]; skipping forever never terminates.
pub trait RepetitionPolicy: Clone {
    fn admit(&mut self, word: &str) -> Admission;
}

/// Halt after `max_repeats` consecutive repeats of the previous word.
///
/// A word equal to the previous sampled word is never appended; it only
/// bumps the repeat counter. Any other word resets the counter and is
/// appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsecutiveRepeatGuard {
    max_repeats: usize,
    last_word: String,
    repeat_count: usize,
}

impl ConsecutiveRepeatGuard {
    pub fn new(max_repeats: usize) -> Self {
        Self {
            max_repeats,
            last_word: String::new(),
            repeat_count: 0,
        }
    }
}

impl Default for ConsecutiveRepeatGuard {
    fn default() -> Self {
        Self::new(2)
    }
}

impl RepetitionPolicy for ConsecutiveRepeatGuard {
    fn admit(&mut self, word: &str) -> Admission {
        let verdict = if word == self.last_word {
            self.repeat_count += 1;
            if self.repeat_count > self.max_repeats {
                Admission::Halt
            } else {
                Admission::Skip
            }
        } else {
            self.repeat_count = 0;
            Admission::Append
        };
        if self.last_word != word {
            self.last_word.clear();
            self.last_word.push_str(word);
        }
        verdict
    }
}

/// Appends every word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoRepetitionGuard;

impl RepetitionPolicy for NoRepetitionGuard {
    fn admit(&mut self, _word: &str) -> Admission {
        Admission::Append
    }
}

/// Why decoding stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    EndOfSequence,
    /// Argmax id has no emittable word: unknown id, padding, the start
    /// sentinel, or an empty distribution.
    UnmappedToken,
    LengthCap,
    RepetitionLimit,
}

/// Output of one decoding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTrace {
    pub words: Vec<String>,
    /// Number of model `step` calls made.
    pub steps: usize,
    pub halt: HaltReason,
}

impl DecodeTrace {
    /// Words joined with single spaces.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyConfig {
    pub max_target_length: usize,
    pub strict_length_cap: bool,
}

/// Greedy decoder over borrowed model and vocabularies.
pub struct GreedyDecoder<'a, M, S, T, P = ConsecutiveRepeatGuard> {
    model: &'a M,
    source: &'a S,
    target: &'a T,
    sentinels: Sentinels,
    cfg: GreedyConfig,
    policy: P,
}

impl<'a, M, S, T, P> GreedyDecoder<'a, M, S, T, P>
where
    M: SequenceModel,
    S: Vocabulary,
    T: Vocabulary,
    P: RepetitionPolicy,
{
    pub fn new(
        model: &'a M,
        source: &'a S,
        target: &'a T,
        sentinels: Sentinels,
        cfg: GreedyConfig,
        policy: P,
    ) -> Self {
        Self {
            model,
            source,
            target,
            sentinels,
            cfg,
            policy,
        }
    }

    /// Translate `input` and return the space-joined output (possibly empty).
    pub fn translate(&self, input: &str) -> Result<String> {
        Ok(self.translate_with_trace(input)?.text())
    }

    /// Translate `input`, also reporting step count and halt reason.
    pub fn translate_with_trace(&self, input: &str) -> Result<DecodeTrace> {
        let source = self.source.encode(input);
        self.decode_ids(&source)
    }

    /// Decode from already-encoded source ids.
    pub fn decode_ids(&self, source: &[u32]) -> Result<DecodeTrace> {
        let mut state = self.model.init_state(source)?;
        let mut token = self.sentinels.start;
        let mut policy = self.policy.clone();
        let mut words: Vec<String> = Vec::new();
        let mut steps = 0usize;

        let halt = loop {
            let (dist, next_state) = self.model.step(token, &state)?;
            steps += 1;

            let Some(id) = argmax(&dist) else {
                break HaltReason::UnmappedToken;
            };
            if id == self.sentinels.end {
                break HaltReason::EndOfSequence;
            }
            let word = match self.target.decode(id) {
                Some(w) if !w.is_empty() && id != self.sentinels.start => w,
                _ => break HaltReason::UnmappedToken,
            };
            if self.length_exceeded(words.len()) {
                break HaltReason::LengthCap;
            }

            match policy.admit(word) {
                Admission::Append => words.push(word.to_string()),
                Admission::Skip => {}
                Admission::Halt => break HaltReason::RepetitionLimit,
            }

            token = id;
            state = next_state;
        };

        tracing::debug!(
            "Greedy decode: {} words in {} steps, halted on {:?}",
            words.len(),
            steps,
            halt
        );

        Ok(DecodeTrace { words, steps, halt })
    }

    fn length_exceeded(&self, len: usize) -> bool {
        if self.cfg.strict_length_cap {
            len >= self.cfg.max_target_length
        } else {
            len > self.cfg.max_target_length
        }
    }
}

/// Index of the largest weight; the lowest index wins ties and NaN never wins.
pub fn argmax(dist: &[f32]) -> Option<u32> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in dist.iter().enumerate() {
        if p.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if p <= b => {}
            _ => best = Some((i, p)),
        }
    }
    best.map(|(i, _)| i as u32)
}
