//! Batch padding / truncation of variable-length sequences.
//!
//! Truncation runs first and applies whatever the padding strategy is; the
//! `Longest` strategy then measures the *truncated* sequences.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{FeatureError, Result};

/// How a batch is brought to a common length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaddingStrategy {
    /// Pad to the longest sequence in the batch.
    #[default]
    Longest,
    /// Pad to an explicit `max_length`.
    MaxLength,
    /// Leave lengths untouched.
    DoNotPad,
}

/// Which end of a sequence receives the padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaddingSide {
    Left,
    #[default]
    Right,
}

/// Options for [`pad_sequences`].
#[derive(Debug, Clone, PartialEq)]
pub struct PadOptions {
    pub strategy: PaddingStrategy,
    pub max_length: Option<usize>,
    pub truncation: bool,
    pub pad_to_multiple_of: Option<usize>,
    pub padding_value: f32,
    pub padding_side: PaddingSide,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            strategy: PaddingStrategy::Longest,
            max_length: None,
            truncation: false,
            pad_to_multiple_of: None,
            padding_value: 0.0,
            padding_side: PaddingSide::Right,
        }
    }
}

#[inline]
fn round_up(len: usize, multiple: Option<usize>) -> usize {
    match multiple {
        Some(m) if m > 0 && len % m != 0 => (len / m + 1) * m,
        _ => len,
    }
}

/// Truncate and/or pad every sequence according to `opts`.
pub fn pad_sequences(mut seqs: Vec<Vec<f32>>, opts: &PadOptions) -> Result<Vec<Vec<f32>>> {
    if opts.truncation {
        let max_length = opts.max_length.ok_or_else(|| {
            FeatureError::Padding("truncation requires max_length to be defined".to_string())
        })?;
        let limit = round_up(max_length, opts.pad_to_multiple_of);
        for seq in &mut seqs {
            seq.truncate(limit);
        }
    }

    let target = match opts.strategy {
        PaddingStrategy::DoNotPad => return Ok(seqs),
        PaddingStrategy::Longest => seqs.iter().map(Vec::len).max().unwrap_or(0),
        PaddingStrategy::MaxLength => opts.max_length.ok_or_else(|| {
            FeatureError::Padding("padding to max_length requires max_length to be defined".to_string())
        })?,
    };
    let target = round_up(target, opts.pad_to_multiple_of);

    for seq in &mut seqs {
        let missing = target.saturating_sub(seq.len());
        if missing == 0 {
            continue;
        }
        match opts.padding_side {
            PaddingSide::Right => seq.resize(target, opts.padding_value),
            PaddingSide::Left => {
                seq.splice(0..0, std::iter::repeat_n(opts.padding_value, missing));
            }
        }
    }
    Ok(seqs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Vec<Vec<f32>> {
        vec![vec![1.0; 3], vec![2.0; 7], vec![3.0; 5]]
    }

    fn lens(seqs: &[Vec<f32>]) -> Vec<usize> {
        seqs.iter().map(Vec::len).collect()
    }

    #[test]
    fn longest_pads_to_batch_max() {
        let out = pad_sequences(batch(), &PadOptions::default()).unwrap();
        assert_eq!(lens(&out), vec![7, 7, 7]);
        assert_eq!(out[0], vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn longest_respects_multiple_of() {
        let opts = PadOptions {
            pad_to_multiple_of: Some(4),
            ..Default::default()
        };
        assert_eq!(lens(&pad_sequences(batch(), &opts).unwrap()), vec![8, 8, 8]);
    }

    #[test]
    fn truncation_applies_even_without_padding() {
        let opts = PadOptions {
            strategy: PaddingStrategy::DoNotPad,
            max_length: Some(4),
            truncation: true,
            ..Default::default()
        };
        assert_eq!(lens(&pad_sequences(batch(), &opts).unwrap()), vec![3, 4, 4]);
    }

    #[test]
    fn longest_measures_truncated_lengths() {
        let opts = PadOptions {
            max_length: Some(6),
            truncation: true,
            ..Default::default()
        };
        assert_eq!(lens(&pad_sequences(batch(), &opts).unwrap()), vec![6, 6, 6]);
    }

    #[test]
    fn max_length_pads_beyond_longest() {
        let opts = PadOptions {
            strategy: PaddingStrategy::MaxLength,
            max_length: Some(10),
            padding_value: -1.0,
            ..Default::default()
        };
        let out = pad_sequences(batch(), &opts).unwrap();
        assert_eq!(lens(&out), vec![10, 10, 10]);
        assert_eq!(out[1][9], -1.0);
    }

    #[test]
    fn left_side_prepends_padding() {
        let opts = PadOptions {
            padding_side: PaddingSide::Left,
            ..Default::default()
        };
        let out = pad_sequences(vec![vec![1.0], vec![2.0, 2.0, 2.0]], &opts).unwrap();
        assert_eq!(out[0], vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_max_length_is_an_error() {
        let truncating = PadOptions {
            truncation: true,
            ..Default::default()
        };
        assert!(matches!(
            pad_sequences(batch(), &truncating),
            Err(FeatureError::Padding(_))
        ));
        let fixed = PadOptions {
            strategy: PaddingStrategy::MaxLength,
            ..Default::default()
        };
        assert!(pad_sequences(batch(), &fixed).is_err());
    }
}
