//! Accepted shapes of raw speech and their normalisation into a mono batch.

use ndarray::{Array1, Array2, ArrayD, Axis};

use crate::error::{FeatureError, Result};

/// Raw audio handed to [`crate::UnivNetFeatureExtractor::extract`].
///
/// Every variant must be mono; a batch is a list of independent waveforms.
#[derive(Debug, Clone)]
pub enum RawSpeech {
    /// One waveform.
    Mono(Vec<f32>),
    /// Several waveforms, lengths may differ.
    Batch(Vec<Vec<f32>>),
    /// Array of rank 1 (one waveform) or rank 2 (batch × time).
    Array(ArrayD<f32>),
}

impl RawSpeech {
    /// Flatten into one `Vec<f32>` per waveform.
    ///
    /// Fails with [`FeatureError::MultiChannel`] for arrays that carry a
    /// channel axis (rank ≥ 3) or no time axis (rank 0).
    pub fn into_batch(self) -> Result<Vec<Vec<f32>>> {
        let batch = match self {
            Self::Mono(wave) => vec![wave],
            Self::Batch(waves) => waves,
            Self::Array(arr) => match arr.ndim() {
                1 => vec![arr.iter().copied().collect()],
                2 => arr
                    .axis_iter(Axis(0))
                    .map(|row| row.iter().copied().collect())
                    .collect(),
                _ => {
                    return Err(FeatureError::MultiChannel {
                        shape: arr.shape().to_vec(),
                    });
                }
            },
        };
        if batch.is_empty() {
            return Err(FeatureError::Numeric("empty batch of raw speech".to_string()));
        }
        Ok(batch)
    }
}

impl From<Vec<f32>> for RawSpeech {
    fn from(wave: Vec<f32>) -> Self {
        Self::Mono(wave)
    }
}

impl From<&[f32]> for RawSpeech {
    fn from(wave: &[f32]) -> Self {
        Self::Mono(wave.to_vec())
    }
}

impl From<Vec<f64>> for RawSpeech {
    fn from(wave: Vec<f64>) -> Self {
        Self::Mono(wave.into_iter().map(|x| x as f32).collect())
    }
}

impl From<Vec<Vec<f32>>> for RawSpeech {
    fn from(waves: Vec<Vec<f32>>) -> Self {
        Self::Batch(waves)
    }
}

impl From<Array1<f32>> for RawSpeech {
    fn from(wave: Array1<f32>) -> Self {
        Self::Array(wave.into_dyn())
    }
}

impl From<Array2<f32>> for RawSpeech {
    fn from(batch: Array2<f32>) -> Self {
        Self::Array(batch.into_dyn())
    }
}

impl From<ArrayD<f32>> for RawSpeech {
    fn from(arr: ArrayD<f32>) -> Self {
        Self::Array(arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, IxDyn};

    #[test]
    fn rank_two_array_is_a_batch_of_rows() {
        let arr = Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let batch = RawSpeech::from(arr).into_batch().unwrap();
        assert_eq!(batch, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn channel_axis_is_rejected() {
        let stereo = Array3::<f32>::zeros((1, 2, 100));
        let err = RawSpeech::from(stereo.into_dyn()).into_batch().unwrap_err();
        assert!(matches!(err, FeatureError::MultiChannel { ref shape } if shape == &[1, 2, 100]));
    }

    #[test]
    fn scalar_and_empty_inputs_are_rejected() {
        let scalar = ArrayD::<f32>::zeros(IxDyn(&[]));
        assert!(RawSpeech::from(scalar).into_batch().is_err());
        assert!(RawSpeech::Batch(Vec::new()).into_batch().is_err());
    }

    #[test]
    fn f64_input_is_narrowed() {
        let batch = RawSpeech::from(vec![0.5f64, -0.25]).into_batch().unwrap();
        assert_eq!(batch, vec![vec![0.5f32, -0.25]]);
    }
}
