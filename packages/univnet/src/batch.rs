//! Keyed container for extracted features and its tensor conversion.

use indexmap::IndexMap;
use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::constants::{NOISE_SEQUENCE_KEY, SPECTROGRAM_KEY};
use crate::error::{FeatureError, Result};

/// Representation requested for the returned batch.
#[derive(Debug, Clone)]
pub enum ReturnTensors {
    /// One stacked `Array3<f32>` per key, shape `(batch, frames, dim)`.
    NdArray,
    /// One stacked candle tensor per key, placed on the given device.
    #[cfg(feature = "candle")]
    Candle(candle_core::Device),
}

/// Value stored under a [`BatchFeature`] key.
#[derive(Debug, Clone)]
pub enum BatchValue {
    /// Per-item arrays; shapes may differ when the batch was not padded.
    List(Vec<Array2<f32>>),
    /// Stacked `(batch, frames, dim)` array.
    Array(Array3<f32>),
    /// Stacked `(batch, frames, dim)` candle tensor.
    #[cfg(feature = "candle")]
    Tensor(candle_core::Tensor),
}

impl BatchValue {
    /// Number of items along the batch axis.
    pub fn batch_size(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Array(arr) => arr.len_of(Axis(0)),
            #[cfg(feature = "candle")]
            Self::Tensor(t) => t.dims().first().copied().unwrap_or(0),
        }
    }

    pub fn as_list(&self) -> Option<&[Array2<f32>]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array3<f32>> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[cfg(feature = "candle")]
    pub fn as_tensor(&self) -> Option<&candle_core::Tensor> {
        match self {
            Self::Tensor(t) => Some(t),
            _ => None,
        }
    }

    fn into_array(self, key: &str) -> Result<Array3<f32>> {
        match self {
            Self::List(items) => stack_items(key, &items),
            Self::Array(arr) => Ok(arr),
            #[cfg(feature = "candle")]
            Self::Tensor(t) => {
                let (b, f, d) = t.dims3()?;
                let data = t.flatten_all()?.to_vec1::<f32>()?;
                Ok(Array3::from_shape_vec((b, f, d), data)?)
            }
        }
    }
}

fn stack_items(key: &str, items: &[Array2<f32>]) -> Result<Array3<f32>> {
    let Some(first) = items.first() else {
        return Err(FeatureError::Numeric(format!("`{key}` holds no items")));
    };
    if items.iter().any(|a| a.dim() != first.dim()) {
        return Err(FeatureError::RaggedBatch {
            key: key.to_string(),
        });
    }
    let views: Vec<ArrayView2<'_, f32>> = items.iter().map(Array2::view).collect();
    Ok(ndarray::stack(Axis(0), &views)?)
}

/// Ordered `key → features` mapping returned by the extractor.
///
/// Keys keep insertion order, so `spectrogram` always precedes
/// `noise_sequence` when both are present.
#[derive(Debug, Clone, Default)]
pub struct BatchFeature {
    data: IndexMap<String, BatchValue>,
}

impl BatchFeature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: BatchValue) -> Option<BatchValue> {
        self.data.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&BatchValue> {
        self.data.get(key)
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<BatchValue> {
        self.data.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Log-mel spectrograms, `(frames, num_mel_bins)` per item.
    pub fn spectrogram(&self) -> Option<&BatchValue> {
        self.get(SPECTROGRAM_KEY)
    }

    /// Gaussian noise, `(frames, model_in_channels)` per item.
    pub fn noise_sequence(&self) -> Option<&BatchValue> {
        self.get(NOISE_SEQUENCE_KEY)
    }

    pub fn into_inner(self) -> IndexMap<String, BatchValue> {
        self.data
    }

    /// Stack every entry into the requested representation.
    ///
    /// Fails with [`FeatureError::RaggedBatch`] when a list entry holds items
    /// of different shapes.
    pub fn convert_to_tensors(self, tensors: &ReturnTensors) -> Result<Self> {
        let mut data = IndexMap::with_capacity(self.data.len());
        for (key, value) in self.data {
            let stacked = value.into_array(&key)?;
            let converted = match tensors {
                ReturnTensors::NdArray => BatchValue::Array(stacked),
                #[cfg(feature = "candle")]
                ReturnTensors::Candle(device) => {
                    let shape = stacked.dim();
                    let flat: Vec<f32> = stacked.iter().copied().collect();
                    BatchValue::Tensor(candle_core::Tensor::from_vec(flat, shape, device)?)
                }
            };
            data.insert(key, converted);
        }
        Ok(Self { data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(frames: usize, value: f32) -> Array2<f32> {
        Array2::from_elem((frames, 4), value)
    }

    #[test]
    fn removal_keeps_insertion_order() {
        let mut batch = BatchFeature::new();
        batch.insert("input_features", BatchValue::List(vec![item(1, 0.0)]));
        batch.insert(SPECTROGRAM_KEY, BatchValue::List(vec![item(2, 1.0)]));
        batch.insert(NOISE_SEQUENCE_KEY, BatchValue::List(vec![item(2, 2.0)]));
        batch.remove("input_features");
        assert_eq!(batch.keys().collect::<Vec<_>>(), vec![SPECTROGRAM_KEY, NOISE_SEQUENCE_KEY]);
    }

    #[test]
    fn equal_shapes_stack_into_ndarray() {
        let mut batch = BatchFeature::new();
        batch.insert(SPECTROGRAM_KEY, BatchValue::List(vec![item(3, 1.0), item(3, 2.0)]));
        let batch = batch.convert_to_tensors(&ReturnTensors::NdArray).unwrap();
        let arr = batch.spectrogram().and_then(BatchValue::as_array).unwrap();
        assert_eq!(arr.dim(), (2, 3, 4));
        assert_eq!(arr[[1, 2, 3]], 2.0);
    }

    #[test]
    fn ragged_lists_refuse_to_stack() {
        let mut batch = BatchFeature::new();
        batch.insert(SPECTROGRAM_KEY, BatchValue::List(vec![item(3, 1.0), item(5, 2.0)]));
        let err = batch.convert_to_tensors(&ReturnTensors::NdArray).unwrap_err();
        assert!(matches!(err, FeatureError::RaggedBatch { ref key } if key == SPECTROGRAM_KEY));
    }

    #[cfg(feature = "candle")]
    #[test]
    fn candle_conversion_preserves_shape_and_values() {
        let mut batch = BatchFeature::new();
        batch.insert(NOISE_SEQUENCE_KEY, BatchValue::List(vec![item(2, 0.5), item(2, -0.5)]));
        let batch = batch
            .convert_to_tensors(&ReturnTensors::Candle(candle_core::Device::Cpu))
            .unwrap();
        let t = batch.noise_sequence().and_then(BatchValue::as_tensor).unwrap();
        assert_eq!(t.dims(), &[2, 2, 4]);
        let values = t.flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert_eq!(values[0], 0.5);
        assert_eq!(values[15], -0.5);
        assert_eq!(batch.noise_sequence().unwrap().batch_size(), 2);
    }
}
