//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Returned whenever feature extraction or its configuration is mis-used.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Caller passed a sampling rate the extractor was not built for.
    #[error(
        "the feature extractor was configured for a sampling rate of {expected} Hz; \
         make sure the provided audio was sampled at {expected} Hz and not {received} Hz"
    )]
    SamplingRateMismatch {
        /// Configured sampling rate.
        expected: u32,
        /// Sampling rate supplied by the caller.
        received: u32,
    },
    /// Batched array input carried a channel axis (or no time axis at all).
    #[error("only mono-channel audio is supported, got an input array of shape {shape:?}")]
    MultiChannel {
        /// Shape of the rejected array.
        shape: Vec<usize>,
    },
    /// Construction-time validation of [`crate::UnivNetConfig`] failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Padding / truncation options are inconsistent.
    #[error("padding: {0}")]
    Padding(String),
    /// A list of per-item arrays could not be stacked.
    #[error(
        "unable to stack `{key}` into a single tensor: items have different shapes; \
         activate truncation and/or padding"
    )]
    RaggedBatch {
        /// Batch key whose items disagree in shape.
        key: String,
    },
    /// Degenerate numeric input (empty batch, waveform shorter than a frame, ...).
    #[error("numeric: {0}")]
    Numeric(String),
    /// ndarray reshape / stack failure.
    #[error("shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
    /// candle tensor construction failure.
    #[cfg(feature = "candle")]
    #[error("tensor: {0}")]
    Tensor(#[from] candle_core::Error),
    /// Config file could not be read or written.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// Config JSON could not be (de)serialized.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the public API.
pub type Result<T> = std::result::Result<T, FeatureError>;
