//! UnivNet vocoder front-end – public crate root
//! =============================================
//! Turns raw **mono** audio into the two inputs a UnivNet generator expects:
//!
//! * a log-mel spectrogram per waveform, `(frames, num_mel_bins)`;
//! * a matching standard-normal noise sequence, `(frames, model_in_channels)`.
//!
//! Build a [`UnivNetFeatureExtractor`] once from a [`UnivNetConfig`], then call
//! [`UnivNetFeatureExtractor::extract`] (or `extract_with_rng` for
//! reproducible noise) for every waveform or batch.
//!
//! ```no_run
//! use fluent_voice_univnet::{ExtractOptions, UnivNetConfig, UnivNetFeatureExtractor};
//!
//! let fe = UnivNetFeatureExtractor::new(UnivNetConfig::default())?;
//! let opts = ExtractOptions { sampling_rate: Some(24_000), ..Default::default() };
//! let batch = fe.extract(vec![0.0f32; 24_000], &opts)?;
//! assert!(batch.spectrogram().is_some());
//! # Ok::<(), fluent_voice_univnet::FeatureError>(())
//! ```
#![deny(unsafe_code)]

/* ────────────────────────  sub-modules  ─────────────────────────────── */
pub mod audio;
pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod input;
pub mod padding;

/* ───────────────────────── public façade ────────────────────────────── */
pub use audio::{MelNorm, MelScale, WindowFunction};
pub use batch::{BatchFeature, BatchValue, ReturnTensors};
pub use config::UnivNetConfig;
pub use constants::*;
pub use error::{FeatureError, Result};
pub use extractor::{ExtractOptions, UnivNetFeatureExtractor};
pub use input::RawSpeech;
pub use padding::{PadOptions, PaddingSide, PaddingStrategy, pad_sequences};
