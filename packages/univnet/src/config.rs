use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::audio::{WindowFunction, optimal_fft_length};
use crate::constants::*;
use crate::error::{FeatureError, Result};
use crate::padding::PaddingSide;

/// Constructor parameters of [`crate::UnivNetFeatureExtractor`].
///
/// Only independent fields live here. FFT size, frequency-bin count, window,
/// mel filter bank and the maximum sample count are pure functions of these
/// and are rebuilt by the extractor, never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnivNetConfig {
    /// Feature dimension of the raw input (mono ⇒ 1).
    pub feature_size: usize,
    /// Sampling rate (Hz) the audio must be recorded at.
    pub sampling_rate: u32,
    /// Fill value for sequence padding of raw waveforms.
    pub padding_value: f32,
    pub padding_side: PaddingSide,
    /// Apply Tacotron 2 normalization unless overridden per call.
    pub do_normalize: bool,
    /// Mel bins; must match the vocoder's `num_mel_channels`.
    pub num_mel_bins: usize,
    /// STFT hop in samples.
    pub hop_length: usize,
    /// Analysis window length in samples.
    pub win_length: usize,
    pub win_function: WindowFunction,
    /// FFT length; `None` derives the next power of two ≥ `win_length`.
    pub filter_length: Option<usize>,
    /// Longest clip, in seconds, kept when truncating.
    pub max_length_s: usize,
    pub fmin: f64,
    /// Upper mel frequency; `None` resolves to `sampling_rate / 2`.
    pub fmax: Option<f64>,
    /// Added to `re² + im²` *before* the square root.
    pub mel_floor: f64,
    /// Reflect-pad `n_fft / 2` extra samples on both sides inside the STFT.
    pub center: bool,
    pub compression_factor: f64,
    pub compression_clip_val: f64,
    pub normalize_min: f32,
    pub normalize_max: f32,
    /// Noise channels; must match the vocoder's `model_in_channels`.
    pub model_in_channels: usize,
    /// Frames appended by end padding.
    pub pad_end_length: usize,
    /// Lowest log-mel value, used as the end-padding fill.
    pub spectrogram_zero: f32,
}

impl Default for UnivNetConfig {
    fn default() -> Self {
        Self {
            feature_size: 1,
            sampling_rate: DEFAULT_SAMPLING_RATE,
            padding_value: 0.0,
            padding_side: PaddingSide::Right,
            do_normalize: false,
            num_mel_bins: DEFAULT_NUM_MEL_BINS,
            hop_length: DEFAULT_HOP_LENGTH,
            win_length: DEFAULT_WIN_LENGTH,
            win_function: WindowFunction::Hann,
            filter_length: Some(DEFAULT_FILTER_LENGTH),
            max_length_s: DEFAULT_MAX_LENGTH_S,
            fmin: 0.0,
            fmax: None,
            mel_floor: DEFAULT_MEL_FLOOR,
            center: false,
            compression_factor: DEFAULT_COMPRESSION_FACTOR,
            compression_clip_val: DEFAULT_COMPRESSION_CLIP_VAL,
            normalize_min: DEFAULT_NORMALIZE_MIN,
            normalize_max: DEFAULT_NORMALIZE_MAX,
            model_in_channels: DEFAULT_MODEL_IN_CHANNELS,
            pad_end_length: DEFAULT_PAD_END_LENGTH,
            spectrogram_zero: DEFAULT_SPECTROGRAM_ZERO,
        }
    }
}

/// Keys that describe derived state; stripped from any foreign JSON on load.
const DERIVED_KEYS: [&str; 5] = ["window", "mel_filters", "n_fft", "n_freqs", "num_max_samples"];

impl UnivNetConfig {
    /// Upper mel frequency with the Nyquist default applied.
    #[inline]
    pub fn resolved_fmax(&self) -> f64 {
        self.fmax.unwrap_or(f64::from(self.sampling_rate) / 2.0)
    }

    /// FFT length: `filter_length`, or the next power of two ≥ `win_length`.
    #[inline]
    pub fn fft_length(&self) -> usize {
        self.filter_length
            .unwrap_or_else(|| optimal_fft_length(self.win_length))
    }

    /// Check every field once; called by the extractor constructor.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(FeatureError::InvalidConfig(msg));
        if self.sampling_rate == 0 {
            return bad("sampling_rate must be positive".into());
        }
        if self.feature_size != 1 {
            return bad(format!("feature_size must be 1 (mono), got {}", self.feature_size));
        }
        if self.hop_length == 0 || self.win_length == 0 {
            return bad("hop_length and win_length must be positive".into());
        }
        if self.num_mel_bins == 0 {
            return bad("num_mel_bins must be positive".into());
        }
        if let Some(n_fft) = self.filter_length
            && n_fft < self.win_length
        {
            return bad(format!(
                "filter_length ({n_fft}) must be >= win_length ({})",
                self.win_length
            ));
        }
        // the (n_fft - hop) / 2 edge reflection needs a non-negative width
        if self.hop_length > self.fft_length() {
            return bad(format!(
                "hop_length ({}) must be <= the FFT length ({})",
                self.hop_length,
                self.fft_length()
            ));
        }
        let fmax = self.resolved_fmax();
        if !(self.fmin >= 0.0 && self.fmin < fmax) {
            return bad(format!("expected 0 <= fmin < fmax, got fmin={} fmax={fmax}", self.fmin));
        }
        if self.normalize_max == self.normalize_min {
            return bad("normalize_min and normalize_max must differ".into());
        }
        if self.compression_factor <= 0.0 || self.compression_clip_val <= 0.0 {
            return bad("compression_factor and compression_clip_val must be positive".into());
        }
        if self.mel_floor < 0.0 {
            return bad("mel_floor must be non-negative".into());
        }
        Ok(())
    }

    /// Key/value form with the extractor type tag; derived fields never appear.
    pub fn to_dict(&self) -> Result<serde_json::Map<String, Value>> {
        let mut map = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(FeatureError::InvalidConfig(format!(
                    "config serialized to a non-object value: {other}"
                )));
            }
        };
        map.insert(
            "feature_extractor_type".to_string(),
            Value::String(FEATURE_EXTRACTOR_TYPE.to_string()),
        );
        Ok(map)
    }

    /// Parse a JSON object; missing keys take their defaults, unknown and
    /// derived keys are ignored.
    pub fn from_json_str(txt: &str) -> Result<Self> {
        let mut value: Value = serde_json::from_str(txt)?;
        if let Value::Object(map) = &mut value {
            for key in DERIVED_KEYS {
                map.remove(key);
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Pretty-printed JSON, including the type tag.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Value::Object(self.to_dict()?))?)
    }

    /// Load a JSON config from disk.
    ///
    /// A directory resolves to its `preprocessor_config.json`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let txt = if path.is_dir() {
            fs::read_to_string(path.join(PREPROCESSOR_CONFIG_FILE))?
        } else {
            fs::read_to_string(path)?
        };
        Self::from_json_str(&txt)
    }

    /// Save to disk (pretty‑printed).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
