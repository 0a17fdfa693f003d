//! **UnivNet feature extractor**
//!
//! 1. Pad / truncate the raw waveforms as a batch.
//! 2. Per waveform: reflect-pad by `(n_fft − hop) / 2`, one-sided STFT,
//!    `sqrt(re² + im² + mel_floor)`, mel projection, `ln(clip(x) · factor)`.
//! 3. Optionally append "zero" frames, draw Gaussian noise and apply
//!    Tacotron 2 normalization.
//!
//! Window, mel filter bank and FFT plan are computed once in [`new`] and only
//! read afterwards, so one extractor can serve many threads.
//!
//! [`new`]: UnivNetFeatureExtractor::new

use ndarray::{Array2, Axis, concatenate};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

use crate::audio::{
    MelNorm, MelScale, Stft, frame_count, mel_filter_bank, pad_window,
    reflect_pad, window_function,
};
use crate::batch::{BatchFeature, BatchValue, ReturnTensors};
use crate::config::UnivNetConfig;
use crate::constants::{NOISE_SEQUENCE_KEY, SPECTROGRAM_KEY};
use crate::error::{FeatureError, Result};
use crate::input::RawSpeech;
use crate::padding::{PadOptions, PaddingStrategy, pad_sequences};

/// Per-call knobs of [`UnivNetFeatureExtractor::extract`].
///
/// `None` fields fall back to the extractor's configuration.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Sampling rate of the input; checked against the configured one.
    pub sampling_rate: Option<u32>,
    pub padding: PaddingStrategy,
    /// Padding / truncation length in samples (default: `max_length_s · sampling_rate`).
    pub max_length: Option<usize>,
    pub truncation: bool,
    pub pad_to_multiple_of: Option<usize>,
    /// Also return a `noise_sequence` entry.
    pub return_noise: bool,
    pub model_in_channels: Option<usize>,
    /// Append `pad_length` frames of `spectrogram_zero` to every spectrogram.
    pub pad_end: bool,
    pub pad_length: Option<usize>,
    pub spectrogram_zero: Option<f32>,
    pub do_normalize: Option<bool>,
    /// Stack the batch into this representation instead of per-item arrays.
    pub return_tensors: Option<ReturnTensors>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            sampling_rate: None,
            padding: PaddingStrategy::Longest,
            max_length: None,
            truncation: true,
            pad_to_multiple_of: None,
            return_noise: true,
            model_in_channels: None,
            pad_end: false,
            pad_length: None,
            spectrogram_zero: None,
            do_normalize: None,
            return_tensors: None,
        }
    }
}

/// Log-mel spectrogram + noise front-end for the UnivNet vocoder.
#[derive(Debug)]
pub struct UnivNetFeatureExtractor {
    config: UnivNetConfig,

    // cached DSP bits
    n_fft: usize,
    n_freqs: usize,
    num_max_samples: usize,
    window: Vec<f64>,
    mel_filters: Array2<f64>, // [freq_bin][mel_bin]
    stft: Stft,
}

impl UnivNetFeatureExtractor {
    /// Validate `config` and pre-compute window, mel filter bank and FFT plan.
    pub fn new(mut config: UnivNetConfig) -> Result<Self> {
        config.validate()?;
        config.fmax = Some(config.resolved_fmax());

        let n_fft = config.fft_length();
        let n_freqs = n_fft / 2 + 1;
        let num_max_samples = config.max_length_s * config.sampling_rate as usize;

        let window = pad_window(
            window_function(config.win_length, config.win_function, true),
            n_fft,
        );
        let mel_filters = mel_filter_bank(
            n_freqs,
            config.num_mel_bins,
            config.fmin,
            config.resolved_fmax(),
            config.sampling_rate,
            Some(MelNorm::Slaney),
            MelScale::Slaney,
        );
        let stft = Stft::new(window.clone(), n_fft, config.hop_length)?;

        tracing::debug!(
            n_fft,
            n_freqs,
            num_mel_bins = config.num_mel_bins,
            hop_length = config.hop_length,
            sampling_rate = config.sampling_rate,
            "univnet feature extractor ready"
        );

        Ok(Self {
            config,
            n_fft,
            n_freqs,
            num_max_samples,
            window,
            mel_filters,
            stft,
        })
    }

    /// Configuration with `fmax` resolved.
    #[inline]
    pub fn config(&self) -> &UnivNetConfig {
        &self.config
    }

    #[inline]
    pub const fn n_fft(&self) -> usize {
        self.n_fft
    }

    #[inline]
    pub const fn n_freqs(&self) -> usize {
        self.n_freqs
    }

    /// `max_length_s · sampling_rate`; default padding / truncation length.
    #[inline]
    pub const fn num_max_samples(&self) -> usize {
        self.num_max_samples
    }

    /// Periodic analysis window, zero-padded to `n_fft`.
    #[inline]
    pub fn window(&self) -> &[f64] {
        &self.window
    }

    /// `(n_freqs, num_mel_bins)` Slaney mel filter bank.
    #[inline]
    pub fn mel_filters(&self) -> &Array2<f64> {
        &self.mel_filters
    }

    #[inline]
    fn edge_pad(&self) -> usize {
        (self.n_fft - self.config.hop_length) / 2
    }

    /// Spectrogram frames produced for a waveform of `num_samples` samples.
    ///
    /// Clips shorter than one frame give `Some(0)`; `None` means
    /// [`mel_spectrogram`](Self::mel_spectrogram) rejects the input.
    pub fn num_frames(&self, num_samples: usize) -> Option<usize> {
        if num_samples == 0 {
            return None;
        }
        let mut len = num_samples + 2 * self.edge_pad();
        if self.config.center {
            len += 2 * (self.n_fft / 2);
        }
        frame_count(len, self.n_fft, self.config.hop_length)
    }

    /// `ln(max(x, clip_val) · factor)`.
    pub fn dynamic_range_compression(&self, x: &Array2<f64>) -> Array2<f64> {
        let clip = self.config.compression_clip_val;
        let factor = self.config.compression_factor;
        x.mapv(|v| (v.max(clip) * factor).ln())
    }

    /// `exp(x) / factor`; inverse of the compression above the clip value.
    pub fn dynamic_range_decompression(&self, x: &Array2<f64>) -> Array2<f64> {
        let factor = self.config.compression_factor;
        x.mapv(|v| v.exp() / factor)
    }

    /// Map `[normalize_min, normalize_max]` onto `[-1, 1]`.
    pub fn normalize(&self, spectrogram: &Array2<f32>) -> Array2<f32> {
        let (lo, hi) = (self.config.normalize_min, self.config.normalize_max);
        spectrogram.mapv(|x| 2.0 * ((x - lo) / (hi - lo)) - 1.0)
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn denormalize(&self, spectrogram: &Array2<f32>) -> Array2<f32> {
        let (lo, hi) = (self.config.normalize_min, self.config.normalize_max);
        spectrogram.mapv(|x| lo + (hi - lo) * ((x + 1.0) / 2.0))
    }

    /// Log-mel spectrogram of one mono waveform, shape `(frames, num_mel_bins)`.
    pub fn mel_spectrogram(&self, waveform: &[f32]) -> Result<Array2<f32>> {
        let pad = self.edge_pad();
        let padded = reflect_pad(waveform, pad, pad)?;

        // (frames, n_freqs), complex
        let spec = self.stft.spectrogram(&padded, self.config.center)?;

        // mel_floor goes under the square root, before the mel projection
        let mel_floor = self.config.mel_floor as f32;
        let amplitude: Array2<f64> = spec
            .t()
            .mapv(|c| f64::from((c.re * c.re + c.im * c.im + mel_floor).sqrt()));

        // (num_mel_bins, frames)
        let mel = self.mel_filters.t().dot(&amplitude);
        let log_mel = self.dynamic_range_compression(&mel);

        Ok(log_mel.t().mapv(|v| v as f32))
    }

    /// Standard-normal noise of shape `(noise_length, channels)`.
    ///
    /// `channels` defaults to `model_in_channels`.
    pub fn generate_noise<R: Rng + ?Sized>(
        &self,
        noise_length: usize,
        channels: Option<usize>,
        rng: &mut R,
    ) -> Array2<f32> {
        let channels = channels.unwrap_or(self.config.model_in_channels);
        Array2::from_shape_simple_fn((noise_length, channels), || rng.sample(StandardNormal))
    }

    /// Append `pad_length` frames of `spectrogram_zero` along the frame axis.
    pub fn pad_spectrogram_end(
        &self,
        spectrogram: &Array2<f32>,
        pad_length: Option<usize>,
        spectrogram_zero: Option<f32>,
    ) -> Result<Array2<f32>> {
        let pad_length = pad_length.unwrap_or(self.config.pad_end_length);
        let zero = spectrogram_zero.unwrap_or(self.config.spectrogram_zero);
        let padding = Array2::from_elem((pad_length, spectrogram.ncols()), zero);
        Ok(concatenate(Axis(0), &[spectrogram.view(), padding.view()])?)
    }

    /// Featurize one waveform or a batch, drawing noise from fresh OS entropy.
    pub fn extract(
        &self,
        raw_speech: impl Into<RawSpeech>,
        opts: &ExtractOptions,
    ) -> Result<BatchFeature> {
        let mut rng = StdRng::from_os_rng();
        self.extract_with_rng(raw_speech, opts, &mut rng)
    }

    /// Featurize one waveform or a batch, drawing noise from `rng`.
    ///
    /// A seeded generator makes the noise sequence reproducible.
    pub fn extract_with_rng<R: Rng + ?Sized>(
        &self,
        raw_speech: impl Into<RawSpeech>,
        opts: &ExtractOptions,
        rng: &mut R,
    ) -> Result<BatchFeature> {
        /* ---------- 1. validate ------------------------------------------ */
        match opts.sampling_rate {
            Some(sr) if sr != self.config.sampling_rate => {
                return Err(FeatureError::SamplingRateMismatch {
                    expected: self.config.sampling_rate,
                    received: sr,
                });
            }
            Some(_) => {}
            None => tracing::warn!(
                "no sampling_rate passed to the feature extractor; pass it explicitly to avoid \
                 silent errors from mismatched audio"
            ),
        }
        let waveforms = raw_speech.into().into_batch()?;

        /* ---------- 2. batch padding of raw samples ---------------------- */
        let pad_opts = PadOptions {
            strategy: opts.padding,
            max_length: Some(opts.max_length.unwrap_or(self.num_max_samples)),
            truncation: opts.truncation,
            pad_to_multiple_of: opts.pad_to_multiple_of,
            padding_value: self.config.padding_value,
            padding_side: self.config.padding_side,
        };
        let waveforms = pad_sequences(waveforms, &pad_opts)?;

        /* ---------- 3. log-mel spectrograms ------------------------------ */
        let mut spectrograms = waveforms
            .iter()
            .map(|w| self.mel_spectrogram(w))
            .collect::<Result<Vec<_>>>()?;
        drop(waveforms);

        if opts.pad_end {
            spectrograms = spectrograms
                .iter()
                .map(|s| self.pad_spectrogram_end(s, opts.pad_length, opts.spectrogram_zero))
                .collect::<Result<Vec<_>>>()?;
        }

        /* ---------- 4. noise + normalization ----------------------------- */
        let noise = if opts.return_noise {
            let mut noise = Vec::with_capacity(spectrograms.len());
            for s in &spectrograms {
                noise.push(self.generate_noise(s.nrows(), opts.model_in_channels, &mut *rng));
            }
            Some(noise)
        } else {
            None
        };

        if opts.do_normalize.unwrap_or(self.config.do_normalize) {
            spectrograms = spectrograms.iter().map(|s| self.normalize(s)).collect();
        }

        tracing::debug!(
            batch = spectrograms.len(),
            frames = ?spectrograms.iter().map(Array2::nrows).collect::<Vec<_>>(),
            noise = noise.is_some(),
            "extracted univnet features"
        );

        let mut batch = BatchFeature::new();
        batch.insert(SPECTROGRAM_KEY, BatchValue::List(spectrograms));
        if let Some(noise) = noise {
            batch.insert(NOISE_SEQUENCE_KEY, BatchValue::List(noise));
        }

        /* ---------- 5. optional tensor conversion ------------------------ */
        match &opts.return_tensors {
            Some(tensors) => batch.convert_to_tensors(tensors),
            None => Ok(batch),
        }
    }
}
