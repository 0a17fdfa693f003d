//! One-sided short-time Fourier transform on top of `rustfft`.

use std::sync::Arc;

use ndarray::Array2;
use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::error::{FeatureError, Result};

/// Smallest power of two that holds `window_length` samples.
#[inline]
pub fn optimal_fft_length(window_length: usize) -> usize {
    window_length.max(1).next_power_of_two()
}

/// Pad `signal` by mirroring it around its first and last samples.
///
/// The edge sample is not repeated (`[1, 2, 3]` → `[3, 2, 1, 2, 3, 2, 1]` for a
/// pad of 2). Pads longer than the signal keep reflecting back and forth with
/// period `2 · (len − 1)`; a single-sample signal is simply repeated.
pub fn reflect_pad(signal: &[f32], left: usize, right: usize) -> Result<Vec<f32>> {
    let len = signal.len();
    if len == 0 {
        return Err(FeatureError::Numeric(
            "cannot reflect-pad an empty waveform".to_string(),
        ));
    }
    if len == 1 {
        return Ok(vec![signal[0]; left + 1 + right]);
    }

    let period = 2 * (len as isize - 1);
    let reflect = |j: isize| -> f32 {
        let m = j.rem_euclid(period);
        let idx = if m < len as isize { m } else { period - m };
        signal[idx as usize]
    };

    let mut padded = Vec::with_capacity(left + len + right);
    padded.extend((1..=left as isize).rev().map(|i| reflect(-i)));
    padded.extend_from_slice(signal);
    padded.extend((0..right as isize).map(|i| reflect(len as isize + i)));
    Ok(padded)
}

/// Number of STFT frames produced for `len` samples (after any centring pad).
///
/// `1 + ⌊(len − frame_length) / hop_length⌋` with a floor division, so a
/// signal slightly shorter than one frame yields zero frames. `None` when the
/// formula goes negative or `hop_length` is zero.
#[inline]
pub fn frame_count(len: usize, frame_length: usize, hop_length: usize) -> Option<usize> {
    if hop_length == 0 {
        return None;
    }
    let frames = (len as isize - frame_length as isize).div_euclid(hop_length as isize) + 1;
    usize::try_from(frames).ok()
}

/// Cached STFT front-end: window, hop and forward FFT plan.
///
/// The frame length always equals the FFT length; the window has been
/// zero-padded to that length beforehand.
pub struct Stft {
    fft: Arc<dyn Fft<f64>>,
    window: Vec<f64>,
    fft_length: usize,
    hop_length: usize,
}

impl std::fmt::Debug for Stft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stft")
            .field("fft_length", &self.fft_length)
            .field("hop_length", &self.hop_length)
            .finish_non_exhaustive()
    }
}

impl Stft {
    /// Plan a forward FFT of `fft_length` points.
    pub fn new(window: Vec<f64>, fft_length: usize, hop_length: usize) -> Result<Self> {
        if window.len() != fft_length {
            return Err(FeatureError::InvalidConfig(format!(
                "window length ({}) must equal the frame length ({fft_length})",
                window.len()
            )));
        }
        if hop_length == 0 {
            return Err(FeatureError::InvalidConfig(
                "hop_length must be positive".to_string(),
            ));
        }
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_length);
        Ok(Self {
            fft,
            window,
            fft_length,
            hop_length,
        })
    }

    /// Number of one-sided frequency bins.
    #[inline]
    pub const fn num_frequency_bins(&self) -> usize {
        self.fft_length / 2 + 1
    }

    /// Complex spectrogram of shape `(frames, fft_length / 2 + 1)`.
    ///
    /// With `center` the waveform is first reflect-padded by `fft_length / 2`
    /// on both sides so frame `t` is centred on sample `t · hop`.
    pub fn spectrogram(&self, waveform: &[f32], center: bool) -> Result<Array2<Complex<f32>>> {
        let centred;
        let waveform = if center {
            let half = self.fft_length / 2;
            centred = reflect_pad(waveform, half, half)?;
            centred.as_slice()
        } else {
            waveform
        };

        let num_frames = frame_count(waveform.len(), self.fft_length, self.hop_length)
            .ok_or_else(|| {
                FeatureError::Numeric(format!(
                    "waveform of {} samples is too short for {}-sample frames with hop {}",
                    waveform.len(),
                    self.fft_length,
                    self.hop_length
                ))
            })?;
        let num_bins = self.num_frequency_bins();

        let mut spec = Array2::<Complex<f32>>::zeros((num_frames, num_bins));
        let mut buffer = vec![Complex::<f64>::new(0.0, 0.0); self.fft_length];
        let mut scratch =
            vec![Complex::<f64>::new(0.0, 0.0); self.fft.get_inplace_scratch_len()];

        for (frame, mut row) in spec.rows_mut().into_iter().enumerate() {
            let start = frame * self.hop_length;
            let samples = &waveform[start..start + self.fft_length];
            for (dst, (&x, &w)) in buffer.iter_mut().zip(samples.iter().zip(&self.window)) {
                *dst = Complex::new(f64::from(x) * w, 0.0);
            }
            self.fft.process_with_scratch(&mut buffer, &mut scratch);
            for (dst, c) in row.iter_mut().zip(&buffer[..num_bins]) {
                *dst = Complex::new(c.re as f32, c.im as f32);
            }
        }
        Ok(spec)
    }
}
