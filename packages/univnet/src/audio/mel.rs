//! Triangular mel filter banks.
//!
//! The bank is returned as an `(n_freqs, n_mels)` matrix so a magnitude
//! spectrogram laid out `(n_freqs, frames)` is projected with
//! `bank.t().dot(&magnitudes)`.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Frequency ↔ mel conversion convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MelScale {
    /// `2595 · log10(1 + f / 700)`
    Htk,
    /// `1127 · ln(1 + f / 700)`
    Kaldi,
    /// Linear below 1 kHz, logarithmic above (Auditory Toolbox).
    #[default]
    Slaney,
}

/// Area normalization applied to every triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MelNorm {
    /// Divide each triangle by its width in Hz so it integrates to a constant.
    Slaney,
}

const SLANEY_MIN_LOG_HZ: f64 = 1000.0;
const SLANEY_MIN_LOG_MEL: f64 = 15.0;

#[inline]
fn slaney_log_step() -> f64 {
    27.0 / 6.4f64.ln()
}

/// Convert a frequency in Hz to mels.
pub fn hertz_to_mel(freq: f64, scale: MelScale) -> f64 {
    match scale {
        MelScale::Htk => 2595.0 * (1.0 + freq / 700.0).log10(),
        MelScale::Kaldi => 1127.0 * (1.0 + freq / 700.0).ln(),
        MelScale::Slaney => {
            if freq >= SLANEY_MIN_LOG_HZ {
                SLANEY_MIN_LOG_MEL + (freq / SLANEY_MIN_LOG_HZ).ln() * slaney_log_step()
            } else {
                3.0 * freq / 200.0
            }
        }
    }
}

/// Convert mels back to Hz.
pub fn mel_to_hertz(mels: f64, scale: MelScale) -> f64 {
    match scale {
        MelScale::Htk => 700.0 * (10f64.powf(mels / 2595.0) - 1.0),
        MelScale::Kaldi => 700.0 * ((mels / 1127.0).exp() - 1.0),
        MelScale::Slaney => {
            if mels >= SLANEY_MIN_LOG_MEL {
                SLANEY_MIN_LOG_HZ * ((mels - SLANEY_MIN_LOG_MEL) / slaney_log_step()).exp()
            } else {
                200.0 * mels / 3.0
            }
        }
    }
}

/// Build a `(num_frequency_bins, num_mel_filters)` bank of triangular filters.
///
/// Filter edges are spaced evenly on `scale` between `min_frequency` and
/// `max_frequency`; FFT bin centres span `0 ..= sampling_rate / 2` (integer
/// Nyquist). An all-zero filter means the bank has more mel bins than the
/// FFT resolution can support; that is logged, not rejected.
pub fn mel_filter_bank(
    num_frequency_bins: usize,
    num_mel_filters: usize,
    min_frequency: f64,
    max_frequency: f64,
    sampling_rate: u32,
    norm: Option<MelNorm>,
    scale: MelScale,
) -> Array2<f64> {
    let mel_min = hertz_to_mel(min_frequency, scale);
    let mel_max = hertz_to_mel(max_frequency, scale);
    let filter_freqs: Vec<f64> = linspace(mel_min, mel_max, num_mel_filters + 2)
        .into_iter()
        .map(|m| mel_to_hertz(m, scale))
        .collect();
    let fft_freqs = linspace(0.0, f64::from(sampling_rate / 2), num_frequency_bins);

    let mut bank = Array2::<f64>::zeros((num_frequency_bins, num_mel_filters));
    for m in 0..num_mel_filters {
        let (left, centre, right) = (filter_freqs[m], filter_freqs[m + 1], filter_freqs[m + 2]);
        let enorm = match norm {
            Some(MelNorm::Slaney) => 2.0 / (right - left),
            None => 1.0,
        };
        for (k, &f) in fft_freqs.iter().enumerate() {
            let down = (f - left) / (centre - left);
            let up = (right - f) / (right - centre);
            bank[[k, m]] = down.min(up).max(0.0) * enorm;
        }
    }

    let empty = bank
        .columns()
        .into_iter()
        .filter(|col| col.iter().all(|&w| w == 0.0))
        .count();
    if empty > 0 {
        tracing::warn!(
            empty,
            num_mel_filters,
            num_frequency_bins,
            "mel filter bank has all-zero filters; num_mel_filters may be too high for num_frequency_bins"
        );
    }
    bank
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
