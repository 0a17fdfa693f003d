//! Analysis window functions.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Named window shapes accepted by [`window_function`].
///
/// Both the short (`hann`) and the `_window`-suffixed (`hann_window`) spellings
/// deserialize to the same variant; serialization always emits the suffixed one
/// so configs stay readable by other tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
pub enum WindowFunction {
    #[serde(rename = "boxcar")]
    #[strum(serialize = "boxcar")]
    Boxcar,
    #[serde(rename = "hamming_window", alias = "hamming")]
    #[strum(to_string = "hamming_window", serialize = "hamming")]
    Hamming,
    #[default]
    #[serde(rename = "hann_window", alias = "hann")]
    #[strum(to_string = "hann_window", serialize = "hann")]
    Hann,
    #[serde(rename = "povey")]
    #[strum(serialize = "povey")]
    Povey,
}

/// Build a window of `length` samples.
///
/// A *periodic* window is the first `length` samples of a symmetric window of
/// `length + 1` samples, which is what spectral analysis wants.
pub fn window_function(length: usize, name: WindowFunction, periodic: bool) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    let n = if periodic { length + 1 } else { length };
    let mut window = match name {
        WindowFunction::Boxcar => vec![1.0; n],
        WindowFunction::Hamming => cosine_window(n, 0.54, 0.46),
        WindowFunction::Hann => cosine_window(n, 0.5, 0.5),
        WindowFunction::Povey => cosine_window(n, 0.5, 0.5)
            .into_iter()
            .map(|w| w.powf(0.85))
            .collect(),
    };
    window.truncate(length);
    window
}

/// Zero-pad `window` on both sides so it spans `frame_length` samples.
///
/// Extra padding goes to the right when the difference is odd.
pub fn pad_window(window: Vec<f64>, frame_length: usize) -> Vec<f64> {
    if window.len() >= frame_length {
        return window;
    }
    let left = (frame_length - window.len()) / 2;
    let mut padded = vec![0.0; frame_length];
    padded[left..left + window.len()].copy_from_slice(&window);
    padded
}

// symmetric generalized cosine window: a - b * cos(2πk / (n - 1))
fn cosine_window(n: usize, a: f64, b: f64) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    let denom = (n - 1) as f64;
    (0..n)
        .map(|k| a - b * (2.0 * PI * k as f64 / denom).cos())
        .collect()
}
