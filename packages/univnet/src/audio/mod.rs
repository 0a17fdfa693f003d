pub mod mel;
pub mod stft;
pub mod window;

/* handy re-exports */
pub use mel::{MelNorm, MelScale, hertz_to_mel, mel_filter_bank, mel_to_hertz};
pub use stft::{Stft, frame_count, optimal_fft_length, reflect_pad};
pub use window::{WindowFunction, pad_window, window_function};
