/// FEATURE_EXTRACTOR_TYPE is the type tag written next to a serialized config.
pub const FEATURE_EXTRACTOR_TYPE: &str = "UnivNetFeatureExtractor";

/// PREPROCESSOR_CONFIG_FILE is the conventional file name of a saved config.
pub const PREPROCESSOR_CONFIG_FILE: &str = "preprocessor_config.json";

/// SPECTROGRAM_KEY names the log-mel spectrogram entry of a [`crate::BatchFeature`].
pub const SPECTROGRAM_KEY: &str = "spectrogram";

/// NOISE_SEQUENCE_KEY names the Gaussian noise entry of a [`crate::BatchFeature`].
pub const NOISE_SEQUENCE_KEY: &str = "noise_sequence";

/// DEFAULT_SAMPLING_RATE is the rate UnivNet checkpoints are trained at.
pub const DEFAULT_SAMPLING_RATE: u32 = 24_000;

/// DEFAULT_NUM_MEL_BINS must match the vocoder's `num_mel_channels`.
pub const DEFAULT_NUM_MEL_BINS: usize = 100;

/// DEFAULT_HOP_LENGTH is the STFT hop in samples (not milliseconds).
pub const DEFAULT_HOP_LENGTH: usize = 256;

/// DEFAULT_WIN_LENGTH is the analysis window length in samples.
pub const DEFAULT_WIN_LENGTH: usize = 1024;

/// DEFAULT_FILTER_LENGTH is the FFT length.
pub const DEFAULT_FILTER_LENGTH: usize = 1024;

/// DEFAULT_MAX_LENGTH_S is the longest clip (seconds) kept by truncation.
pub const DEFAULT_MAX_LENGTH_S: usize = 10;

/// DEFAULT_MEL_FLOOR is added under the square root of the magnitude.
pub const DEFAULT_MEL_FLOOR: f64 = 1e-9;

/// DEFAULT_COMPRESSION_FACTOR scales the clipped mel energies before `ln`.
pub const DEFAULT_COMPRESSION_FACTOR: f64 = 1.0;

/// DEFAULT_COMPRESSION_CLIP_VAL is the lower clip bound before `ln`.
pub const DEFAULT_COMPRESSION_CLIP_VAL: f64 = 1e-5;

/// DEFAULT_NORMALIZE_MIN is the Tacotron 2 lower normalization bound (`ln(1e-5)` in f32).
pub const DEFAULT_NORMALIZE_MIN: f32 = -11.512_925;

/// DEFAULT_NORMALIZE_MAX is the Tacotron 2 upper normalization bound.
pub const DEFAULT_NORMALIZE_MAX: f32 = 2.314_338_7;

/// DEFAULT_MODEL_IN_CHANNELS must match the vocoder's `model_in_channels`.
pub const DEFAULT_MODEL_IN_CHANNELS: usize = 64;

/// DEFAULT_PAD_END_LENGTH is the number of frames appended by end padding.
pub const DEFAULT_PAD_END_LENGTH: usize = 10;

/// DEFAULT_SPECTROGRAM_ZERO is the lowest value a log-mel frame can take.
pub const DEFAULT_SPECTROGRAM_ZERO: f32 = -11.5129;
