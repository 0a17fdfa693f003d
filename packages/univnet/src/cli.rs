//! Command Line Interface for the UnivNet feature extractor
//!
//! Extracts log-mel spectrograms (and noise) from WAV files, and prints or
//! writes extractor configurations.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// UnivNet feature extraction CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract features from a mono WAV file
    Extract(ExtractCommand),

    /// Print or save the extractor configuration
    Config(ConfigCommand),
}

/// Extract features from a mono WAV file
#[derive(Parser, Debug)]
pub struct ExtractCommand {
    /// Input WAV file (mono, recorded at the configured sampling rate)
    pub input: PathBuf,

    /// Extractor config (JSON file or directory holding preprocessor_config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Append spectrogram-zero frames to the end of the spectrogram
    #[arg(long)]
    pub pad_end: bool,

    /// Number of frames appended by --pad-end
    #[arg(long, requires = "pad_end")]
    pub pad_length: Option<usize>,

    /// Map the spectrogram onto [-1, 1]
    #[arg(long)]
    pub normalize: bool,

    /// Skip the noise sequence
    #[arg(long)]
    pub no_noise: bool,

    /// Seed for the noise generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the features as JSON here instead of printing a summary
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save the extractor configuration
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Start from this config instead of the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the config here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
