//! UnivNet feature extraction CLI binary

use anyhow::{Context, Result, bail};
use clap::Parser;
use ndarray::Array2;
use rand::{SeedableRng, rngs::StdRng};
use serde_json::{Value, json};
use std::path::Path;
use tracing::{Level, info};

mod cli;
use cli::{Cli, Commands, ConfigCommand, ExtractCommand};

use fluent_voice_univnet::{
    BatchValue, ExtractOptions, UnivNetConfig, UnivNetFeatureExtractor,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Extract(cmd) => {
            info!("Extracting features from {:?}", cmd.input);
            extract(cmd)
        }
        Commands::Config(cmd) => config(cmd),
    }
}

fn load_config(path: Option<&Path>) -> Result<UnivNetConfig> {
    match path {
        Some(p) => UnivNetConfig::load(p).with_context(|| format!("loading config {p:?}")),
        None => Ok(UnivNetConfig::default()),
    }
}

/// Read a mono WAV as `f32` samples in `[-1, 1]` plus its sample rate.
fn read_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
    let reader =
        hound::WavReader::open(path).with_context(|| format!("opening wav {path:?}"))?;
    let spec = reader.spec();
    if spec.channels != 1 {
        bail!(
            "{path:?} has {} channels; only mono audio is supported",
            spec.channels
        );
    }
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok((samples, spec.sample_rate))
}

fn first_item(value: Option<&BatchValue>) -> Option<&Array2<f32>> {
    value.and_then(BatchValue::as_list).and_then(<[_]>::first)
}

fn array_json(arr: &Array2<f32>) -> Value {
    json!({
        "shape": [arr.nrows(), arr.ncols()],
        "data": arr.rows().into_iter().map(|r| r.to_vec()).collect::<Vec<_>>(),
    })
}

fn extract(cmd: ExtractCommand) -> Result<()> {
    let cfg = load_config(cmd.config.as_deref())?;
    let fe = UnivNetFeatureExtractor::new(cfg).context("building feature extractor")?;

    let (samples, sample_rate) = read_wav(&cmd.input)?;
    info!(
        samples = samples.len(),
        sample_rate,
        frames = ?fe.num_frames(samples.len()),
        "decoded input"
    );

    let opts = ExtractOptions {
        sampling_rate: Some(sample_rate),
        return_noise: !cmd.no_noise,
        pad_end: cmd.pad_end,
        pad_length: cmd.pad_length,
        do_normalize: cmd.normalize.then_some(true),
        ..Default::default()
    };
    let mut rng = match cmd.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let batch = fe
        .extract_with_rng(samples, &opts, &mut rng)
        .context("feature extraction failed")?;

    let spectrogram = first_item(batch.spectrogram()).context("no spectrogram produced")?;
    let noise = first_item(batch.noise_sequence());

    match &cmd.output {
        Some(out) => {
            let mut doc = json!({
                "sampling_rate": sample_rate,
                "spectrogram": array_json(spectrogram),
            });
            if let Some(noise) = noise {
                doc["noise_sequence"] = array_json(noise);
            }
            std::fs::write(out, serde_json::to_string(&doc)?)
                .with_context(|| format!("writing {out:?}"))?;
            info!("Features written to {out:?}");
        }
        None => {
            let (min, max) = spectrogram
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            println!("spectrogram: {:?} (min {min:.4}, max {max:.4})", spectrogram.dim());
            if let Some(noise) = noise {
                println!("noise_sequence: {:?}", noise.dim());
            }
        }
    }
    Ok(())
}

fn config(cmd: ConfigCommand) -> Result<()> {
    let cfg = load_config(cmd.config.as_deref())?;
    // round-trip through the extractor so fmax is resolved and the config validated
    let fe = UnivNetFeatureExtractor::new(cfg).context("invalid configuration")?;
    match cmd.output {
        Some(out) => {
            fe.config()
                .save(&out)
                .with_context(|| format!("saving config to {out:?}"))?;
            info!("Config written to {out:?}");
        }
        None => println!("{}", fe.config().to_json_string()?),
    }
    Ok(())
}
