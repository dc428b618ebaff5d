//! Write a simulated dataset.

use clap::Args;
use gwslider_filter::{SIMULATED_EVENT_NAME, simulate_dataset};
use gwslider_waveform::WaveformSynthesizer;
use std::path::PathBuf;

use super::common::{ParamsArgs, Sources, describe_params};

/// Generate an injection in colored noise and save it as a dataset.
#[derive(Args)]
pub struct SimulateArgs {
    /// Output JSON file (default: `<datasets>/SIMULATED.json`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Injection parameters (default: from the config)
    #[command(flatten)]
    params: ParamsArgs,

    /// Target optimal SNR per detector
    #[arg(long)]
    snr: Option<f64>,

    /// Noise seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Run the simulate command.
pub fn run(args: SimulateArgs, sources: &Sources) -> anyhow::Result<()> {
    let mut config = sources.analysis_config()?;
    if let Some(params) = args.params.intrinsic()? {
        config.simulation.injection = params;
    }
    if let Some(snr) = args.snr {
        anyhow::ensure!(snr.is_finite() && snr > 0.0, "--snr must be positive, got {snr}");
        config.simulation.snr = snr;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }

    let synth = WaveformSynthesizer::new(config.waveform)?;
    let dataset = simulate_dataset(&config, &synth)?;

    let path = match args.output {
        Some(path) => path,
        None => {
            let dir = sources.datasets.clone().map_or_else(gwslider_config::ensure_datasets_dir, Ok)?;
            dir.join(format!("{SIMULATED_EVENT_NAME}.json"))
        }
    };
    dataset.save(&path)?;

    println!("Simulated: {}", describe_params(&config.simulation.injection));
    println!("  SNR:      {}", config.simulation.snr);
    println!("  Seed:     {}", config.simulation.seed);
    println!("  Samples:  {} at {} Hz", dataset.len(), dataset.sample_rate());
    println!("  Written:  {}", path.display());
    Ok(())
}
