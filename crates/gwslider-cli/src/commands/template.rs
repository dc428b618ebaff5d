//! Synthesize a template.

use anyhow::Context;
use clap::Args;
use gwslider_waveform::{WaveformOracle, WaveformSynthesizer};
use std::path::PathBuf;

use super::common::{ParamsArgs, Sources, describe_params};

/// Synthesize a time-domain template.
#[derive(Args)]
pub struct TemplateArgs {
    #[command(flatten)]
    params: ParamsArgs,

    /// Render onto this sample rate, padded to --duration with the merger centered
    #[arg(long, value_name = "HZ")]
    sample_rate: Option<f64>,

    /// Length of the padded template (s)
    #[arg(long, default_value_t = 32.0, requires = "sample_rate")]
    duration: f64,

    /// Reference phase (rad); ignored with --sample-rate
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    phase: f64,

    /// Write `{"time": [..], "strain": [..]}` to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Run the template command.
pub fn run(args: TemplateArgs, sources: &Sources) -> anyhow::Result<()> {
    let config = sources.analysis_config()?;
    let params = args.params.intrinsic()?.unwrap_or(config.simulation.injection);
    let synth = WaveformSynthesizer::new(config.waveform)?;

    let (time, strain) = match args.sample_rate {
        Some(fs) => {
            let total = (args.duration * fs).round() as usize;
            let strain = synth.render_padded_template(&params, &config.render, fs, total, total / 2)?;
            let center = (total / 2) as f64;
            let time = (0..total).map(|i| (i as f64 - center) / fs).collect();
            (time, strain)
        }
        None => (
            synth.times().times().to_vec(),
            synth.time_domain(&params, args.phase)?,
        ),
    };

    let (peak_index, peak) = strain
        .iter()
        .enumerate()
        .fold((0, 0.0_f64), |best, (i, &v)| if v.abs() > best.1 { (i, v.abs()) } else { best });

    println!("Template: {}", describe_params(&params));
    println!("  Model:       {}", synth.oracle().name());
    println!("  Samples:     {}", strain.len());
    println!("  Span:        {:.4} s to {:.4} s", time.first().copied().unwrap_or(0.0), time.last().copied().unwrap_or(0.0));
    println!("  Peak |h|:    {peak:.4e} at t = {:.5} s", time.get(peak_index).copied().unwrap_or(0.0));

    if let Some(path) = &args.output {
        let json = serde_json::json!({ "time": time, "strain": strain });
        std::fs::write(path, serde_json::to_string(&json)?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("  Written to:  {}", path.display());
    }
    Ok(())
}
