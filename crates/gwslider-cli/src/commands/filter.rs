//! Matched-filter a template against an event.

use clap::Args;
use gwslider_registry::Detector;

use super::common::{ParamsArgs, Sources, describe_params};

/// Run the matched filter on one event.
#[derive(Args)]
pub struct FilterArgs {
    /// Event name (see `gwslider events`)
    event: String,

    /// Template parameters (default: the event's reference parameters)
    #[command(flatten)]
    params: ParamsArgs,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

/// Run the filter command.
pub fn run(args: FilterArgs, sources: &Sources) -> anyhow::Result<()> {
    let session = sources.session()?;
    let event = session.registry().get(&args.event)?;
    let params = args.params.intrinsic()?.unwrap_or(*event.reference());
    let report = session.analyze(event, &params)?;

    if args.json {
        let detectors: serde_json::Map<String, serde_json::Value> = report
            .iter()
            .map(|r| {
                let f = &r.filter;
                (
                    r.detector.to_string(),
                    serde_json::json!({
                        "snr": f.snr,
                        "time_of_max": f.time_of_max,
                        "effective_distance": f.effective_distance,
                        "amplitude": r.amplitude(),
                        "horizon": f.horizon,
                        "phase": f.phase,
                        "offset": f.offset,
                    }),
                )
            })
            .collect();
        let out = serde_json::json!({
            "event": event.name(),
            "params": params,
            "network_snr": report.network_snr(),
            "detectors": detectors,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Event:    {}", event.name());
    println!("Template: {}", describe_params(&params));
    println!();
    println!("  Det   SNR      t_max (GPS)        d_eff      horizon    phase    offset");
    for detector in Detector::ALL {
        let f = &report.detector(detector).filter;
        println!(
            "  {:4} {:7.3}  {:17.5}  {:9.4}  {:9.4}  {:7.4}  {:6}",
            detector.as_str(),
            f.snr,
            f.time_of_max,
            f.effective_distance,
            f.horizon,
            f.phase,
            f.offset
        );
    }
    println!();
    println!("  Network SNR: {:.3}", report.network_snr());
    Ok(())
}
