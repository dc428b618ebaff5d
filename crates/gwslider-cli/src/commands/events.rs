//! List reference events.

use clap::Args;
use gwslider_config::is_factory_event;
use gwslider_filter::SIMULATED_EVENT_NAME;
use gwslider_registry::EventRegistry;

use super::common::{Sources, describe_params};

/// List reference events.
#[derive(Args)]
pub struct EventsArgs {
    /// Load every dataset and report why unusable ones fail
    #[arg(long)]
    check: bool,
}

/// Run the events command.
pub fn run(args: EventsArgs, sources: &Sources) -> anyhow::Result<()> {
    let (table, base) = sources.event_table()?;
    let datasets_dir = sources.datasets_dir();

    println!("Reference Events:");
    println!("=================");
    let registry = args.check.then(|| EventRegistry::from_table(&table, &base, &datasets_dir));
    for event in &table {
        let path = event.dataset_path(&base, &datasets_dir);
        let status = match &registry {
            Some(registry) => match registry.get(&event.name)?.unavailable_reason() {
                None => "usable".to_string(),
                Some(reason) => format!("unusable: {reason}"),
            },
            None if path.exists() => format!("dataset {}", path.display()),
            None => "no dataset".to_string(),
        };
        let origin = if is_factory_event(&event.name) { "" } else { " (user)" };
        println!("  {:10} GPS {:.1}{origin}", event.name, event.gps_time);
        println!("             {}", describe_params(&event.reference_params()));
        println!("             {status}");
    }

    let config = sources.analysis_config()?;
    if config.simulation.enabled {
        println!();
        println!(
            "  {:10} injection at SNR {} (seed {})",
            SIMULATED_EVENT_NAME, config.simulation.snr, config.simulation.seed
        );
        println!("             {}", describe_params(&config.simulation.injection));
    }
    Ok(())
}
