//! gwslider CLI - explore gravitational-wave templates against detector data.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gwslider")]
#[command(author, version, about = "Gravitational-wave template explorer", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    sources: commands::common::Sources,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List reference events and dataset status
    Events(commands::events::EventsArgs),

    /// Synthesize a template for given source parameters
    Template(commands::template::TemplateArgs),

    /// Matched-filter a template against an event
    Filter(commands::filter::FilterArgs),

    /// Convert between parameter modes
    Convert(commands::convert::ConvertArgs),

    /// Write a simulated injection dataset
    Simulate(commands::simulate::SimulateArgs),

    /// Interactive exploration driven by line commands on stdin
    Explore(commands::explore::ExploreArgs),

    /// Manage configuration files
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Events(args) => commands::events::run(args, &cli.sources),
        Commands::Template(args) => commands::template::run(args, &cli.sources),
        Commands::Filter(args) => commands::filter::run(args, &cli.sources),
        Commands::Convert(args) => commands::convert::run(args),
        Commands::Simulate(args) => commands::simulate::run(args, &cli.sources),
        Commands::Explore(args) => commands::explore::run(args, &cli.sources),
        Commands::Config(args) => commands::config::run(args, &cli.sources),
    }
}
