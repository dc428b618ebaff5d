//! Configuration file management.

use anyhow::Context;
use clap::{Args, Subcommand};
use gwslider_config::{
    AnalysisConfig, EventTable, factory_events, list_datasets, paths, validate_analysis, validate_events,
};
use std::path::{Path, PathBuf};

use super::common::Sources;

/// Manage configuration files.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write default analysis and event files
    Init {
        /// Target directory (default: user config dir)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Print the effective analysis config as TOML
    Show,

    /// Validate an analysis config or event table file
    Validate {
        /// File to check
        file: PathBuf,

        /// Treat the file as an event table
        #[arg(long)]
        table: bool,
    },

    /// Show config and dataset locations
    Paths,
}

/// Run the config command.
pub fn run(args: ConfigArgs, sources: &Sources) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Init { dir, force } => init(dir, force),
        ConfigCommand::Show => {
            print!("{}", sources.analysis_config()?.to_toml()?);
            Ok(())
        }
        ConfigCommand::Validate { file, table } => validate(&file, table),
        ConfigCommand::Paths => show_paths(sources),
    }
}

fn init(dir: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => paths::ensure_user_config_dir()?,
    };
    let analysis = dir.join(paths::ANALYSIS_FILE);
    let events = dir.join(paths::EVENTS_FILE);
    for path in [&analysis, &events] {
        if path.exists() && !force {
            anyhow::bail!("{} already exists. Use --force to overwrite.", path.display());
        }
    }
    AnalysisConfig::default().save(&analysis)?;
    factory_events().save(&events)?;
    println!("Wrote {}", analysis.display());
    println!("Wrote {}", events.display());
    Ok(())
}

fn validate(file: &Path, is_table: bool) -> anyhow::Result<()> {
    let result = if is_table {
        let table = EventTable::load(file).with_context(|| format!("loading {}", file.display()))?;
        validate_events(&table).map(|()| format!("{} events", table.len()))
    } else {
        let config = AnalysisConfig::load(file).with_context(|| format!("loading {}", file.display()))?;
        validate_analysis(&config).map(|()| "analysis config".to_string())
    };
    match result {
        Ok(what) => {
            println!("{}: valid ({what})", file.display());
            Ok(())
        }
        Err(e) => {
            println!("{}: {} problem(s)", file.display(), e.count());
            anyhow::bail!(e)
        }
    }
}

fn show_paths(sources: &Sources) -> anyhow::Result<()> {
    let datasets = sources.datasets_dir();
    println!("Config directory:   {}", paths::user_config_dir().display());
    println!("Analysis config:    {}", paths::analysis_config_path().display());
    println!("Event table:        {}", paths::event_table_path().display());
    println!("Datasets directory: {}", datasets.display());
    let found = list_datasets(&datasets);
    if found.is_empty() {
        println!("  (no datasets)");
    }
    for path in found {
        let name = paths::event_name_from_path(&path).unwrap_or_default();
        println!("  {name:12} {}", path.display());
    }
    Ok(())
}
