//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::{Args, ValueEnum};
use gwslider_config::{AnalysisConfig, EventTable, factory_events, paths};
use gwslider_core::{IntrinsicParams, MassMode, ParamMode, SpinMode};
use gwslider_filter::Session;
use std::path::{Path, PathBuf};

/// Where configuration and the event table come from.
#[derive(Args, Clone, Debug, Default)]
pub struct Sources {
    /// Analysis config file (default: user config dir, then built-in defaults)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Event table file (default: user config dir, then the factory table)
    #[arg(long, global = true, value_name = "FILE")]
    pub events: Option<PathBuf>,

    /// Directory searched for `<EVENT>.json` datasets
    #[arg(long, global = true, value_name = "DIR")]
    pub datasets: Option<PathBuf>,
}

impl Sources {
    /// Load and validate the analysis config.
    ///
    /// An explicit path must exist; the user file is optional.
    pub fn analysis_config(&self) -> anyhow::Result<AnalysisConfig> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => {
                let path = paths::analysis_config_path();
                if !path.exists() {
                    tracing::debug!(path = %path.display(), "no user config, using defaults");
                    return Ok(AnalysisConfig::default());
                }
                path
            }
        };
        AnalysisConfig::load_validated(&path).with_context(|| format!("loading {}", path.display()))
    }

    /// Load and validate the event table, with the directory relative
    /// dataset paths resolve against.
    pub fn event_table(&self) -> anyhow::Result<(EventTable, PathBuf)> {
        let path = match &self.events {
            Some(path) => path.clone(),
            None => {
                let path = paths::event_table_path();
                if !path.exists() {
                    return Ok((factory_events(), self.datasets_dir()));
                }
                path
            }
        };
        let table = EventTable::load_validated(&path).with_context(|| format!("loading {}", path.display()))?;
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok((table, base))
    }

    /// Dataset search directory.
    pub fn datasets_dir(&self) -> PathBuf {
        self.datasets.clone().unwrap_or_else(paths::datasets_dir)
    }

    /// Build a session over every configured event.
    pub fn session(&self) -> anyhow::Result<Session> {
        let config = self.analysis_config()?;
        let (table, base) = self.event_table()?;
        Ok(Session::load(config, &table, &base, &self.datasets_dir())?)
    }
}

/// Mass slot interpretation on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MassArg {
    /// mass1, mass2
    #[default]
    Components,
    /// chirp mass, mass2/mass1
    ChirpRatio,
}

/// Spin slot interpretation on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpinArg {
    /// spin1z, spin2z
    #[default]
    Components,
    /// chi_eff, chi_a
    Effective,
}

impl From<MassArg> for MassMode {
    fn from(arg: MassArg) -> Self {
        match arg {
            MassArg::Components => MassMode::Components,
            MassArg::ChirpRatio => MassMode::ChirpRatio,
        }
    }
}

impl From<SpinArg> for SpinMode {
    fn from(arg: SpinArg) -> Self {
        match arg {
            SpinArg::Components => SpinMode::Components,
            SpinArg::Effective => SpinMode::EffectiveAntisymmetric,
        }
    }
}

/// Four source parameters and how to read them.
#[derive(Args, Clone, Debug)]
pub struct ParamsArgs {
    /// Four comma-separated values, e.g. 34.6,30,0,0
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub params: Option<Vec<f64>>,

    /// How the first two values are read
    #[arg(long, value_enum, default_value_t)]
    pub mass_mode: MassArg,

    /// How the last two values are read
    #[arg(long, value_enum, default_value_t)]
    pub spin_mode: SpinArg,
}

impl ParamsArgs {
    /// Parameter mode selected on the command line.
    pub fn mode(&self) -> ParamMode {
        ParamMode::new(self.mass_mode.into(), self.spin_mode.into())
    }

    /// Parsed values, or `None` when `--params` was not given.
    pub fn intrinsic(&self) -> anyhow::Result<Option<IntrinsicParams>> {
        let Some(values) = &self.params else {
            return Ok(None);
        };
        let sliders: [f64; 4] = values
            .as_slice()
            .try_into()
            .map_err(|_| anyhow::anyhow!("--params takes exactly 4 values, got {}", values.len()))?;
        let params = self.mode().from_sliders(sliders)?;
        params.validate()?;
        Ok(Some(params))
    }
}

/// One-line summary of a parameter vector in both parametrizations.
pub fn describe_params(params: &IntrinsicParams) -> String {
    let d = params.to_derived();
    format!(
        "m1={:.3} m2={:.3} s1z={:.3} s2z={:.3} | Mc={:.3} q={:.4} chi_eff={:.4} chi_a={:.4}",
        params.mass1, params.mass2, params.spin1z, params.spin2z, d.chirp_mass, d.mass_ratio, d.chi_eff, d.chi_a
    )
}
