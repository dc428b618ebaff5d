//! Convert parameters between slider modes.

use clap::Args;
use gwslider_core::ParamMode;

use super::common::{MassArg, ParamsArgs, SpinArg, describe_params};

/// Convert four parameter values into another mode.
#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    input: ParamsArgs,

    /// Mass mode of the output
    #[arg(long, value_enum, default_value_t = MassArg::ChirpRatio)]
    to_mass: MassArg,

    /// Spin mode of the output
    #[arg(long, value_enum, default_value_t = SpinArg::Effective)]
    to_spin: SpinArg,
}

/// Run the convert command.
pub fn run(args: ConvertArgs) -> anyhow::Result<()> {
    let Some(params) = args.input.intrinsic()? else {
        anyhow::bail!("--params is required");
    };
    let mode = ParamMode::new(args.to_mass.into(), args.to_spin.into());
    let values = mode.to_sliders(&params);

    println!("{}", describe_params(&params));
    for (label, value) in mode.labels().iter().zip(values) {
        println!("  {label:12} {value:.6}");
    }
    Ok(())
}
