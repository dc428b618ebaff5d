//! Line-driven interactive exploration.
//!
//! Reads one command per line from stdin, applies it and prints the new
//! readout. Failed updates print the error and keep the previous curves.

use clap::Args;
use gwslider_core::{MassMode, SpinMode};
use gwslider_filter::{Explorer, RenderData, StateUpdate};
use gwslider_registry::Detector;
use std::io::{self, BufRead, Write};

use super::common::Sources;

/// Explore templates interactively.
#[derive(Args)]
pub struct ExploreArgs {
    /// Event to start on (default: first usable event)
    #[arg(long)]
    event: Option<String>,

    /// Don't print the prompt
    #[arg(long)]
    quiet: bool,
}

const HELP: &str = "\
commands:
  set <slot> <value>           move slider 1-4
  mass components|chirp        mass slider mode
  spin components|effective    spin slider mode
  event <name>                 switch event
  det [H1|L1]                  select or toggle detector
  residual                     toggle residual
  ref                          reset to reference parameters
  show                         print the current readout
  help                         this text
  quit";

#[derive(Debug, PartialEq)]
enum Line {
    Update(StateUpdate),
    Show,
    Help,
    Quit,
    Empty,
}

fn parse_line(line: &str) -> Result<Line, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let update = match words.as_slice() {
        [] => return Ok(Line::Empty),
        ["quit" | "exit" | "q"] => return Ok(Line::Quit),
        ["show"] => return Ok(Line::Show),
        ["help" | "?"] => return Ok(Line::Help),
        ["set", slot, value] => {
            let slot: usize = slot.parse().map_err(|_| format!("bad slot '{slot}'"))?;
            let value: f64 = value.parse().map_err(|_| format!("bad value '{value}'"))?;
            if slot == 0 {
                return Err("slots are numbered 1 to 4".into());
            }
            StateUpdate::SetSlider { index: slot - 1, value }
        }
        ["mass", "components"] => StateUpdate::SetMassMode(MassMode::Components),
        ["mass", "chirp"] => StateUpdate::SetMassMode(MassMode::ChirpRatio),
        ["spin", "components"] => StateUpdate::SetSpinMode(SpinMode::Components),
        ["spin", "effective"] => StateUpdate::SetSpinMode(SpinMode::EffectiveAntisymmetric),
        ["event", name] => StateUpdate::SelectEvent((*name).to_string()),
        ["det"] => StateUpdate::ToggleDetector,
        ["det", name] => {
            let detector: Detector = name.parse().map_err(|e| format!("{e}"))?;
            StateUpdate::SelectDetector(detector)
        }
        ["residual"] => StateUpdate::ToggleResidual,
        ["ref"] => StateUpdate::GoToReference,
        _ => return Err(format!("unknown command '{line}' (try 'help')")),
    };
    Ok(Line::Update(update))
}

fn print_readout(out: &mut impl Write, explorer: &Explorer<'_>) -> io::Result<()> {
    let state = explorer.state();
    writeln!(out, "event {}  detector {}  mode {}", state.event, state.detector, state.mode)?;
    for (label, value) in state.mode.labels().iter().zip(state.sliders) {
        writeln!(out, "  {label:12} {value:.4}")?;
    }
    if let Some(render) = explorer.render() {
        print_render(out, render)?;
    }
    if let Some(error) = explorer.error() {
        writeln!(out, "  error: {error}")?;
    }
    Ok(())
}

fn print_render(out: &mut impl Write, render: &RenderData) -> io::Result<()> {
    writeln!(
        out,
        "  SNR {:.3}  network {:.3}  amplitude {:.4}  phase {:.4}  offset {}",
        render.snr, render.network_snr, render.amplitude, render.phase, render.offset
    )?;
    if let Some(residual) = &render.residual {
        let rms = (residual.iter().map(|r| r * r).sum::<f64>() / residual.len().max(1) as f64).sqrt();
        writeln!(out, "  residual rms {rms:.4}")?;
    }
    Ok(())
}

/// Apply one command per input line until EOF or `quit`.
fn drive(explorer: &mut Explorer<'_>, input: impl BufRead, out: &mut impl Write, prompt: bool) -> anyhow::Result<()> {
    print_readout(out, explorer)?;
    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else { break };
        match parse_line(&line?) {
            Ok(Line::Update(update)) => {
                // failures are shown in the readout
                let _ = explorer.apply(update);
                print_readout(out, explorer)?;
            }
            Ok(Line::Show) => print_readout(out, explorer)?,
            Ok(Line::Help) => writeln!(out, "{HELP}")?,
            Ok(Line::Quit) => break,
            Ok(Line::Empty) => {}
            Err(message) => writeln!(out, "  error: {message}")?,
        }
    }
    Ok(())
}

/// Run the explore command.
pub fn run(args: ExploreArgs, sources: &Sources) -> anyhow::Result<()> {
    let session = sources.session()?;
    let mut explorer = Explorer::new(&session)?;
    if let Some(name) = args.event {
        explorer.apply(StateUpdate::SelectEvent(name))?;
    }
    let stdin = io::stdin();
    drive(&mut explorer, stdin.lock(), &mut io::stdout().lock(), !args.quiet)
}
