//! Integration tests for the gwslider binary.

use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// The `gwslider` binary built by cargo, isolated from any user config.
fn gwslider_bin(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gwslider"));
    cmd.env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_DATA_HOME", dir.path().join("data"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn cli_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    let output = gwslider_bin(&dir).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    for command in ["events", "template", "filter", "convert", "simulate", "explore", "config"] {
        assert!(stdout.contains(command), "help should mention '{command}'");
    }
}

#[test]
fn cli_version_works() {
    let dir = TempDir::new().unwrap();
    let output = gwslider_bin(&dir).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("gwslider"));
}

#[test]
fn cli_events_lists_factory_table() {
    let dir = TempDir::new().unwrap();
    let output = gwslider_bin(&dir).arg("events").output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = stdout_of(&output);
    for name in ["GW150914", "GW190521", "GW190519", "SIMULATED"] {
        assert!(stdout.contains(name), "events should list {name}");
    }
    assert!(stdout.contains("no dataset"));
}

#[test]
fn cli_convert_to_derived() {
    let dir = TempDir::new().unwrap();
    let output = gwslider_bin(&dir)
        .args(["convert", "--params", "30,30,0.5,0.5"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("chirp_mass"));
    assert!(stdout.contains("mass_ratio   1.000000"));
    assert!(stdout.contains("chi_eff      0.500000"));
}

#[test]
fn cli_convert_rejects_bad_spin() {
    let dir = TempDir::new().unwrap();
    let output = gwslider_bin(&dir)
        .args(["convert", "--params", "30,30,1.2,0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("spin1z"));
}

#[test]
fn cli_config_init_then_validate() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("cfg");
    let output = gwslider_bin(&dir)
        .args(["config", "init", "--dir", target.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let analysis = target.join("analysis.toml");
    let output = gwslider_bin(&dir)
        .args(["config", "validate", analysis.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("valid"));

    let events = target.join("events.toml");
    let output = gwslider_bin(&dir)
        .args(["config", "validate", "--table", events.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("8 events"));

    let again = gwslider_bin(&dir)
        .args(["config", "init", "--dir", target.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!again.status.success(), "init without --force must not overwrite");
}

#[test]
fn cli_config_validate_reports_problems() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[filter]\nwindow_seconds = 40.0\n\n[simulation]\nsnr = 0.0\n").unwrap();
    let output = gwslider_bin(&dir)
        .args(["config", "validate", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stdout_of(&output).contains("2 problem(s)"));
}

#[test]
fn cli_template_writes_json() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("template.json");
    let output = gwslider_bin(&dir)
        .args(["template", "--params", "34.6,30,0,0", "-o", out.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["strain"].as_array().unwrap().len(), 513);
    assert_eq!(json["time"].as_array().unwrap().len(), 513);
}

#[test]
fn cli_config_paths_lists_datasets_by_event() {
    let dir = TempDir::new().unwrap();
    let datasets = dir.path().join("datasets");
    std::fs::create_dir_all(&datasets).unwrap();
    std::fs::write(datasets.join("GW150914.json"), "{}").unwrap();
    std::fs::write(datasets.join("notes.txt"), "").unwrap();

    let output = gwslider_bin(&dir)
        .args(["config", "paths", "--datasets", datasets.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = stdout_of(&output);
    assert!(stdout.lines().any(|l| l.trim_start().starts_with("GW150914 ")), "{stdout}");
    assert!(!stdout.contains("notes.txt"));
}

#[test]
fn cli_simulate_then_filter() {
    let dir = TempDir::new().unwrap();
    let datasets = dir.path().join("datasets");
    std::fs::create_dir_all(&datasets).unwrap();
    let output = gwslider_bin(&dir)
        .args(["simulate", "--datasets", datasets.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(datasets.join("SIMULATED.json").exists());

    let output = gwslider_bin(&dir)
        .args(["filter", "SIMULATED", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let snr = json["detectors"]["H1"]["snr"].as_f64().unwrap();
    assert!(snr > 14.0 && snr < 26.0, "H1 SNR {snr}");
    assert!(json["network_snr"].as_f64().unwrap() > 20.0);
}

#[test]
fn cli_explore_applies_commands() {
    let dir = TempDir::new().unwrap();
    let mut child = gwslider_bin(&dir)
        .args(["explore", "--quiet"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"mass chirp\nset 2 0\nresidual\nref\ndet\nbogus\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("event SIMULATED"));
    assert!(stdout.contains("chirp_mass"));
    assert!(stdout.contains("error: parameter 'mass_ratio'"));
    assert!(stdout.contains("residual rms"));
    assert!(stdout.contains("detector H1"));
    assert!(stdout.contains("unknown command 'bogus'"));
}
