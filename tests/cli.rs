// Tests for the spooler binary and the printer setup it shares with the library

use spooler_rs::config::{ConfigError, PrinterConfig};
use spooler_rs::{Printer, PrinterError};
use std::fs;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Runs the binary inside `dir`, so no stray `printer.toml` is picked up.
fn spooler(dir: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spooler"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn test_ink_override_replaces_configured_ink() {
    let config = PrinterConfig { name: "lab".to_string(), ink: 1 };
    let printer = Printer::<String>::from_config_with_ink(&config, Some("5")).unwrap();
    assert_eq!(printer.name(), "lab");
    assert_eq!(printer.ink(), 5);

    let printer = Printer::<String>::from_config_with_ink(&config, None).unwrap();
    assert_eq!(printer.ink(), 1);
}

#[test]
fn test_negative_ink_override_is_rejected() {
    let config = PrinterConfig::default();
    let err = Printer::<String>::from_config_with_ink(&config, Some("-3")).unwrap_err();
    assert!(matches!(err, ConfigError::Ink(PrinterError::InvalidInk(ref raw)) if raw == "-3"));
}

#[test]
fn test_missing_config_is_logged() {
    let dir = tempdir().unwrap();
    let output = spooler(dir.path(), &["--config", "missing.toml", "print", "a"]);
    assert!(!output.status.success());
    let stderr = text(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_non_integer_config_ink_is_logged() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.toml"), "[printer]\nink = 2.5\n").unwrap();
    let output = spooler(dir.path(), &["--config", "bad.toml", "print", "a"]);
    assert!(!output.status.success());
    let stderr = text(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "stderr: {}", stderr);
}

#[test]
fn test_negative_ink_flag_is_rejected() {
    let dir = tempdir().unwrap();
    let output = spooler(dir.path(), &["--ink", "-3", "print", "a"]);
    assert!(!output.status.success());
    let stderr = text(&output.stderr);
    assert!(stderr.contains("Failed to initialize printer"), "stderr: {}", stderr);
    assert!(stderr.contains("-3"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_print_plain_output() {
    let dir = tempdir().unwrap();
    let output = spooler(dir.path(), &["--ink", "3", "print", "a", "b", "c", "d", "e"]);
    assert!(output.status.success(), "stderr: {}", text(&output.stderr));
    assert_eq!(text(&output.stdout), "a\nb\nc\n");
}

#[test]
fn test_print_json_output() {
    let dir = tempdir().unwrap();
    let output = spooler(dir.path(), &["--json", "--ink", "3", "print", "a", "b", "c", "d", "e"]);
    assert!(output.status.success(), "stderr: {}", text(&output.stderr));
    let lines: Vec<serde_json::Value> = text(&output.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["printed"], serde_json::json!(["a", "b", "c"]));
    assert_eq!(lines[1]["status"]["ink"], 0);
    assert_eq!(lines[1]["status"]["queued"], 2);
    assert_eq!(lines[1]["status"]["state"], "Stalled");
}

#[test]
fn test_run_script_with_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("printer.toml"), "[printer]\nname = \"office\"\nink = 3\n").unwrap();
    fs::write(
        dir.path().join("job.txt"),
        "print line1 line2 line3 line4 line5\nrefill 3\nprint page1 page2\nclear\n",
    )
    .unwrap();
    let output = spooler(dir.path(), &["run", "job.txt"]);
    assert!(output.status.success(), "stderr: {}", text(&output.stderr));
    assert_eq!(
        text(&output.stdout),
        "line1\nline2\nline3\nink: 3\nline4\nline5\npage1\ncleared: page2\n"
    );
}

#[test]
fn test_run_script_stops_at_bad_line() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("job.txt"), "print a\nrefill lots\n").unwrap();
    let output = spooler(dir.path(), &["--ink", "1", "run", "job.txt"]);
    assert!(!output.status.success());
    assert_eq!(text(&output.stdout), "a\n");
    assert!(text(&output.stderr).contains("Script failed"));
}
