//! Process-level tests through the `log_probe` binary
//!
//! Stderr is captured through an OS pipe, the way a supervising process would
//! read a child's log output.

use pretty_assertions::assert_eq;
use std::io::Read;
use std::process::{ExitStatus, Stdio};
use tests::probe;

const PROBE: &str = env!("CARGO_BIN_EXE_log_probe");

struct ProbeRun {
    status: ExitStatus,
    stdout: String,
    stderr_lines: Vec<String>,
}

fn run_probe(args: &[&str], envs: &[(&str, &str)]) -> ProbeRun {
    let (mut reader, writer) = os_pipe::pipe().expect("Failed to create pipe");

    let mut cmd = probe::command(PROBE);
    cmd.args(args)
        .envs(envs.iter().copied())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::from(writer));

    let child = cmd.spawn().expect("Failed to spawn log_probe");
    // Drop our copy of the write end so the read below sees EOF
    drop(cmd);

    let output = child.wait_with_output().expect("Failed to wait for log_probe");
    let mut stderr = String::new();
    reader
        .read_to_string(&mut stderr)
        .expect("Failed to read stderr pipe");

    ProbeRun {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr_lines: stderr.lines().map(strip_timestamp).collect(),
    }
}

/// `"Info:  12:00:00.123456 msg"` -> `"Info:  msg"`
fn strip_timestamp(line: &str) -> String {
    let (Some(prefix), Some(rest)) = (line.get(..7), line.get(7..)) else {
        return line.to_string();
    };
    match rest.split_once(' ') {
        Some((stamp, message)) if stamp.contains(':') && stamp.contains('.') => {
            format!("{}{}", prefix, message)
        }
        _ => line.to_string(),
    }
}

#[test]
fn test_probe_without_debug_flag() {
    let run = run_probe(&["emit"], &[]);

    assert!(run.status.success(), "probe failed: {:?}", run.stderr_lines);
    assert_eq!(
        run.stderr_lines,
        vec![
            "Info:  probe started",
            "Error: something failed: 7",
            "Info:  via tracing",
        ]
    );
}

#[test]
fn test_probe_with_debug_flag() {
    let run = run_probe(&["-debug", "emit"], &[]);

    assert!(run.status.success(), "probe failed: {:?}", run.stderr_lines);
    assert_eq!(&run.stderr_lines[..5], &[
        "Info:  probe started",
        "Debug: debug is on",
        "Error: something failed: 7",
        "Info:  via tracing",
        "Debug: tracing debug",
    ]);
    assert!(run.stderr_lines[5].starts_with("Debug: probe took "));
    assert_eq!(run.stderr_lines.len(), 6);
}

#[test]
fn test_probe_debug_from_environment() {
    let run = run_probe(&["emit"], &[("TINTLOG_DEBUG", "1")]);
    assert!(run.stderr_lines.iter().any(|l| l == "Debug: debug is on"));
}

#[test]
fn test_probe_mirrors_to_log_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("probe.log");
    let path_str = path.to_str().expect("utf-8 temp path");

    let run = run_probe(&["emit"], &[("TINTLOG_LOG_PATH", path_str)]);
    assert!(run.status.success());

    let file = std::fs::read_to_string(&path).expect("Failed to read probe log");
    let file_lines: Vec<String> = file.lines().map(strip_timestamp).collect();
    assert_eq!(file_lines, run.stderr_lines);
}

#[test]
fn test_probe_bad_log_path_falls_back_to_console() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("missing").join("probe.log");
    let path_str = path.to_str().expect("utf-8 temp path");

    let run = run_probe(&["emit"], &[("TINTLOG_LOG_PATH", path_str)]);

    assert!(run.status.success());
    assert!(run.stderr_lines[0].starts_with("Error: Failed to open log file "));
    assert_eq!(run.stderr_lines[1], "Info:  probe started");
}

#[test]
fn test_fatal_exits_nonzero_after_logging() {
    let run = run_probe(&["fatal"], &[]);

    assert_eq!(run.status.code(), Some(1));
    assert_eq!(run.stderr_lines, vec!["PANIC! cannot continue: config missing"]);
    assert!(run.stdout.is_empty());
}

#[test]
fn test_panic_unwinds_with_message() {
    let run = run_probe(&["panic"], &[]);

    assert!(!run.status.success());
    assert_eq!(run.stderr_lines[0], "PANIC! invariant broken: ring overflow");
    // Default panic hook reports the same message
    assert!(run
        .stderr_lines
        .iter()
        .skip(1)
        .any(|l| l.contains("invariant broken: ring overflow")));
}

#[test]
fn test_probe_trace_output() {
    let run = run_probe(&["-debug", "trace"], &[]);

    assert!(run.status.success());
    let breadcrumb = run.stdout.trim();
    assert!(breadcrumb.starts_with("0 ::: "), "{}", breadcrumb);
    assert_eq!(breadcrumb.matches(" >").count(), 6, "{}", breadcrumb);
    assert!(breadcrumb.contains("log_probe.rs:"), "{}", breadcrumb);

    let run = run_probe(&["trace"], &[]);
    assert_eq!(run.stdout.trim(), "<TRACE N/A>");
}
