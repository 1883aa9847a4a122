// End-to-end tests for `swapmatch run` / `swapmatch validate`.
//
// Each test builds a throwaway workspace in a temp dir, runs the binary
// against it, and checks exit code plus the files it leaves behind.
//
// Run with: cargo test -p swapmatch-cli --test run_tests -- --nocapture

use std::path::Path;
use std::process::{Command, Output};

const ETH_SOL: &str = include_str!("../../recon/tests/fixtures/raw/eth_sol.csv");
const BASE_ARB: &str = include_str!("../../recon/tests/fixtures/raw/base_arb.csv");
const CONFIG: &str = include_str!("../../recon/tests/fixtures/swaps.swapmatch.toml");

fn swapmatch(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_swapmatch"));
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Temp workspace with the fixture config at the root and sources under raw/.
fn fixture_workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    std::fs::create_dir(&raw).unwrap();
    std::fs::write(raw.join("eth_sol.csv"), ETH_SOL).unwrap();
    std::fs::write(raw.join("base_arb.csv"), BASE_ARB).unwrap();
    std::fs::write(raw.join("README.txt"), "not a source").unwrap();
    std::fs::write(dir.path().join("swaps.swapmatch.toml"), CONFIG).unwrap();
    dir
}

#[test]
fn run_writes_csv_and_summary() {
    let ws = fixture_workspace();
    let output = swapmatch(ws.path())
        .args(["run", "swaps.swapmatch.toml"])
        .output()
        .expect("swapmatch run");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty(), "stdout should be empty without --json");
    assert!(stderr(&output).contains("saved 5 matches"), "stderr: {}", stderr(&output));
    assert!(
        stderr(&output).contains("swap match run complete"),
        "engine summary should log at the default level: {}",
        stderr(&output)
    );

    let csv = std::fs::read_to_string(ws.path().join("out/filtered_cross_chain_swaps.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "tx1,tx2,bt1,bt2,raw_diff_pct_1,time_diff,raw_diff_pct_2,token,diff_pct"
    );
    assert_eq!(lines.len(), 6);
    assert!(lines[1].starts_with("0xa1,sol1,"));
    assert!(lines[5].starts_with("0xb3,sol2,"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(ws.path().join("out/summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["meta"]["config_name"], "Fixture Swaps");
    assert_eq!(summary["summary"]["final_matches"], 5);
    assert_eq!(summary["summary"]["rejected"], 4);
}

#[test]
fn verbose_logs_each_source_once() {
    let ws = fixture_workspace();
    let output = swapmatch(ws.path())
        .args(["run", "swaps.swapmatch.toml", "-v"])
        .output()
        .expect("swapmatch run -v");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert_eq!(err.matches("parsed source").count(), 2, "stderr: {err}");
    assert!(err.contains("resolved contended candidates"), "stderr: {err}");
}

#[test]
fn json_flag_prints_single_document_to_stdout() {
    let ws = fixture_workspace();
    let output = swapmatch(ws.path())
        .args(["run", "swaps.swapmatch.toml", "--json"])
        .output()
        .expect("swapmatch run --json");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let val: serde_json::Value = serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\n{stdout}"));

    let matches = val["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 5);
    assert_eq!(matches[0]["origin"], "uncontended");
    assert_eq!(matches[2]["origin"], "resolved");
}

#[test]
fn flags_override_config_paths() {
    let ws = fixture_workspace();
    let elsewhere = ws.path().join("custom/final.csv");
    let summary = ws.path().join("custom/run.json");

    let output = swapmatch(ws.path())
        .args(["run", "swaps.swapmatch.toml", "--output"])
        .arg(&elsewhere)
        .arg("--summary")
        .arg(&summary)
        .output()
        .expect("swapmatch run --output");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(elsewhere.exists());
    assert!(summary.exists());
    assert!(!ws.path().join("out/filtered_cross_chain_swaps.csv").exists());
}

#[test]
fn run_without_config_uses_defaults() {
    let ws = tempfile::tempdir().unwrap();
    let raw = ws.path().join("data/raw");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::write(raw.join("eth_sol.csv"), ETH_SOL).unwrap();

    let output = swapmatch(ws.path()).arg("run").output().expect("swapmatch run");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let csv = std::fs::read_to_string(
        ws.path().join("data/output/filtered_cross_chain_swaps.csv"),
    )
    .unwrap();
    // eth_sol.csv alone: 0xa1 and 0xa5 uncontended, 0xa3 resolves to sol4,
    // sol2 has no rival without base_arb.csv.
    let ids: Vec<&str> = csv.lines().skip(1).map(|l| &l[..4]).collect();
    assert_eq!(ids, vec!["0xa1", "0xa2", "0xa5", "0xa3"]);
}

#[test]
fn empty_result_is_success_with_header_only() {
    let ws = tempfile::tempdir().unwrap();
    let input = ws.path().join("in");
    std::fs::create_dir(&input).unwrap();
    std::fs::write(
        input.join("wide.csv"),
        "tx1,tx2,bt1,bt2,raw_diff_pct_1,time_diff\n0x1,s1,,,0.5,10\n",
    )
    .unwrap();
    let out = ws.path().join("final.csv");

    let output = swapmatch(ws.path())
        .args(["run", "--input-dir", "in", "--output"])
        .arg(&out)
        .output()
        .expect("swapmatch run");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "tx1,tx2,bt1,bt2,raw_diff_pct_1,time_diff,raw_diff_pct_2,diff_pct\n"
    );
    assert!(stderr(&output).contains("saved 0 matches"));
}

// ===========================================================================
// Exit codes
// ===========================================================================

#[test]
fn no_input_files_exits_62() {
    let ws = fixture_workspace();
    let empty = ws.path().join("empty");
    std::fs::create_dir(&empty).unwrap();

    let output = swapmatch(ws.path())
        .args(["run", "swaps.swapmatch.toml", "--input-dir", "empty"])
        .output()
        .expect("swapmatch run");

    assert_eq!(output.status.code(), Some(62), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("no files matching"));
}

#[test]
fn missing_column_exits_61() {
    let ws = tempfile::tempdir().unwrap();
    let input = ws.path().join("in");
    std::fs::create_dir(&input).unwrap();
    std::fs::write(input.join("bad.csv"), "tx1,tx2,bt1,bt2,time_diff\n0x1,s1,,,10\n").unwrap();

    let output = swapmatch(ws.path())
        .args(["run", "--input-dir", "in"])
        .output()
        .expect("swapmatch run");

    assert_eq!(output.status.code(), Some(61), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("raw_diff_pct_1"), "stderr: {err}");
    assert!(err.contains("bad.csv"), "stderr: {err}");
    assert!(err.contains("hint:"), "stderr: {err}");
    assert!(!ws.path().join("data/output").exists());
}

#[test]
fn invalid_config_exits_60() {
    let ws = tempfile::tempdir().unwrap();
    std::fs::write(
        ws.path().join("bad.swapmatch.toml"),
        "name = \"bad\"\n[thresholds]\nmargin = -0.1\n",
    )
    .unwrap();

    let output = swapmatch(ws.path())
        .args(["run", "bad.swapmatch.toml"])
        .output()
        .expect("swapmatch run");
    assert_eq!(output.status.code(), Some(60), "stderr: {}", stderr(&output));

    let output = swapmatch(ws.path())
        .args(["validate", "bad.swapmatch.toml"])
        .output()
        .expect("swapmatch validate");
    assert_eq!(output.status.code(), Some(60), "stderr: {}", stderr(&output));
}

#[test]
fn unknown_config_key_exits_60() {
    let ws = tempfile::tempdir().unwrap();
    std::fs::write(ws.path().join("typo.toml"), "name = \"x\"\nmargni = 0.01\n").unwrap();

    let output = swapmatch(ws.path())
        .args(["validate", "typo.toml"])
        .output()
        .expect("swapmatch validate");
    assert_eq!(output.status.code(), Some(60), "stderr: {}", stderr(&output));
}

#[test]
fn validate_reports_thresholds() {
    let ws = fixture_workspace();
    let output = swapmatch(ws.path())
        .args(["validate", "swaps.swapmatch.toml"])
        .output()
        .expect("swapmatch validate");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("valid: 'Fixture Swaps'"), "stderr: {err}");
    assert!(err.contains("margin=0.005"), "stderr: {err}");
}

#[test]
fn bad_arguments_exit_2() {
    let ws = tempfile::tempdir().unwrap();
    let output = swapmatch(ws.path())
        .args(["run", "--no-such-flag"])
        .output()
        .expect("swapmatch run");
    assert_eq!(output.status.code(), Some(2));
}
