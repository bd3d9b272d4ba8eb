//! Integration tests for fixture verification and the harness CLI.

use std::path::{Path, PathBuf};
use std::process::Command;

use printkit_harness::structured_log::validate_log_file;
use printkit_harness::{ConformanceReport, FixtureSet, TestRunner};

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn fixture_path() -> PathBuf {
    repo_root().join("tests/conformance/fixtures/printf_core.v1.json")
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("printkit-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn checked_in_fixtures_pass_in_both_modes() {
    let set = FixtureSet::from_file(&fixture_path()).expect("fixture file loads");
    assert_eq!(set.family, "stdio/snprintf");

    for mode in ["strict", "hardened"] {
        let results = TestRunner::new("fixture-verify", mode).run(&set);
        assert!(!results.is_empty());
        let failures: Vec<_> = results.iter().filter(|r| !r.passed).collect();
        assert!(failures.is_empty(), "{mode} failures: {failures:#?}");

        let report = ConformanceReport::new("printkit", mode, results);
        assert!(report.is_clean(), "{mode}: {:?}", report.summary);
    }
}

#[test]
fn strict_run_consults_host_for_portable_cases() {
    let set = FixtureSet::from_file(&fixture_path()).unwrap();
    let results = TestRunner::new("parity", "strict").run(&set);
    let checked = results.iter().filter(|r| r.host_parity.is_some()).count();
    assert!(checked > results.len() / 2, "only {checked} cases reached the host");
    let skipped = results
        .iter()
        .find(|r| r.case_name.starts_with("absent_string_placeholder"))
        .unwrap();
    assert_eq!(skipped.host_parity, None);
}

#[test]
fn cli_verify_writes_report_log_and_index() {
    let dir = scratch_dir("verify");
    let report = dir.join("report.md");
    let log = dir.join("run.jsonl");
    let output = Command::new(env!("CARGO_BIN_EXE_harness"))
        .args(["verify", "--fixture"])
        .arg(fixture_path())
        .arg("--report")
        .arg(&report)
        .arg("--log")
        .arg(&log)
        .args(["--run-id", "itest"])
        .output()
        .expect("failed to run harness");
    assert!(
        output.status.success(),
        "harness verify failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(std::fs::read_to_string(&report).unwrap().contains("| Case | Status |"));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report.with_extension("json")).unwrap())
            .unwrap();
    assert_eq!(json["summary"]["failed"], 0);

    let (lines, errors) = validate_log_file(&log).unwrap();
    assert!(errors.is_empty(), "{errors:?}");
    // run_start + one per case per mode + run_end
    let set = FixtureSet::from_file(&fixture_path()).unwrap();
    let strict = set.cases.iter().filter(|c| c.mode != "hardened").count();
    let hardened = set.cases.iter().filter(|c| c.mode != "strict").count();
    assert_eq!(lines, strict + hardened + 2);

    let index: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(log.with_extension("index.json")).unwrap())
            .unwrap();
    let artifacts = index["artifacts"].as_array().unwrap();
    assert_eq!(artifacts.len(), 3);
    assert!(artifacts.iter().all(|a| a["sha256"].as_str().unwrap().len() == 64));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn cli_capture_round_trips_through_verify() {
    let dir = scratch_dir("capture");
    let captured = dir.join("host.v1.json");
    let status = Command::new(env!("CARGO_BIN_EXE_harness"))
        .args(["capture", "--timestamp", "2026-10-18T00:00:00Z", "--output"])
        .arg(&captured)
        .status()
        .unwrap();
    assert!(status.success());

    let set = FixtureSet::from_file(&captured).unwrap();
    assert!(set.cases.iter().all(|c| c.mode == "strict"));
    let results = TestRunner::new("capture", "strict").run(&set);
    assert!(results.iter().all(|r| r.passed && r.host_parity == Some(true)));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn cli_capture_stamps_utc_time_by_default() {
    let dir = scratch_dir("capture-now");
    let captured = dir.join("host.v1.json");
    let status = Command::new(env!("CARGO_BIN_EXE_harness"))
        .args(["capture", "--output"])
        .arg(&captured)
        .status()
        .unwrap();
    assert!(status.success());

    let set = FixtureSet::from_file(&captured).unwrap();
    let stamp = set.captured_at.as_str();
    assert_eq!(stamp.len(), "2026-10-18T00:00:00.000Z".len(), "{stamp}");
    assert_eq!(stamp.as_bytes()[10], b'T');
    assert!(stamp.ends_with('Z'));
    assert!(!stamp.contains("SystemTime"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn cli_render_and_pad() {
    let output = Command::new(env!("CARGO_BIN_EXE_harness"))
        .args(["render", "--format", "[%-5s|%d]", "--arg", "str:ab", "--arg", "int:-3"])
        .args(["--capacity", "6"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "[ab  \n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("returned 10"));

    let output = Command::new(env!("CARGO_BIN_EXE_harness"))
        .args(["pad", "--text", "ab", "--fill", "*", "--count", "-3"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, b"len = 5;\n***ab\n");

    let output = Command::new(env!("CARGO_BIN_EXE_harness"))
        .arg("pad")
        .output()
        .unwrap();
    let mut expected = b"len = 100;\n".to_vec();
    expected.extend(std::iter::repeat_n(b'a', 100));
    expected.push(b'\n');
    assert_eq!(output.stdout, expected);
}
