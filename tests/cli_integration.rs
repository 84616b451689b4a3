//! CLI integration tests for Surveyor.
//!
//! These tests drive the binary end to end: flag parsing, config, logging,
//! specification building, and the structural checks.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the surveyor binary command, isolated from the user's config.
fn surveyor(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("surveyor").unwrap();
    cmd.env("HOME", home)
        .env_remove("SURVEYOR_DEFINITIONS_DIR")
        .current_dir(home);
    cmd
}

/// Create a temporary directory for test runs.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Run `surveyor survey` and parse its JSON output.
fn survey_json(tmp: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = surveyor(tmp.path())
        .arg("survey")
        .args(args)
        .arg("--log-dir")
        .arg(tmp.path().join("logs"))
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "survey failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// surveyor survey
// ============================================================================

#[test]
fn test_survey_prints_specification() {
    let tmp = temp_dir();
    let spec = survey_json(&tmp, &["cbc", "--query", "process_name:cmd.exe", "--days", "7"]);

    assert_eq!(spec["backend"], "cbc");
    assert_eq!(spec["query"], "process_name:cmd.exe");
    assert_eq!(spec["days"], 7);
    assert_eq!(spec["credentials"]["profile"], "default");
    assert_eq!(spec["write_to_file"], true);
    assert_eq!(spec["output_format"], "csv");
    assert!(spec.get("minutes").is_none());
    assert!(spec.get("product_args").is_none());
}

#[test]
fn test_survey_writes_log_file() {
    let tmp = temp_dir();
    survey_json(&tmp, &["cbr", "--query", "x"]);

    let logs: Vec<_> = fs::read_dir(tmp.path().join("logs"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();

    assert_eq!(logs.len(), 1);
    assert!(logs[0].ends_with(".cbr.log"), "unexpected log name: {}", logs[0]);
}

#[test]
fn test_survey_rejects_days_and_minutes() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["survey", "cbc", "--days", "1", "--minutes", "30"])
        .arg("--log-dir")
        .arg(tmp.path().join("logs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn test_survey_iocfile_requires_ioctype() {
    let tmp = temp_dir();
    let iocs = tmp.path().join("iocs.txt");
    fs::write(&iocs, "evil.example\n").unwrap();

    surveyor(tmp.path())
        .args(["survey", "cbc", "--iocfile"])
        .arg(&iocs)
        .arg("--log-dir")
        .arg(tmp.path().join("logs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--ioctype"));
}

#[test]
fn test_survey_loads_iocs() {
    let tmp = temp_dir();
    let iocs = tmp.path().join("iocs.txt");
    fs::write(&iocs, "  evil.example \nbad.example\n").unwrap();

    let spec = survey_json(
        &tmp,
        &["cbc", "--iocfile", iocs.to_str().unwrap(), "--ioctype", "domain"],
    );

    assert_eq!(spec["ioc_source"], "iocs.txt");
    assert_eq!(spec["ioc_type"], "domain");
    assert_eq!(
        spec["ioc_list"],
        serde_json::json!(["evil.example", "bad.example"])
    );
}

#[test]
fn test_survey_cortex_needs_credentials_file() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["survey", "cortex", "--query", "x"])
        .arg("--log-dir")
        .arg(tmp.path().join("logs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("credentials file"));
}

#[test]
fn test_survey_cortex_with_credentials() {
    let tmp = temp_dir();
    let creds = tmp.path().join("creds.ini");
    fs::write(&creds, "[default]\n").unwrap();

    let spec = survey_json(
        &tmp,
        &[
            "cortex",
            "--creds",
            creds.to_str().unwrap(),
            "--profile",
            "default",
            "--auth-type",
            "ADVANCED",
        ],
    );

    assert_eq!(spec["credentials"]["auth_type"], "advanced");
    assert_eq!(spec["credentials"]["profile"], "default");
}

#[test]
fn test_survey_unknown_edr() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["survey", "crowdstrike"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid EDR 'crowdstrike'"))
        .stderr(predicate::str::contains("surveyor backend list"));
}

#[test]
fn test_survey_walks_sigma_dir() {
    let tmp = temp_dir();
    let rules = tmp.path().join("rules");
    fs::create_dir_all(rules.join("nested")).unwrap();
    fs::write(rules.join("b.yml"), "title: b\n").unwrap();
    fs::write(rules.join("nested/a.yml"), "title: a\n").unwrap();
    fs::write(rules.join("notes.txt"), "skip me\n").unwrap();

    let spec = survey_json(&tmp, &["cbc", "--sigmadir", rules.to_str().unwrap()]);

    let found = spec["sigma_rules"].as_array().unwrap();
    assert_eq!(found.len(), 2);
    assert!(found
        .iter()
        .all(|rule| rule.as_str().unwrap().ends_with(".yml")));
}

#[test]
fn test_survey_cortex_rejects_sigma() {
    let tmp = temp_dir();
    let creds = tmp.path().join("creds.ini");
    fs::write(&creds, "[default]\n").unwrap();
    let rule = tmp.path().join("rule.yml");
    fs::write(&rule, "title: r\n").unwrap();

    surveyor(tmp.path())
        .args(["survey", "cortex", "--profile", "default", "--creds"])
        .arg(&creds)
        .arg("--sigmarule")
        .arg(&rule)
        .arg("--log-dir")
        .arg(tmp.path().join("logs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("are supported by product \"cortex\""));
}

#[test]
fn test_survey_builtin_deffile() {
    let tmp = temp_dir();
    let defs = tmp.path().join("defs");
    fs::create_dir_all(&defs).unwrap();
    fs::write(defs.join("remote_access.json"), "{}").unwrap();

    let output = surveyor(tmp.path())
        .env("SURVEYOR_DEFINITIONS_DIR", &defs)
        .args(["survey", "cbc", "--deffile", "remote_access"])
        .arg("--log-dir")
        .arg(tmp.path().join("logs"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let spec: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let files = spec["definition_files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].as_str().unwrap().ends_with("remote_access.json"));
}

#[test]
fn test_survey_missing_deffile() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["survey", "cbc", "--deffile", "nope"])
        .arg("--definitions-dir")
        .arg(tmp.path())
        .arg("--log-dir")
        .arg(tmp.path().join("logs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_survey_filters_product_args() {
    let tmp = temp_dir();
    let spec = survey_json(
        &tmp,
        &["cbr", "--sensor-group", "servers", "--device-policy", "ignored"],
    );

    assert_eq!(spec["product_args"]["sensor_group"], "servers");
    assert!(spec["product_args"].get("device_policy").is_none());
}

#[test]
fn test_survey_uses_project_config() {
    let tmp = temp_dir();
    fs::create_dir_all(tmp.path().join(".surveyor")).unwrap();
    fs::write(
        tmp.path().join(".surveyor/config.toml"),
        "[survey]\nlimit = 25\noutput_format = \"json\"\n",
    )
    .unwrap();

    let spec = survey_json(&tmp, &["cbc", "--query", "x"]);
    assert_eq!(spec["limit"], 25);
    assert_eq!(spec["output_format"], "json");

    let spec = survey_json(&tmp, &["cbc", "--query", "x", "--limit", "5"]);
    assert_eq!(spec["limit"], 5);
}

// ============================================================================
// surveyor check
// ============================================================================

#[test]
fn test_check_dfe_token_passes() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["check", "dfe", "--token", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] dfe"))
        .stdout(predicate::str::contains("No arguments were supplied"));
}

#[test]
fn test_check_dfe_partial_app_registration_fails() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["check", "dfe", "--tenant-id", "t", "--app-id", "a"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[!!] dfe"));
}

#[test]
fn test_check_file_and_profile() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["check", "s1", "--creds", "creds.ini", "--profile", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "A profile and path to a credentials file argument have been supplied",
        ));
}

#[test]
fn test_check_unknown_edr() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["check", "crowdstrike", "--token", "abc"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[!!] crowdstrike is not a supported EDR"));
}

#[test]
fn test_check_product_mismatch() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["check", "cbc", "--url", "u", "--token", "t", "--org-key", "o"])
        .args(["--sensor-group", "servers"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[OK] cbc"))
        .stdout(predicate::str::contains(
            "[!!] VMware Carbon Black Cloud Enterprise EDR (CBC)",
        ));
}

// ============================================================================
// surveyor backend
// ============================================================================

#[test]
fn test_backend_list() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["backend", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cbc"))
        .stdout(predicate::str::contains("Cortex XDR (Cortex)"))
        .stdout(predicate::str::contains("SentinelOne (S1)"));
}

#[test]
fn test_backend_show() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["backend", "show", "S1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deep_visibility"))
        .stdout(predicate::str::contains("--dv only"));
}

// ============================================================================
// surveyor completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = temp_dir();

    surveyor(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("surveyor"));
}
