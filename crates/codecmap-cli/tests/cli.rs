use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("codecmap"))
}

fn write_config(temp: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = temp.path().join(name);
    std::fs::write(&path, body).expect("write config");
    path
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("rules").and(contains("lookup")).and(contains("check")));
}

#[test]
fn rules_prints_descriptor_lines() {
    cmd()
        .arg("rules")
        .assert()
        .success()
        .stdout(contains("116:1 \"not IPv4 datagram\""))
        .stdout(contains("116:475 "));
}

#[test]
fn rules_json_is_a_catalog() {
    let assert = cmd()
        .arg("rules")
        .arg("--gid")
        .arg("116")
        .arg("--json")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let catalog: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(catalog["catalog_version"], 1);
    assert_eq!(catalog["gid"], 116);
    assert_eq!(catalog["decode_index_max"], 476);
    let rules = catalog["rules"].as_array().expect("rules array");
    assert_eq!(rules.len(), 160);
    assert_eq!(rules[0]["name"], "DECODE_NOT_IPV4_DGRAM");
}

#[test]
fn rules_unknown_gid_shows_error_and_hint() {
    cmd()
        .arg("rules")
        .arg("--gid")
        .arg("999")
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn lookup_resolves_assigned_sid() {
    cmd()
        .arg("lookup")
        .arg("400")
        .assert()
        .success()
        .stdout(contains("116:400").and(contains("DECODE_TCP_XMAS")));
}

#[test]
fn lookup_gap_sid_is_unresolved() {
    cmd()
        .arg("lookup")
        .arg("417")
        .assert()
        .code(2)
        .stderr(contains("error: unresolved rule 116:417").and(contains("hint:")));
}

#[test]
fn modules_lists_codec_options() {
    cmd()
        .arg("modules")
        .assert()
        .success()
        .stdout(
            contains("udp [context]")
                .and(contains("gtp_ports"))
                .and(contains("max_mpls_stack_depth")),
        );
}

#[test]
fn modules_json_has_param_types() {
    let assert = cmd().arg("modules").arg("--json").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let modules: Value = serde_json::from_str(&stdout).expect("valid json");
    let mpls = modules
        .as_array()
        .expect("module array")
        .iter()
        .find(|module| module["name"] == "mpls")
        .expect("mpls module");
    assert_eq!(mpls["usage"], "context");
    assert_eq!(mpls["params"][2]["type"], "int -1:255");
}

#[test]
fn check_accepts_valid_config() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(
        &temp,
        "snort.json",
        r#"{
            "global": { "trace": { "decode": 2 } },
            "context": {
                "udp": { "enable_gtp": true, "gtp_ports": [2152, 3386] },
                "mpls": { "mpls_payload_type": "eth" }
            }
        }"#,
    );

    cmd()
        .arg("check")
        .arg(config)
        .assert()
        .success()
        .stderr(contains("OK: configuration valid"));
}

#[test]
fn check_quiet_suppresses_ok() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(&temp, "empty.json", "{}");

    cmd()
        .arg("check")
        .arg(config)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn check_reports_every_error() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(
        &temp,
        "bad.json",
        r#"{
            "context": {
                "udp": { "enable_gtp": "yes" },
                "mpls": { "max_mpls_stack_depth": 300 },
                "nosuch": {}
            }
        }"#,
    );

    cmd()
        .arg("check")
        .arg(config)
        .assert()
        .code(2)
        .stderr(
            contains("enable_gtp")
                .and(contains("max_mpls_stack_depth"))
                .and(contains("nosuch"))
                .and(contains("error: 3 configuration error(s)"))
                .and(contains("hint:")),
        );
}

#[test]
fn check_rejects_context_only_module_in_wrong_scope() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(
        &temp,
        "scope.json",
        r#"{ "context": { "trace": { "decode": 1 } } }"#,
    );

    cmd()
        .arg("check")
        .arg(config)
        .assert()
        .code(2)
        .stderr(contains("trace"));
}

#[test]
fn check_missing_file_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.json");

    cmd()
        .arg("check")
        .arg(missing)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn check_malformed_json_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(&temp, "broken.json", "{ \"context\": ");

    cmd()
        .arg("check")
        .arg(config)
        .assert()
        .code(2)
        .stderr(contains("error: invalid configuration").and(contains("hint:")));
}

#[test]
fn check_rejects_non_json_extension() {
    let temp = TempDir::new().expect("tempdir");
    let config = write_config(&temp, "snort.lua", "{}");

    cmd()
        .arg("check")
        .arg(config)
        .assert()
        .code(2)
        .stderr(contains("unsupported configuration format"));
}

#[test]
fn check_glob_checks_every_match() {
    let temp = TempDir::new().expect("tempdir");
    write_config(&temp, "a.json", "{}");
    write_config(
        &temp,
        "b.json",
        r#"{ "context": { "udp": { "bogus": 1 } } }"#,
    );
    let pattern = temp.path().join("*.json");

    cmd()
        .arg("check")
        .arg(pattern)
        .assert()
        .code(2)
        .stderr(contains("b.json").and(contains("bogus")));
}

#[test]
fn check_glob_keeps_going_past_unreadable_file() {
    let temp = TempDir::new().expect("tempdir");
    write_config(&temp, "a.json", "{ \"context\": ");
    write_config(&temp, "b.json", r#"{ "context": { "mpls": { "bogus": 1 } } }"#);
    let pattern = temp.path().join("*.json");

    cmd()
        .arg("check")
        .arg(pattern)
        .assert()
        .code(2)
        .stderr(
            contains("a.json")
                .and(contains("invalid configuration"))
                .and(contains("bogus"))
                .and(contains("error: 2 configuration error(s)")),
        );
}

#[test]
fn check_glob_without_matches_shows_hint() {
    let temp = TempDir::new().expect("tempdir");
    let pattern = temp.path().join("*.json");

    cmd()
        .arg("check")
        .arg(pattern)
        .assert()
        .failure()
        .stderr(contains("no files match pattern").and(contains("hint:")));
}
