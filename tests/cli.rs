#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("roulement-cli").unwrap()
}

fn write_workspace(path: &Path, value: serde_json::Value) {
    fs::write(path, serde_json::to_vec_pretty(&value).unwrap()).unwrap();
}

fn small_team() -> serde_json::Value {
    json!({
        "employees": [
            {"id": "ana", "name": "Ana", "level": "bartender"},
            {"id": "bo", "name": "Bo", "level": "door-staff"}
        ],
        "rules": [
            {
                "id": "ana-weekend",
                "name": "Ana weekend",
                "rule_type": "ASSIGN_FIXED_OFF_DAYS",
                "params": {"dates": ["2025-03-01"], "shift": "off"}
            }
        ],
        "assignments": {"global": [], "employees": {"ana": ["ana-weekend"]}}
    })
}

#[test]
fn rules_lists_the_catalog() {
    cli()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("ASSIGN_FIXED_OFF_DAYS"))
        .stdout(predicate::str::contains("shift: choice [off|statutory-off]"))
        .stdout(predicate::str::contains("SHIFT_INTERDEPENDENCE"));
}

#[test]
fn generate_prints_table_and_writes_csv() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("workspace.json");
    let csv = dir.path().join("march.csv");
    write_workspace(&input, small_team());

    cli()
        .arg("--input")
        .arg(&input)
        .args(["generate", "--year", "2025", "--month", "3", "--seed", "7"])
        .arg("--out-csv")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("date | Ana | Bo"))
        .stdout(predicate::str::contains("2025-03-01 (Sat) | off |"))
        .stderr(predicate::str::contains("seed: 7"));

    let written = fs::read_to_string(&csv).unwrap();
    assert_eq!(written.lines().count(), 32);
    assert!(written.starts_with("date,Ana,Bo"));
}

#[test]
fn dangling_rule_is_reported_but_not_fatal() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("workspace.json");
    let mut workspace = small_team();
    workspace["assignments"]["global"] = json!(["ghost"]);
    write_workspace(&input, workspace);

    cli()
        .arg("--input")
        .arg(&input)
        .args(["generate", "--year", "2025", "--month", "3", "--seed", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn unassignable_slots_exit_with_code_two() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("workspace.json");
    let mut rules = Vec::new();
    for shift in [
        "9-17:30", "9:30-18", "10:30-18", "10:30-19", "10:30-20:30", "13-21:30", "14-22",
        "10-18:30", "off",
    ] {
        rules.push(json!({
            "id": format!("bar-{shift}"),
            "name": format!("bar {shift}"),
            "rule_type": "REQUIRED_LEVEL_FOR_SHIFT",
            "params": {"level": "bartender", "shift": shift}
        }));
    }
    let ids: Vec<_> = rules.iter().map(|r| r["id"].clone()).collect();
    write_workspace(
        &input,
        json!({
            "employees": [{"id": "bo", "name": "Bo", "level": "door-staff"}],
            "rules": rules,
            "assignments": {"global": ids, "employees": {}}
        }),
    );

    cli()
        .arg("--input")
        .arg(&input)
        .args(["generate", "--year", "2025", "--month", "4", "--seed", "1"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("UNASSIGNED"))
        .stderr(predicate::str::contains("unassigned: Bo on 2025-04-01"));
}

#[test]
fn describe_renders_workspace_rules() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("workspace.json");
    write_workspace(&input, small_team());

    cli()
        .arg("--input")
        .arg(&input)
        .arg("describe")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ana-weekend | 【Ana weekend】 off on 2025-03-01 (off)",
        ));
}

#[test]
fn import_employees_creates_workspace() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("workspace.json");
    let csv = dir.path().join("staff.csv");
    fs::write(&csv, "name,level,id\nAna,bartender,ana\nBo,door-staff,\n").unwrap();

    cli()
        .arg("--input")
        .arg(&input)
        .arg("import-employees")
        .arg("--csv")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("imported 2 employee(s)"));

    let saved: serde_json::Value = serde_json::from_slice(&fs::read(&input).unwrap()).unwrap();
    let employees = saved["employees"].as_array().unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0]["id"], "ana");
    assert_eq!(employees[1]["level"], "door-staff");
}

#[test]
fn invalid_month_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("workspace.json");
    write_workspace(&input, small_team());

    cli()
        .arg("--input")
        .arg(&input)
        .args(["generate", "--year", "2025", "--month", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid month: 2025-13"));
}

#[test]
fn shifts_lists_the_catalog_with_durations() {
    cli()
        .arg("shifts")
        .assert()
        .success()
        .stdout(predicate::str::contains("9-17:30: 09:00-17:30 (510 min)"))
        .stdout(predicate::str::contains("statutory-off: rest"));
}
