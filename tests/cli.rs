#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn seed(dir: &Path) {
    fs::write(
        dir.join("ress-ens.json"),
        r#"[{"name": "Dupont", "subjects": "Math"}]"#,
    )
    .unwrap();
    fs::write(dir.join("ress-group.json"), r#"[{"name": "G1"}]"#).unwrap();
    fs::write(dir.join("ress-salle.json"), r#"[{"name": "R1"}]"#).unwrap();
    fs::write(
        dir.join("constraints.json"),
        r#"[{"resource": "Dupont", "day": "lundi", "time": "08:00-10:00", "type": "Indisponible"}]"#,
    )
    .unwrap();
}

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("emploi-cli").unwrap();
    cmd.arg("--data-dir").arg(dir);
    cmd
}

#[test]
fn generate_prints_and_saves_timetable() {
    let dir = tempdir().unwrap();
    seed(dir.path());

    let output = cli(dir.path())
        .args(["generate", "--date", "2024-01-01"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["date"], "2024-01-01");
    assert_eq!(value["timetable"][0]["time"], "08:00-10:00");
    assert_eq!(value["timetable"][0]["lundi"], "-");
    assert_eq!(value["timetable"][0]["mardi"], "Math (Dupont, G1, R1)");
    assert!(dir
        .path()
        .join("emploit/timetable_2024-01-01.json")
        .is_file());

    cli(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("timetable_2024-01-01.json"));
}

#[test]
fn insufficient_data_is_a_client_error() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["generate", "--date", "2024-01-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            r#"{"error":"insufficient data to generate a timetable"}"#,
        ));
}

#[test]
fn export_show_and_clear() {
    let dir = tempdir().unwrap();
    let rows = dir.path().join("rows.json");
    fs::write(&rows, r#"[{"time": "08:00-10:00", "lundi": "Sport (A, B, C)"}]"#).unwrap();

    cli(dir.path())
        .args(["export", "--date", "2024-02-05", "--file"])
        .arg(&rows)
        .assert()
        .success();

    cli(dir.path())
        .args(["show", "timetable_2024-02-05.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sport (A, B, C)"));

    cli(dir.path())
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\": 1"));

    cli(dir.path())
        .args(["show", "timetable_2024-02-05.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn generate_can_write_a_json_copy() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    let copy = dir.path().join("copie.json");

    cli(dir.path())
        .args(["generate", "--date", "2024-01-01", "--json-out"])
        .arg(&copy)
        .assert()
        .success();

    let copied: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&copy).unwrap()).unwrap();
    let stored: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("emploit/timetable_2024-01-01.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(copied, stored);
    assert_eq!(copied["timetable"][0]["mardi"], "Math (Dupont, G1, R1)");
}

#[test]
fn csv_command_renders_stored_timetable() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    let out = dir.path().join("grille.csv");
    let saved = dir.path().join("emploit/timetable_2024-01-01.json");

    cli(dir.path())
        .args(["csv", "--date", "2024-01-01", "--out"])
        .arg(&out)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
    assert!(!out.exists());
    assert!(!saved.exists());

    cli(dir.path())
        .args(["--seed", "3", "generate", "--date", "2024-01-01"])
        .assert()
        .success();
    let before = fs::read_to_string(&saved).unwrap();

    cli(dir.path())
        .args(["csv", "--date", "2024-01-01", "--out"])
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&saved).unwrap(), before);
    let text = fs::read_to_string(out).unwrap();
    assert!(text.starts_with("time,lundi,mardi,mercredi,jeudi,vendredi\n08:00-10:00,-,"));
    assert!(text.contains("Math (Dupont, G1, R1)"));
    assert_eq!(text.lines().count(), 5);
}
