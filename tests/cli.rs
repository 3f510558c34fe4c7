#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/manufacturing.json");

fn cli(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("skiftplan-cli").unwrap();
    cmd.arg("--store").arg(store);
    cmd
}

fn seeded(store: &Path) {
    cli(store)
        .args(["create", "--file", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("created Manufacturing"));
}

#[test]
fn create_list_and_duplicate() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("schedules.json");
    seeded(&store);

    cli(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Manufacturing | 3 shift(s) | 3 team(s) | 0 non-working period(s)",
        ));

    cli(&store)
        .args(["create", "--file", FIXTURE])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn missing_schedule_exits_with_not_found() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("schedules.json");
    cli(&store)
        .args(["show", "--name", "Nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn shifts_for_date_with_csv_export() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("schedules.json");
    let csv = dir.path().join("monday.csv");
    seeded(&store);

    cli(&store)
        .args(["shifts", "--name", "Manufacturing", "--date", "2024-01-01", "--out-csv"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"teamName\": \"C\""))
        .stdout(predicate::str::contains("\"endTime\": \"2024-01-02T07:00:00\""));

    let text = fs::read_to_string(&csv).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.starts_with("team,shift,start,end\n"));
}

#[test]
fn working_time_over_a_covered_day() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("schedules.json");
    seeded(&store);

    cli(&store)
        .args([
            "working-time",
            "--name",
            "Manufacturing",
            "--from",
            "2024-01-02T00:00",
            "--to",
            "2024-01-03T00:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"workingTime\": \"PT24H\""))
        .stdout(predicate::str::contains("\"nonWorkingTime\": \"PT0H\""));

    cli(&store)
        .args([
            "working-time",
            "--name",
            "Manufacturing",
            "--team",
            "A",
            "--exclude-breaks",
            "--from",
            "2024-01-02T00:00",
            "--to",
            "2024-01-03T00:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"workingTime\": \"PT7H30M\""));
}

#[test]
fn reversed_range_fails() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("schedules.json");
    seeded(&store);

    cli(&store)
        .args([
            "working-time",
            "--name",
            "Manufacturing",
            "--from",
            "2024-01-03T00:00",
            "--to",
            "2024-01-02T00:00",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid range"));
}

#[test]
fn holidays_print_and_merge_once() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("schedules.json");

    cli(&store)
        .args(["holidays", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Midsommarafton"))
        .stdout(predicate::str::contains("\"startDateTime\": \"2024-06-21T00:00:00\""));

    seeded(&store);
    for _ in 0..2 {
        cli(&store)
            .args(["holidays", "--name", "Manufacturing", "--year", "2024"])
            .assert()
            .success();
    }
    cli(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("17 non-working period(s)"));
}

#[test]
fn import_periods_and_render_roster() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("schedules.json");
    let periods = dir.path().join("periods.csv");
    let roster = dir.path().join("roster.txt");
    fs::write(&periods, "name,start,end,description\nRevision,2024-01-03,2024-01-03,Yearly stop\n")
        .unwrap();
    seeded(&store);

    cli(&store)
        .args(["import-periods", "--name", "Manufacturing", "--csv"])
        .arg(&periods)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 non-working period(s)"));

    cli(&store)
        .args([
            "roster",
            "--name",
            "Manufacturing",
            "--start",
            "2024-01-03",
            "--end",
            "2024-01-03",
            "--out",
        ])
        .arg(&roster)
        .assert()
        .success();

    let text = fs::read_to_string(&roster).unwrap();
    assert!(text.starts_with("2024-01-03 Wed\n  closed: Revision (Yearly stop)\n"));
    assert!(text.contains("  C: Night 23:00-07:00 (+1)\n"));
}

#[test]
fn stats_and_delete() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("schedules.json");
    seeded(&store);

    cli(&store)
        .args(["stats", "--name", "Manufacturing", "--team", "B"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hoursPerWeek\": \"PT40H\""));

    cli(&store)
        .args(["delete", "--name", "Manufacturing"])
        .assert()
        .success();
    cli(&store)
        .args(["delete", "--name", "Manufacturing"])
        .assert()
        .code(3);
}
