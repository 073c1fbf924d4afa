//! CLI integration tests.

mod harness;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use harness::temp_db::TempDb;
use orderdesk::testkit::db::{seed_customer, seed_order, seed_restaurant};
use predicates::prelude::*;

fn orderdesk() -> Command {
    let mut cmd = cargo_bin_cmd!("orderdesk");
    cmd.env_remove("ORDERDESK_DATABASE").env("RUST_LOG", "warn");
    cmd
}

#[test]
fn help_lists_commands() {
    orderdesk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn version_names_the_binary() {
    orderdesk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("orderdesk"));
}

#[test]
fn migrate_creates_schema() {
    let db = TempDb::create("cli-migrate");
    orderdesk()
        .env("ORDERDESK_DATABASE", db.path())
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn report_prints_json() {
    let db = TempDb::create("cli-report");
    {
        let mut conn = db.conn();
        seed_restaurant(&mut conn, 1, "Grill");
        seed_customer(&mut conn, 10, "north", "active", 0);
        seed_order(&mut conn, 10, 1, 40, "2024-02-14 19:00:00");
    }

    orderdesk()
        .env("ORDERDESK_DATABASE", db.path())
        .args([
            "report",
            "quarter-income",
            "--restaurant",
            "1",
            "--quarter",
            "Q1/2024",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"provenance\": \"computed\""))
        .stdout(predicate::str::contains("\"total_income\": 40"));

    orderdesk()
        .env("ORDERDESK_DATABASE", db.path())
        .args([
            "report",
            "quarter-income",
            "--restaurant",
            "1",
            "--quarter",
            "Q1/2024",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"provenance\": \"cached\""));
}

#[test]
fn malformed_month_exits_nonzero() {
    let db = TempDb::create("cli-bad-month");
    orderdesk()
        .env("ORDERDESK_DATABASE", db.path())
        .args(["report", "performance", "--district", "north", "--month", "2024-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2024-03"));
}

#[test]
fn invalid_config_exits_nonzero() {
    let path = harness::temp_db::temp_path("cli-config", "toml");
    std::fs::write(&path, "[database]\npool_size = 0\n").unwrap();

    let assert = orderdesk()
        .args(["migrate", "--config"])
        .arg(&path)
        .assert();
    let _ = std::fs::remove_file(&path);
    assert
        .failure()
        .stderr(predicate::str::contains("database.pool_size"));
}
