use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::Path;

mod common;
use common::{autotx, setup_test_db, temp_script};

#[test]
fn test_exec_script_and_select_as_table() {
    let db_path = setup_test_db("cli_exec_table");
    let script = temp_script(
        "cli_exec_table",
        &[
            "-- schema",
            "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)",
            "",
            "INSERT INTO people (name) VALUES ('alice')",
            "INSERT INTO people (name) VALUES ('bob')",
            "SELECT id, name FROM people ORDER BY id",
        ],
    );

    autotx()
        .args(["--db", &db_path, "exec", &script])
        .assert()
        .success()
        .stdout(contains("name"))
        .stdout(contains("alice"))
        .stdout(contains("bob"));
}

#[test]
fn test_exec_persists_writes_after_exit() {
    let db_path = setup_test_db("cli_exec_persist");

    autotx()
        .args(["--db", &db_path, "exec"])
        .write_stdin(
            "CREATE TABLE t (v INTEGER)\nINSERT INTO t VALUES (1)\nINSERT INTO t VALUES (2)\n",
        )
        .assert()
        .success();

    autotx()
        .args(["--db", &db_path, "exec", "--format", "csv", "-"])
        .write_stdin("SELECT count(*) AS n FROM t\n")
        .assert()
        .success()
        .stdout(contains("n\n2"));
}

#[test]
fn test_exec_json_output() {
    let db_path = setup_test_db("cli_exec_json");

    autotx()
        .args(["--db", &db_path, "exec", "--format", "json"])
        .write_stdin("CREATE TABLE t (v TEXT)\nINSERT INTO t VALUES ('x')\nSELECT v FROM t\n")
        .assert()
        .success()
        .stdout(contains("\"v\": \"x\""));
}

#[test]
fn test_exec_stats() {
    let db_path = setup_test_db("cli_exec_stats");

    autotx()
        .args(["--db", &db_path, "exec", "--stats"])
        .write_stdin("CREATE TABLE t (v INTEGER)\nINSERT INTO t VALUES (1)\nSELECT * FROM t\n")
        .assert()
        .success()
        .stdout(contains("writes:                 2"))
        .stdout(contains("committing transaction with 2 queries"));
}

#[test]
fn test_exec_no_transactions_never_logs_commit() {
    let db_path = setup_test_db("cli_exec_no_tx");

    autotx()
        .args(["--db", &db_path, "--no-transactions", "exec"])
        .write_stdin("CREATE TABLE t (v INTEGER)\nINSERT INTO t VALUES (1)\n")
        .assert()
        .success()
        .stdout(contains("committing transaction").not());
}

#[test]
fn test_exec_sql_error_fails() {
    let db_path = setup_test_db("cli_exec_error");

    autotx()
        .args(["--db", &db_path, "exec"])
        .write_stdin("INSERT INTO nowhere VALUES (1)\n")
        .assert()
        .failure()
        .stderr(contains("Database error"));
}

#[test]
fn test_exec_without_database_fails() {
    autotx()
        .args(["exec"])
        .write_stdin("SELECT 1\n")
        .assert()
        .failure()
        .stderr(contains("No database name provided"));
}

#[test]
fn test_encrypted_without_password_fails() {
    let db_path = setup_test_db("cli_encrypted_no_pw");

    autotx()
        .args(["--db", &db_path, "--encrypted", "exec"])
        .write_stdin("SELECT 1\n")
        .assert()
        .failure()
        .stderr(contains("Password not provided for encrypted database"));
}

#[test]
fn test_remove_deletes_database() {
    let db_path = setup_test_db("cli_remove");

    autotx()
        .args(["--db", &db_path, "exec"])
        .write_stdin("CREATE TABLE t (v INTEGER)\n")
        .assert()
        .success();
    assert!(Path::new(&db_path).exists());

    autotx()
        .args(["--db", &db_path, "remove"])
        .assert()
        .success()
        .stdout(contains("has been removed"));
    assert!(!Path::new(&db_path).exists());
}

#[test]
fn test_config_file_and_overrides() {
    let db_path = setup_test_db("cli_config");
    let mut cfg_path = std::env::temp_dir();
    cfg_path.push("cli_config_autotx.yaml");
    fs::write(
        &cfg_path,
        format!(
            "database_name: {}\nautocommit_delay_ms: 250\npassword: secret\n",
            db_path
        ),
    )
    .unwrap();
    let cfg = cfg_path.to_string_lossy().to_string();

    autotx()
        .args(["--config", &cfg, "--no-transactions", "config"])
        .assert()
        .success()
        .stdout(contains("autocommit_delay_ms: 250"))
        .stdout(contains("no_transactions: true"))
        .stdout(contains("secret").not());
}

#[test]
fn test_exec_stats_as_json() {
    let db_path = setup_test_db("cli_exec_stats_json");

    autotx()
        .args(["--db", &db_path, "exec", "--stats", "--format", "json"])
        .write_stdin("CREATE TABLE t (v INTEGER)\nINSERT INTO t VALUES (1)\n")
        .assert()
        .success()
        .stdout(contains("\"writes\": 2"))
        .stdout(contains("\"transactions_committed\": 1"))
        .stdout(contains("\"statements_committed\": 2"));
}

#[test]
fn test_exec_user_commit_reports_flush_error_and_keeps_data() {
    let db_path = setup_test_db("cli_exec_user_commit");

    autotx()
        .args(["--db", &db_path, "--delay-ms", "60000", "exec"])
        .write_stdin("CREATE TABLE t (v INTEGER)\nINSERT INTO t VALUES (1)\nCOMMIT\n")
        .assert()
        .failure()
        .stderr(contains("no transaction is active"));

    autotx()
        .args(["--db", &db_path, "exec", "--format", "csv"])
        .write_stdin("SELECT count(*) AS n FROM t\n")
        .assert()
        .success()
        .stdout(contains("n\n1"));
}
