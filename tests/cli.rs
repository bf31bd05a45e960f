use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const BIN_NAME: &str = "spendcast";

fn spendcast(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("SPENDCAST_DATA_DIR", data_dir.path())
        .env_remove("SPENDCAST_USER")
        .env_remove("RUST_LOG");
    cmd
}

fn add(data_dir: &TempDir, user: &str, args: &[&str]) -> String {
    let output = spendcast(data_dir)
        .args(["--user", user, "transaction", "add"])
        .args(args)
        .output()
        .expect("command runs");
    assert!(output.status.success(), "add failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix("ID:"))
        .map(|id| id.trim().to_string())
        .expect("created transaction prints its ID")
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    spendcast(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("transaction").and(contains("report")));
}

#[test]
fn commands_need_a_user() {
    let dir = TempDir::new().unwrap();
    spendcast(&dir)
        .args(["transaction", "list"])
        .assert()
        .failure()
        .stderr(contains("No user selected"));
}

#[test]
fn invalid_user_is_rejected() {
    let dir = TempDir::new().unwrap();
    spendcast(&dir)
        .args(["--user", "../etc", "transaction", "list"])
        .assert()
        .failure()
        .stderr(contains("User ID"));
}

#[test]
fn forecast_from_two_months_of_rent() {
    let dir = TempDir::new().unwrap();
    add(&dir, "alice", &["100", "-c", "Rent", "-d", "2024-01-05"]);
    add(&dir, "alice", &["100", "-c", "Rent", "-d", "2024-02-04"]);

    spendcast(&dir)
        .args(["--user", "alice", "report", "forecast"])
        .assert()
        .success()
        .stdout(
            contains("Forecast for March 2024: $100.00")
                .and(contains("y = 0.00x + 100.00"))
                .and(contains("100.0%")),
        );
}

#[test]
fn category_report_ignores_income() {
    let dir = TempDir::new().unwrap();
    add(&dir, "alice", &["1000", "--type", "income", "-c", "Salary", "-d", "2024-01-01"]);
    add(&dir, "alice", &["50", "-d", "2024-01-02"]);

    spendcast(&dir)
        .args(["--user", "alice", "report", "categories"])
        .assert()
        .success()
        .stdout(contains("Other").and(contains("$50.00")).and(contains("Salary").not()));
}

#[test]
fn single_transaction_is_not_enough_for_analysis() {
    let dir = TempDir::new().unwrap();
    add(&dir, "alice", &["42", "-c", "Groceries", "-d", "2024-05-10"]);

    spendcast(&dir)
        .args(["--user", "alice", "report", "forecast"])
        .assert()
        .success()
        .stdout(contains(
            "At least 2 months of transaction data are required for forecasting.",
        ));

    spendcast(&dir)
        .args(["--user", "alice", "report", "recurring"])
        .assert()
        .success()
        .stdout(contains(
            "At least 6 transactions are required for recurring transaction analysis.",
        ));
}

#[test]
fn users_do_not_share_transactions() {
    let dir = TempDir::new().unwrap();
    add(&dir, "alice", &["10", "-c", "Transport", "-d", "2024-01-01"]);

    spendcast(&dir)
        .args(["--user", "bob", "transaction", "list"])
        .assert()
        .success()
        .stdout(contains("No transactions found."));
    assert!(dir.path().join("data").join("transactions_alice.json").exists());
}

#[test]
fn edit_and_delete_by_id_prefix() {
    let dir = TempDir::new().unwrap();
    let id = add(&dir, "alice", &["10", "-c", "Transport", "-d", "2024-01-01"]);
    let prefix = &id[..8];

    spendcast(&dir)
        .args(["--user", "alice", "transaction", "edit", prefix, "-a", "12.50"])
        .assert()
        .success()
        .stdout(contains("$12.50"));

    spendcast(&dir)
        .args(["--user", "alice", "transaction", "delete", prefix])
        .assert()
        .success()
        .stdout(contains("Use --force"));

    spendcast(&dir)
        .args(["--user", "alice", "transaction", "delete", prefix, "--force"])
        .assert()
        .success()
        .stdout(contains("Deleted transaction"));

    spendcast(&dir)
        .args(["--user", "alice", "transaction", "show", prefix])
        .assert()
        .failure()
        .stderr(contains("Transaction not found"));
}

#[test]
fn rejects_invalid_amount() {
    let dir = TempDir::new().unwrap();
    spendcast(&dir)
        .args(["--user", "alice", "transaction", "add", "twelve", "-d", "2024-01-01"])
        .assert()
        .failure()
        .stderr(contains("Validation error"));
}

#[test]
fn import_csv_then_detect_recurring() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("bank.csv");
    std::fs::write(
        &csv_path,
        "date,amount,type,category,description\n\
         2024-01-01,1200,expense,Rent,January\n\
         2024-02-02,1200,expense,Rent,February\n\
         2024-03-01,1200,expense,Rent,March\n\
         2024-01-03,50,expense,Groceries,\n\
         2024-01-29,50,expense,Groceries,\n\
         2024-01-15,20,expense,Transport,\n\
         garbage,5,expense,Other,\n",
    )
    .unwrap();

    spendcast(&dir)
        .args(["--user", "alice", "import"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(contains("Imported:  6").and(contains("line 8")));

    spendcast(&dir)
        .args(["--user", "alice", "report", "recurring"])
        .assert()
        .success()
        .stdout(contains("[Recurring] Rent").and(contains("[Similar] Groceries")));
}

#[test]
fn report_exports_csv() {
    let dir = TempDir::new().unwrap();
    add(&dir, "alice", &["30", "-c", "groceries", "-d", "2024-01-01"]);
    let out = dir.path().join("categories.csv");

    spendcast(&dir)
        .args(["--user", "alice", "report", "categories", "--output"])
        .arg(&out)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("Category,Amount,Percentage"));
    assert!(csv.contains("Groceries,30.00,100.00"));
}

#[test]
fn default_user_from_config() {
    let dir = TempDir::new().unwrap();
    spendcast(&dir)
        .args(["config", "--default-user", "carol"])
        .assert()
        .success()
        .stdout(contains("Default user set to 'carol'"));

    spendcast(&dir)
        .args(["transaction", "add", "5", "-d", "2024-01-01"])
        .assert()
        .success();
    assert!(dir.path().join("data").join("transactions_carol.json").exists());
}

#[test]
fn currency_symbol_from_settings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"currency_symbol": "€"}"#,
    )
    .unwrap();

    let id = add(&dir, "erin", &["50", "-c", "Groceries", "-d", "2024-01-02"]);

    spendcast(&dir)
        .args(["--user", "erin", "report", "categories"])
        .assert()
        .success()
        .stdout(contains("€50.00").and(contains("$").not()));

    spendcast(&dir)
        .args(["--user", "erin", "transaction", "show", &id])
        .assert()
        .success()
        .stdout(contains("Amount:      €50.00"));
}

#[test]
fn dirty_records_still_report() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("transactions_dave.json"),
        r#"{"transactions": [
            {"id": "a", "amount": null, "type": "expense", "category": "Rent", "date": "2024-01-01"},
            {"id": "b", "amount": 40, "type": "transfer", "category": "Transport", "date": "2024-01-03"}
        ]}"#,
    )
    .unwrap();

    spendcast(&dir)
        .args(["--user", "dave", "report", "categories"])
        .assert()
        .success()
        .stdout(contains("Transport").and(contains("$40.00")));
}
