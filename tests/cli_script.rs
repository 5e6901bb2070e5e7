use assert_cmd::Command;
use predicates::str::contains;
use serde_json::json;
use tempfile::TempDir;

fn write_rows(dir: &TempDir) -> String {
    let rows = json!([
        {"Дата операции": "01.03.2024 09:15:00", "Сумма операции": -500, "Категория": "Groceries", "Описание": "Market"},
        {"Дата операции": "02.03.2024 19:40:00", "Сумма операции": -1000, "Категория": "Groceries", "Описание": "Bistro"}
    ]);
    let path = dir.path().join("rows.json");
    std::fs::write(&path, rows.to_string()).unwrap();
    path.display().to_string()
}

#[test]
fn script_mode_runs_transfer_flow() {
    let tmp = TempDir::new().unwrap();
    let rows = write_rows(&tmp);
    let export = tmp.path().join("out.json");
    let input = format!(
        "ingest tinkoff \"{}\"\nopen Groceries\nselect 2\ntransfer Dining\nexport \"{}\"\nexit\n",
        rows,
        export.display()
    );

    let mut cmd = Command::cargo_bin("fin_note_cli").unwrap();
    cmd.env("FIN_NOTE_CLI_SCRIPT", "1")
        .env("FIN_NOTE_HOME", tmp.path().join("home"))
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Ingested 2 transaction(s)"))
        .stdout(contains("Moved 1 transaction(s)"))
        .stdout(contains("Category `Dining` was created."));

    let json = std::fs::read_to_string(&export).unwrap();
    assert!(json.contains("\"Dining\""));
    assert!(json.contains("Bistro"));
}

#[test]
fn script_mode_reports_errors_and_keeps_going() {
    let tmp = TempDir::new().unwrap();
    let input = "stats\ntrnasfer Dining\nversion\nexit\n";

    let mut cmd = Command::cargo_bin("fin_note_cli").unwrap();
    cmd.env("FIN_NOTE_CLI_SCRIPT", "1")
        .env("FIN_NOTE_HOME", tmp.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("ingest tinkoff rows.json"))
        .stdout(contains("Did you mean `transfer`?"))
        .stdout(contains("fin_note 0.1.0"));
}
