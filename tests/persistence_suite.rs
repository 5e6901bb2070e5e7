mod common;

use std::fs;

use chrono::NaiveDate;
use common::{setup_test_env, temp_root, tinkoff_rows};
use fin_note_core::{
    config::{Config, ConfigManager},
    core::{services::ServiceError, AnalyzerSession},
    errors::LedgerError,
    storage::{codec, export_file_name},
};
use serde_json::json;

#[test]
fn save_and_load_named_snapshot() {
    let (mut session, _config, base) = setup_test_env();
    session.ingest("tinkoff", tinkoff_rows()).unwrap();
    let path = session.save("March 2024").unwrap();
    assert_eq!(path, base.join("snapshots").join("march_2024.json"));
    assert_eq!(session.current_name(), Some("March 2024"));

    let expected = session.categories().clone();
    session.reset();
    assert!(session.categories().is_empty());

    assert_eq!(session.load("March 2024").unwrap(), 4);
    assert_eq!(session.categories(), &expected);
    assert_eq!(session.active_category(), None);
}

#[test]
fn overwriting_a_snapshot_keeps_a_backup_to_restore() {
    let (mut session, _config, _base) = setup_test_env();
    session.ingest("tinkoff", tinkoff_rows()).unwrap();
    session.save("march").unwrap();
    let original = session.categories().clone();

    session.add_category("Savings").unwrap();
    session.save("march").unwrap();
    session.backup(Some("after savings")).unwrap();

    let backups = session.list_backups().unwrap();
    assert_eq!(backups.len(), 2);
    assert!(backups.iter().all(|name| name.starts_with("march_")));
    let noted = backups
        .iter()
        .find(|name| name.ends_with("_after-savings.json"))
        .expect("noted backup");
    let previous = backups.iter().find(|name| *name != noted).unwrap().clone();

    assert_eq!(session.restore(&previous).unwrap(), 4);
    assert_eq!(session.categories(), &original);
    session.reset();
    session.load("march").unwrap();
    assert!(!session.categories().contains("Savings"));
}

#[test]
fn backups_are_pruned_to_retention() {
    let (mut session, _config, _base) = setup_test_env();
    session.ingest("tinkoff", tinkoff_rows()).unwrap();
    session.save("pruned").unwrap();
    for note in ["one", "two", "three", "four", "five"] {
        session.backup(Some(note)).unwrap();
    }
    assert_eq!(session.list_backups().unwrap().len(), 3);
}

#[test]
fn backup_requires_a_named_snapshot() {
    let (mut session, _config, _base) = setup_test_env();
    session.ingest("tinkoff", tinkoff_rows()).unwrap();
    assert!(matches!(
        session.backup(None),
        Err(LedgerError::StorageError(_))
    ));
    assert!(matches!(
        session.restore("missing.json"),
        Err(ServiceError::Ledger(LedgerError::StorageError(_)))
    ));
}

#[test]
fn export_and_import_through_a_file() {
    let (mut session, _config, base) = setup_test_env();
    session.ingest("tinkoff", tinkoff_rows()).unwrap();
    let path = base.join("exports").join(export_file_name(
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    ));
    session.export_to_path(&path).unwrap();
    assert!(path.ends_with("Выписка от 31.03.24.json"));

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw["categories"]["Супермаркеты"].is_object());

    let mut fresh = AnalyzerSession::new(Config::default());
    let (mut other, _, _) = setup_test_env();
    assert!(fresh.import_from_path(&path).is_err());
    assert_eq!(other.import_from_path(&path).unwrap(), 4);
    assert_eq!(other.categories(), session.categories());
}

#[test]
fn failed_import_keeps_current_state() {
    let (mut session, _config, base) = setup_test_env();
    session.ingest("tinkoff", tinkoff_rows()).unwrap();
    session.open_category("Такси").unwrap();
    session.toggle_all();

    let broken = base.join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(session.import_from_path(&broken).is_err());

    let inconsistent = base.join("inconsistent.json");
    let bad = json!({
        "categories": {
            "Food": {"transactions": [{"amount": -10.0}], "total": -99.0, "totalCashback": 0.0}
        }
    });
    fs::write(&inconsistent, bad.to_string()).unwrap();
    assert!(session.import_from_path(&inconsistent).is_err());

    assert_eq!(session.categories().transaction_count(), 4);
    assert_eq!(session.active_category(), Some("Такси"));
    assert_eq!(session.selection().len(), 1);
}

#[test]
fn failed_export_leaves_target_untouched() {
    let (mut session, _config, base) = setup_test_env();
    session.ingest("tinkoff", tinkoff_rows()).unwrap();

    let occupied = base.join("occupied");
    fs::create_dir_all(occupied.join("inner")).unwrap();
    assert!(session.export_to_path(&occupied).is_err());
    assert!(occupied.join("inner").is_dir());
}

#[test]
fn snapshot_codec_rejects_duplicate_ids() {
    let (mut session, _config, _base) = setup_test_env();
    session.ingest("tinkoff", tinkoff_rows()).unwrap();
    let mut value = session.export_snapshot().unwrap();
    let groceries = value["categories"]["Супермаркеты"]["transactions"]
        .as_array()
        .unwrap()
        .clone();
    let id = groceries[0]["id"].clone();
    value["categories"]["Такси"]["transactions"][0]["id"] = id;
    assert!(codec::deserialize(value).is_err());
}

#[test]
fn config_backups_restore_previous_settings() {
    let base = temp_root();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    let mut config = manager.load().unwrap();
    assert_eq!(config, Config::default());

    let backup = manager.backup(&config, Some("before currency")).unwrap();
    config.currency = "USD".into();
    manager.save(&config).unwrap();
    assert_eq!(manager.load().unwrap().currency, "USD");

    let restored = manager.restore(&backup).unwrap();
    assert_eq!(restored.currency, "RUB");
    assert_eq!(manager.load().unwrap(), restored);
    assert_eq!(manager.list_backups().unwrap(), vec![backup]);
}
