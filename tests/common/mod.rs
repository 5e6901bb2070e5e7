#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use fin_note_core::{
    config::{Config, ConfigManager},
    core::AnalyzerSession,
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_root() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates a session and config manager backed by a unique directory.
pub fn setup_test_env() -> (AnalyzerSession, ConfigManager, PathBuf) {
    let base = temp_root();
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    let session = AnalyzerSession::with_storage(Config::default(), Box::new(storage));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (session, config_manager, base)
}

pub fn tinkoff_rows() -> Vec<Value> {
    vec![
        json!({
            "Дата операции": "05.03.2024 08:30:00",
            "Номер карты": "*1111",
            "Статус": "OK",
            "Сумма операции": "-1 250,50",
            "Категория": "Супермаркеты",
            "MCC": "5411",
            "Описание": "Пятёрочка",
            "Кэшбэк": 12.5
        }),
        json!({
            "Дата операции": "",
            "Дата платежа": "06.03.2024",
            "Номер карты": "*1111",
            "Статус": "OK",
            "Сумма операции": -300,
            "Категория": "Такси",
            "Описание": "Yandex Go"
        }),
        json!({
            "Дата операции": "07.03.2024 21:05:00",
            "Номер карты": "*2222",
            "Статус": "OK",
            "Сумма операции": 15000,
            "Категория": "Пополнения",
            "Описание": "Зарплата"
        }),
        json!({
            "Дата операции": "08.03.2024 10:00:00",
            "Номер карты": "*1111",
            "Статус": "OK",
            "Сумма операции": -4200,
            "Категория": "Супермаркеты",
            "Описание": "Ашан",
            "Кэшбэк": 42
        }),
    ]
}

pub fn sberbank_rows() -> Vec<Value> {
    vec![
        json!({
            "Номер": 1,
            "Дата": "10.03.2024",
            "Тип операции": "Расходы",
            "Категория": "Рестораны",
            "Сумма": 980,
            "Валюта": "RUB",
            "Описание": "Кофейня",
            "Состояние": "Исполнена",
            "Номер счета/карты списания": "40817810"
        }),
        json!({
            "Номер": 2,
            "Дата": 45_362.75,
            "Тип операции": "Доходы",
            "Категория": "Переводы",
            "Сумма": "5 000,00 ₽",
            "Валюта": "RUB",
            "Описание": "Возврат долга",
            "Состояние": "Исполнена",
            "Номер счета/карты списания": "40817810"
        }),
    ]
}
