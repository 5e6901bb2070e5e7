mod common;

use common::{setup_test_env, tinkoff_rows};
use fin_note_core::{
    config::Config,
    core::{
        services::{ServiceError, SortDirection, SortKey},
        AnalyzerSession,
    },
    ledger::{StatementDate, Transaction},
};
use serde_json::json;

fn grocery_rows() -> Vec<serde_json::Value> {
    vec![
        json!({"Дата операции": "01.03.2024 09:15:00", "Сумма операции": -500, "Категория": "Groceries", "Описание": "Market", "Кэшбэк": 10}),
        json!({"Дата операции": "02.03.2024 19:40:00", "Сумма операции": -1000, "Категория": "Groceries", "Описание": "Bistro", "Кэшбэк": 20}),
        json!({"Дата операции": "04.03.2024 08:00:00", "Сумма операции": -250, "Категория": "Transport", "Описание": "Metro"}),
    ]
}

fn session_with(rows: Vec<serde_json::Value>) -> AnalyzerSession {
    let mut session = AnalyzerSession::new(Config::default());
    session.ingest("tinkoff", rows).expect("ingest rows");
    session
}

fn grand_total(session: &AnalyzerSession) -> (f64, f64, usize) {
    session.categories().iter().fold((0.0, 0.0, 0), |(a, c, n), (_, bucket)| {
        (a + bucket.total(), c + bucket.total_cashback(), n + bucket.len())
    })
}

#[test]
fn moving_dinner_out_of_groceries() {
    let mut session = session_with(grocery_rows());
    session.open_category("Groceries").unwrap();
    let bistro = session
        .visible_transactions()
        .into_iter()
        .find(|txn| txn.description == "Bistro")
        .map(|txn| txn.id)
        .unwrap();
    assert_eq!(session.toggle_transaction(bistro), Some(true));

    let report = session.transfer_selected("Dining").unwrap();
    assert_eq!(report.moved, 1);
    assert!(report.target_created);
    assert!(!report.source_removed);

    let groceries = session.categories().get("Groceries").unwrap();
    let dining = session.categories().get("Dining").unwrap();
    assert_eq!(groceries.total(), -500.0);
    assert_eq!(groceries.total_cashback(), 10.0);
    assert_eq!(dining.total(), -1000.0);
    assert_eq!(dining.total_cashback(), 20.0);
    assert_eq!(dining.transactions()[0].id, bistro);
    assert!(session.selection().is_empty());
    assert!(session.warnings().is_empty());
}

#[test]
fn transfers_conserve_totals_and_counts() {
    let mut session = session_with(tinkoff_rows());
    let before = grand_total(&session);

    session.open_category("Супермаркеты").unwrap();
    session.toggle_row(0).unwrap();
    session.transfer_selected("Такси").unwrap();
    session.open_category("Такси").unwrap();
    session.toggle_all();
    session.transfer_selected("Разное").unwrap();

    let after = grand_total(&session);
    assert!((before.0 - after.0).abs() < 1e-9);
    assert!((before.1 - after.1).abs() < 1e-9);
    assert_eq!(before.2, after.2);
    assert!(session.warnings().is_empty());
}

#[test]
fn draining_a_category_removes_it_and_closes_the_view() {
    let mut session = session_with(grocery_rows());
    session.open_category("Transport").unwrap();
    assert_eq!(session.toggle_all(), 1);

    let report = session.transfer_selected("Groceries").unwrap();
    assert!(report.source_removed);
    assert!(!report.target_created);
    assert!(!session.categories().contains("Transport"));
    assert_eq!(session.active_category(), None);
    assert_eq!(session.categories().get("Groceries").unwrap().len(), 3);
}

#[test]
fn rejected_transfers_change_nothing() {
    let mut session = session_with(grocery_rows());
    session.open_category("Groceries").unwrap();
    let snapshot = session.categories().clone();

    let err = session.transfer_selected("Dining").unwrap_err();
    assert!(matches!(err, ServiceError::EmptySelection { .. }));

    session.toggle_all();
    let err = session.transfer_selected(" Groceries ").unwrap_err();
    assert!(matches!(err, ServiceError::SelfTransfer(_)));
    let err = session.transfer_selected("   ").unwrap_err();
    assert!(matches!(err, ServiceError::EmptyCategoryName));

    assert_eq!(session.categories(), &snapshot);
    assert_eq!(session.selection().len(), 2);
}

#[test]
fn amount_sort_descending_is_exact_reverse() {
    let mut session = session_with(grocery_rows());
    session.open_category("Groceries").unwrap();

    let spec = session.sort_by(SortKey::Amount);
    assert_eq!(spec.direction, SortDirection::Ascending);
    let ascending: Vec<f64> = session.visible_transactions().iter().map(|t| t.amount).collect();
    assert_eq!(ascending, vec![-500.0, -1000.0]);

    let spec = session.sort_by(SortKey::Amount);
    assert_eq!(spec.direction, SortDirection::Descending);
    let descending: Vec<f64> = session.visible_transactions().iter().map(|t| t.amount).collect();
    assert_eq!(descending, vec![-1000.0, -500.0]);

    // sorting never reorders the stored bucket
    let stored: Vec<f64> = session
        .categories()
        .get("Groceries")
        .unwrap()
        .transactions()
        .iter()
        .map(|t| t.amount)
        .collect();
    assert_eq!(stored, vec![-500.0, -1000.0]);
}

#[test]
fn selection_follows_ids_across_resorting() {
    let mut session = session_with(grocery_rows());
    session.open_category("Groceries").unwrap();
    session.toggle_row(0).unwrap();
    let selected = session.visible_transactions()[0].id;

    session.sort_by(SortKey::Description);
    assert!(session.selection().is_selected(selected));
    assert_eq!(session.selection().len(), 1);

    session.open_category("Transport").unwrap();
    assert!(session.selection().is_empty());
}

#[test]
fn statistics_skip_transfer_categories() {
    let (mut session, _config, _base) = setup_test_env();
    session.ingest("tinkoff", tinkoff_rows()).unwrap();

    let stats = session.statistics();
    assert_eq!(stats.transaction_count, 3);
    assert_eq!(stats.income, 0.0);
    assert!((stats.expense - 5750.5).abs() < 1e-9);
    assert!((stats.cashback - 54.5).abs() < 1e-9);
    assert!((stats.net() - -5750.5).abs() < 1e-9);
}

#[test]
fn add_category_rejects_duplicates_and_blank_names() {
    let mut session = session_with(grocery_rows());
    assert_eq!(session.add_category("  Savings ").unwrap(), "Savings");
    assert!(session.categories().get("Savings").unwrap().is_empty());
    assert!(matches!(
        session.add_category("Groceries"),
        Err(ServiceError::DuplicateCategoryName(_))
    ));
    assert!(matches!(
        session.add_category(" "),
        Err(ServiceError::EmptyCategoryName)
    ));
}

#[test]
fn unknown_dates_sort_first() {
    let undated = Transaction::new(StatementDate::Unknown, -1.0, "Misc");
    let dated = Transaction::new(StatementDate::parse("01.01.2024").unwrap(), -2.0, "Misc");
    assert!(undated.date.instant() < dated.date.instant());
}

#[test]
fn budget_buckets_are_targets_but_unallocated_sources_are_not() {
    let mut rows = grocery_rows();
    rows.push(json!({"Дата операции": "05.03.2024", "Сумма операции": -2990, "Категория": "Маркетплейсы", "Описание": "Ozon"}));
    let mut session = session_with(rows);

    for name in &Config::default().budget_categories {
        assert!(session.categories().get(name).is_some_and(|bucket| bucket.is_empty()));
    }

    session.open_category("Groceries").unwrap();
    let targets = session.transfer_targets();
    assert!(targets.contains(&"Квартплата"));
    assert!(targets.contains(&"Transport"));
    assert!(!targets.contains(&"Маркетплейсы"));
    assert!(!targets.contains(&"Groceries"));

    // the unallocated source can still be opened and drained
    session.open_category("Маркетплейсы").unwrap();
    session.toggle_all();
    let report = session.transfer_selected("Квартплата").unwrap();
    assert!(!report.target_created);
    assert!(report.source_removed);
    assert_eq!(session.categories().get("Квартплата").unwrap().total(), -2990.0);
}
