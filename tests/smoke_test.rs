mod common;

use common::{setup_test_env, tinkoff_rows};
use fin_note_core::{
    core::services::SortKey,
    currency::{format_amount, CurrencyCode, LocaleConfig},
    init,
};

#[test]
fn statement_session_smoke() {
    init();

    let (mut session, config_manager, base) = setup_test_env();
    let config = config_manager.load().unwrap();
    session.set_config(config);

    session.ingest("tinkoff", tinkoff_rows()).unwrap();
    session.open_category("Супермаркеты").unwrap();
    session.sort_by(SortKey::Date);
    session.toggle_row(0).unwrap();
    let report = session.transfer_selected("Продукты").unwrap();
    assert_eq!(report.moved, 1);

    session.save("smoke").unwrap();
    assert!(base.join("snapshots").join("smoke.json").exists());

    let stats = session.statistics();
    let locale = LocaleConfig::for_tag(&session.config().locale);
    let currency = CurrencyCode::new(&session.config().currency);
    let expense = format_amount(stats.expense, &currency, &locale);
    assert!(expense.contains('₽'), "{expense}");
}
