//! Store adapter tests: upsert/get/delete round trips, ordering, schema idempotence.

use chrono::NaiveDate;
use sales_analytics_core::{
    config::StoreConfig, CompanyStore, Employee, MonthlyFinancialRecord,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn employee(id: i64, name: &str, dept: &str, base: f64) -> Employee {
    Employee::new(0, id, name, dept, base, 0.1, 2.0, 25.0).unwrap()
}

fn month(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

fn record(date: NaiveDate, revenue: f64) -> MonthlyFinancialRecord {
    MonthlyFinancialRecord::new(0, date, revenue, 400.0, 200.0, 100.0).unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn upsert_then_get_returns_equal_employee() {
    let store = CompanyStore::in_memory().unwrap();
    let e = employee(42, "Ada Lovelace", "Engineering", 5200.0);

    store.upsert_employee(&e).unwrap();

    assert_eq!(store.get_employee(42).unwrap(), Some(e));
}

#[test]
fn upsert_replaces_every_non_key_field() {
    let store = CompanyStore::in_memory().unwrap();
    store.upsert_employee(&employee(1, "Bo", "Ops", 3000.0)).unwrap();

    let replacement = Employee::new(0, 1, "Bo Chen", "Finance", 3500.0, 0.05, 0.0, 0.0).unwrap();
    store.upsert_employee(&replacement).unwrap();

    assert_eq!(store.get_employee(1).unwrap(), Some(replacement));
    assert_eq!(store.employee_count().unwrap(), 1);
}

#[test]
fn delete_then_get_is_absent_and_missing_delete_is_not_an_error() {
    let store = CompanyStore::in_memory().unwrap();
    store.upsert_employee(&employee(5, "Cy", "Sales", 2000.0)).unwrap();

    assert!(store.delete_employee(5).unwrap());
    assert_eq!(store.get_employee(5).unwrap(), None);
    assert!(!store.delete_employee(5).unwrap(), "second delete should find nothing");
    assert_eq!(store.get_employee(999).unwrap(), None);
}

#[test]
fn employees_listed_by_id_ascending() {
    let store = CompanyStore::in_memory().unwrap();
    for id in [30, 10, 20] {
        store.upsert_employee(&employee(id, "X", "Ops", 1.0)).unwrap();
    }

    let ids: Vec<i64> = store.list_employees().unwrap().iter().map(|e| e.employee_id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
}

#[test]
fn financial_records_keyed_and_ordered_by_date() {
    let store = CompanyStore::in_memory().unwrap();
    store.upsert_financial_record(&record(month(2024, 3), 1300.0)).unwrap();
    store.upsert_financial_record(&record(month(2023, 12), 900.0)).unwrap();
    store.upsert_financial_record(&record(month(2024, 1), 1000.0)).unwrap();
    // Same date again: update, not a second row.
    store.upsert_financial_record(&record(month(2024, 1), 1100.0)).unwrap();

    let records = store.list_financial_records().unwrap();
    let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![month(2023, 12), month(2024, 1), month(2024, 3)]);
    assert_eq!(records[1].revenue, 1100.0);
    assert_eq!(store.financial_record_count().unwrap(), 3);
}

#[test]
fn financial_record_round_trip_and_delete() {
    let store = CompanyStore::in_memory().unwrap();
    let r = record(month(2024, 6), 1500.0);
    store.upsert_financial_record(&r).unwrap();

    assert_eq!(store.get_financial_record(r.date).unwrap(), Some(r.clone()));
    assert!(store.delete_financial_record(r.date).unwrap());
    assert_eq!(store.get_financial_record(r.date).unwrap(), None);
    assert!(!store.delete_financial_record(r.date).unwrap());
}

#[test]
fn init_schema_twice_keeps_existing_rows() {
    let store = CompanyStore::in_memory().unwrap();
    store.upsert_employee(&employee(1, "Ada", "Eng", 1000.0)).unwrap();
    store.upsert_financial_record(&record(month(2024, 1), 1000.0)).unwrap();

    store.init_schema().unwrap();
    store.init_schema().unwrap();

    assert_eq!(store.employee_count().unwrap(), 1);
    assert_eq!(store.financial_record_count().unwrap(), 1);
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::file(dir.path().join("nested").join("company.db"));

    {
        let store = CompanyStore::open(&config).unwrap();
        store.upsert_employee(&employee(7, "Dee", "Legal", 4100.0)).unwrap();
    }

    let reopened = CompanyStore::open(&config).unwrap();
    assert_eq!(reopened.get_employee(7).unwrap().map(|e| e.name), Some("Dee".to_string()));
}

#[test]
fn two_handles_on_one_file_see_each_others_writes() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::file(dir.path().join("company.db"));
    let writer = CompanyStore::open(&config).unwrap();
    let reader = CompanyStore::open(&config).unwrap();

    writer.upsert_employee(&employee(3, "Eve", "Sales", 2500.0)).unwrap();

    assert!(reader.get_employee(3).unwrap().is_some());
}

#[test]
fn separate_memory_stores_are_isolated() {
    let a = CompanyStore::in_memory().unwrap();
    let b = CompanyStore::in_memory().unwrap();

    a.upsert_employee(&employee(1, "Ada", "Eng", 1000.0)).unwrap();

    assert_eq!(b.employee_count().unwrap(), 0);
}

#[test]
fn store_without_schema_reports_storage_error() {
    let config = StoreConfig {
        schema_auto_init: false,
        ..StoreConfig::in_memory()
    };
    let store = CompanyStore::open(&config).unwrap();

    let err = store.list_employees().unwrap_err();
    assert!(err.is_storage(), "expected a storage error, got {err}");

    store.init_schema().unwrap();
    assert!(store.list_employees().unwrap().is_empty());
}

#[test]
fn financial_dates_stored_as_iso_month_start() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("company.db");
    let store = CompanyStore::open(&StoreConfig::file(&db_path)).unwrap();
    let mid_march = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();

    store.upsert_financial_record(&record(mid_march, 1300.0)).unwrap();
    store.upsert_financial_record(&record(month(2024, 3), 1400.0)).unwrap();

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let raw: Vec<String> = conn
        .prepare("SELECT date FROM financials")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(raw, vec!["2024-03-01".to_string()]);

    let stored = store.get_financial_record(mid_march).unwrap().unwrap();
    assert_eq!(stored.date, month(2024, 3));
    assert_eq!(stored.revenue, 1400.0);
}
