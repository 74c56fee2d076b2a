use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use retrofolio_core::activities::{InvestmentTransaction, TransactionCategory};
use retrofolio_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, DbPool, WriteHandle,
};
use rust_decimal::Decimal;
use tempfile::TempDir;

pub struct TestStorage {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

pub fn setup_storage() -> TestStorage {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = init(&dir.path().to_string_lossy()).expect("Failed to initialize database");
    let pool = create_pool(&db_path).expect("Failed to create database pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer(Arc::clone(&pool));
    TestStorage {
        pool,
        writer,
        _dir: dir,
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn noon(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0).expect("valid time").and_utc()
}

pub fn buy(
    id: &str,
    portfolio_id: &str,
    security_id: &str,
    date: NaiveDate,
    quantity: Decimal,
    ref_amount: Decimal,
    currency: &str,
) -> InvestmentTransaction {
    InvestmentTransaction {
        id: id.to_string(),
        portfolio_id: portfolio_id.to_string(),
        security_id: security_id.to_string(),
        date,
        category: TransactionCategory::Buy,
        quantity,
        ref_amount,
        ref_fees: Decimal::ZERO,
        currency: currency.to_string(),
        created_at: noon(date),
    }
}
