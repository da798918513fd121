use chrono::{DateTime, Local, TimeZone};
use rust_decimal::Decimal;
use sqlx::{Row, sqlite::SqliteRow};

use crate::models::{Holding, Snapshot, TradeType, Transaction};

use super::error::StoreError;

pub fn parse_i64_from_row(row: &SqliteRow, column: &str) -> Result<i64, StoreError> {
    row.try_get::<i64, _>(column)
        .map_err(|err| StoreError::Corrupt(format!("column '{}' is not an i64: {}", column, err)))
}

pub fn parse_string_from_row(row: &SqliteRow, column: &str) -> Result<String, StoreError> {
    row.try_get::<String, _>(column)
        .map_err(|err| StoreError::Corrupt(format!("column '{}' is not text: {}", column, err)))
}

pub fn parse_opt_string_from_row(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<String>, StoreError> {
    row.try_get::<Option<String>, _>(column)
        .map_err(|err| StoreError::Corrupt(format!("column '{}' is not text: {}", column, err)))
}

// Money is stored as INTEGER whole currency units.
pub fn parse_currency_from_row(row: &SqliteRow, column: &str) -> Result<Decimal, StoreError> {
    Ok(Decimal::from(parse_i64_from_row(row, column)?))
}

// Timestamps are stored as epoch milliseconds.
pub fn parse_datetime_from_row(
    row: &SqliteRow,
    column: &str,
) -> Result<DateTime<Local>, StoreError> {
    let millis = parse_i64_from_row(row, column)?;
    Local.timestamp_millis_opt(millis).single().ok_or_else(|| {
        StoreError::Corrupt(format!(
            "column '{}' holds an invalid timestamp: {}",
            column, millis
        ))
    })
}

pub fn parse_trade_type_from_row(row: &SqliteRow, column: &str) -> Result<TradeType, StoreError> {
    let raw = parse_string_from_row(row, column)?;
    TradeType::parse_str(&raw)
        .map_err(|err| StoreError::Corrupt(format!("column '{}': {}", column, err)))
}

pub fn parse_holding(row: &SqliteRow) -> Result<Holding, StoreError> {
    Ok(Holding::new(
        parse_string_from_row(row, "ticker")?,
        parse_string_from_row(row, "name")?,
        parse_i64_from_row(row, "lots")?,
        parse_currency_from_row(row, "average_cost")?,
    ))
}

pub fn parse_snapshot(row: &SqliteRow) -> Result<Snapshot, StoreError> {
    Ok(Snapshot::new(
        parse_i64_from_row(row, "id")?,
        parse_i64_from_row(row, "portfolio_id")?,
        parse_datetime_from_row(row, "taken_at")?,
        parse_currency_from_row(row, "total_value")?,
        parse_currency_from_row(row, "stock_value")?,
        parse_currency_from_row(row, "cash_value")?,
    ))
}

pub fn parse_transaction(row: &SqliteRow) -> Result<Transaction, StoreError> {
    Ok(Transaction::new(
        parse_trade_type_from_row(row, "trade_type")?,
        parse_string_from_row(row, "ticker")?,
        parse_i64_from_row(row, "lots")?,
        parse_currency_from_row(row, "price_per_share")?,
        parse_currency_from_row(row, "total_amount")?,
        parse_datetime_from_row(row, "executed_at")?,
        parse_opt_string_from_row(row, "notes")?,
    ))
}
