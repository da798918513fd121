use chrono::{DateTime, Local};
use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct Snapshot {
    id: i64,
    portfolio_id: i64,
    taken_at: DateTime<Local>,
    total_value: Decimal,
    stock_value: Decimal,
    cash_value: Decimal,
}
