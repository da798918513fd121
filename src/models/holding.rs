use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

pub const SHARES_PER_LOT: i64 = 100;

#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct Holding {
    ticker: String,
    name: String,
    lots: i64,
    average_cost: Decimal,
}

impl Holding {
    pub fn shares(&self) -> i64 {
        self.lots * SHARES_PER_LOT
    }
}
