use anyhow::{Result, anyhow};
use chrono::{DateTime, Local};
use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

use super::holding::SHARES_PER_LOT;

#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct Transaction {
    trade_type: TradeType,
    ticker: String,
    lots: i64,
    price_per_share: Decimal,
    total_amount: Decimal,
    executed_at: DateTime<Local>,
    notes: Option<String>,
}

impl Transaction {
    pub fn filled(
        trade_type: TradeType,
        ticker: String,
        lots: i64,
        price_per_share: Decimal,
        executed_at: DateTime<Local>,
        notes: Option<String>,
    ) -> Self {
        let total_amount = Decimal::from(lots * SHARES_PER_LOT) * price_per_share;
        Self::new(
            trade_type,
            ticker,
            lots,
            price_per_share,
            total_amount,
            executed_at,
            notes,
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TradeType {
    Buy,
    Sell,
}

impl TradeType {
    pub fn parse_str(s: &str) -> Result<TradeType> {
        match s {
            "Buy" => Ok(TradeType::Buy),
            "Sell" => Ok(TradeType::Sell),
            _ => Err(anyhow!("Unknown trade type '{}'", s)),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            TradeType::Buy => "Buy",
            TradeType::Sell => "Sell",
        }
    }
}
