use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

use super::holding::Holding;

#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct Position {
    ticker: String,
    name: String,
    lots: i64,
    average_cost: Decimal,
    price: Decimal,
    market_value: Decimal,
    cost_basis: Decimal,
    unrealized_gain: Decimal,
    unrealized_gain_percent: Decimal,
}

impl Position {
    pub fn valued(holding: &Holding, price: Decimal) -> Self {
        let shares = Decimal::from(holding.shares());
        let market_value = shares * price;
        let cost_basis = shares * *holding.average_cost();
        let unrealized_gain = market_value - cost_basis;
        let unrealized_gain_percent = if cost_basis > Decimal::ZERO {
            unrealized_gain / cost_basis * Decimal::from(100)
        } else {
            Decimal::ZERO
        };
        Self::new(
            holding.ticker().clone(),
            holding.name().clone(),
            *holding.lots(),
            *holding.average_cost(),
            price,
            market_value,
            cost_basis,
            unrealized_gain,
            unrealized_gain_percent,
        )
    }
}
