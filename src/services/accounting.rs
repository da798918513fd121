use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Holding;

pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ticker and name only matter when creating a new holding.
pub fn apply_buy(
    existing: Option<&Holding>,
    ticker: &str,
    name: &str,
    lots: i64,
    price: Decimal,
) -> Holding {
    match existing {
        Some(holding) => {
            let total_lots = *holding.lots() + lots;
            let average_cost = if total_lots > 0 {
                let held_cost = Decimal::from(*holding.lots()) * *holding.average_cost();
                let fill_cost = Decimal::from(lots) * price;
                round_currency((held_cost + fill_cost) / Decimal::from(total_lots))
            } else {
                *holding.average_cost()
            };
            Holding::new(
                holding.ticker().clone(),
                holding.name().clone(),
                total_lots,
                average_cost,
            )
        }
        None => Holding::new(
            ticker.to_string(),
            name.to_string(),
            lots,
            round_currency(price),
        ),
    }
}

pub fn apply_sell(holding: &Holding, lots: i64) -> Option<Holding> {
    let remaining = (*holding.lots() - lots).max(0);
    if remaining == 0 {
        return None;
    }
    Some(Holding::new(
        holding.ticker().clone(),
        holding.name().clone(),
        remaining,
        *holding.average_cost(),
    ))
}

pub fn debit_cash(balance: Decimal, amount: Decimal) -> Decimal {
    (balance - amount).max(Decimal::ZERO)
}

pub fn clamp_cash(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}
