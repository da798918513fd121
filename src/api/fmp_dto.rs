use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::Quote;

#[derive(Debug, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct FmpQuoteDto {
    symbol: String,
    name: String,
    price: Decimal,
    change_percentage: Decimal,
    change: Decimal,
}

impl FmpQuoteDto {
    pub fn to_quote(&self) -> Quote {
        Quote::new(
            self.symbol.clone(),
            self.price,
            self.change,
            self.change_percentage,
        )
    }
}
