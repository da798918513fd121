use std::str::FromStr;

use anyhow::{Context, Result};
use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::Quote;

#[derive(Debug, Deserialize, Getters, new)]
pub struct AvGlobalQuoteDto {
    #[serde(rename = "01. symbol")]
    symbol: String,
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "09. change")]
    change: String,
    #[serde(rename = "10. change percent")]
    change_percent: String,
}

impl AvGlobalQuoteDto {
    pub fn to_quote(&self) -> Result<Quote> {
        let price = Decimal::from_str(&self.price)
            .with_context(|| format!("Failed to parse price '{}'", self.price))?;
        let change = Decimal::from_str(&self.change)
            .with_context(|| format!("Failed to parse change '{}'", self.change))?;
        let change_percent = Decimal::from_str(self.change_percent.trim_end_matches('%'))
            .with_context(|| format!("Failed to parse change percent '{}'", self.change_percent))?;
        Ok(Quote::new(self.symbol.clone(), price, change, change_percent))
    }
}
