use anyhow::{Result, anyhow};
use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use strum_macros::EnumIter;

#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct Quote {
    symbol: String,
    price: Decimal,
    change: Decimal,
    change_percent: Decimal,
}

#[derive(Clone, Copy, Debug, Default, EnumIter, Eq, PartialEq)]
pub enum ApiProvider {
    #[default]
    AlphaVantage,
    Fmp,
}

impl ApiProvider {
    pub fn parse_str(s: &str) -> Result<ApiProvider> {
        match s {
            "av" => Ok(ApiProvider::AlphaVantage),
            "fmp" => Ok(ApiProvider::Fmp),
            _ => Err(anyhow!("Unknown quote provider '{}', expected av or fmp", s)),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            ApiProvider::AlphaVantage => "av",
            ApiProvider::Fmp => "fmp",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ApiProvider::AlphaVantage => "Alpha Vantage",
            ApiProvider::Fmp => "Financial Modeling Prep",
        }
    }
}
