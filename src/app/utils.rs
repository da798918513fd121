use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, TimeZone};
use regex::Regex;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::{
    api::{av, fmp},
    models::{ApiProvider, Quote},
    services::accounting::round_currency,
};

const TICKER_PATTERN: &str = r"^[A-Z0-9]{1,10}(\.[A-Z0-9]{1,4})?$";

// Exchange-style symbols: "AAPL", "005930.KS", "BRK.B".
pub fn validate_ticker(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    let pattern = Regex::new(TICKER_PATTERN).context("Invalid ticker pattern")?;
    if !pattern.is_match(&symbol) {
        bail!("Invalid ticker '{}'", symbol);
    }
    Ok(symbol)
}

pub fn parse_datetime(field: &str) -> Result<DateTime<Local>> {
    let date_str = format!("{} 00:00:00", field);
    let naive = chrono::NaiveDateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("Failed to parse date '{}'", field))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("Date '{}' is not a valid local time", field))
}

pub fn parse_decimal(field: &str, field_name: &str) -> Result<Decimal> {
    field
        .parse::<Decimal>()
        .with_context(|| format!("Failed to parse {} '{}'", field_name, field))
}

pub fn parse_lots(field: &str) -> Result<i64> {
    let lots = field
        .parse::<i64>()
        .with_context(|| format!("Failed to parse lots '{}'", field))?;
    if lots < 1 {
        bail!("Lots must be at least 1, got {}", lots);
    }
    Ok(lots)
}

pub async fn get_quote(symbol: &str, client: &Client, api: &ApiProvider) -> Result<Quote> {
    match api {
        ApiProvider::AlphaVantage => {
            let api_key = std::env::var("ALPHA_VANTAGE_API_KEY")
                .context("Missing ALPHA_VANTAGE_API_KEY in environment")?;
            let av_quote_result = av::get_quote(symbol, client, api_key.as_str())
                .await
                .with_context(|| format!("Alpha Vantage ({})", symbol))?;
            av_quote_result.to_quote()
        }
        ApiProvider::Fmp => {
            let api_key =
                std::env::var("FMP_API_KEY").context("Missing FMP_API_KEY in environment")?;
            let fmp_quote_result = fmp::get_quote(symbol, client, api_key.as_str())
                .await
                .with_context(|| format!("FMP ({})", symbol))?;
            let first = fmp_quote_result
                .first()
                .with_context(|| format!("FMP ({}): empty quote response", symbol))?;
            Ok(first.to_quote())
        }
    }
}

pub fn format_amount(amount: &Decimal) -> String {
    let rounded = round_currency(*amount).normalize().to_string();
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}

pub fn format_percent(percent: &Decimal) -> String {
    let rounded = percent.round_dp(2);
    if rounded.is_sign_negative() {
        format!("{}%", rounded)
    } else {
        format!("+{}%", rounded)
    }
}
