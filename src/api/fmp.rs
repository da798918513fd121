use anyhow::Result;
use reqwest::Client;

use super::{
    fmp_dto::FmpQuoteDto,
    utils::{make_request, parse_response_array},
};

const BASE_URL: &str = "https://financialmodelingprep.com/stable";

pub async fn get_quote(symbol: &str, client: &Client, api_key: &str) -> Result<Vec<FmpQuoteDto>> {
    let params = format!("symbol={}&apikey={}", symbol, api_key);
    let res = make_request(client, BASE_URL, "quote", &params).await?;

    parse_response_array::<FmpQuoteDto>(res, &format!("No quote for symbol {}", symbol))
}
