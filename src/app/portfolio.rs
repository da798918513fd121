use anyhow::{Context, Error, Result};
use chrono::{DateTime, Local};
use csv::Reader;
use rust_decimal::Decimal;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::{
    api::cache::QuoteCache,
    db::PortfolioStore,
    models::{
        ApiProvider, Growth, GrowthPeriod, Holding, Position, Quote, Snapshot, TradeType,
        Transaction,
    },
    services::{accounting, growth, snapshot::SnapshotRecorder},
};

use super::utils::{self, parse_datetime, parse_lots};

struct CsvTrade {
    executed_at: DateTime<Local>,
    trade_type: TradeType,
    ticker: String,
    name: Option<String>,
    lots: i64,
    price: Decimal,
    notes: Option<String>,
}

pub struct Portfolio {
    portfolio_id: i64,
    name: String,
    store: PortfolioStore,
    recorder: SnapshotRecorder,
    client: reqwest::Client,
    quote_cache: QuoteCache,
    default_api: ApiProvider,
    period: GrowthPeriod,
    positions: Vec<Position>,
    history: Vec<Snapshot>,
    growth: Growth,
    stock_value: Decimal,
    cash_value: Decimal,
}

impl Portfolio {
    pub fn new(
        portfolio_id: i64,
        name: String,
        store: PortfolioStore,
        default_api: ApiProvider,
    ) -> Self {
        Self {
            portfolio_id,
            name,
            recorder: SnapshotRecorder::new(store.clone()),
            store,
            client: reqwest::Client::new(),
            quote_cache: QuoteCache::default(),
            default_api,
            period: GrowthPeriod::default(),
            positions: Vec::new(),
            history: Vec::new(),
            growth: Growth::default(),
            stock_value: Decimal::ZERO,
            cash_value: Decimal::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &Vec<Position> {
        &self.positions
    }

    pub fn history(&self) -> &Vec<Snapshot> {
        &self.history
    }

    pub fn growth(&self) -> &Growth {
        &self.growth
    }

    pub fn period(&self) -> GrowthPeriod {
        self.period
    }

    pub fn default_api(&self) -> ApiProvider {
        self.default_api
    }

    pub fn stock_value(&self) -> Decimal {
        self.stock_value
    }

    pub fn cash_value(&self) -> Decimal {
        self.cash_value
    }

    pub fn total_value(&self) -> Decimal {
        accounting::round_currency(self.stock_value + self.cash_value)
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let holdings = self.store.list_holdings(self.portfolio_id).await?;

        let mut positions = Vec::with_capacity(holdings.len());
        let mut stock_value = Decimal::ZERO;

        // One request at a time; bursts trip free-tier rate limits.
        let mut stream = tokio_stream::iter(holdings);
        while let Some(holding) = stream.next().await {
            let price = match self.quote(holding.ticker()).await {
                Ok(quote) => *quote.price(),
                Err(err) => {
                    warn!(ticker = %holding.ticker(), %err, "quote failed, pricing at zero");
                    Decimal::ZERO
                }
            };
            let position = Position::valued(&holding, price);
            stock_value += *position.market_value();
            positions.push(position);
        }

        self.positions = positions;
        self.stock_value = stock_value;
        self.cash_value = self.store.cash_balance(self.portfolio_id).await?;

        self.recorder
            .record(
                self.portfolio_id,
                self.stock_value,
                self.cash_value,
                Local::now(),
            )
            .await
            .context("Failed to record snapshot")?;

        self.reload_growth().await
    }

    async fn quote(&self, symbol: &str) -> Result<Quote> {
        if let Some(quote) = self.quote_cache.get(symbol).await {
            debug!(%symbol, "quote cache hit");
            return Ok(quote);
        }
        let quote = utils::get_quote(symbol, &self.client, &self.default_api).await?;
        self.quote_cache.put(quote.clone()).await;
        Ok(quote)
    }

    async fn reload_growth(&mut self) -> Result<()> {
        let snapshots = self.store.snapshots_asc(self.portfolio_id).await?;
        self.history = growth::filter_window(&snapshots, self.period, Local::now());
        self.growth = growth::growth_over(&self.history);
        Ok(())
    }

    pub async fn set_period(&mut self, period: GrowthPeriod) -> Result<()> {
        self.period = period;
        self.reload_growth().await
    }

    pub fn set_default_api(&mut self, api: ApiProvider) {
        if self.default_api != api {
            info!(provider = api.to_str(), "quote provider switched");
            self.default_api = api;
            // Prices from the old provider must not satisfy new lookups.
            self.quote_cache.clear();
        }
    }

    pub async fn buy(
        &mut self,
        ticker: &str,
        name_hint: Option<&str>,
        lots: i64,
        price: Decimal,
        notes: Option<String>,
        executed_at: DateTime<Local>,
    ) -> Result<Holding> {
        let ticker = utils::validate_ticker(ticker)?;
        anyhow::ensure!(lots > 0, "Buy needs at least one lot");
        anyhow::ensure!(price >= Decimal::ZERO, "Price cannot be negative");

        let existing = self.store.find_holding(self.portfolio_id, &ticker).await?;
        let name = name_hint
            .map(str::to_string)
            .unwrap_or_else(|| ticker.clone());
        let updated = accounting::apply_buy(existing.as_ref(), &ticker, &name, lots, price);
        self.store.upsert_holding(self.portfolio_id, &updated).await?;

        let entry = Transaction::filled(
            TradeType::Buy,
            ticker.clone(),
            lots,
            price,
            executed_at,
            notes,
        );
        self.store.insert_transaction(self.portfolio_id, &entry).await?;
        let balance = self
            .store
            .subtract_cash(self.portfolio_id, *entry.total_amount())
            .await?;
        self.cash_value = balance;

        info!(%ticker, lots, %price, %balance, "buy applied");
        Ok(updated)
    }

    pub async fn sell(
        &mut self,
        ticker: &str,
        lots: i64,
        price: Decimal,
        notes: Option<String>,
        executed_at: DateTime<Local>,
    ) -> Result<Option<Holding>> {
        let ticker = utils::validate_ticker(ticker)?;
        anyhow::ensure!(lots > 0, "Sell needs at least one lot");
        anyhow::ensure!(price >= Decimal::ZERO, "Price cannot be negative");

        let holding = self
            .store
            .find_holding(self.portfolio_id, &ticker)
            .await?
            .with_context(|| format!("No holding for ticker {}", ticker))?;

        let updated = accounting::apply_sell(&holding, lots);
        match &updated {
            Some(remaining) => {
                self.store
                    .upsert_holding(self.portfolio_id, remaining)
                    .await?
            }
            None => {
                self.store.delete_holding(self.portfolio_id, &ticker).await?;
                info!(%ticker, "position closed");
            }
        }

        // The ledger logs the requested lots even when the position clamps.
        let entry = Transaction::filled(
            TradeType::Sell,
            ticker.clone(),
            lots,
            price,
            executed_at,
            notes,
        );
        self.store.insert_transaction(self.portfolio_id, &entry).await?;
        let balance = self
            .store
            .add_cash(self.portfolio_id, *entry.total_amount())
            .await?;
        self.cash_value = balance;

        info!(%ticker, lots, %price, %balance, "sell applied");
        Ok(updated)
    }

    pub async fn add_cash(&mut self, amount: Decimal) -> Result<Decimal> {
        anyhow::ensure!(amount >= Decimal::ZERO, "Amount cannot be negative");
        let balance = self.store.add_cash(self.portfolio_id, amount).await?;
        self.cash_value = balance;
        info!(%amount, %balance, "cash deposited");
        Ok(balance)
    }

    pub async fn subtract_cash(&mut self, amount: Decimal) -> Result<Decimal> {
        anyhow::ensure!(amount >= Decimal::ZERO, "Amount cannot be negative");
        let balance = self.store.subtract_cash(self.portfolio_id, amount).await?;
        self.cash_value = balance;
        info!(%amount, %balance, "cash withdrawn");
        Ok(balance)
    }

    pub async fn set_cash(&mut self, amount: Decimal) -> Result<Decimal> {
        let balance = self.store.set_cash(self.portfolio_id, amount).await?;
        self.cash_value = balance;
        info!(%balance, "cash balance set");
        Ok(balance)
    }

    pub async fn recent_transactions(&self, limit: i64) -> Result<Vec<Transaction>> {
        Ok(self.store.list_transactions(self.portfolio_id, limit).await?)
    }

    // Expects date,type,ticker,name,lots,price,notes rows.
    pub async fn import_trades(&mut self, path: &str) -> Result<usize> {
        let path = shellexpand::tilde(path);
        let mut reader = Reader::from_path(path.as_ref())
            .with_context(|| format!("Failed to open CSV file at path: {}", path))?;

        let mut trades = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let rec = record
                .with_context(|| format!("Failed to read CSV record at row {}", row_idx + 1))?;

            if rec.len() < 6 {
                return Err(Error::msg(format!(
                    "Invalid CSV format at row {}: expected at least 6 columns, found {}",
                    row_idx + 1,
                    rec.len()
                )));
            }

            let executed_at =
                parse_datetime(&rec[0]).with_context(|| format!("Row {}", row_idx + 1))?;
            let trade_type =
                TradeType::parse_str(&rec[1]).with_context(|| format!("Row {}", row_idx + 1))?;
            let ticker = rec[2].to_string();
            let name = non_empty(&rec[3]);
            let lots = parse_lots(&rec[4]).with_context(|| format!("Row {}", row_idx + 1))?;
            let price = utils::parse_decimal(&rec[5], "price")
                .with_context(|| format!("Row {}", row_idx + 1))?;
            let notes = rec.get(6).and_then(non_empty);

            trades.push(CsvTrade {
                executed_at,
                trade_type,
                ticker,
                name,
                lots,
                price,
                notes,
            });
        }

        // Average cost depends on fill order.
        trades.sort_by(|a, b| a.executed_at.cmp(&b.executed_at));

        let mut applied = 0;
        for trade in trades {
            let result = match trade.trade_type {
                TradeType::Buy => self
                    .buy(
                        &trade.ticker,
                        trade.name.as_deref(),
                        trade.lots,
                        trade.price,
                        trade.notes,
                        trade.executed_at,
                    )
                    .await
                    .map(|_| ()),
                TradeType::Sell => self
                    .sell(
                        &trade.ticker,
                        trade.lots,
                        trade.price,
                        trade.notes,
                        trade.executed_at,
                    )
                    .await
                    .map(|_| ()),
            };
            match result {
                Ok(()) => applied += 1,
                Err(err) => warn!(ticker = %trade.ticker, %err, "imported trade skipped"),
            }
        }

        info!(applied, "trade ledger imported");
        Ok(applied)
    }
}

fn non_empty(field: &str) -> Option<String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
