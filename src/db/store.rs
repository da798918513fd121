use chrono::{DateTime, Local, TimeZone};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use sqlx::{Pool, Sqlite};

use crate::models::{Holding, Snapshot, Transaction};
use crate::services::accounting::{clamp_cash, debit_cash, round_currency};

use super::error::StoreError;
use super::utils::{
    parse_currency_from_row, parse_holding, parse_i64_from_row, parse_snapshot, parse_transaction,
};

#[derive(Clone, Debug)]
pub struct PortfolioStore {
    pool: Pool<Sqlite>,
}

impl PortfolioStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn find_or_create_portfolio(&self, name: &str) -> Result<i64, StoreError> {
        let existing = sqlx::query("SELECT id FROM portfolios WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = existing {
            return parse_i64_from_row(&row, "id");
        }

        let id = sqlx::query("INSERT INTO portfolios (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(id)
    }

    pub async fn find_holding(
        &self,
        portfolio_id: i64,
        ticker: &str,
    ) -> Result<Option<Holding>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT ticker, name, lots, average_cost FROM holdings
            WHERE portfolio_id = ? AND ticker = ?
            "#,
        )
        .bind(portfolio_id)
        .bind(ticker)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(parse_holding).transpose()
    }

    pub async fn list_holdings(&self, portfolio_id: i64) -> Result<Vec<Holding>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT ticker, name, lots, average_cost FROM holdings
            WHERE portfolio_id = ?
            ORDER BY ticker
            "#,
        )
        .bind(portfolio_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(parse_holding).collect()
    }

    pub async fn upsert_holding(
        &self,
        portfolio_id: i64,
        holding: &Holding,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT id FROM holdings WHERE portfolio_id = ? AND ticker = ?")
            .bind(portfolio_id)
            .bind(holding.ticker())
            .fetch_optional(&mut *tx)
            .await?;

        match existing {
            Some(row) => {
                let id = parse_i64_from_row(&row, "id")?;
                sqlx::query(
                    r#"
                    UPDATE holdings
                    SET name = ?, lots = ?, average_cost = ?, updated_at = CURRENT_TIMESTAMP
                    WHERE id = ?
                    "#,
                )
                .bind(holding.name())
                .bind(holding.lots())
                .bind(currency_to_i64(*holding.average_cost())?)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO holdings (portfolio_id, ticker, name, lots, average_cost)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(portfolio_id)
                .bind(holding.ticker())
                .bind(holding.name())
                .bind(holding.lots())
                .bind(currency_to_i64(*holding.average_cost())?)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_holding(&self, portfolio_id: i64, ticker: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM holdings WHERE portfolio_id = ? AND ticker = ?")
            .bind(portfolio_id)
            .bind(ticker)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn insert_transaction(
        &self,
        portfolio_id: i64,
        transaction: &Transaction,
    ) -> Result<i64, StoreError> {
        let id = sqlx::query(
            r#"
            INSERT INTO transactions
            (portfolio_id, trade_type, ticker, lots, price_per_share, total_amount, executed_at, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(portfolio_id)
        .bind(transaction.trade_type().to_str())
        .bind(transaction.ticker())
        .bind(transaction.lots())
        .bind(currency_to_i64(*transaction.price_per_share())?)
        .bind(currency_to_i64(*transaction.total_amount())?)
        .bind(transaction.executed_at().timestamp_millis())
        .bind(transaction.notes())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    pub async fn list_transactions(
        &self,
        portfolio_id: i64,
        limit: i64,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT trade_type, ticker, lots, price_per_share, total_amount, executed_at, notes
            FROM transactions
            WHERE portfolio_id = ?
            ORDER BY executed_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(portfolio_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(parse_transaction).collect()
    }

    pub async fn insert_snapshot(
        &self,
        portfolio_id: i64,
        taken_at: DateTime<Local>,
        total_value: Decimal,
        stock_value: Decimal,
        cash_value: Decimal,
    ) -> Result<Snapshot, StoreError> {
        let millis = taken_at.timestamp_millis();
        let id = sqlx::query(
            r#"
            INSERT INTO snapshots (portfolio_id, taken_at, total_value, stock_value, cash_value)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(portfolio_id)
        .bind(millis)
        .bind(currency_to_i64(total_value)?)
        .bind(currency_to_i64(stock_value)?)
        .bind(currency_to_i64(cash_value)?)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        // Echo back what landed at rest: millisecond timestamp, whole units.
        let stored_at = Local
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| StoreError::Corrupt(format!("invalid timestamp: {}", millis)))?;
        Ok(Snapshot::new(
            id,
            portfolio_id,
            stored_at,
            round_currency(total_value),
            round_currency(stock_value),
            round_currency(cash_value),
        ))
    }

    pub async fn latest_snapshot_since(
        &self,
        portfolio_id: i64,
        since: DateTime<Local>,
    ) -> Result<Option<Snapshot>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, portfolio_id, taken_at, total_value, stock_value, cash_value
            FROM snapshots
            WHERE portfolio_id = ? AND taken_at >= ?
            ORDER BY taken_at DESC
            LIMIT 1
            "#,
        )
        .bind(portfolio_id)
        .bind(since.timestamp_millis())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(parse_snapshot).transpose()
    }

    pub async fn snapshots_asc(&self, portfolio_id: i64) -> Result<Vec<Snapshot>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, portfolio_id, taken_at, total_value, stock_value, cash_value
            FROM snapshots
            WHERE portfolio_id = ?
            ORDER BY taken_at ASC
            "#,
        )
        .bind(portfolio_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(parse_snapshot).collect()
    }

    pub async fn delete_snapshots_before(
        &self,
        portfolio_id: i64,
        cutoff: DateTime<Local>,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM snapshots WHERE portfolio_id = ? AND taken_at < ?")
            .bind(portfolio_id)
            .bind(cutoff.timestamp_millis())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn cash_balance(&self, portfolio_id: i64) -> Result<Decimal, StoreError> {
        let row = sqlx::query("SELECT balance FROM cash_balances WHERE portfolio_id = ?")
            .bind(portfolio_id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => parse_currency_from_row(&row, "balance"),
            None => Ok(Decimal::ZERO),
        }
    }

    pub async fn set_cash(
        &self,
        portfolio_id: i64,
        amount: Decimal,
    ) -> Result<Decimal, StoreError> {
        let next = clamp_cash(round_currency(amount));
        let mut tx = self.pool.begin().await?;
        write_cash(&mut tx, portfolio_id, next).await?;
        tx.commit().await?;
        Ok(next)
    }

    pub async fn add_cash(
        &self,
        portfolio_id: i64,
        amount: Decimal,
    ) -> Result<Decimal, StoreError> {
        let mut tx = self.pool.begin().await?;
        let current = cash_in_tx(&mut tx, portfolio_id).await?;
        let next = clamp_cash(round_currency(current + amount));
        write_cash(&mut tx, portfolio_id, next).await?;
        tx.commit().await?;
        Ok(next)
    }

    pub async fn subtract_cash(
        &self,
        portfolio_id: i64,
        amount: Decimal,
    ) -> Result<Decimal, StoreError> {
        let mut tx = self.pool.begin().await?;
        let current = cash_in_tx(&mut tx, portfolio_id).await?;
        let next = debit_cash(current, round_currency(amount));
        write_cash(&mut tx, portfolio_id, next).await?;
        tx.commit().await?;
        Ok(next)
    }
}

async fn cash_in_tx(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    portfolio_id: i64,
) -> Result<Decimal, StoreError> {
    let row = sqlx::query("SELECT balance FROM cash_balances WHERE portfolio_id = ?")
        .bind(portfolio_id)
        .fetch_optional(&mut **tx)
        .await?;
    match row {
        Some(row) => parse_currency_from_row(&row, "balance"),
        None => Ok(Decimal::ZERO),
    }
}

async fn write_cash(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    portfolio_id: i64,
    amount: Decimal,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO cash_balances (portfolio_id, balance)
        VALUES (?, ?)
        ON CONFLICT (portfolio_id)
        DO UPDATE SET balance = excluded.balance, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(portfolio_id)
    .bind(currency_to_i64(amount)?)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn currency_to_i64(amount: Decimal) -> Result<i64, StoreError> {
    round_currency(amount)
        .to_i64()
        .ok_or_else(|| StoreError::Corrupt(format!("amount out of range: {}", amount)))
}
