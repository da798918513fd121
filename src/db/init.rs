use sqlx::sqlite::SqliteQueryResult;

pub async fn create_portfolios(
    connection: &sqlx::Pool<sqlx::Sqlite>,
) -> Result<SqliteQueryResult, sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS portfolios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(connection)
    .await
}

pub async fn create_holdings(
    connection: &sqlx::Pool<sqlx::Sqlite>,
) -> Result<SqliteQueryResult, sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS holdings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            portfolio_id INTEGER NOT NULL REFERENCES portfolios(id),
            ticker TEXT NOT NULL,
            name TEXT NOT NULL,
            lots INTEGER NOT NULL,
            average_cost INTEGER NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (portfolio_id, ticker)
        )
        "#,
    )
    .execute(connection)
    .await
}

pub async fn create_snapshots(
    connection: &sqlx::Pool<sqlx::Sqlite>,
) -> Result<SqliteQueryResult, sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS snapshots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            portfolio_id INTEGER NOT NULL REFERENCES portfolios(id),
            taken_at INTEGER NOT NULL,
            total_value INTEGER NOT NULL,
            stock_value INTEGER NOT NULL,
            cash_value INTEGER NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(connection)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_snapshots_portfolio_taken_at
        ON snapshots (portfolio_id, taken_at)
        "#,
    )
    .execute(connection)
    .await
}

pub async fn create_transactions(
    connection: &sqlx::Pool<sqlx::Sqlite>,
) -> Result<SqliteQueryResult, sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            portfolio_id INTEGER NOT NULL REFERENCES portfolios(id),
            trade_type TEXT NOT NULL,
            ticker TEXT NOT NULL,
            lots INTEGER NOT NULL,
            price_per_share INTEGER NOT NULL,
            total_amount INTEGER NOT NULL,
            executed_at INTEGER NOT NULL,
            notes TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(connection)
    .await
}

pub async fn create_cash_balances(
    connection: &sqlx::Pool<sqlx::Sqlite>,
) -> Result<SqliteQueryResult, sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cash_balances (
            portfolio_id INTEGER PRIMARY KEY REFERENCES portfolios(id),
            balance INTEGER NOT NULL DEFAULT 0,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(connection)
    .await
}

pub async fn create_all(connection: &sqlx::Pool<sqlx::Sqlite>) -> Result<(), sqlx::Error> {
    create_portfolios(connection).await?;
    create_holdings(connection).await?;
    create_snapshots(connection).await?;
    create_transactions(connection).await?;
    create_cash_balances(connection).await?;
    Ok(())
}
