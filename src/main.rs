use std::{fs::File, sync::Arc};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use tracing_subscriber::EnvFilter;

use stock_tracker_tui::app::{App, Portfolio, utils::parse_datetime};
use stock_tracker_tui::db::{PortfolioStore, init};
use stock_tracker_tui::models::{ApiProvider, GrowthPeriod};

#[derive(Parser)]
#[command(name = "stock-tracker-tui", version, about = "Terminal stock portfolio tracker")]
struct Cli {
    /// SQLite database file
    #[arg(long, default_value = "portfolio.db")]
    db: String,

    /// Portfolio to operate on, created on first use
    #[arg(long, default_value = "main")]
    portfolio: String,

    /// Quote provider: av | fmp
    #[arg(long, default_value = "av")]
    api: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the dashboard (default)
    Tui {
        /// CSV trade ledger wired to the F4 key
        #[arg(long)]
        import: Option<String>,
    },
    /// Record a buy
    Buy {
        ticker: String,
        lots: i64,
        price: Decimal,
        /// Display name, defaults to the ticker
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Trade date (YYYY-MM-DD), defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// Record a sell
    Sell {
        ticker: String,
        lots: i64,
        price: Decimal,
        #[arg(long)]
        notes: Option<String>,
        /// Trade date (YYYY-MM-DD), defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// Adjust the cash balance
    Cash {
        #[command(subcommand)]
        op: CashCommand,
    },
    /// Show recent ledger entries
    History {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Replay a CSV trade ledger
    Import { path: String },
    /// Print growth over a period: today | day | week | month | year | all
    Growth {
        #[arg(long, default_value = "all")]
        period: String,
    },
}

#[derive(Subcommand)]
enum CashCommand {
    /// Deposit an amount
    Add { amount: Decimal },
    /// Withdraw an amount, flooring at zero
    Sub { amount: Decimal },
    /// Overwrite the balance
    Set { amount: Decimal },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui { import: None });

    init_tracing(&command)?;

    let db_path = shellexpand::tilde(&cli.db).into_owned();
    let db_connect_options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let connection = SqlitePool::connect_with(db_connect_options)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path))?;
    init::create_all(&connection)
        .await
        .context("Failed to initialize database schema")?;

    let store = PortfolioStore::new(connection);
    let portfolio_id = store.find_or_create_portfolio(&cli.portfolio).await?;
    let api = ApiProvider::parse_str(&cli.api)?;
    let mut portfolio = Portfolio::new(portfolio_id, cli.portfolio.clone(), store, api);

    match command {
        Command::Tui { import } => {
            portfolio.refresh().await?;
            let mut app = App::new(portfolio, import);
            app.run().await?;
        }
        Command::Buy {
            ticker,
            lots,
            price,
            name,
            notes,
            date,
        } => {
            let executed_at = trade_date(date.as_deref())?;
            let holding = portfolio
                .buy(&ticker, name.as_deref(), lots, price, notes, executed_at)
                .await?;
            println!(
                "{}: {} lots at average cost {}",
                holding.ticker(),
                holding.lots(),
                holding.average_cost()
            );
        }
        Command::Sell {
            ticker,
            lots,
            price,
            notes,
            date,
        } => {
            let executed_at = trade_date(date.as_deref())?;
            match portfolio
                .sell(&ticker, lots, price, notes, executed_at)
                .await?
            {
                Some(holding) => println!(
                    "{}: {} lots remaining at average cost {}",
                    holding.ticker(),
                    holding.lots(),
                    holding.average_cost()
                ),
                None => println!("{}: position closed", ticker.to_uppercase()),
            }
        }
        Command::Cash { op } => {
            let balance = match op {
                CashCommand::Add { amount } => portfolio.add_cash(amount).await?,
                CashCommand::Sub { amount } => portfolio.subtract_cash(amount).await?,
                CashCommand::Set { amount } => portfolio.set_cash(amount).await?,
            };
            println!("Cash balance: {}", balance);
        }
        Command::History { limit } => {
            for entry in portfolio.recent_transactions(limit).await? {
                let notes = entry.notes().as_deref().unwrap_or("");
                println!(
                    "{}  {:<4} {:<10} {:>6} lots @ {:>10} = {:>12}  {}",
                    entry.executed_at().format("%Y-%m-%d"),
                    entry.trade_type().to_str(),
                    entry.ticker(),
                    entry.lots(),
                    entry.price_per_share(),
                    entry.total_amount(),
                    notes
                );
            }
        }
        Command::Import { path } => {
            let applied = portfolio.import_trades(&path).await?;
            println!("Imported {} trades", applied);
        }
        Command::Growth { period } => {
            let period = GrowthPeriod::parse_str(&period)?;
            portfolio.set_period(period).await?;
            let growth = portfolio.growth();
            println!(
                "Growth ({}): {} ({}%)",
                period.to_str(),
                growth.value(),
                growth.percent().round_dp(2)
            );
        }
    }

    Ok(())
}

fn trade_date(date: Option<&str>) -> Result<DateTime<Local>> {
    match date {
        Some(raw) => parse_datetime(raw),
        None => Ok(Local::now()),
    }
}

// The TUI owns the terminal, so its logs go to a file.
fn init_tracing(command: &Command) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if matches!(command, Command::Tui { .. }) {
        let log_file = File::create("stock-tracker.log").context("Failed to create log file")?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Arc::new(log_file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}
