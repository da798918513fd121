#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
    use tempfile::NamedTempFile;

    use crate::app::Portfolio;
    use crate::db::{PortfolioStore, init};
    use crate::models::{ApiProvider, TradeType};

    async fn portfolio_fixture() -> (NamedTempFile, PortfolioStore, Portfolio, i64) {
        let file = NamedTempFile::new().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(file.path())
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();
        init::create_all(&pool).await.unwrap();

        let store = PortfolioStore::new(pool);
        let portfolio_id = store.find_or_create_portfolio("test").await.unwrap();
        let portfolio = Portfolio::new(
            portfolio_id,
            String::from("test"),
            store.clone(),
            ApiProvider::default(),
        );
        (file, store, portfolio, portfolio_id)
    }

    #[tokio::test]
    async fn buy_and_sell_couple_cash_to_the_ledger() {
        let (_file, store, mut portfolio, pid) = portfolio_fixture().await;
        let now = Local::now();

        portfolio.set_cash(dec!(500000)).await.unwrap();

        // 2 lots of 100 shares at 1000 debit 200000
        let bought = portfolio
            .buy("005930", Some("Samsung Electronics"), 2, dec!(1000), None, now)
            .await
            .unwrap();
        assert_eq!(*bought.lots(), 2);
        assert_eq!(*bought.average_cost(), dec!(1000));
        assert_eq!(store.cash_balance(pid).await.unwrap(), dec!(300000));

        // 1 lot at 1100 credits 110000, average cost untouched
        let remaining = portfolio
            .sell("005930", 1, dec!(1100), None, now + Duration::seconds(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(*remaining.lots(), 1);
        assert_eq!(*remaining.average_cost(), dec!(1000));
        assert_eq!(store.cash_balance(pid).await.unwrap(), dec!(410000));
        assert_eq!(portfolio.cash_value(), dec!(410000));

        let ledger = store.list_transactions(pid, 10).await.unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(*ledger[0].trade_type(), TradeType::Sell);
        assert_eq!(*ledger[0].total_amount(), dec!(110000));
        assert_eq!(*ledger[1].trade_type(), TradeType::Buy);
        assert_eq!(*ledger[1].total_amount(), dec!(200000));
    }

    #[tokio::test]
    async fn oversell_closes_position_and_credits_requested_lots() {
        let (_file, store, mut portfolio, pid) = portfolio_fixture().await;
        let now = Local::now();

        portfolio
            .buy("005930", None, 1, dec!(1000), None, now)
            .await
            .unwrap();

        let closed = portfolio
            .sell("005930", 5, dec!(1200), None, now + Duration::seconds(1))
            .await
            .unwrap();
        assert!(closed.is_none());
        assert!(store.find_holding(pid, "005930").await.unwrap().is_none());

        // The ledger and the cash credit both carry the requested 5 lots.
        assert_eq!(store.cash_balance(pid).await.unwrap(), dec!(600000));
        let ledger = store.list_transactions(pid, 1).await.unwrap();
        assert_eq!(*ledger[0].lots(), 5);
        assert_eq!(*ledger[0].total_amount(), dec!(600000));
    }

    #[tokio::test]
    async fn buy_larger_than_balance_floors_cash_at_zero() {
        let (_file, store, mut portfolio, pid) = portfolio_fixture().await;

        portfolio.set_cash(dec!(100000)).await.unwrap();
        portfolio
            .buy("005930", None, 2, dec!(1000), None, Local::now())
            .await
            .unwrap();

        assert_eq!(store.cash_balance(pid).await.unwrap(), Decimal::ZERO);
        assert_eq!(portfolio.cash_value(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn sell_without_holding_is_rejected() {
        let (_file, store, mut portfolio, pid) = portfolio_fixture().await;

        let result = portfolio
            .sell("005930", 1, dec!(1000), None, Local::now())
            .await;

        assert!(result.is_err());
        assert!(store.list_transactions(pid, 10).await.unwrap().is_empty());
        assert_eq!(store.cash_balance(pid).await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn import_replays_trades_in_date_order() {
        let (_file, store, mut portfolio, pid) = portfolio_fixture().await;

        let csv_file = NamedTempFile::new().unwrap();
        std::fs::write(
            csv_file.path(),
            "date,type,ticker,name,lots,price,notes\n\
             2025-03-12,Sell,005930,,5,1200,\n\
             2025-03-10,Buy,005930,Samsung Electronics,10,1000,first fill\n\
             2025-03-09,Sell,066570,,1,50000,\n\
             2025-03-11,Buy,005930,,5,1300,\n",
        )
        .unwrap();

        let applied = portfolio
            .import_trades(csv_file.path().to_str().unwrap())
            .await
            .unwrap();

        // The sell of an unheld ticker is skipped; the other three apply
        // oldest first: buy 10 @ 1000, buy 5 @ 1300, sell 5 @ 1200.
        assert_eq!(applied, 3);

        let holding = store.find_holding(pid, "005930").await.unwrap().unwrap();
        assert_eq!(*holding.lots(), 10);
        assert_eq!(*holding.average_cost(), dec!(1100));
        assert_eq!(holding.name(), "Samsung Electronics");

        assert_eq!(store.cash_balance(pid).await.unwrap(), dec!(600000));

        let ledger = store.list_transactions(pid, 10).await.unwrap();
        assert_eq!(ledger.len(), 3);
        assert_eq!(*ledger[0].trade_type(), TradeType::Sell);
        assert_eq!(ledger[2].notes().as_deref(), Some("first fill"));
    }
}
