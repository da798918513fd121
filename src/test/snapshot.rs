#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
    use tempfile::NamedTempFile;

    use crate::db::{PortfolioStore, init};
    use crate::services::snapshot::{SkipReason, SnapshotOutcome, SnapshotRecorder};

    async fn recorder_fixture() -> (NamedTempFile, PortfolioStore, SnapshotRecorder, i64) {
        let file = NamedTempFile::new().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(file.path())
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();
        init::create_all(&pool).await.unwrap();

        let store = PortfolioStore::new(pool);
        let portfolio_id = store.find_or_create_portfolio("test").await.unwrap();
        let recorder = SnapshotRecorder::new(store.clone());
        (file, store, recorder, portfolio_id)
    }

    #[tokio::test]
    async fn first_snapshot_is_recorded() {
        let (_file, _store, recorder, pid) = recorder_fixture().await;

        let outcome = recorder
            .record(pid, dec!(600), dec!(400), Local::now())
            .await
            .unwrap();

        match outcome {
            SnapshotOutcome::Recorded(snapshot) => {
                assert_eq!(*snapshot.total_value(), dec!(1000));
                assert_eq!(*snapshot.stock_value(), dec!(600));
                assert_eq!(*snapshot.cash_value(), dec!(400));
            }
            SnapshotOutcome::Skipped(reason) => panic!("unexpected skip: {}", reason.to_str()),
        }
    }

    #[tokio::test]
    async fn non_positive_value_is_never_written() {
        let (_file, store, recorder, pid) = recorder_fixture().await;

        let outcome = recorder
            .record(pid, dec!(0), dec!(0), Local::now())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SnapshotOutcome::Skipped(SkipReason::NonPositiveValue)
        );
        assert!(store.snapshots_asc(pid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unchanged_value_within_window_is_skipped() {
        let (_file, store, recorder, pid) = recorder_fixture().await;
        let now = Local::now();

        recorder.record(pid, dec!(500), dec!(500), now).await.unwrap();
        let outcome = recorder
            .record(pid, dec!(500), dec!(500), now + Duration::seconds(1))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SnapshotOutcome::Skipped(SkipReason::NoMaterialChange)
        );
        assert_eq!(store.snapshots_asc(pid).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn material_change_within_window_is_recorded() {
        let (_file, store, recorder, pid) = recorder_fixture().await;
        let now = Local::now();

        recorder.record(pid, dec!(500), dec!(500), now).await.unwrap();
        let outcome = recorder
            .record(pid, dec!(600), dec!(500), now + Duration::seconds(1))
            .await
            .unwrap();

        assert!(matches!(outcome, SnapshotOutcome::Recorded(_)));
        assert_eq!(store.snapshots_asc(pid).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unchanged_value_outside_window_is_recorded() {
        let (_file, store, recorder, pid) = recorder_fixture().await;
        let now = Local::now();

        recorder.record(pid, dec!(500), dec!(500), now).await.unwrap();
        let outcome = recorder
            .record(pid, dec!(500), dec!(500), now + Duration::seconds(6))
            .await
            .unwrap();

        assert!(matches!(outcome, SnapshotOutcome::Recorded(_)));
        assert_eq!(store.snapshots_asc(pid).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn change_below_one_basis_point_fraction_is_skipped() {
        let (_file, store, recorder, pid) = recorder_fixture().await;
        let now = Local::now();

        recorder
            .record(pid, dec!(1000000), dec!(0), now)
            .await
            .unwrap();

        // 50 / 1000000 = 0.005%, below the 0.01% threshold
        let skipped = recorder
            .record(pid, dec!(1000050), dec!(0), now + Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(
            skipped,
            SnapshotOutcome::Skipped(SkipReason::NoMaterialChange)
        );

        // 200 / 1000000 = 0.02%, above it
        let recorded = recorder
            .record(pid, dec!(1000200), dec!(0), now + Duration::seconds(2))
            .await
            .unwrap();
        assert!(matches!(recorded, SnapshotOutcome::Recorded(_)));
        assert_eq!(store.snapshots_asc(pid).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn snapshots_past_retention_are_pruned() {
        let (_file, store, recorder, pid) = recorder_fixture().await;
        let now = Local::now();

        store
            .insert_snapshot(pid, now - Duration::days(400), dec!(900), dec!(900), dec!(0))
            .await
            .unwrap();

        recorder.record(pid, dec!(500), dec!(500), now).await.unwrap();

        let remaining = store.snapshots_asc(pid).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(*remaining[0].total_value(), dec!(1000));
    }
}
