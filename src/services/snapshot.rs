use chrono::{DateTime, Duration, Local};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, warn};

use crate::db::{PortfolioStore, StoreError};
use crate::models::Snapshot;

use super::accounting::round_currency;

const THROTTLE_WINDOW_MS: i64 = 5_000;
// Relative change below this ratio (0.01%) is not material.
const MIN_CHANGE_RATIO: Decimal = dec!(0.0001);
const RETENTION_DAYS: i64 = 365;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SnapshotOutcome {
    Recorded(Snapshot),
    Skipped(SkipReason),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    NonPositiveValue,
    NoMaterialChange,
}

impl SkipReason {
    pub fn to_str(&self) -> &str {
        match self {
            SkipReason::NonPositiveValue => "non-positive value",
            SkipReason::NoMaterialChange => "too recent, no material change",
        }
    }
}

pub struct SnapshotRecorder {
    store: PortfolioStore,
}

impl SnapshotRecorder {
    pub fn new(store: PortfolioStore) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        portfolio_id: i64,
        stock_value: Decimal,
        cash_value: Decimal,
        now: DateTime<Local>,
    ) -> Result<SnapshotOutcome, StoreError> {
        let total_value = round_currency(stock_value + cash_value);
        if total_value <= Decimal::ZERO {
            debug!(portfolio_id, "snapshot skipped: non-positive value");
            return Ok(SnapshotOutcome::Skipped(SkipReason::NonPositiveValue));
        }

        let since = now - Duration::milliseconds(THROTTLE_WINDOW_MS);
        if let Some(recent) = self.store.latest_snapshot_since(portfolio_id, since).await? {
            let change_ratio = (total_value - *recent.total_value()).abs() / *recent.total_value();
            if change_ratio < MIN_CHANGE_RATIO {
                debug!(
                    portfolio_id,
                    %total_value,
                    "snapshot skipped: too recent, no material change"
                );
                return Ok(SnapshotOutcome::Skipped(SkipReason::NoMaterialChange));
            }
        }

        let snapshot = self
            .store
            .insert_snapshot(
                portfolio_id,
                now,
                total_value,
                round_currency(stock_value),
                round_currency(cash_value),
            )
            .await?;
        info!(portfolio_id, %total_value, "snapshot recorded");

        // Retention is best-effort; a failed prune never fails the record.
        let cutoff = now - Duration::days(RETENTION_DAYS);
        match self.store.delete_snapshots_before(portfolio_id, cutoff).await {
            Ok(pruned) if pruned > 0 => debug!(portfolio_id, pruned, "stale snapshots pruned"),
            Ok(_) => {}
            Err(err) => warn!(portfolio_id, %err, "snapshot pruning failed"),
        }

        Ok(SnapshotOutcome::Recorded(snapshot))
    }
}
