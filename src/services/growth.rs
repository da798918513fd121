use chrono::{DateTime, Duration, Local, TimeZone, Timelike};
use rust_decimal::Decimal;

use crate::models::{Growth, GrowthPeriod, Snapshot};

const SESSION_OPEN_HOUR: u32 = 9;
const SESSION_CLOSE_HOUR: u32 = 16;

pub fn window_start(period: GrowthPeriod, now: DateTime<Local>) -> Option<DateTime<Local>> {
    match period {
        GrowthPeriod::Today => {
            // Midnight can fall in a DST gap; fall back to a bounded day.
            let start = now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
                .unwrap_or_else(|| now - Duration::days(1));
            Some(start)
        }
        GrowthPeriod::Day => Some(now - Duration::days(1)),
        GrowthPeriod::Week => Some(now - Duration::days(7)),
        GrowthPeriod::Month => Some(now - Duration::days(30)),
        GrowthPeriod::Year => Some(now - Duration::days(365)),
        GrowthPeriod::All => None,
    }
}

pub fn filter_window(
    snapshots: &[Snapshot],
    period: GrowthPeriod,
    now: DateTime<Local>,
) -> Vec<Snapshot> {
    let cutoff = window_start(period, now);
    let windowed: Vec<Snapshot> = snapshots
        .iter()
        .filter(|snapshot| {
            let in_window = match cutoff {
                Some(start) => *snapshot.taken_at() >= start,
                None => true,
            };
            let in_session =
                period != GrowthPeriod::Today || in_session_hours(snapshot.taken_at());
            in_window && in_session
        })
        .cloned()
        .collect();

    // Keep an anchor point when the window is empty.
    if windowed.is_empty() {
        return snapshots.last().cloned().into_iter().collect();
    }
    windowed
}

fn in_session_hours(taken_at: &DateTime<Local>) -> bool {
    (SESSION_OPEN_HOUR..=SESSION_CLOSE_HOUR).contains(&taken_at.hour())
}

pub fn growth_over(snapshots: &[Snapshot]) -> Growth {
    if snapshots.len() < 2 {
        return Growth::default();
    }
    let first = &snapshots[0];
    let last = &snapshots[snapshots.len() - 1];

    let value = *last.total_value() - *first.total_value();
    let percent = if *first.total_value() > Decimal::ZERO {
        value / *first.total_value() * Decimal::from(100)
    } else {
        Decimal::ZERO
    };
    Growth::new(value, percent)
}
