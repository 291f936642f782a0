//! When derived data and cached views go stale.
//!
//! Views are purged when the data behind them changed, and also when a
//! calendar week or month has started since the previous update, since
//! views show "this week" and "this month" figures. Weeks start on Monday
//! and every boundary is computed in UTC.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};

/// Whether contributions and ranks must be recomputed.
pub fn needs_update(ncommits: u64, gone_names: &BTreeSet<String>) -> bool {
    ncommits > 0 || !gone_names.is_empty()
}

/// Monday 00:00 UTC of the week containing `now`.
pub fn beginning_of_week(now: DateTime<Utc>) -> DateTime<Utc> {
    let days = i64::from(now.weekday().num_days_from_monday());
    let monday = now.date_naive() - Duration::days(days);
    Utc.from_utc_datetime(&monday.and_time(NaiveTime::MIN))
}

/// The 1st of the month containing `now`, 00:00 UTC.
pub fn beginning_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = now.date_naive() - Duration::days(i64::from(now.day0()));
    Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

/// True when the previous update happened before the current week or the
/// current month began. A first-ever update (`last` is `None`) counts as no
/// boundary crossed.
pub fn calendar_boundary_crossed(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last {
        Some(last) => last < beginning_of_week(now) || last < beginning_of_month(now),
        None => false,
    }
}

/// Whether the view cache must be purged after this update.
pub fn needs_cache_expiration(
    needs_update: bool,
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    needs_update || calendar_boundary_crossed(last, now)
}
