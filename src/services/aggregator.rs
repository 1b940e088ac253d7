//! Time-windowed tallies of moderation events.

use crate::error::{StatsError, StatsResult};
use crate::services::event_store::{EventKind, EventStore};
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Offset, TimeZone, Utc};

/// The time windows a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Today,
    Weekly,
}

impl Window {
    /// Parses a caller-supplied window name at the boundary.
    pub fn parse(s: &str) -> StatsResult<Self> {
        match s {
            "today" => Ok(Window::Today),
            "weekly" => Ok(Window::Weekly),
            other => Err(StatsError::InvalidWindow(other.to_string())),
        }
    }
}

/// `[since, until]` bounds for a window anchored at `now`.
///
/// Today starts at guild-local midnight resolved through `tz_offset_minutes`
/// (0 = UTC midnight). Weekly is a strict rolling seven-day lookback, not
/// calendar aligned.
pub fn window_bounds(
    window: Window,
    now: DateTime<Utc>,
    tz_offset_minutes: i32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    match window {
        Window::Weekly => (now - Duration::days(7), now),
        Window::Today => {
            let offset = FixedOffset::east_opt(tz_offset_minutes * 60)
                .unwrap_or_else(|| Utc.fix());
            let local = now.with_timezone(&offset);
            let midnight = local.date_naive().and_time(NaiveTime::MIN);
            let start = offset
                .from_local_datetime(&midnight)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(now);
            (start, now)
        }
    }
}

/// Per-kind counts for one guild and window. Derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateResult {
    counts: [u64; 5],
    other: u64,
}

impl AggregateResult {
    /// Tallies one raw kind string; unrecognized kinds land in the
    /// catch-all bucket so newer deployments cannot break the report.
    pub fn record_kind(&mut self, raw: &str) {
        match EventKind::parse(raw) {
            Some(kind) => self.counts[kind as usize] += 1,
            None => self.other += 1,
        }
    }

    #[must_use]
    pub fn count(&self, kind: EventKind) -> u64 {
        self.counts[kind as usize]
    }

    #[must_use]
    pub fn other(&self) -> u64 {
        self.other
    }

    /// True when every bucket is zero: "no activity yet", not an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.other == 0 && self.counts.iter().all(|&n| n == 0)
    }
}

/// Counts events of each kind for one guild within the window anchored at
/// `now`. A guild with no events yields a zero-filled result.
pub async fn aggregate(
    store: &dyn EventStore,
    guild_id: i64,
    window: Window,
    now: DateTime<Utc>,
    tz_offset_minutes: i32,
) -> StatsResult<AggregateResult> {
    let (since, until) = window_bounds(window, now, tz_offset_minutes);
    let events = store.query(guild_id, since, until).await?;

    let mut result = AggregateResult::default();
    for event in &events {
        result.record_kind(&event.kind);
    }
    Ok(result)
}
