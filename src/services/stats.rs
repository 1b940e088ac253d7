//! Query façade shared by the chat command handler and the dashboard API.

use crate::error::{StatsError, StatsResult};
use crate::services::aggregator::{aggregate, Window};
use crate::services::event_store::{
    EventKind, EventStore, GuildDirectory, GuildProfile, NewEvent,
};
use crate::services::report::{format_window, Report};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);
const JANITOR_INTERVAL: Duration = Duration::from_secs(30);

struct CachedReport {
    report: Report,
    stored_at: Instant,
}

/// Single entry point for statistics queries and event ingestion.
///
/// Reports may be served from a short-lived per-guild cache; TTL expiry is
/// the staleness bound for events written outside this process, while
/// `record` invalidates eagerly so the in-process ingestion path is always
/// fresh.
pub struct StatisticsService {
    store: Arc<dyn EventStore>,
    directory: Arc<dyn GuildDirectory>,
    cache: Arc<DashMap<i64, CachedReport>>,
    ttl: Duration,
}

impl StatisticsService {
    pub fn new(store: Arc<dyn EventStore>, directory: Arc<dyn GuildDirectory>) -> Self {
        Self::with_ttl(store, directory, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(
        store: Arc<dyn EventStore>,
        directory: Arc<dyn GuildDirectory>,
        ttl: Duration,
    ) -> Self {
        let cache: Arc<DashMap<i64, CachedReport>> = Arc::new(DashMap::new());
        let janitor_cache = Arc::clone(&cache);

        // Evict expired entries so idle guilds do not pin memory
        tokio::spawn(async move {
            loop {
                sleep(JANITOR_INTERVAL).await;
                janitor_cache.retain(|_, entry| entry.stored_at.elapsed() < ttl);
            }
        });

        Self {
            store,
            directory,
            cache,
            ttl,
        }
    }

    /// Records one completed moderation action and invalidates the guild's
    /// cached report. The append is awaited: the triggering action is not
    /// finished until the event is durable or the failure is reported.
    pub async fn record(
        &self,
        kind: EventKind,
        guild_id: i64,
        actor_id: i64,
        target_id: i64,
    ) -> StatsResult<()> {
        self.store
            .append(NewEvent {
                guild_id,
                kind,
                actor_id,
                target_id,
                recorded_at: Utc::now(),
            })
            .await?;

        self.cache.remove(&guild_id);
        Ok(())
    }

    /// Today + weekly report for one guild, possibly served from cache.
    pub async fn get_report(&self, guild_id: i64) -> StatsResult<Report> {
        if let Some(entry) = self.cache.get(&guild_id) {
            if entry.stored_at.elapsed() < self.ttl {
                debug!(guild_id, "serving cached statistics report");
                return Ok(entry.report.clone());
            }
        }

        let report = self.report_at(guild_id, Utc::now()).await?;
        self.cache.insert(
            guild_id,
            CachedReport {
                report: report.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(report)
    }

    /// Computes a fresh report anchored at `now`. Both windows use the same
    /// instant so today and weekly counts cannot skew within one response.
    pub async fn report_at(&self, guild_id: i64, now: DateTime<Utc>) -> StatsResult<Report> {
        let profile = self
            .directory
            .guild(guild_id)
            .await?
            .ok_or(StatsError::GuildNotFound(guild_id))?;

        let today = aggregate(
            self.store.as_ref(),
            guild_id,
            Window::Today,
            now,
            profile.tz_offset_minutes,
        )
        .await?;
        let weekly = aggregate(
            self.store.as_ref(),
            guild_id,
            Window::Weekly,
            now,
            profile.tz_offset_minutes,
        )
        .await?;

        Ok(Report {
            today: format_window(&today),
            weekly: format_window(&weekly),
        })
    }

    /// Guilds known to the bot's membership.
    pub async fn guilds(&self) -> StatsResult<Vec<GuildProfile>> {
        self.directory.guilds().await
    }
}
