//! In-memory implementation of the store seams.
//!
//! One append-only log per guild partition, so concurrent appends for
//! different guilds never contend and appends within one guild serialize on
//! the partition entry. Backs demo mode and the engine tests.

use crate::error::StatsResult;
use crate::services::event_store::{
    EventStore, GuildDirectory, GuildProfile, ModerationEvent, NewEvent,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryStore {
    events: DashMap<i64, Vec<ModerationEvent>>,
    guilds: DashMap<i64, GuildProfile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl EventStore for MemoryStore {
    async fn append(&self, event: NewEvent) -> StatsResult<()> {
        self.events
            .entry(event.guild_id)
            .or_default()
            .push(event.into());
        Ok(())
    }

    async fn query(
        &self,
        guild_id: i64,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StatsResult<Vec<ModerationEvent>> {
        let mut events: Vec<ModerationEvent> = match self.events.get(&guild_id) {
            Some(log) => log
                .iter()
                .filter(|e| e.recorded_at >= since && e.recorded_at <= until)
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        // Appends are not required to arrive in timestamp order
        events.sort_by_key(|e| e.recorded_at);
        Ok(events)
    }
}

#[async_trait::async_trait]
impl GuildDirectory for MemoryStore {
    async fn guild(&self, guild_id: i64) -> StatsResult<Option<GuildProfile>> {
        Ok(self.guilds.get(&guild_id).map(|entry| entry.value().clone()))
    }

    async fn guilds(&self) -> StatsResult<Vec<GuildProfile>> {
        let mut profiles: Vec<GuildProfile> =
            self.guilds.iter().map(|entry| entry.value().clone()).collect();
        profiles.sort_by_key(|p| p.guild_id);
        Ok(profiles)
    }

    async fn register(&self, profile: GuildProfile) -> StatsResult<()> {
        self.guilds.insert(profile.guild_id, profile);
        Ok(())
    }
}
