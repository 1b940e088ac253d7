//! Relational implementation of the store seams.

use crate::db::entities::{guilds, moderation_events};
use crate::error::{StatsError, StatsResult};
use crate::services::event_store::{
    EventStore, GuildDirectory, GuildProfile, ModerationEvent, NewEvent,
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::future::Future;
use std::time::Duration;

/// Event store and guild directory backed by the relational moderation store.
///
/// Every operation runs under a bounded timeout and surfaces
/// `StoreUnavailable` instead of hanging; both the chat command path and the
/// HTTP path have caller-side timeouts that must not be silently exceeded.
pub struct DbStore {
    db: DatabaseConnection,
    op_timeout: Duration,
}

impl DbStore {
    pub fn new(db: DatabaseConnection, op_timeout: Duration) -> Self {
        Self { db, op_timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> StatsResult<T>
    where
        F: Future<Output = Result<T, sea_orm::DbErr>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(StatsError::from),
            Err(_) => Err(StatsError::StoreUnavailable(
                "store operation timed out".to_string(),
            )),
        }
    }
}

#[async_trait::async_trait]
impl EventStore for DbStore {
    async fn append(&self, event: NewEvent) -> StatsResult<()> {
        let model = moderation_events::ActiveModel {
            guild_id: Set(event.guild_id),
            kind: Set(event.kind.as_str().to_owned()),
            actor_id: Set(event.actor_id),
            target_id: Set(event.target_id),
            recorded_at: Set(event.recorded_at.naive_utc()),
            ..Default::default()
        };

        self.bounded(model.insert(&self.db)).await?;
        Ok(())
    }

    async fn query(
        &self,
        guild_id: i64,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StatsResult<Vec<ModerationEvent>> {
        let rows = self
            .bounded(
                moderation_events::Entity::find()
                    .filter(moderation_events::Column::GuildId.eq(guild_id))
                    .filter(moderation_events::Column::RecordedAt.gte(since.naive_utc()))
                    .filter(moderation_events::Column::RecordedAt.lte(until.naive_utc()))
                    .order_by_asc(moderation_events::Column::RecordedAt)
                    .all(&self.db),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ModerationEvent {
                guild_id: row.guild_id,
                kind: row.kind,
                actor_id: row.actor_id,
                target_id: row.target_id,
                recorded_at: Utc.from_utc_datetime(&row.recorded_at),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl GuildDirectory for DbStore {
    async fn guild(&self, guild_id: i64) -> StatsResult<Option<GuildProfile>> {
        let row = self
            .bounded(guilds::Entity::find_by_id(guild_id).one(&self.db))
            .await?;

        Ok(row.map(|row| GuildProfile {
            guild_id: row.guild_id,
            name: row.name,
            tz_offset_minutes: row.tz_offset_minutes,
        }))
    }

    async fn guilds(&self) -> StatsResult<Vec<GuildProfile>> {
        let rows = self
            .bounded(
                guilds::Entity::find()
                    .order_by_asc(guilds::Column::GuildId)
                    .all(&self.db),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| GuildProfile {
                guild_id: row.guild_id,
                name: row.name,
                tz_offset_minutes: row.tz_offset_minutes,
            })
            .collect())
    }

    async fn register(&self, profile: GuildProfile) -> StatsResult<()> {
        let existing = self
            .bounded(guilds::Entity::find_by_id(profile.guild_id).one(&self.db))
            .await?;

        match existing {
            Some(row) => {
                let mut active: guilds::ActiveModel = row.into();
                active.name = Set(profile.name);
                active.tz_offset_minutes = Set(profile.tz_offset_minutes);
                self.bounded(active.update(&self.db)).await?;
            }
            None => {
                let active = guilds::ActiveModel {
                    guild_id: Set(profile.guild_id),
                    name: Set(profile.name),
                    tz_offset_minutes: Set(profile.tz_offset_minutes),
                };
                self.bounded(active.insert(&self.db)).await?;
            }
        }

        Ok(())
    }
}
