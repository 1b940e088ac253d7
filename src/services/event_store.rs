//! Domain types and the storage seams of the statistics engine.

use crate::error::StatsResult;
use chrono::{DateTime, Utc};

/// The moderation actions the engine knows how to label.
///
/// Stored on the wire as a stable snake_case string; `EventKind::parse`
/// returning `None` means the row was written by a newer deployment and is
/// tallied into the catch-all bucket instead of being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Warning,
    Kick,
    Ban,
    TicketOpened,
    ShieldAction,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Warning,
        EventKind::Kick,
        EventKind::Ban,
        EventKind::TicketOpened,
        EventKind::ShieldAction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Warning => "warning",
            EventKind::Kick => "kick",
            EventKind::Ban => "ban",
            EventKind::TicketOpened => "ticket_opened",
            EventKind::ShieldAction => "shield_action",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "warning" => Some(EventKind::Warning),
            "kick" => Some(EventKind::Kick),
            "ban" => Some(EventKind::Ban),
            "ticket_opened" => Some(EventKind::TicketOpened),
            "shield_action" => Some(EventKind::ShieldAction),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            EventKind::Warning => "🔸",
            EventKind::Kick => "🦶",
            EventKind::Ban => "🔨",
            EventKind::TicketOpened => "🎫",
            EventKind::ShieldAction => "🛡️",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventKind::Warning => "Warnings Issued",
            EventKind::Kick => "Kicks Performed",
            EventKind::Ban => "Bans Performed",
            EventKind::TicketOpened => "Tickets Opened",
            EventKind::ShieldAction => "Shield Actions",
        }
    }
}

/// A moderation event as it goes into the store. Timestamped by the caller
/// when the triggering action completes.
#[derive(Debug, Clone, Copy)]
pub struct NewEvent {
    pub guild_id: i64,
    pub kind: EventKind,
    pub actor_id: i64,
    pub target_id: i64,
    pub recorded_at: DateTime<Utc>,
}

/// A stored moderation event. `kind` is the raw stored string so that
/// unrecognized kinds survive the round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationEvent {
    pub guild_id: i64,
    pub kind: String,
    pub actor_id: i64,
    pub target_id: i64,
    pub recorded_at: DateTime<Utc>,
}

impl From<NewEvent> for ModerationEvent {
    fn from(event: NewEvent) -> Self {
        Self {
            guild_id: event.guild_id,
            kind: event.kind.as_str().to_owned(),
            actor_id: event.actor_id,
            target_id: event.target_id,
            recorded_at: event.recorded_at,
        }
    }
}

/// A guild the bot is a member of.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildProfile {
    pub guild_id: i64,
    pub name: String,
    /// Offset resolving the guild-local start of "today"; 0 = UTC midnight.
    pub tz_offset_minutes: i32,
}

/// Append-only durable log of moderation events.
#[async_trait::async_trait]
pub trait EventStore: Send + Sync {
    /// Durably persists one event. Must complete (or report failure) before
    /// the triggering moderation action is considered finished.
    async fn append(&self, event: NewEvent) -> StatsResult<()>;

    /// Events for one guild with `since <= recorded_at <= until`, ordered by
    /// timestamp ascending.
    async fn query(
        &self,
        guild_id: i64,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StatsResult<Vec<ModerationEvent>>;
}

/// The bot's guild membership, backing `GuildNotFound` checks.
#[async_trait::async_trait]
pub trait GuildDirectory: Send + Sync {
    async fn guild(&self, guild_id: i64) -> StatsResult<Option<GuildProfile>>;

    async fn guilds(&self) -> StatsResult<Vec<GuildProfile>>;

    /// Upsert, called by the gateway collaborator on guild join.
    async fn register(&self, profile: GuildProfile) -> StatsResult<()>;
}
