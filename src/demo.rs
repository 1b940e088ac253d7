//! Demo-mode seeding: representative guilds and events for running the
//! dashboard API without a gateway or database.

use crate::error::StatsResult;
use crate::services::event_store::{EventKind, EventStore, GuildDirectory, GuildProfile, NewEvent};
use crate::services::memory_store::MemoryStore;
use chrono::{Duration, Utc};
use tracing::info;

pub async fn seed(store: &MemoryStore) -> StatsResult<()> {
    let guilds = [
        GuildProfile {
            guild_id: 1001,
            name: "Test Server #1".to_string(),
            tz_offset_minutes: 0,
        },
        GuildProfile {
            guild_id: 1002,
            name: "Awesome Community".to_string(),
            tz_offset_minutes: 120,
        },
        GuildProfile {
            guild_id: 1003,
            name: "Gaming Hub".to_string(),
            tz_offset_minutes: -300,
        },
    ];
    for guild in guilds {
        store.register(guild).await?;
    }

    let now = Utc::now();
    let events = [
        // Recent activity lands in both windows
        (1001, EventKind::Warning, Duration::minutes(30)),
        (1001, EventKind::Warning, Duration::hours(1)),
        (1001, EventKind::Kick, Duration::hours(2)),
        (1001, EventKind::TicketOpened, Duration::minutes(45)),
        // Earlier in the week: weekly only
        (1001, EventKind::Ban, Duration::days(2)),
        (1001, EventKind::Warning, Duration::days(3)),
        (1001, EventKind::ShieldAction, Duration::days(5)),
        (1002, EventKind::TicketOpened, Duration::hours(3)),
        (1002, EventKind::Ban, Duration::days(1)),
        // Outside the weekly lookback: never reported
        (1002, EventKind::Kick, Duration::days(10)),
    ];
    for (i, (guild_id, kind, age)) in events.into_iter().enumerate() {
        store
            .append(NewEvent {
                guild_id,
                kind,
                actor_id: 9000,
                target_id: 9100 + i as i64,
                recorded_at: now - age,
            })
            .await?;
    }

    info!("Seeded demo data: 3 guilds, 10 events");
    Ok(())
}
