pub mod guilds;
pub mod moderation_events;
