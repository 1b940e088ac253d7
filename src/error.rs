//! Engine error taxonomy.

use sea_orm::DbErr;

/// Errors surfaced by the statistics engine.
///
/// `StoreUnavailable` is transient and retriable by the caller with backoff;
/// the engine itself never retries silently. `GuildNotFound` is permanent for
/// the request. `InvalidWindow` only occurs when a caller-supplied window
/// name is parsed at the boundary; inside the engine the window set is a
/// closed enum.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("moderation store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("guild {0} is not registered with the bot")]
    GuildNotFound(i64),

    #[error("unsupported statistics window: {0}")]
    InvalidWindow(String),
}

impl StatsError {
    /// HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::StoreUnavailable(_) => 503,
            Self::GuildNotFound(_) => 404,
            Self::InvalidWindow(_) => 400,
        }
    }

    /// Stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::GuildNotFound(_) => "GUILD_NOT_FOUND",
            Self::InvalidWindow(_) => "INVALID_WINDOW",
        }
    }
}

impl From<DbErr> for StatsError {
    fn from(err: DbErr) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

/// Result type alias for engine operations.
pub type StatsResult<T> = Result<T, StatsError>;
