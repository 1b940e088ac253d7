use crate::error::StatsError;
use crate::services::event_store::GuildProfile;
use crate::services::report::Report;
use crate::web::ApiState;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Client-facing error: a status, a stable code, and a message that never
/// carries internal error text.
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTHORIZED",
            message: "Authentication required".to_string(),
        }
    }

    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "INVALID_REQUEST",
            message: message.to_string(),
        }
    }
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        let message = match &err {
            // The dashboard shows a generic failure state; outage details
            // stay in the logs
            StatsError::StoreUnavailable(detail) => {
                warn!(%detail, "statistics request failed: store unavailable");
                "Unable to load statistics. Please try again later.".to_string()
            }
            other => other.to_string(),
        };

        Self {
            status: StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code: err.error_code(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": self.code,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

fn authorize(state: &ApiState, headers: &HeaderMap) -> Result<(), ApiError> {
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == state.dashboard_token => Ok(()),
        _ => Err(ApiError::unauthorized()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    guild_id: String,
}

pub async fn get_statistics(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<Report>, ApiError> {
    authorize(&state, &headers)?;

    let guild_id: i64 = query
        .guild_id
        .parse()
        .map_err(|_| ApiError::bad_request("guildId must be a numeric guild id"))?;

    let report = state.stats.get_report(guild_id).await?;
    Ok(Json(report))
}

pub async fn list_guilds(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<GuildProfile>>, ApiError> {
    authorize(&state, &headers)?;

    let guilds = state.stats.guilds().await?;
    Ok(Json(guilds))
}
