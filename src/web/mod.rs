//! Dashboard-facing HTTP API.

pub mod handlers;

use crate::services::stats::StatisticsService;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct ApiState {
    pub stats: Arc<StatisticsService>,
    /// Bearer token standing in for the session/OAuth layer, which lives
    /// with the web-server collaborator.
    pub dashboard_token: String,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/statistics", get(handlers::get_statistics))
        .route("/api/guilds", get(handlers::list_guilds))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StatsError, StatsResult};
    use crate::services::event_store::{
        EventKind, EventStore, GuildDirectory, GuildProfile, ModerationEvent, NewEvent,
    };
    use crate::services::memory_store::MemoryStore;
    use crate::services::report::NO_STATISTICS;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{DateTime, Utc};
    use std::time::Duration as StdDuration;
    use tower::util::ServiceExt;

    const TOKEN: &str = "secret-token";

    async fn router_with_store(store: Arc<MemoryStore>) -> Router {
        let stats = Arc::new(StatisticsService::with_ttl(
            Arc::clone(&store) as Arc<dyn EventStore>,
            store as Arc<dyn GuildDirectory>,
            StdDuration::ZERO,
        ));
        create_router(Arc::new(ApiState {
            stats,
            dashboard_token: TOKEN.to_string(),
        }))
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .register(GuildProfile {
                guild_id: 1001,
                name: "Test Server #1".to_string(),
                tz_offset_minutes: 0,
            })
            .await
            .unwrap();
        store
    }

    fn authed(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {TOKEN}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = router_with_store(seeded_store().await).await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_statistics_requires_auth() {
        let app = router_with_store(seeded_store().await).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/statistics?guildId=1001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_statistics_rejects_wrong_token() {
        let app = router_with_store(seeded_store().await).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/statistics?guildId=1001")
                    .header("authorization", "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_statistics_rejects_malformed_guild_id() {
        let app = router_with_store(seeded_store().await).await;
        let response = app
            .oneshot(authed("/api/statistics?guildId=not-a-number"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_statistics_unknown_guild_is_404() {
        let app = router_with_store(seeded_store().await).await;
        let response = app
            .oneshot(authed("/api/statistics?guildId=4040"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["code"], "GUILD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_statistics_reports_both_windows() {
        let store = seeded_store().await;
        store
            .append(NewEvent {
                guild_id: 1001,
                kind: EventKind::Ban,
                actor_id: 10,
                target_id: 20,
                recorded_at: Utc::now(),
            })
            .await
            .unwrap();

        let app = router_with_store(store).await;
        let response = app
            .oneshot(authed("/api/statistics?guildId=1001"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let today = body["today"].as_str().unwrap();
        let weekly = body["weekly"].as_str().unwrap();
        assert!(today.contains("🔨 Bans Performed: **1**"));
        assert!(weekly.contains("🔨 Bans Performed: **1**"));
    }

    #[tokio::test]
    async fn test_statistics_empty_guild_renders_sentinel() {
        let app = router_with_store(seeded_store().await).await;
        let response = app
            .oneshot(authed("/api/statistics?guildId=1001"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["today"], NO_STATISTICS);
        assert_eq!(body["weekly"], NO_STATISTICS);
    }

    #[tokio::test]
    async fn test_guilds_lists_membership() {
        let app = router_with_store(seeded_store().await).await;
        let response = app.oneshot(authed("/api/guilds")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let guilds = body.as_array().unwrap();
        assert_eq!(guilds.len(), 1);
        assert_eq!(guilds[0]["guildId"], 1001);
        assert_eq!(guilds[0]["name"], "Test Server #1");
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl EventStore for FailingStore {
        async fn append(&self, _event: NewEvent) -> StatsResult<()> {
            Err(StatsError::StoreUnavailable("connection refused".into()))
        }

        async fn query(
            &self,
            _guild_id: i64,
            _since: DateTime<Utc>,
            _until: DateTime<Utc>,
        ) -> StatsResult<Vec<ModerationEvent>> {
            Err(StatsError::StoreUnavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_5xx_with_generic_message() {
        let directory = seeded_store().await;
        let stats = Arc::new(StatisticsService::with_ttl(
            Arc::new(FailingStore) as Arc<dyn EventStore>,
            directory as Arc<dyn GuildDirectory>,
            StdDuration::ZERO,
        ));
        let app = create_router(Arc::new(ApiState {
            stats,
            dashboard_token: TOKEN.to_string(),
        }));

        let response = app
            .oneshot(authed("/api/statistics?guildId=1001"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["code"], "STORE_UNAVAILABLE");
        // Internal error text must not leak to callers
        assert!(!body["message"].as_str().unwrap().contains("connection refused"));
    }
}
