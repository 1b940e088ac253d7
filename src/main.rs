use anyhow::Context as _;
use clap::Parser as _;
use dotenvy::dotenv;
use modstats::config::Config;
use modstats::db;
use modstats::demo;
use modstats::services::db_store::DbStore;
use modstats::services::event_store::{EventStore, GuildDirectory};
use modstats::services::memory_store::MemoryStore;
use modstats::services::stats::StatisticsService;
use modstats::web::{self, ApiState};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run against an in-memory store seeded with demo data; no database
    /// or gateway required.
    #[arg(long)]
    demo: bool,

    /// Rollback the specified number of migrations and run all migrations again.
    #[arg(long, num_args = 0..=1, default_missing_value = "1")]
    refresh_migrations: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::fmt::init();

    info!("Starting moderation statistics service...");

    let config = Config::from_env();

    let (store, directory): (Arc<dyn EventStore>, Arc<dyn GuildDirectory>) = if args.demo {
        info!("Demo mode: using seeded in-memory store");
        let memory = Arc::new(MemoryStore::new());
        demo::seed(&memory).await?;
        (
            Arc::clone(&memory) as Arc<dyn EventStore>,
            memory as Arc<dyn GuildDirectory>,
        )
    } else {
        let conn = db::establish_connection(&config.database_url)
            .await
            .context("Failed to connect to moderation store")?;

        use sea_orm_migration::MigratorTrait;
        if let Some(depth) = args.refresh_migrations {
            info!("Refreshing migrations (down {}, then up)...", depth);
            db::migrations::Migrator::down(&conn, Some(depth))
                .await
                .context("Failed to rollback migration")?;
        }

        db::migrations::Migrator::up(&conn, None)
            .await
            .context("Failed to run migrations")?;

        if args.refresh_migrations.is_some() {
            info!("Migrations refreshed successfully.");
            return Ok(());
        }

        let db_store = Arc::new(DbStore::new(
            conn,
            Duration::from_secs(config.store_timeout_secs),
        ));
        (
            Arc::clone(&db_store) as Arc<dyn EventStore>,
            db_store as Arc<dyn GuildDirectory>,
        )
    };

    let stats = Arc::new(StatisticsService::with_ttl(
        store,
        directory,
        Duration::from_secs(config.cache_ttl_secs),
    ));

    let state = Arc::new(ApiState {
        stats,
        dashboard_token: config.dashboard_token.clone(),
    });
    let app = web::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Dashboard API listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
