//! # Guesthouse Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, starts the
//! daily jobs and the health server, and runs the Telegram bot.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guesthouse_bot::bot::context::AppContext;
use guesthouse_bot::bot::handlers::BotHandler;
use guesthouse_bot::bot::state::DialogueStorage;
use guesthouse_bot::config::Config;
use guesthouse_bot::database::connection::DatabaseManager;
use guesthouse_bot::services::health::HealthService;
use guesthouse_bot::services::jobs::{DailyJobsService, JobSettings};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guesthouse_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Guesthouse Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, admins: {}, completion policy: {}",
        config.database_url,
        config.http_port,
        config.admin_ids.len(),
        config.completion_policy
    );

    // SQLite creates the file but not its directory.
    if let Some(parent) = config
        .database_url
        .strip_prefix("sqlite:")
        .map(|path| path.trim_start_matches("//"))
        .and_then(|path| Path::new(path).parent())
    {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    let bot = Bot::new(&config.telegram_bot_token);
    let ctx = AppContext::new(
        db_arc.as_ref().clone(),
        &config.admin_ids,
        config.utc_offset_hours,
    );
    let handler = BotHandler::new(ctx);

    info!("Initializing daily jobs...");
    let mut jobs = match DailyJobsService::new(bot.clone(), db_arc.clone(), JobSettings::from(&config)).await {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Failed to create daily jobs service: {}", e);
            return Err(anyhow::anyhow!("Failed to create daily jobs service: {}", e));
        }
    };

    if let Err(e) = jobs.start().await {
        tracing::error!("Failed to start daily jobs: {}", e);
        return Err(anyhow::anyhow!("Failed to start daily jobs: {}", e));
    }

    let health_service = HealthService::new(db_arc.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        let storage: Arc<DialogueStorage> = DialogueStorage::new();
        Dispatcher::builder(bot, handler.schema())
            .dependencies(dptree::deps![storage])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = jobs.stop().await {
        tracing::warn!("Error stopping daily jobs: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
