//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::SeedService;
use crate::config::Settings;
use crate::domain::services::NoteExtractor;
use crate::infrastructure::ai::OpenAiNoteExtractor;
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    PgBlogPostRepository, PgCategoryRepository, PgTagRepository, PgUserRepository,
};
use crate::presentation::http::{create_router, handlers::health};
use crate::presentation::middleware::RateLimiters;
use crate::shared::error::AppError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub settings: Arc<Settings>,
    pub note_extractor: Arc<dyn NoteExtractor>,
    pub rate_limiters: Arc<RateLimiters>,
}

impl AppState {
    pub fn new(db: PgPool, settings: Settings, note_extractor: Arc<dyn NoteExtractor>) -> Self {
        Self {
            rate_limiters: Arc::new(RateLimiters::from_settings(&settings.rate_limit)),
            db,
            settings: Arc::new(settings),
            note_extractor,
        }
    }

    /// State backed by the configured LLM provider
    pub fn from_settings(db: PgPool, settings: Settings) -> Result<Self, AppError> {
        let note_extractor = Arc::new(OpenAiNoteExtractor::new(&settings.ai)?);
        Ok(Self::new(db, settings, note_extractor))
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db).await?;
            tracing::info!("Database migrations applied");
        }

        if settings.seed.enabled {
            seed(&db, &settings).await?;
        }

        if settings.is_production() && !settings.security.enable_hsts {
            tracing::warn!("HSTS is disabled in production");
        }

        let state = AppState::from_settings(db, settings.clone())?;
        if !state.note_extractor.is_configured() {
            tracing::warn!("No AI API key configured; note analysis will return 503");
        }

        let window = Duration::from_secs(settings.rate_limit.window_seconds.max(1));
        state.rate_limiters.spawn_cleanup(window);

        health::init_server_start();
        let router = create_router(state);

        let listener = TcpListener::bind(settings.server_addr()).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn seed(db: &PgPool, settings: &Settings) -> Result<()> {
    let seeder = SeedService::new(
        Arc::new(PgUserRepository::new(db.clone())),
        Arc::new(PgCategoryRepository::new(db.clone())),
        Arc::new(PgTagRepository::new(db.clone())),
        Arc::new(PgBlogPostRepository::new(db.clone())),
    );
    seeder.run(&settings.seed).await?;
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
