//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::{
    AuthService, AuthServiceImpl, FriendshipService, FriendshipServiceImpl, PostService,
    PostServiceImpl, UserService, UserServiceImpl,
};
use crate::config::Settings;
use crate::domain::{AccessPolicy, Repositories};
use crate::infrastructure::{database, repositories};
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub posts: Arc<dyn PostService>,
    pub friendships: Arc<dyn FriendshipService>,
    pub settings: Arc<Settings>,
    /// Shown on the home route
    pub database_name: Arc<str>,
}

impl AppState {
    /// Wire every service onto the given repositories.
    pub fn new(repos: Repositories, settings: Settings) -> Self {
        let id_generator = Arc::new(SnowflakeGenerator::new(
            u64::from(settings.snowflake.machine_id),
            0,
        ));
        let policy = AccessPolicy::new(settings.auth.admin_email.clone());
        let database_name: Arc<str> = settings
            .database
            .database_name()
            .unwrap_or("unknown")
            .into();

        Self {
            auth: Arc::new(AuthServiceImpl::new(
                repos.users.clone(),
                settings.jwt.clone(),
            )),
            users: Arc::new(UserServiceImpl::new(
                repos.users.clone(),
                repos.posts.clone(),
                repos.friendships.clone(),
                policy,
                id_generator.clone(),
            )),
            posts: Arc::new(PostServiceImpl::new(
                repos.posts.clone(),
                repos.users.clone(),
                id_generator.clone(),
            )),
            friendships: Arc::new(FriendshipServiceImpl::new(
                repos.friendships,
                id_generator,
            )),
            settings: Arc::new(settings),
            database_name,
        }
    }
}

/// Routes plus the outer tracing and CORS layers.
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);

    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        // Create database pool
        let pool = database::create_pool(&settings.database)
            .await
            .context("Failed to connect to the database")?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");
        }

        let addr = settings.server_addr();
        let state = AppState::new(repositories::postgres_repositories(pool), settings);
        let router = build_router(state);

        // Bind to address
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
