use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod email;
mod error;
mod middleware;
mod models;
mod oauth;
mod repositories;
mod routes;
mod session;
mod state;
mod validation;

use catalog::{CatalogStore, FixtureSet};

use crate::{
    config::AppConfig,
    email::EmailClient,
    oauth::GithubOAuth,
    repositories::{CatalogRepository, user::UserRepository},
    session::SessionManager,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    let config = AppConfig::load()?;

    // Seed the catalog; a bad fixture set leaves it empty rather than stopping the service
    let mut store = CatalogStore::new();
    match FixtureSet::load_dir(&config.catalog.data_dir) {
        Ok(fixtures) => {
            fixtures.seed(&mut store);
            info!("Mock data loaded successfully");
        }
        Err(e) => error!("Error loading mock data: {}", e),
    }
    let store = Arc::new(RwLock::new(store));

    let github = if config.github.is_configured() {
        Some(GithubOAuth::new(&config.github)?)
    } else {
        warn!("GITHUB_CLIENT_ID not set; GitHub login disabled");
        None
    };

    if config.email.api_key.is_empty() {
        warn!("SENDGRID_API_KEY not set; code emails will fail");
    }

    let sessions = SessionManager::new(Duration::from_secs(config.session.ttl_secs));
    sessions.spawn_pruner(Duration::from_secs(config.session.prune_interval_secs));

    let app_state = AppState {
        catalog: CatalogRepository::new(store.clone()),
        user_repository: UserRepository::new(store),
        sessions,
        github,
        email_client: EmailClient::new(&config.email),
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
