//! Pantry MTS server entry point.

use std::sync::Arc;

use axum::{Router, middleware};
use pantry_api::{ProfileTokenAuth, middleware::AppState, router as api_router};
use pantry_common::Config;
use pantry_core::collaborators::DbDirectory;
use pantry_core::services::{
    EmailTransport, InboxService, MtsDispatcher, SiteTransport, WebhookTransport,
};
use pantry_db::repositories::{
    OrganizationRepository, ProfileRepository, SiteMessageRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pantry=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting pantry-mts server...");

    let config = Config::load()?;

    let db = pantry_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    pantry_db::migrate(&db).await?;
    info!("Migrations completed");

    // Repositories
    let db = Arc::new(db);
    let org_repo = OrganizationRepository::new(Arc::clone(&db));
    let profile_repo = ProfileRepository::new(Arc::clone(&db));
    let site_message_repo = SiteMessageRepository::new(Arc::clone(&db));

    // Services
    let directory = Arc::new(DbDirectory::new(org_repo, profile_repo.clone()));
    let email = config.email.clone().map(EmailTransport::new);
    if email.is_some() {
        info!("Email transport enabled");
    } else {
        info!("No email gateway configured, email transport disabled");
    }
    let site = SiteTransport::new(Arc::new(site_message_repo.clone()));
    let dispatcher = MtsDispatcher::new(directory, email, site, WebhookTransport::new());
    let inbox_service = InboxService::new(site_message_repo);

    let state = AppState {
        dispatcher,
        inbox_service,
        auth: Arc::new(ProfileTokenAuth::new(profile_repo)),
    };

    let app = Router::new()
        .merge(api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            pantry_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
