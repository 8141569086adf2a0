mod error;
mod handlers;
mod pages;
mod routes;
mod session;

use plainplates_app::{AppContext, Config};
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), plainplates_errors::AppError> {
    use plainplates_errors::AppError;

    let config = Config::from_env()?;
    let addr = config.bind_addr;

    let key = match &config.session_secret {
        Some(secret) => Key::try_from(secret.as_slice())
            .map_err(|e| AppError::Config(format!("Invalid SESSION_SECRET: {}", e)))?,
        None => {
            tracing::warn!("SESSION_SECRET not set; sessions won't survive a restart");
            Key::generate()
        }
    };
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_signed(key)
        .with_same_site(SameSite::Lax)
        .with_secure(config.secure_cookies())
        .with_expiry(Expiry::OnInactivity(time::Duration::days(7)));

    let app_context = AppContext::init(config).await?;

    let app = routes::router()
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(app_context.clone());

    tracing::info!("Listening on http://{}", addr);
    tracing::info!(
        "Submission limits: {}/min, {}/hour",
        app_context.config.submit_limit_per_minute,
        app_context.config.submit_limit_per_hour
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Internal(format!("Server error: {}", e)))
}
