use blog_api::{AppState, app, config::AppConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    info!("Server running on http://{}", config.bind_addr);
    info!("API Endpoints:");
    info!("  GET    /health              - Health check");
    info!("  GET    /posts               - List posts (category/tag filters, paginated)");
    info!("  GET    /posts/:id           - Post detail with related posts");
    info!("  GET    /posts/:id/related   - Related posts only");
    info!("  POST   /subscribe           - Newsletter subscription");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
