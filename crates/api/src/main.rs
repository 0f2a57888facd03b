use std::sync::Arc;

use openhouse_api::{routes, AppContext};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "openhouse=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting OpenHouse (lead & viewing booking backend)");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = openhouse_infra::config::load()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let context = Arc::new(AppContext::new(config)?);
    let app = routes::router(context);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
