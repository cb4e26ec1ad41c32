//! Development server for the retail admin UI
//!
//! This binary runs the in-memory mock of the retail backend and fills it
//! with enough data to exercise every admin page: staff accounts, roles,
//! payment methods, products with images, reviews and support tickets.
//!
//! Usage: cargo run -p dev-server
//!
//! The port comes from `PORT` (environment or `.env`), defaulting to 8000.

use anyhow::{Context, Result};
use test_helpers::mock::DevDataset;
use test_helpers::telemetry;
use tracing::info;

const DEFAULT_PORT: u16 = 8000;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber)?;

    let port = match std::env::var("PORT") {
        Ok(value) => value
            .parse()
            .with_context(|| format!("PORT must be a port number, got {value:?}"))?,
        Err(_) => DEFAULT_PORT,
    };

    info!("🚀 Starting retail admin development server");
    let app = test_helpers::spawn_app_on_port(port).await;
    info!("✅ Mock API running on {}", app.address);

    info!("📊 Setting up development test data...");
    let dataset = DevDataset::create(&app).await?;

    info!("🎯 Development server ready!");
    info!("   API: {}", app.address);
    info!("   UI:  cd ui && BACKEND_URL={} trunk serve", app.address);
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
