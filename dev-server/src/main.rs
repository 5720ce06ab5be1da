//! Development server for UI work
//!
//! Runs the in-memory mock backend on a fixed port and fills it with a
//! development dataset.
//!
//! Usage: cargo run -p dev-server
//!
//! `PORT` (default 8081) and `RUST_LOG` are read from the environment or a
//! `.env` file.

use anyhow::{Context, Result};
use test_helpers::mock::DevDataset;
use test_helpers::telemetry;
use tracing::info;

const DEFAULT_PORT: u16 = 8081;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber)?;

    let port = match std::env::var("PORT") {
        Ok(port) => port.parse().context("PORT must be a port number")?,
        Err(_) => DEFAULT_PORT,
    };

    info!("🚀 Starting property listing development server");
    let app = test_helpers::spawn_app_on_port(port).await;
    info!("✅ API server running on http://127.0.0.1:{}", app.port);

    info!("📊 Setting up development test data...");
    let dataset = DevDataset::create(&app).await?;
    // the dataset is created as alice; the UI keeps its own session
    app.client.logout();

    info!("🎯 Development server ready!");
    info!("   API: http://127.0.0.1:{}/api", app.port);
    info!(
        "   UI:  cd ui && BACKEND_URL=http://127.0.0.1:{} trunk serve",
        app.port
    );
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
