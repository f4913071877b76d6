use clinic_sync::config::{self, Config};
use clinic_sync::core::report;
use clinic_sync::{CacheKind, HttpGateway, Result, SyncCoordinator};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load config.toml (defaults when absent), then apply environment overrides
    let Config { gateway, sync } = config::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let gateway = gateway.with_env_overrides();
    if gateway.token.is_none() {
        warn!(
            "{} is not set, authenticated requests will be rejected",
            config::API_TOKEN_ENV
        );
    }
    info!("Using API at {}", gateway.base_url);

    // 4. Build the coordinator over the HTTP gateway
    let http = HttpGateway::new(&gateway)
        .inspect_err(|e| error!("Failed to build HTTP client: {}", e))?;
    let coordinator = SyncCoordinator::new(Arc::new(http), sync);

    // 5. Load every doctor-facing resource concurrently
    tokio::join!(
        coordinator.load_dashboard(),
        coordinator.load_appointments(Default::default()),
        coordinator.load_earnings(),
        coordinator.load_reviews(),
    );

    let state = coordinator.read().await;
    for (kind, message) in state.errors() {
        error!("Could not load {}: {}", kind, message);
    }
    if state.error(CacheKind::Dashboard).is_none() {
        info!("Dashboard\n{}", report::format_dashboard(&state.stats()));
    }
    info!(
        "{} appointments on page {}/{}",
        state.list().len(),
        state.pagination().page,
        state.pagination().total_pages
    );
    if state.error(CacheKind::Earnings).is_none() {
        info!("Earnings\n{}", report::format_earnings(&state.earnings_summary()));
    }
    if state.error(CacheKind::Reviews).is_none() {
        info!(
            "Reviews\n{}",
            report::format_rating_distribution(&state.rating_distribution())
        );
    }

    Ok(())
}
