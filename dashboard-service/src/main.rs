use std::sync::Arc;

use anyhow::Result;
use dashboard_service::{config::AppConfig, metrics_server, observability, server, Dashboard};

// One thread of control: views are recomputed synchronously per request.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // Input files are a startup precondition; any load error ends the process here.
    let dashboard = Dashboard::load(&cfg.data, cfg.map.clone())?;

    server::serve(&cfg.server, Arc::new(dashboard)).await?;

    Ok(())
}
