use std::net::SocketAddr;

use axum::{routing::get, Router};
use metrics::Unit;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const DATES_UNPARSEABLE_TOTAL: &str = "installation_dates_unparseable_total";
pub const DISTRICTS_MISSING_TOTAL: &str = "installation_districts_missing_total";
pub const DISTRICTS_UNMATCHED_TOTAL: &str = "installation_districts_unmatched_total";
pub const VIEWS_TOTAL: &str = "dashboard_views_total";
pub const VIEW_SECONDS: &str = "dashboard_view_seconds";

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Register help text for every metric the dashboard emits.
pub fn describe_metrics() {
    metrics::describe_counter!(
        DATES_UNPARSEABLE_TOTAL,
        "Installation rows whose date could not be parsed and have no year"
    );
    metrics::describe_counter!(
        DISTRICTS_MISSING_TOTAL,
        "Installation rows without a district code, loaded as Unknown"
    );
    metrics::describe_counter!(
        DISTRICTS_UNMATCHED_TOTAL,
        "Installation rows whose district code has no boundary feature"
    );
    metrics::describe_counter!(VIEWS_TOTAL, "Filter, aggregate and render passes");
    metrics::describe_histogram!(VIEW_SECONDS, Unit::Seconds, "Time spent recomputing one view");
}

/// Install the Prometheus recorder and serve it at `/metrics` on `bind_addr`.
///
/// Call before loading data so the load-time counters are recorded. Needs a
/// running tokio runtime for the listener task.
pub fn init(bind_addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid metrics.bind_addr '{bind_addr}': {e}"))?;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus metrics recorder: {e}"))?;
    let _ = PROM_HANDLE.set(handle);
    describe_metrics();

    let listener = std::net::TcpListener::bind(addr)
        .map_err(|e| anyhow::anyhow!("failed to bind metrics listener on {addr}: {e}"))?;
    listener.set_nonblocking(true)?;
    let listener = tokio::net::TcpListener::from_std(listener)?;
    tracing::info!(%addr, "metrics listener started");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, metrics_router().into_make_service()).await {
            tracing::error!(error = %e, "metrics server error");
        }
    });

    Ok(())
}

fn metrics_router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Empty until a recorder is installed.
async fn metrics_handler() -> String {
    PROM_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn metrics_route_answers_without_recorder() {
        let resp = metrics_router()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn describing_without_recorder_is_a_no_op() {
        describe_metrics();
    }

    #[test]
    fn rejects_invalid_bind_addr() {
        assert!(init("not-an-address").is_err());
    }
}
