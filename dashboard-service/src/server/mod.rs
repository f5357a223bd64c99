pub mod page;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use installations_core::domain::{Selection, Selector};
use serde::Deserialize;

use crate::{config::ServerConfig, pipeline::Dashboard};
use page::{render_page, RecordRow};

#[derive(Clone)]
struct AppState {
    dashboard: Arc<Dashboard>,
    heading: Arc<str>,
}

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "dashboard request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Query string carrying the dropdown values and the table toggle.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub year: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub show_table: Option<String>,
}

impl SelectionQuery {
    pub fn selection(&self) -> Selection {
        let mut selection = Selection::default();
        selection.set_year(Selector::parse(self.year.as_deref()));
        selection.set_province(Selector::parse(self.province.as_deref()));
        selection.set_district(Selector::parse(self.district.as_deref()));
        selection
    }

    pub fn show_table(&self) -> bool {
        matches!(self.show_table.as_deref(), Some(v) if !matches!(v, "" | "off" | "false" | "0"))
    }
}

pub fn router(dashboard: Arc<Dashboard>, heading: &str) -> Router {
    let state = AppState {
        dashboard,
        heading: Arc::from(heading),
    };

    Router::new()
        .route("/", get(index))
        .route("/reset", get(reset))
        .route("/api/figure", get(figure))
        .route("/api/counts", get(counts))
        .route("/api/records", get(records))
        .route("/api/options", get(options))
        .with_state(state)
}

pub async fn serve(cfg: &ServerConfig, dashboard: Arc<Dashboard>) -> anyhow::Result<()> {
    let addr: SocketAddr = cfg
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr '{}': {e}", cfg.bind_addr))?;

    let app = router(dashboard, &cfg.heading);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "dashboard listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

fn page(state: &AppState, selection: &Selection, show_table: bool) -> Result<Html<String>, ServerError> {
    let view = state.dashboard.view(selection);
    let html = render_page(&state.dashboard, &view, &state.heading, show_table)?;
    Ok(Html(html))
}

async fn index(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Html<String>, ServerError> {
    page(&state, &query.selection(), query.show_table())
}

async fn reset(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Html<String>, ServerError> {
    let mut selection = query.selection();
    selection.reset();
    tracing::info!("filters reset");
    page(&state, &selection, query.show_table())
}

async fn figure(State(state): State<AppState>, Query(query): Query<SelectionQuery>) -> Response {
    let view = state.dashboard.view(&query.selection());
    Json(&view.figure).into_response()
}

async fn counts(State(state): State<AppState>, Query(query): Query<SelectionQuery>) -> Response {
    let view = state.dashboard.view(&query.selection());
    Json(view.counts).into_response()
}

async fn records(State(state): State<AppState>, Query(query): Query<SelectionQuery>) -> Response {
    let view = state.dashboard.view(&query.selection());
    let rows: Vec<RecordRow<'_>> = view.filtered.iter().map(|r| RecordRow::from(*r)).collect();
    Json(rows).into_response()
}

async fn options(State(state): State<AppState>) -> Response {
    Json(state.dashboard.options()).into_response()
}
