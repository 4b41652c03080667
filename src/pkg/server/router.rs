use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::{routing::get, Router};

use super::handlers;
use super::handlers::probes::{healthz, livez};
use super::handlers::ui::index;
use super::state::AppState;
use crate::prelude::Result;

pub async fn build_routes() -> Result<Router> {
    let state = AppState::new().await?;
    Ok(routes(state))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/calculate", post(handlers::calculate::calculate))
        .route("/jobs/{job_id}/results.csv", get(handlers::jobs::results_csv))
        .route("/jobs/{job_id}/chart.png", get(handlers::jobs::chart_png))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state)
}
