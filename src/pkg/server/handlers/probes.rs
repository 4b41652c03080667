use axum::extract::State;

use crate::{
    pkg::server::state::AppState,
    prelude::{AppError, Result},
};

pub async fn livez() -> Result<()> {
    tracing::debug!("service is live");
    Ok(())
}

pub async fn healthz(State(state): State<AppState>) -> Result<()> {
    if !state.pipeline.artifacts.is_ready() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "upload or static directory is missing",
        )));
    }
    tracing::debug!("service is healthy");
    Ok(())
}
