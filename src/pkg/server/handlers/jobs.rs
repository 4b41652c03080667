use std::path::PathBuf;

use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};

use crate::{
    pkg::{internal::artifacts::JobId, server::state::AppState},
    prelude::{AppError, Result},
};

async fn read_artifact(path: PathBuf, what: &str) -> Result<Vec<u8>> {
    match tokio::fs::read(&path).await {
        Ok(data) => {
            tracing::debug!("serving {} ({} bytes)", path.display(), data.len());
            Ok(data)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(what.into())),
        Err(e) => Err(e.into()),
    }
}

pub async fn results_csv(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse> {
    let job: JobId = job_id.parse()?;
    let data = read_artifact(
        state.pipeline.artifacts.results_path(&job),
        &format!("results for job {}", job),
    )
    .await?;
    Ok((
        [
            (CONTENT_TYPE, "text/csv".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"ci_scoring_results_{}.csv\"", job),
            ),
        ],
        data,
    ))
}

pub async fn chart_png(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse> {
    let job: JobId = job_id.parse()?;
    let data = read_artifact(
        state.pipeline.artifacts.chart_path(&job),
        &format!("chart for job {}", job),
    )
    .await?;
    Ok(([(CONTENT_TYPE, "image/png")], data))
}
