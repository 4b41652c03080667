use askama::Template;
use axum::{
    extract::{Multipart, State},
    response::Html,
};

use crate::{
    pkg::{
        internal::pipeline::Submission,
        server::{state::AppState, uispec::Results},
    },
    prelude::{AppError, Result},
};

pub async fn calculate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut latitude = String::new();
    let mut longitude = String::new();
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;
                // browsers send an empty, unnamed part when no file was chosen
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                file = Some((file_name, data.to_vec()));
            }
            "latitude" => {
                latitude = field.text().await?;
            }
            "longitude" => {
                longitude = field.text().await?;
            }
            _ => {
                let _ = field.bytes().await?;
            }
        }
    }
    let (file_name, data) = file.ok_or(AppError::MissingFile)?;
    tracing::debug!("upload {} ({} bytes) at {}, {}", &file_name, data.len(), &latitude, &longitude);

    let outcome = state
        .pipeline
        .submit(Submission {
            file_name,
            data,
            latitude,
            longitude,
        })
        .await?;
    tracing::info!("job {} scored {} records", outcome.job_id, outcome.dataset.rows.len());
    Ok(Html(Results::from_outcome(&outcome).render()?))
}
