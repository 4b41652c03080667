use std::sync::Arc;

use crate::{
    conf::settings,
    pkg::internal::{artifacts::Artifacts, chart::ChartRenderer, pipeline::Pipeline},
    prelude::Result,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub async fn new() -> Result<AppState> {
        let artifacts = Artifacts::from_settings(&settings);
        artifacts.ensure_dirs()?;
        let renderer = ChartRenderer::from_settings(&settings);
        Ok(Self::with_pipeline(
            Pipeline::new(artifacts, renderer),
            settings.max_upload_bytes,
        ))
    }

    pub fn with_pipeline(pipeline: Pipeline, max_upload_bytes: usize) -> AppState {
        AppState {
            pipeline: Arc::new(pipeline),
            max_upload_bytes,
        }
    }
}
