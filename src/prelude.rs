use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type Result<T> = core::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("ERR-UPLOAD-001: No file part in the request.")]
    MissingFile,

    #[error("ERR-UPLOAD-002: malformed upload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("ERR-CSV-001: CSV file is missing required headers: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("ERR-CSV-002: {0}")]
    Parse(String),

    #[error("ERR-CHART-001: {0}")]
    Chart(String),

    #[error("ERR-IO-001: {0}")]
    Io(#[from] std::io::Error),

    #[error("ERR-VIEW-001: {0}")]
    Template(#[from] askama::Error),

    #[error("ERR-CONF-001: {0}")]
    Config(#[from] config::ConfigError),

    #[error("ERR-TASK-001: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("ERR-JOB-400: invalid job id {0}")]
    InvalidJobId(String),

    #[error("ERR-JOB-404: {0} not found")]
    NotFound(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFile
            | AppError::Multipart(_)
            | AppError::MissingColumns(_)
            | AppError::Parse(_)
            | AppError::InvalidJobId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        if !e.is_io_error() {
            return AppError::Parse(e.to_string());
        }
        match e.into_kind() {
            csv::ErrorKind::Io(io) => AppError::Io(io),
            kind => AppError::Parse(format!("{:?}", kind)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", &self);
        } else {
            tracing::warn!("{}", &self);
        }
        (status, self.to_string()).into_response()
    }
}
