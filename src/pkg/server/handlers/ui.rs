use askama::Template;
use axum::response::Html;

use crate::{pkg::server::uispec::Index, prelude::Result};

pub async fn index() -> Result<Html<String>> {
    Ok(Html(Index {}.render()?))
}
