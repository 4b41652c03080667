mod cmd;
pub mod conf;
pub mod pkg;
mod prelude;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::prelude::Result;

/// Used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "ci_scoring=info,warn";

fn log_filter(from_env: Option<EnvFilter>) -> EnvFilter {
    from_env.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(log_filter(EnvFilter::try_from_default_env().ok()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    cmd::run().await?;
    Ok(())
}
