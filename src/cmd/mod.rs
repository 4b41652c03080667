use std::path::PathBuf;

use crate::{pkg::server::listen, prelude::Result};
use clap::{Parser, Subcommand};

mod score;

#[derive(Parser)]
#[command(about = "carbon intensity scoring for production records")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    /// Serve the upload form and scoring endpoints
    Listen,
    /// Score a local CSV without starting the server
    Score {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Also render the bar chart
        #[arg(long)]
        chart: bool,
    },
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    match args.command {
        Some(SubCommandType::Listen) => {
            listen().await?;
        }
        Some(SubCommandType::Score {
            input,
            out_dir,
            chart,
        }) => {
            score::apply(&input, &out_dir, chart)?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
