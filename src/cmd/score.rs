use std::fs::File;
use std::path::Path;

use crate::{
    conf::settings,
    pkg::internal::{
        adaptors::records::spec::{format_score, ScoredDataset},
        artifacts::{Artifacts, CHART_FILE, RESULTS_FILE},
        chart::ChartRenderer,
        pipeline::Pipeline,
    },
    prelude::Result,
};

pub fn apply(input: &Path, out_dir: &Path, chart: bool) -> Result<()> {
    std::fs::create_dir_all(out_dir)?;
    let renderer = if chart {
        ChartRenderer::from_settings(&settings)
    } else {
        ChartRenderer::new(settings.chart_width, settings.chart_height, false)
    };
    let pipeline = Pipeline::new(Artifacts::new(out_dir, out_dir), renderer);
    let results_path = out_dir.join(RESULTS_FILE);
    let chart_path = out_dir.join(CHART_FILE);
    let (scored, chart_written) = pipeline.process(
        File::open(input)?,
        &results_path,
        chart.then_some(chart_path.as_path()),
    )?;

    print!("{}", summary(&scored));
    println!("results written to {}", results_path.display());
    if chart_written {
        println!("chart written to {}", chart_path.display());
    }
    Ok(())
}

fn summary(scored: &ScoredDataset) -> String {
    let width = scored
        .rows
        .iter()
        .map(|r| r.product().chars().count())
        .max()
        .unwrap_or(0)
        .max("Product".len());
    let mut out = format!("{:<width$}  CI Score (kg CO2/unit)\n", "Product", width = width);
    for row in &scored.rows {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            row.product(),
            format_score(row.ci_score),
            width = width
        ));
    }
    out
}
