use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::pkg::internal::adaptors::records::mutators::RecordMutator;
use crate::pkg::internal::adaptors::records::selectors::RecordSelector;
use crate::pkg::internal::adaptors::records::spec::ScoredDataset;
use crate::pkg::internal::artifacts::{Artifacts, JobId};
use crate::pkg::internal::chart::{BarChart, ChartRenderer};
use crate::pkg::internal::scoring::score;
use crate::prelude::Result;

#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub file_name: String,
    pub data: Vec<u8>,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub job_id: JobId,
    pub dataset: ScoredDataset,
    pub results_path: PathBuf,
    pub chart_path: Option<PathBuf>,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    pub artifacts: Artifacts,
    pub renderer: ChartRenderer,
}

impl Pipeline {
    pub fn new(artifacts: Artifacts, renderer: ChartRenderer) -> Self {
        Pipeline {
            artifacts,
            renderer,
        }
    }

    /// Runs on the blocking pool; parsing and drawing are CPU bound.
    pub async fn submit(self: &Arc<Self>, submission: Submission) -> Result<Outcome> {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || pipeline.run(submission)).await?
    }

    pub fn run(&self, submission: Submission) -> Result<Outcome> {
        let job_id = JobId::new();
        let span = tracing::info_span!("job", %job_id);
        let _guard = span.enter();

        let raw = self
            .artifacts
            .save_upload(&job_id, &submission.file_name, &submission.data)?;
        tracing::info!("received {} ({} bytes)", raw.display(), submission.data.len());

        let results_path = self.artifacts.results_path(&job_id);
        let chart_path = self.artifacts.chart_path(&job_id);
        let (dataset, chart_written) = self.process(
            std::fs::File::open(&raw)?,
            &results_path,
            Some(&chart_path),
        )?;

        Ok(Outcome {
            job_id,
            dataset,
            results_path,
            chart_path: chart_written.then_some(chart_path),
            latitude: submission.latitude,
            longitude: submission.longitude,
        })
    }

    /// Validate, score, chart, write. Returns the scored rows and whether the chart was written.
    pub fn process<R: Read>(
        &self,
        source: R,
        results_path: &Path,
        chart_path: Option<&Path>,
    ) -> Result<(ScoredDataset, bool)> {
        let dataset = RecordSelector::new(source).dataset()?;
        let scored = score(dataset);
        tracing::debug!("scored {} records", scored.rows.len());

        let chart_written = match chart_path {
            Some(path) => match self.render_chart(&scored, path) {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("error generating graph: {}", e);
                    false
                }
            },
            None => false,
        };

        if let Some(dir) = results_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let written = RecordMutator::to_path(results_path)?.write_scored(&scored)?;
        tracing::info!("wrote {} scored rows to {}", written, results_path.display());
        Ok((scored, chart_written))
    }

    fn render_chart(&self, scored: &ScoredDataset, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        self.renderer.render(&BarChart::from_scored(scored), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::adaptors::records::spec::CI_SCORE;
    use crate::prelude::AppError;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    const SAMPLE: &str = "Product,CO2 Emissions (kg CO2),Output (kg),Energy Use (kWh),Transport Distance (km)\n\
                          A,100,50,10,5\n\
                          B,0,0,1,1\n\
                          C,30,0,2,2\n";

    fn pipeline() -> Result<(TempDir, Arc<Pipeline>)> {
        let root = tempfile::tempdir()?;
        let artifacts = Artifacts::new(root.path().join("uploads"), root.path().join("static"));
        artifacts.ensure_dirs()?;
        let pipeline = Pipeline::new(artifacts, ChartRenderer::new(320, 240, false));
        Ok((root, Arc::new(pipeline)))
    }

    fn submission(data: &str) -> Submission {
        Submission {
            file_name: "records.csv".into(),
            data: data.as_bytes().to_vec(),
            latitude: "51.5".into(),
            longitude: "not-a-number".into(),
        }
    }

    #[test]
    fn test_scenario_end_to_end() -> Result<()> {
        let (_root, pipeline) = pipeline()?;
        let outcome = pipeline.run(submission(SAMPLE))?;
        assert_eq!(outcome.dataset.scores(), vec![2.0, 0.0, 0.0]);
        assert_eq!(outcome.latitude, "51.5");
        assert_eq!(outcome.longitude, "not-a-number");

        let chart = outcome.chart_path.expect("chart rendered");
        assert!(chart.exists());

        let mut reader = csv::Reader::from_path(&outcome.results_path)?;
        assert_eq!(reader.headers()?.iter().last(), Some(CI_SCORE));
        let rows: Vec<csv::StringRecord> = reader.records().collect::<core::result::Result<_, _>>()?;
        assert_eq!(rows.len(), 3);
        let products: Vec<&str> = rows.iter().filter_map(|r| r.get(0)).collect();
        assert_eq!(products, vec!["A", "B", "C"]);
        Ok(())
    }

    #[test]
    fn test_missing_column_writes_no_outputs() -> Result<()> {
        let (_root, pipeline) = pipeline()?;
        let data = "Product,CO2 Emissions (kg CO2),Energy Use (kWh),Transport Distance (km)\nA,100,10,5\n";
        let err = pipeline.run(submission(data)).expect_err("missing Output (kg)");
        assert!(matches!(err, AppError::MissingColumns(_)));

        let uploads = pipeline.artifacts.job_dir(&JobId::new());
        let upload_root = uploads.parent().expect("job dirs live under the upload dir");
        let jobs: Vec<_> = std::fs::read_dir(upload_root)?.collect::<std::io::Result<_>>()?;
        assert_eq!(jobs.len(), 1, "raw upload is still persisted");
        let job_dir = jobs[0].path();
        assert!(job_dir.join("records.csv").exists());
        assert!(!job_dir.join(crate::pkg::internal::artifacts::RESULTS_FILE).exists());

        let static_root = pipeline
            .artifacts
            .chart_path(&JobId::new())
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .expect("chart dirs live under the static dir");
        assert_eq!(std::fs::read_dir(static_root)?.count(), 0);
        Ok(())
    }

    #[test]
    #[traced_test]
    fn test_chart_failure_is_not_fatal() -> Result<()> {
        let (root, pipeline) = pipeline()?;
        let results = root.path().join("out").join("results.csv");
        // a regular file where the chart directory should be
        let blocker = root.path().join("blocked");
        std::fs::write(&blocker, b"")?;
        let (scored, chart_written) = pipeline.process(
            SAMPLE.as_bytes(),
            &results,
            Some(&blocker.join("chart.png")),
        )?;
        assert!(!chart_written);
        assert_eq!(scored.rows.len(), 3);
        assert!(results.exists());
        assert!(logs_contain("error generating graph"));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[traced_test]
    async fn test_concurrent_jobs_do_not_share_outputs() -> Result<()> {
        let (_root, pipeline) = pipeline()?;
        let (first, second) = tokio::join!(
            pipeline.submit(submission(SAMPLE)),
            pipeline.submit(submission(
                "Product,CO2 Emissions (kg CO2),Output (kg),Energy Use (kWh),Transport Distance (km)\nZ,9,3,0,0\n",
            )),
        );
        let (first, second) = (first?, second?);
        assert_ne!(first.job_id, second.job_id);
        assert_ne!(first.results_path, second.results_path);
        assert_ne!(first.chart_path, second.chart_path);

        let first_csv = std::fs::read_to_string(&first.results_path)?;
        assert!(first_csv.contains("A,100,50,10,5,2.0"));
        assert!(!first_csv.contains("Z,"));
        let second_csv = std::fs::read_to_string(&second.results_path)?;
        assert!(second_csv.ends_with("Z,9,3,0,0,3.0\n"));
        assert!(!second_csv.contains("A,"));
        Ok(())
    }

    #[tokio::test]
    #[traced_test]
    async fn test_submit_runs_on_blocking_pool() -> Result<()> {
        let (_root, pipeline) = pipeline()?;
        let outcome = pipeline.submit(submission(SAMPLE)).await?;
        assert_eq!(outcome.dataset.rows.len(), 3);
        assert!(outcome.results_path.exists());
        Ok(())
    }
}
