use askama::Template;

use crate::pkg::internal::pipeline::Outcome;

#[derive(Template)]
#[template(path = "index.html")]
pub struct Index {}

#[derive(Template)]
#[template(path = "results.html")]
pub struct Results<'a> {
    pub job_id: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub latitude: &'a str,
    pub longitude: &'a str,
    pub chart_url: Option<String>,
    pub results_url: String,
}

impl<'a> Results<'a> {
    pub fn from_outcome(outcome: &'a Outcome) -> Self {
        let job_id = outcome.job_id.to_string();
        Results {
            headers: outcome.dataset.output_headers(),
            rows: outcome.dataset.output_rows(),
            latitude: &outcome.latitude,
            longitude: &outcome.longitude,
            chart_url: outcome
                .chart_path
                .as_ref()
                .map(|_| format!("/jobs/{}/chart.png", job_id)),
            results_url: format!("/jobs/{}/results.csv", job_id),
            job_id,
        }
    }
}
