use crate::pkg::internal::adaptors::records::spec::{Dataset, ScoredDataset, ScoredRecord};

/// Carbon intensity of one record: emissions per unit of output, `0` when nothing was produced.
pub fn ci_score(emissions: f64, output: f64) -> f64 {
    if output == 0.0 {
        return 0.0;
    }
    emissions / output
}

pub fn score(dataset: Dataset) -> ScoredDataset {
    let rows = dataset
        .rows
        .into_iter()
        .map(|row| ScoredRecord {
            ci_score: ci_score(row.record.co2_emissions, row.record.output),
            row,
        })
        .collect();
    ScoredDataset {
        headers: dataset.headers,
        rows,
    }
}
