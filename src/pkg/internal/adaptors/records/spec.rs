use serde::Deserialize;

pub const PRODUCT: &str = "Product";
pub const CO2_EMISSIONS: &str = "CO2 Emissions (kg CO2)";
pub const OUTPUT: &str = "Output (kg)";
pub const ENERGY_USE: &str = "Energy Use (kWh)";
pub const TRANSPORT_DISTANCE: &str = "Transport Distance (km)";
pub const CI_SCORE: &str = "CI Score (kg CO2/unit)";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    PRODUCT,
    CO2_EMISSIONS,
    OUTPUT,
    ENERGY_USE,
    TRANSPORT_DISTANCE,
];

/// One production line item, as typed from the required columns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "CO2 Emissions (kg CO2)")]
    pub co2_emissions: f64,
    #[serde(rename = "Output (kg)")]
    pub output: f64,
    #[serde(rename = "Energy Use (kWh)")]
    pub energy_use: f64,
    #[serde(rename = "Transport Distance (km)")]
    pub transport_distance: f64,
}

/// A typed record together with every cell of its input line, extra columns included.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub record: Record,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub row: Row,
    pub ci_score: f64,
}

impl ScoredRecord {
    pub fn product(&self) -> &str {
        &self.row.record.product
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoredDataset {
    pub headers: Vec<String>,
    pub rows: Vec<ScoredRecord>,
}

impl ScoredDataset {
    #[cfg(test)]
    pub fn scores(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.ci_score).collect()
    }

    /// Input headers followed by the CI score column.
    pub fn output_headers(&self) -> Vec<String> {
        let mut headers = self.headers.clone();
        headers.push(CI_SCORE.to_string());
        headers
    }

    /// Cells as they are written to the result CSV and shown in the result table.
    pub fn output_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                let mut cells = r.row.cells.clone();
                cells.push(format_score(r.ci_score));
                cells
            })
            .collect()
    }
}

/// Shortest round-trip formatting, always with a fractional part (`2.0`, not `2`).
pub fn format_score(score: f64) -> String {
    let s = score.to_string();
    if score.is_finite() && !s.contains('.') {
        format!("{}.0", s)
    } else {
        s
    }
}
