use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::pkg::internal::adaptors::records::spec::{Dataset, Record, Row, REQUIRED_COLUMNS};
use crate::prelude::{AppError, Result};

pub struct RecordSelector<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RecordSelector<R> {
    pub fn new(source: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Fields)
            .from_reader(source);
        RecordSelector { reader }
    }

    /// Headers are matched by exact name; extra columns are kept as-is.
    pub fn dataset(mut self) -> Result<Dataset> {
        let headers = self.reader.headers()?.clone();
        check_columns(&headers)?;
        let mut rows = Vec::new();
        for result in self.reader.records() {
            let cells = result?;
            let record: Record = cells.deserialize(Some(&headers)).map_err(|e| {
                AppError::Parse(format!("{} in line {}", e, line_of(&cells, rows.len())))
            })?;
            rows.push(Row {
                record,
                cells: cells.iter().map(str::to_string).collect(),
            });
        }
        tracing::debug!("read {} records with {} columns", rows.len(), headers.len());
        Ok(Dataset {
            headers: headers.iter().map(str::to_string).collect(),
            rows,
        })
    }
}

pub fn check_columns(headers: &StringRecord) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingColumns(missing))
    }
}

fn line_of(record: &StringRecord, index: usize) -> u64 {
    record
        .position()
        .map(|p| p.line())
        .unwrap_or(index as u64 + 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::adaptors::records::spec::OUTPUT;

    const HEADER: &str =
        "Product,CO2 Emissions (kg CO2),Output (kg),Energy Use (kWh),Transport Distance (km)";

    fn read(csv: &str) -> Result<Dataset> {
        RecordSelector::new(csv.as_bytes()).dataset()
    }

    #[test]
    fn test_reads_rows_in_file_order() -> Result<()> {
        let data = format!("{HEADER}\nA,100,50,10,5\nB,0,0,1,1\nC,30,0,2,2\n");
        let dataset = read(&data)?;
        let products: Vec<&str> = dataset
            .rows
            .iter()
            .map(|r| r.record.product.as_str())
            .collect();
        assert_eq!(products, vec!["A", "B", "C"]);
        assert_eq!(dataset.rows[0].record.co2_emissions, 100.0);
        assert_eq!(dataset.rows[0].record.output, 50.0);
        assert_eq!(dataset.headers.len(), 5);
        Ok(())
    }

    #[test]
    fn test_extra_columns_pass_through() -> Result<()> {
        let data = format!("Site,{HEADER},Notes\nnorth,A,100,50,10,5,fragile\n");
        let dataset = read(&data)?;
        assert_eq!(dataset.headers[0], "Site");
        assert_eq!(dataset.headers[6], "Notes");
        assert_eq!(
            dataset.rows[0].cells,
            vec!["north", "A", "100", "50", "10", "5", "fragile"]
        );
        assert_eq!(dataset.rows[0].record.product, "A");
        Ok(())
    }

    #[test]
    fn test_missing_output_column() {
        let data = "Product,CO2 Emissions (kg CO2),Energy Use (kWh),Transport Distance (km)\nA,1,2,3\n";
        match read(data) {
            Err(AppError::MissingColumns(missing)) => assert_eq!(missing, vec![OUTPUT]),
            other => panic!("expected missing columns, got {:?}", other),
        }
    }

    #[test]
    fn test_each_required_column_is_enforced() {
        for dropped in REQUIRED_COLUMNS {
            let kept: Vec<&str> = REQUIRED_COLUMNS
                .iter()
                .copied()
                .filter(|c| *c != dropped)
                .collect();
            let data = format!("{}\n{}\n", kept.join(","), vec!["1"; kept.len()].join(","));
            match read(&data) {
                Err(AppError::MissingColumns(missing)) => assert_eq!(missing, vec![dropped]),
                other => panic!("dropping {} gave {:?}", dropped, other),
            }
        }
    }

    #[test]
    fn test_header_names_are_exact() {
        let data = "product,co2 emissions (kg co2),Output (kg),Energy Use (kWh),Transport Distance (km)\n";
        match read(data) {
            Err(AppError::MissingColumns(missing)) => assert_eq!(missing.len(), 2),
            other => panic!("expected missing columns, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_misses_every_column() {
        match read("") {
            Err(AppError::MissingColumns(missing)) => assert_eq!(missing.len(), 5),
            other => panic!("expected missing columns, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_is_an_empty_dataset() -> Result<()> {
        let dataset = read(&format!("{HEADER}\n"))?;
        assert!(dataset.rows.is_empty());
        Ok(())
    }

    #[test]
    fn test_non_numeric_cell_is_a_parse_error() {
        let data = format!("{HEADER}\nA,100,50,10,5\nB,lots,50,10,5\n");
        match read(&data) {
            Err(AppError::Parse(msg)) => assert!(msg.contains("line 3"), "{}", msg),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_numeric_cell_is_a_parse_error() {
        let data = format!("{HEADER}\nA,100,,10,5\n");
        assert!(matches!(read(&data), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_ragged_row_is_a_parse_error() {
        let data = format!("{HEADER}\nA,100,50\n");
        assert!(matches!(read(&data), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_fields_are_trimmed() -> Result<()> {
        let data = format!("{HEADER}\n Widget , 12.5 , 5 ,1,1\n");
        let dataset = read(&data)?;
        assert_eq!(dataset.rows[0].record.product, "Widget");
        assert_eq!(dataset.rows[0].record.co2_emissions, 12.5);
        Ok(())
    }
}
