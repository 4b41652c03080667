use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::pkg::internal::adaptors::records::spec::ScoredDataset;
use crate::prelude::Result;

pub struct RecordMutator<W: Write> {
    writer: csv::Writer<W>,
}

impl RecordMutator<File> {
    /// Truncates whatever is already at `path`.
    pub fn to_path(path: &Path) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> RecordMutator<W> {
    pub fn new(sink: W) -> Self {
        RecordMutator {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_scored(&mut self, dataset: &ScoredDataset) -> Result<usize> {
        self.writer.write_record(dataset.output_headers())?;
        let rows = dataset.output_rows();
        for row in &rows {
            self.writer.write_record(row)?;
        }
        self.writer.flush()?;
        Ok(rows.len())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }
}
