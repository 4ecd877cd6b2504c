use std::fs::File;
use std::path::PathBuf;

use tracing::info;

use crate::app::Result;
use crate::domain::Record;
use crate::export::{ensure_parent_dir, RecordSink};

/// One row per record, columns in [`Record::COLUMNS`] order
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for CsvSink {
    fn name(&self) -> &str {
        "csv"
    }

    fn write(&mut self, records: &[Record]) -> Result<()> {
        ensure_parent_dir(&self.path)?;

        // Header written by hand so an empty run still gets one
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(File::create(&self.path)?);
        writer.write_record(Record::COLUMNS)?;
        for record in records {
            writer.write_record(record.values())?;
        }
        writer.flush()?;

        info!(path = %self.path.display(), count = records.len(), "Saved CSV");
        Ok(())
    }
}
