use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::info;

use crate::app::Result;
use crate::domain::Record;
use crate::export::{ensure_parent_dir, RecordSink};

/// Pretty-printed JSON array, one object per record
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for JsonSink {
    fn name(&self) -> &str {
        "json"
    }

    fn write(&mut self, records: &[Record]) -> Result<()> {
        ensure_parent_dir(&self.path)?;

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!(path = %self.path.display(), count = records.len(), "Saved JSON");
        Ok(())
    }
}
