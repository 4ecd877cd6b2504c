//! Output sinks for the aggregated record set.

mod csv_sink;
mod json_sink;

pub use csv_sink::CsvSink;
pub use json_sink::JsonSink;

use std::fs;
use std::path::Path;

use crate::app::Result;
use crate::domain::Record;

/// Materializes the full record set of a run
pub trait RecordSink: Send {
    fn name(&self) -> &str;

    fn write(&mut self, records: &[Record]) -> Result<()>;
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_records() -> Vec<Record> {
    vec![
        Record::builder("Agent.ai", "https://agent.ai/agent/writer")
            .name("Writer, \"the\" bot")
            .build()
            .unwrap(),
        Record::builder("Metaschool", "https://metaschool.so/courses/solana")
            .name("Solana 101")
            .build()
            .unwrap(),
    ]
}
