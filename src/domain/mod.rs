pub mod record;

pub use record::{Record, RecordBuilder};
