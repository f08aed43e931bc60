//! IPD section parsers, in file order.

pub mod database_table;
pub mod header;
pub mod record_stream;

pub use database_table::DatabaseTableParser;
pub use header::{HeaderParser, IpdHeader, IPD_SIGNATURE};
pub use record_stream::{DroppedRecord, RecordHeader, RecordStream, StreamEnd};
