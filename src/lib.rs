//! Streaming decoder for IPD backup archives.
//!
//! IPD ("Inter@ctive Pager Backup/Restore File") archives hold a table of
//! named databases followed by a run of records, each tagged with the id of
//! the database it belongs to and carrying a set of typed binary fields.
//!
//! Decoding is a single forward pass over any [`std::io::Read`] source:
//! 1. the fixed header is validated ([`parsing::HeaderParser`]),
//! 2. the database name table is read ([`parsing::DatabaseTableParser`]),
//! 3. records are streamed until the input runs out ([`parsing::RecordStream`]).
//!
//! An archive has no end marker. Input ending between records is a clean
//! finish; input ending inside a record drops that record. Both are reported
//! through [`StreamEnd`] rather than as errors.
//!
//! ## Features
//! - `async` - Async file reading with tokio
//!
//! ## Example
//!
//! ```rust,ignore
//! let archive = ipd_stream::decode(std::io::BufReader::new(file))?;
//! for db in &archive {
//!     println!("{}: {} records", db.name, db.records.len());
//! }
//! println!("{}", archive.to_json()?);
//! ```

mod byte_cursor;
pub mod decoder;
pub mod error;
pub mod escape;
mod file_media;
pub mod model;
pub mod parsing;

pub use byte_cursor::ByteCursor;
pub use decoder::{decode, decode_bytes, ArchiveDecoder, DecodeOptions, DecodedArchive};
pub use error::{HeaderFault, IpdError, Result};
pub use escape::{escape_payload, unescape_payload};
pub use file_media::LocalArchiveFile;
pub use model::{Archive, Database, Record};
pub use parsing::{DroppedRecord, IpdHeader, StreamEnd};
