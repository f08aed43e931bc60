//! Error types for IPD decoding.
//!
//! This module provides the [`IpdError`] type which covers every way a decode
//! can fail. Running out of bytes while inside the record stream is *not* an
//! error: the decoder reports it through [`StreamEnd`](crate::StreamEnd).
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | Format | [`InvalidHeader`] | File is not an IPD archive |
//! | Structure | [`TruncatedArchive`], [`CorruptArchive`] | Archive is damaged |
//! | Cursor | [`EndOfStream`] | Input exhausted (internal signal) |
//! | I/O | [`Io`] | Read errors other than end of input |
//!
//! ## Example
//!
//! ```rust,ignore
//! use ipd_stream::{decode_bytes, IpdError};
//!
//! match decode_bytes(&data) {
//!     Ok(archive) => println!("Found {} databases", archive.len()),
//!     Err(IpdError::InvalidHeader(fault)) => eprintln!("Not an IPD file: {}", fault),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! [`InvalidHeader`]: IpdError::InvalidHeader
//! [`TruncatedArchive`]: IpdError::TruncatedArchive
//! [`CorruptArchive`]: IpdError::CorruptArchive
//! [`EndOfStream`]: IpdError::EndOfStream
//! [`Io`]: IpdError::Io

use std::fmt;
use std::io;

use thiserror::Error;

/// Which part of the fixed header failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFault {
    /// The leading bytes are not `"Inter@ctive Pager Backup/Restore File"`.
    Magic,
    /// The byte after the magic is not `0x0A`.
    LineFeed,
    /// The byte after the database count is not `0x00`.
    NulTerminator,
    /// The input ended before the header was complete.
    Truncated,
}

impl fmt::Display for HeaderFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Magic => write!(f, "missing IPD file header"),
            Self::LineFeed => write!(f, "missing mandatory line feed"),
            Self::NulTerminator => write!(f, "missing mandatory null byte"),
            Self::Truncated => write!(f, "file ends inside the header"),
        }
    }
}

/// Error type for IPD operations.
#[derive(Debug, Error)]
pub enum IpdError {
    /// The fixed header is malformed. Fatal: no partial output is produced.
    #[error("Invalid IPD header: {0}")]
    InvalidHeader(HeaderFault),

    /// The input ended while reading the database name table.
    ///
    /// Records refer to databases by table position, so nothing after the
    /// table can be interpreted without it.
    #[error("Truncated archive: database table ends at entry {index} (offset {offset})")]
    TruncatedArchive {
        /// Index of the table entry being read.
        index: u16,
        /// Bytes consumed when the input ran out.
        offset: u64,
    },

    /// A record references a database id the table never declared.
    #[error(
        "Corrupt archive: record at offset {offset} references database {db_id}, \
         but only {database_count} are declared"
    )]
    CorruptArchive {
        /// The offending database id.
        db_id: u16,
        /// Number of databases in the table.
        database_count: usize,
        /// Offset of the record header.
        offset: u64,
    },

    /// A cursor read needed more bytes than the input had left.
    ///
    /// Callers outside the crate only see this from [`ByteCursor`](crate::ByteCursor)
    /// directly; the decoder converts it into one of the variants above or
    /// into a normal end of stream.
    #[error("Unexpected end of stream")]
    EndOfStream,

    /// An I/O error other than end of input.
    #[error("IO error: {0}")]
    Io(#[source] io::Error),
}

impl IpdError {
    /// Returns `true` for the cursor exhaustion signal.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}

impl From<io::Error> for IpdError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::EndOfStream
        } else {
            Self::Io(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, IpdError>;
