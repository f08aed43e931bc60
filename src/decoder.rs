//! ArchiveDecoder - drives header, table and record stream over one cursor.

use crate::byte_cursor::ByteCursor;
use crate::error::{IpdError, Result};
use crate::model::Archive;
use crate::parsing::{DatabaseTableParser, HeaderParser, IpdHeader, RecordStream, StreamEnd};
use std::io::Read;

/// Options for decoding.
#[derive(Default)]
pub struct DecodeOptions {
    /// Filter function: return true to keep a database's records.
    ///
    /// Rejected databases stay in the archive, empty, so database ids keep
    /// matching table positions.
    pub filter: Option<Box<dyn Fn(&str) -> bool + Send + Sync>>,
    /// Maximum number of records to keep.
    pub max_records: Option<usize>,
}

impl std::fmt::Debug for DecodeOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeOptions")
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("max_records", &self.max_records)
            .finish()
    }
}

/// Result of a full decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArchive {
    pub header: IpdHeader,
    pub archive: Archive,
    /// Where the record stream stopped.
    pub end: StreamEnd,
    /// Bytes consumed from the input.
    pub bytes_read: u64,
}

/// Single-pass IPD decoder over any [`Read`] source.
///
/// The source does not need to be seekable. Wrap files in a
/// [`BufReader`](std::io::BufReader); the decoder issues many small reads.
pub struct ArchiveDecoder<R> {
    cursor: ByteCursor<R>,
    options: DecodeOptions,
}

impl<R: Read> ArchiveDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            cursor: ByteCursor::new(reader),
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn decode(mut self) -> Result<DecodedArchive> {
        let header = HeaderParser::parse(&mut self.cursor)?;
        tracing::debug!(
            version = header.version,
            databases = header.database_count,
            "parsed IPD header"
        );

        let mut archive = DatabaseTableParser::parse(&mut self.cursor, header.database_count)?;
        let keep: Vec<bool> = archive
            .iter()
            .map(|db| self.options.filter.as_ref().is_none_or(|f| f(db.name.as_str())))
            .collect();

        let mut kept = 0usize;
        let mut stream = RecordStream::new(&mut self.cursor, archive.len());
        let end = loop {
            if self.options.max_records.is_some_and(|max| kept >= max) {
                break StreamEnd::Limit;
            }
            let Some(item) = stream.next() else {
                break stream.end().cloned().unwrap_or(StreamEnd::RecordBoundary);
            };
            let (db_id, record) = item?;
            // RecordStream rejects ids outside the table
            if !keep[db_id as usize] {
                continue;
            }
            let db = archive.get_mut(db_id).ok_or(IpdError::CorruptArchive {
                db_id,
                database_count: keep.len(),
                offset: stream.position(),
            })?;
            db.records.push(record);
            kept += 1;
        };

        let bytes_read = self.cursor.position();
        tracing::debug!(
            records = kept,
            bytes = bytes_read,
            end = ?end,
            "decoded IPD archive"
        );

        Ok(DecodedArchive {
            header,
            archive,
            end,
            bytes_read,
        })
    }
}

/// Decode an archive from a reader with default options.
pub fn decode<R: Read>(reader: R) -> Result<Archive> {
    ArchiveDecoder::new(reader).decode().map(|decoded| decoded.archive)
}

/// Decode an archive held in memory.
pub fn decode_bytes(data: &[u8]) -> Result<Archive> {
    decode(data)
}
