//! Record stream parser.
//!
//! Everything after the database table is a run of records, with no count
//! and no terminator: the archive simply ends. Each record is
//! ```text
//! db_id          u16 little-endian
//! record_length  u32 little-endian   (header + fields, in bytes)
//! db_version     u8
//! handle         u16 little-endian
//! uid            u32 big-endian
//! fields*        until 7 + sum(3 + field_length) >= record_length
//!   field_length u16 little-endian
//!   field_type   u8
//!   payload      field_length bytes
//! ```
//!
//! [`RecordStream`] walks this as a small state machine and yields each
//! completed record. Running out of input is how the stream ends; where it
//! ran out is reported by [`StreamEnd`].

use crate::byte_cursor::ByteCursor;
use crate::error::{IpdError, Result};
use crate::model::Record;
use std::io::Read;

/// Bytes of a record header counted against `record_length`.
///
/// `db_id` and `record_length` itself are not part of the count, so this is
/// smaller than the 13 bytes the header occupies on the wire.
pub const RECORD_HEADER_SIZE: u64 = 7;

/// Bytes of a field header (`field_length` + `field_type`).
pub const FIELD_HEADER_SIZE: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub db_id: u16,
    pub record_length: u32,
    /// Per-database version byte. Read, not interpreted.
    pub db_version: u8,
    pub handle: u16,
    pub uid: u32,
    /// Offset of `db_id` in the input.
    pub offset: u64,
}

/// A record whose fields were cut off by the end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRecord {
    pub db_id: u16,
    pub handle: u16,
    pub uid: u32,
    pub record_length: u32,
    /// Bytes of the record accounted for by complete fields.
    pub consumed: u64,
}

/// How the record stream finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
    /// Input ended between records (or inside a record header).
    RecordBoundary,
    /// Input ended inside a field. The record being built was discarded.
    MidRecord(DroppedRecord),
    /// The caller's record limit was reached before the input ended.
    Limit,
}

enum State {
    AwaitingRecordHeader,
    DecodingFields {
        header: RecordHeader,
        record: Record,
        consumed: u64,
    },
    Done(StreamEnd),
    Failed,
}

/// Iterator over `(db_id, record)` pairs of the record section.
///
/// Yields `Err` at most once, for a fatal condition (an out-of-range
/// database id or an I/O failure); the stream is finished afterwards.
pub struct RecordStream<'c, R> {
    cursor: &'c mut ByteCursor<R>,
    database_count: usize,
    state: State,
}

impl<'c, R: Read> RecordStream<'c, R> {
    /// Start reading records. `database_count` bounds valid `db_id`s.
    pub fn new(cursor: &'c mut ByteCursor<R>, database_count: usize) -> Self {
        Self {
            cursor,
            database_count,
            state: State::AwaitingRecordHeader,
        }
    }

    /// How the stream finished, once it has.
    pub fn end(&self) -> Option<&StreamEnd> {
        match &self.state {
            State::Done(end) => Some(end),
            _ => None,
        }
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn read_header(&mut self) -> Result<RecordHeader> {
        let offset = self.cursor.position();
        let db_id = self.cursor.u16_le()?;
        let record_length = self.cursor.u32_le()?;
        let db_version = self.cursor.u8()?;
        let handle = self.cursor.u16_le()?;
        let uid = self.cursor.u32_be()?;

        Ok(RecordHeader {
            db_id,
            record_length,
            db_version,
            handle,
            uid,
            offset,
        })
    }

    fn read_field(&mut self) -> Result<(u8, Vec<u8>)> {
        let field_length = self.cursor.u16_le()?;
        let field_type = self.cursor.u8()?;
        let payload = self.cursor.bytes(field_length as usize)?;
        Ok((field_type, payload))
    }

    /// `AwaitingRecordHeader` -> `DecodingFields` | `Done` | `Failed`.
    fn on_record_header(&mut self) -> Option<Result<(u16, Record)>> {
        let header = match self.read_header() {
            Ok(header) => header,
            Err(IpdError::EndOfStream) => {
                tracing::debug!(offset = self.cursor.position(), "record stream ended");
                self.state = State::Done(StreamEnd::RecordBoundary);
                return None;
            }
            Err(e) => return self.fail(e),
        };

        if header.db_id as usize >= self.database_count {
            return self.fail(IpdError::CorruptArchive {
                db_id: header.db_id,
                database_count: self.database_count,
                offset: header.offset,
            });
        }

        tracing::trace!(
            db_id = header.db_id,
            length = header.record_length,
            handle = header.handle,
            uid = header.uid,
            "record header"
        );

        self.state = State::DecodingFields {
            header,
            record: Record::new(header.handle, header.uid),
            consumed: RECORD_HEADER_SIZE,
        };
        None
    }

    /// `DecodingFields` -> `AwaitingRecordHeader` (yielding) | `Done` | `Failed`.
    fn on_fields(
        &mut self,
        header: RecordHeader,
        mut record: Record,
        mut consumed: u64,
    ) -> Option<Result<(u16, Record)>> {
        while consumed < u64::from(header.record_length) {
            let (field_type, payload) = match self.read_field() {
                Ok(field) => field,
                Err(IpdError::EndOfStream) => {
                    tracing::warn!(
                        db_id = header.db_id,
                        uid = header.uid,
                        offset = header.offset,
                        "archive ends inside a record; dropping it"
                    );
                    self.state = State::Done(StreamEnd::MidRecord(DroppedRecord {
                        db_id: header.db_id,
                        handle: header.handle,
                        uid: header.uid,
                        record_length: header.record_length,
                        consumed,
                    }));
                    return None;
                }
                Err(e) => return self.fail(e),
            };

            consumed += FIELD_HEADER_SIZE + payload.len() as u64;
            tracing::trace!(field_type, len = payload.len(), "field");
            // Later fields of the same type replace earlier ones
            record.fields.insert(field_type, payload);
        }

        self.state = State::AwaitingRecordHeader;
        Some(Ok((header.db_id, record)))
    }

    fn fail(&mut self, e: IpdError) -> Option<Result<(u16, Record)>> {
        self.state = State::Failed;
        Some(Err(e))
    }
}

impl<R: Read> Iterator for RecordStream<'_, R> {
    type Item = Result<(u16, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, State::Failed) {
                State::AwaitingRecordHeader => {
                    if let Some(item) = self.on_record_header() {
                        return Some(item);
                    }
                }
                State::DecodingFields {
                    header,
                    record,
                    consumed,
                } => return self.on_fields(header, record, consumed),
                state @ (State::Done(_) | State::Failed) => {
                    self.state = state;
                    return None;
                }
            }
        }
    }
}
