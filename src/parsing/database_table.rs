//! Database name table parser.
//!
//! Follows the file header. Each of the `database_count` entries is a
//! little-endian `u16` length and that many bytes of NUL-padded name.

use crate::byte_cursor::ByteCursor;
use crate::error::{IpdError, Result};
use crate::model::{Archive, Database};
use std::io::Read;

pub struct DatabaseTableParser;

impl DatabaseTableParser {
    /// Read `count` names and return an archive of empty databases.
    ///
    /// Running out of input here is fatal: records address databases by
    /// table position.
    pub fn parse<R: Read>(cursor: &mut ByteCursor<R>, count: u16) -> Result<Archive> {
        let mut archive = Archive::new();

        for index in 0..count {
            let db = Self::parse_entry(cursor).map_err(|e| match e {
                IpdError::EndOfStream => IpdError::TruncatedArchive {
                    index,
                    offset: cursor.position(),
                },
                other => other,
            })?;
            tracing::trace!(index, name = %db.name, "database table entry");
            archive.push(db);
        }

        Ok(archive)
    }

    fn parse_entry<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Database> {
        let name_length = cursor.u16_le()?;
        let raw_name = cursor.bytes(name_length as usize)?;
        Ok(Database::from_raw_name(&raw_name))
    }
}
