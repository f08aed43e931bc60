//! File header parser.
//!
//! Every IPD file starts with a fixed prologue:
//! ```text
//! "Inter@ctive Pager Backup/Restore File"   37 bytes, ASCII
//! 0x0A
//! version                                   u8
//! database count                            u16 big-endian
//! 0x00
//! ```

use crate::byte_cursor::ByteCursor;
use crate::error::{HeaderFault, IpdError, Result};
use std::io::Read;

/// IPD magic signature.
pub const IPD_SIGNATURE: &[u8; 37] = b"Inter@ctive Pager Backup/Restore File";

/// Byte following the signature.
pub const LINE_FEED: u8 = 0x0A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpdHeader {
    /// Format version byte. Stored, not interpreted.
    pub version: u8,
    pub database_count: u16,
}

pub struct HeaderParser;

impl HeaderParser {
    pub const HEADER_SIZE: usize = IPD_SIGNATURE.len() + 5;

    pub fn parse<R: Read>(cursor: &mut ByteCursor<R>) -> Result<IpdHeader> {
        Self::parse_fields(cursor).map_err(|e| match e {
            IpdError::EndOfStream => IpdError::InvalidHeader(HeaderFault::Truncated),
            other => other,
        })
    }

    fn parse_fields<R: Read>(cursor: &mut ByteCursor<R>) -> Result<IpdHeader> {
        let signature = cursor.bytes(IPD_SIGNATURE.len())?;
        if signature != IPD_SIGNATURE {
            return Err(IpdError::InvalidHeader(HeaderFault::Magic));
        }

        if cursor.u8()? != LINE_FEED {
            return Err(IpdError::InvalidHeader(HeaderFault::LineFeed));
        }

        let version = cursor.u8()?;
        let database_count = cursor.u16_be()?;

        if cursor.u8()? != 0x00 {
            return Err(IpdError::InvalidHeader(HeaderFault::NulTerminator));
        }

        Ok(IpdHeader {
            version,
            database_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(version: u8, count: u16) -> Vec<u8> {
        let mut buffer = IPD_SIGNATURE.to_vec();
        buffer.push(LINE_FEED);
        buffer.push(version);
        buffer.extend_from_slice(&count.to_be_bytes());
        buffer.push(0x00);
        buffer
    }

    fn parse(buffer: &[u8]) -> Result<IpdHeader> {
        HeaderParser::parse(&mut ByteCursor::new(buffer))
    }

    #[test]
    fn test_parse_header() {
        let buffer = header_bytes(2, 0x0102);
        assert_eq!(buffer.len(), HeaderParser::HEADER_SIZE);

        let mut cursor = ByteCursor::new(&buffer[..]);
        let header = HeaderParser::parse(&mut cursor).unwrap();
        assert_eq!(header.version, 2);
        // Big-endian: 0x01 0x02
        assert_eq!(header.database_count, 258);
        assert_eq!(cursor.position(), HeaderParser::HEADER_SIZE as u64);
    }

    #[test]
    fn test_invalid_signature() {
        let mut buffer = header_bytes(2, 1);
        buffer[0] = b'i';
        assert!(matches!(
            parse(&buffer),
            Err(IpdError::InvalidHeader(HeaderFault::Magic))
        ));
    }

    #[test]
    fn test_missing_line_feed() {
        let mut buffer = header_bytes(2, 1);
        buffer[37] = 0x0D;
        assert!(matches!(
            parse(&buffer),
            Err(IpdError::InvalidHeader(HeaderFault::LineFeed))
        ));
    }

    #[test]
    fn test_missing_nul() {
        let mut buffer = header_bytes(2, 1);
        buffer[41] = 0x01;
        assert!(matches!(
            parse(&buffer),
            Err(IpdError::InvalidHeader(HeaderFault::NulTerminator))
        ));
    }

    #[test]
    fn test_truncated_header() {
        let buffer = header_bytes(2, 1);
        for len in [0, 10, 37, 40, 41] {
            assert!(matches!(
                parse(&buffer[..len]),
                Err(IpdError::InvalidHeader(HeaderFault::Truncated))
            ));
        }
    }

    #[test]
    fn test_foreign_files() {
        assert!(matches!(
            parse(b"PK\x03\x04"),
            Err(IpdError::InvalidHeader(HeaderFault::Truncated))
        ));
        assert!(matches!(
            parse(&[0u8; 64]),
            Err(IpdError::InvalidHeader(HeaderFault::Magic))
        ));
    }
}
