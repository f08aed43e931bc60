//! Reversible text form for binary field payloads.
//!
//! Payloads are arbitrary bytes, so they are emitted as a single-quoted
//! literal:
//! - printable ASCII (`0x20..=0x7E`) as-is, except `\` and `'`
//! - `\\`, `\'`, `\t`, `\n`, `\r`
//! - every other byte as `\xHH` with lowercase hex digits

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Render `payload` as a quoted, escaped literal.
pub fn escape_payload(payload: &[u8]) -> String {
    let mut out = String::with_capacity(payload.len() + 2);
    out.push('\'');
    for &b in payload {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7E => out.push(b as char),
            _ => {
                out.push_str("\\x");
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0x0F) as usize] as char);
            }
        }
    }
    out.push('\'');
    out
}

/// Inverse of [`escape_payload`]. Returns `None` for malformed input.
pub fn unescape_payload(text: &str) -> Option<Vec<u8>> {
    let body = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let bytes = body.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            // Unescaped quotes cannot appear inside the literal
            if b == b'\'' || !(0x20..=0x7E).contains(&b) {
                return None;
            }
            out.push(b);
            i += 1;
            continue;
        }

        let kind = *bytes.get(i + 1)?;
        match kind {
            b'\\' => out.push(b'\\'),
            b'\'' => out.push(b'\''),
            b't' => out.push(b'\t'),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b'x' => {
                let hi = hex_value(*bytes.get(i + 2)?)?;
                let lo = hex_value(*bytes.get(i + 3)?)?;
                out.push((hi << 4) | lo);
                i += 4;
                continue;
            }
            _ => return None,
        }
        i += 2;
    }

    Some(out)
}

#[inline]
fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
