#![no_main]
use ipd_stream::parsing::IPD_SIGNATURE;
use ipd_stream::{decode_bytes, escape_payload, unescape_payload};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Raw input: almost always rejected at the header
    let _ = decode_bytes(data);

    // Behind a valid prologue so the table and record stream get exercised
    let mut framed = IPD_SIGNATURE.to_vec();
    framed.push(0x0A);
    framed.extend_from_slice(data);
    if let Ok(archive) = decode_bytes(&framed) {
        let _ = archive.to_json();
        for record in archive.iter().flat_map(|db| &db.records) {
            for payload in record.fields.values() {
                assert_eq!(unescape_payload(&escape_payload(payload)).as_ref(), Some(payload));
            }
        }
    }
});
