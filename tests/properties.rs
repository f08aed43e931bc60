mod common;

use common::{ArchiveBuilder, RecordFixture};
use ipd_stream::{decode_bytes, ArchiveDecoder, IpdError, StreamEnd};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn fields_strategy() -> impl Strategy<Value = Vec<(u8, Vec<u8>)>> {
    vec((any::<u8>(), vec(any::<u8>(), 0..64)), 0..8)
}

proptest! {
    #[test]
    fn prop_table_order_and_count(names in vec("[A-Za-z ]{0,24}", 0..20)) {
        let mut builder = ArchiveBuilder::new();
        for name in &names {
            builder = builder.database(name);
        }
        let archive = decode_bytes(&builder.build()).unwrap();

        prop_assert_eq!(archive.len(), names.len());
        for (db, name) in archive.iter().zip(&names) {
            prop_assert_eq!(&db.name, name);
        }
    }

    #[test]
    fn prop_magic_corruption_rejected(index in 0usize..37, replacement in any::<u8>()) {
        let mut data = ArchiveBuilder::new().database("Addr").build();
        prop_assume!(data[index] != replacement);
        data[index] = replacement;

        prop_assert!(matches!(decode_bytes(&data), Err(IpdError::InvalidHeader(_))));
    }

    #[test]
    fn prop_fields_survive_decode(uid in any::<u32>(), handle in any::<u16>(), fields in fields_strategy()) {
        let mut record = RecordFixture::new(0, uid).handle(handle);
        for (field_type, payload) in &fields {
            record = record.field(*field_type, payload);
        }
        let length = record.length();
        let data = ArchiveBuilder::new().database("Addr").record(record).build();

        let archive = decode_bytes(&data).unwrap();
        let decoded = &archive.get(0).unwrap().records[0];

        // Duplicate field types keep the last payload
        let field_count = fields.len();
        let expected: BTreeMap<u8, Vec<u8>> = fields.into_iter().collect();
        prop_assert_eq!(&decoded.fields, &expected);
        prop_assert_eq!(decoded.uid, uid);
        prop_assert_eq!(decoded.handle, handle);
        if expected.len() == field_count {
            prop_assert_eq!(decoded.encoded_len(), u64::from(length));
        }
    }

    #[test]
    fn prop_cut_inside_field_drops_record(
        payload in vec(any::<u8>(), 1..64),
        cut_seed in any::<usize>(),
    ) {
        let builder = ArchiveBuilder::new()
            .database("Addr")
            .record(RecordFixture::new(0, 1).field(1, b"kept"))
            .record(RecordFixture::new(0, 2).field(1, b"head").field(2, &payload));
        let data = builder.build();

        // Strictly inside the last field's payload
        let cut = data.len() - 1 - cut_seed % payload.len();
        let decoded = ArchiveDecoder::new(&data[..cut]).decode().unwrap();

        let records = &decoded.archive.get(0).unwrap().records;
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].uid, 1);
        prop_assert!(matches!(decoded.end, StreamEnd::MidRecord(ref d) if d.uid == 2));
    }

    #[test]
    fn prop_cut_inside_record_header_keeps_earlier_records(cut_in_header in 0usize..13) {
        let mut data = ArchiveBuilder::new()
            .database("Addr")
            .record(RecordFixture::new(0, 1).field(1, b"kept"))
            .build();
        let mut next = Vec::new();
        RecordFixture::new(0, 2).field(1, b"lost").encode(&mut next);
        data.extend_from_slice(&next[..cut_in_header]);

        let decoded = ArchiveDecoder::new(&data[..]).decode().unwrap();
        prop_assert_eq!(decoded.archive.record_count(), 1);
        prop_assert_eq!(decoded.end, StreamEnd::RecordBoundary);
    }

    #[test]
    fn prop_arbitrary_stream_never_panics(stream in vec(any::<u8>(), 0..512)) {
        let mut data = ArchiveBuilder::new().database("A").database("B").build();
        data.extend_from_slice(&stream);
        match decode_bytes(&data) {
            Ok(archive) => prop_assert_eq!(archive.len(), 2),
            Err(e) => prop_assert!(matches!(e, IpdError::CorruptArchive { .. }), "unexpected error: {:?}", e),
        }
    }
}
