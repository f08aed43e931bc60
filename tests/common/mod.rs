//! In-test IPD encoder used to build fixtures.

#![allow(dead_code)]

use ipd_stream::parsing::IPD_SIGNATURE;

pub struct FieldFixture {
    pub field_type: u8,
    pub payload: Vec<u8>,
}

pub struct RecordFixture {
    pub db_id: u16,
    pub db_version: u8,
    pub handle: u16,
    pub uid: u32,
    pub fields: Vec<FieldFixture>,
}

impl RecordFixture {
    pub fn new(db_id: u16, uid: u32) -> Self {
        Self {
            db_id,
            db_version: 0,
            handle: 0,
            uid,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field_type: u8, payload: &[u8]) -> Self {
        self.fields.push(FieldFixture {
            field_type,
            payload: payload.to_vec(),
        });
        self
    }

    pub fn handle(mut self, handle: u16) -> Self {
        self.handle = handle;
        self
    }

    /// Value of the `record_length` field.
    pub fn length(&self) -> u32 {
        7 + self
            .fields
            .iter()
            .map(|f| 3 + f.payload.len() as u32)
            .sum::<u32>()
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.db_id.to_le_bytes());
        out.extend_from_slice(&self.length().to_le_bytes());
        out.push(self.db_version);
        out.extend_from_slice(&self.handle.to_le_bytes());
        out.extend_from_slice(&self.uid.to_be_bytes());
        for field in &self.fields {
            out.extend_from_slice(&(field.payload.len() as u16).to_le_bytes());
            out.push(field.field_type);
            out.extend_from_slice(&field.payload);
        }
    }
}

pub struct ArchiveBuilder {
    version: u8,
    names: Vec<Vec<u8>>,
    records: Vec<RecordFixture>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            version: 2,
            names: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn database(mut self, name: &str) -> Self {
        self.names.push(name.as_bytes().to_vec());
        self
    }

    pub fn raw_database(mut self, name: &[u8]) -> Self {
        self.names.push(name.to_vec());
        self
    }

    pub fn record(mut self, record: RecordFixture) -> Self {
        self.records.push(record);
        self
    }

    /// Bytes up to and including the database table.
    pub fn prologue(&self) -> Vec<u8> {
        let mut out = IPD_SIGNATURE.to_vec();
        out.push(0x0A);
        out.push(self.version);
        out.extend_from_slice(&(self.names.len() as u16).to_be_bytes());
        out.push(0x00);
        for name in &self.names {
            out.extend_from_slice(&(name.len() as u16).to_le_bytes());
            out.extend_from_slice(name);
        }
        out
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = self.prologue();
        for record in &self.records {
            record.encode(&mut out);
        }
        out
    }
}
