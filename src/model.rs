//! Decoded archive model: databases holding records holding typed fields.
//!
//! Serializes to the legacy JSON shape: an array of
//! `{"name": .., "records": [{"uid": .., "<type>": "<escaped payload>"}]}`.

use crate::escape::escape_payload;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// One record of a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record handle assigned by the device.
    pub handle: u16,
    /// Unique id of the record.
    pub uid: u32,
    /// Field payloads keyed by field type code.
    pub fields: BTreeMap<u8, Vec<u8>>,
}

impl Record {
    pub fn new(handle: u16, uid: u32) -> Self {
        Self {
            handle,
            uid,
            fields: BTreeMap::new(),
        }
    }

    pub fn field(&self, field_type: u8) -> Option<&[u8]> {
        self.fields.get(&field_type).map(Vec::as_slice)
    }

    /// Bytes this record occupies on the wire, header included.
    pub fn encoded_len(&self) -> u64 {
        7 + self
            .fields
            .values()
            .map(|payload| 3 + payload.len() as u64)
            .sum::<u64>()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("uid", &self.uid)?;
        for (field_type, payload) in &self.fields {
            map.serialize_entry(&field_type.to_string(), &escape_payload(payload))?;
        }
        map.end()
    }
}

/// A named database from the archive's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Database {
    pub name: String,
    pub records: Vec<Record>,
}

impl Database {
    /// Create an empty database, dropping trailing NUL padding from `raw_name`.
    pub fn from_raw_name(raw_name: &[u8]) -> Self {
        let end = raw_name
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |i| i + 1);
        Self {
            name: String::from_utf8_lossy(&raw_name[..end]).into_owned(),
            records: Vec::new(),
        }
    }
}

/// Every database of an archive, in table order.
///
/// A database's index is its id: records in the stream refer to it by
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    databases: Vec<Database>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, database: Database) {
        self.databases.push(database);
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    pub fn get(&self, db_id: u16) -> Option<&Database> {
        self.databases.get(db_id as usize)
    }

    pub(crate) fn get_mut(&mut self, db_id: u16) -> Option<&mut Database> {
        self.databases.get_mut(db_id as usize)
    }

    /// First database with the given name. Names are not required to be unique.
    pub fn by_name(&self, name: &str) -> Option<&Database> {
        self.databases.iter().find(|db| db.name == name)
    }

    pub fn databases(&self) -> &[Database] {
        &self.databases
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Database> {
        self.databases.iter()
    }

    /// Total records across all databases.
    pub fn record_count(&self) -> usize {
        self.databases.iter().map(|db| db.records.len()).sum()
    }

    pub fn into_databases(self) -> Vec<Database> {
        self.databases
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for Archive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.databases.len()))?;
        for db in &self.databases {
            seq.serialize_element(db)?;
        }
        seq.end()
    }
}

impl<'a> IntoIterator for &'a Archive {
    type Item = &'a Database;
    type IntoIter = std::slice::Iter<'a, Database>;

    fn into_iter(self) -> Self::IntoIter {
        self.databases.iter()
    }
}
