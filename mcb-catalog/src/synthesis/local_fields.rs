//! Stage 3: institution-local fields
//!
//! Applied to every output record, catalog or synthesized. Local fields are
//! appended after the existing fields, whose order is left untouched. The
//! finished record is marked UTF-8: catalog records read as MARC-8 were
//! transcoded on the way in.

use super::builder::{RecordOrigin, SourcedRecord};
use crate::marc::{build_field, mark_unicode, Field, Record, RecordExt};
use chrono::NaiveDate;
use mcb_common::config::LocalFieldsConfig;
use mcb_common::time::yyyymmdd;

/// Per-item values written into the local fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemLocal {
    /// Item barcode (049 $l)
    pub barcode: String,
    /// Local call number (099 $a)
    pub call_number: String,
    /// The disc came without its container insert (adds a 590)
    pub lacks_container_insert: bool,
}

/// A finished record, ready to be written
#[derive(Debug, Clone)]
pub struct LocalizedRecord {
    record: Record,
    origin: RecordOrigin,
}

impl PartialEq for LocalizedRecord {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin && self.record.field_lines() == other.record.field_lines()
    }
}

impl LocalizedRecord {
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn origin(&self) -> RecordOrigin {
        self.origin
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

impl SourcedRecord {
    /// Stage 3: add local holdings, call number and batch fields
    pub fn localize(
        self,
        item: &ItemLocal,
        config: &LocalFieldsConfig,
        processed: NaiveDate,
    ) -> LocalizedRecord {
        let (mut record, origin) = self.into_parts();
        add_local_fields(&mut record, item, config, processed);
        mark_unicode(&mut record);
        LocalizedRecord { record, origin }
    }
}

fn local_field<'a>(tag: &str, subfields: impl IntoIterator<Item = (char, &'a str)>) -> Field {
    build_field(tag, [' ', ' '], subfields)
}

/// Append local fields to any record
///
/// An existing 049 (the catalog's own holdings symbol) is replaced.
pub fn add_local_fields(
    record: &mut Record,
    item: &ItemLocal,
    config: &LocalFieldsConfig,
    processed: NaiveDate,
) {
    record.drop_fields("049");
    record.add_field(local_field(
        "049",
        [('a', config.holdings_symbol.as_str()), ('l', item.barcode.as_str())],
    ));

    record.add_field(local_field("099", [('a', item.call_number.as_str())]));

    let processed = yyyymmdd(processed);
    record.add_field(local_field(
        "962",
        [
            ('a', config.batch_cataloger.as_str()),
            ('b', config.batch_name.as_str()),
            ('c', processed.as_str()),
            ('d', config.batch_encoding.as_str()),
            ('9', config.local_marker.as_str()),
        ],
    ));

    record.add_field(local_field(
        "966",
        [
            ('a', config.collection_code.as_str()),
            ('b', config.collection_name.as_str()),
            ('9', config.local_marker.as_str()),
        ],
    ));

    if item.lacks_container_insert {
        record.add_field(local_field(
            "590",
            [
                ('a', config.container_note.as_str()),
                ('9', config.local_marker.as_str()),
            ],
        ));
    }
}
