//! MARC 21 bibliographic records
//!
//! Records, ISO 2709 reading and writing, and MARC-8 transcoding come from
//! `mrrc`. `fields` adds the lookups and edits reconciliation needs.
//!
//! Text is Unicode in memory. Records leave the engine marked UTF-8
//! (Leader/09 `a`) whatever coding they arrived in.

pub mod fields;

pub use fields::{build_field, is_control_tag, FieldExt, LeaderPosition, RecordExt};
pub use mrrc::{Field, Leader, MarcError, MarcReader, MarcWriter, Record, Subfield};

use std::io::Read;

pub type MarcResult<T> = Result<T, MarcError>;

/// Leader/09 value for UCS/Unicode records
pub const UNICODE_CODING: char = 'a';

/// Empty record with a default leader
pub fn empty_record() -> Record {
    Record::new(Leader::default())
}

/// Declare the record's text as UTF-8
pub fn mark_unicode(record: &mut Record) {
    record.set_leader_code(LeaderPosition::CharacterCoding, UNICODE_CODING);
}

/// Encode one record as ISO 2709
pub fn encode_record(record: &Record) -> MarcResult<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = MarcWriter::new(&mut buffer);
        writer.write_record(record)?;
    }
    Ok(buffer)
}

/// Read every record from a stream
pub fn read_all<R: Read>(input: R) -> MarcResult<Vec<Record>> {
    let mut reader = MarcReader::new(input);
    let mut records = Vec::new();
    while let Some(record) = reader.read_record()? {
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD_TERMINATOR: u8 = 0x1E;
    const RECORD_TERMINATOR: u8 = 0x1D;

    /// Hand-assembled ISO 2709 bytes, so field data can carry MARC-8
    fn raw_record(coding: u8, fields: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut directory = Vec::new();
        let mut data = Vec::new();
        for (tag, bytes) in fields {
            let start = data.len();
            data.extend_from_slice(bytes);
            data.push(FIELD_TERMINATOR);
            directory.extend_from_slice(
                format!("{}{:04}{:05}", tag, bytes.len() + 1, start).as_bytes(),
            );
        }
        directory.push(FIELD_TERMINATOR);
        let base = 24 + directory.len();
        let length = base + data.len() + 1;

        let mut raw = format!("{:05}njm {}22{:05}3i 4500", length, coding as char, base).into_bytes();
        raw.extend(directory);
        raw.extend(data);
        raw.push(RECORD_TERMINATOR);
        raw
    }

    fn marc8_title_record() -> Vec<u8> {
        let mut title = b"10\x1faCaf".to_vec();
        // MARC-8 combining acute precedes its base letter
        title.extend_from_slice(&[0xE2, b'e']);
        raw_record(
            b' ',
            &[("001", b"ocm00000042".to_vec()), ("245", title)],
        )
    }

    fn composed(text: &str) -> String {
        text.replace("e\u{301}", "é")
    }

    #[test]
    fn test_marc8_text_is_transcoded_on_read() {
        let records = read_all(marc8_title_record().as_slice()).unwrap();
        assert_eq!(records.len(), 1);

        let title = records[0].data_field("245").and_then(|f| f.first_value('a')).unwrap();
        assert!(!title.contains('\u{FFFD}'));
        assert_eq!(composed(title), "Café");
    }

    #[test]
    fn test_transcoded_record_is_written_as_unicode() {
        let mut record = read_all(marc8_title_record().as_slice()).unwrap().remove(0);
        mark_unicode(&mut record);

        let bytes = encode_record(&record).unwrap();
        assert_eq!(bytes[9], b'a');

        let reread = read_all(bytes.as_slice()).unwrap().remove(0);
        let title = reread.data_field("245").and_then(|f| f.first_value('a')).unwrap();
        assert_eq!(composed(title), "Café");
        assert_eq!(reread.control_number(), Some("ocm00000042"));
    }

    #[test]
    fn test_empty_stream_has_no_records() {
        assert!(read_all(&[][..]).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_record_is_error() {
        let mut bytes = encode_record(&{
            let mut record = empty_record();
            record.add_control_field("001".to_string(), "ocm1".to_string());
            record
        })
        .unwrap();
        bytes.truncate(bytes.len() - 4);
        assert!(read_all(bytes.as_slice()).is_err());
    }
}
