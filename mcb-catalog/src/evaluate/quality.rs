//! Structural checks on catalog records
//!
//! A usable candidate is a sound recording (Leader/06 `i` or `j`), is not an
//! online resource (008/23 `o`), and was cataloged in English (040 $b `eng`).

use crate::evaluate::external_id;
use crate::marc::{FieldExt, LeaderPosition, Record, RecordExt};
use std::fmt;
use tracing::info;

/// Leader/06 values for sound recordings (nonmusical, musical)
const SOUND_RECORDING_TYPES: [char; 2] = ['i', 'j'];
/// 008/23 form of item
const FORM_OF_ITEM_POS: usize = 23;
const FORM_ONLINE: char = 'o';
const CATALOGING_LANGUAGE: &str = "eng";

/// Why a candidate failed a quality check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Leader/06 is not a sound recording type
    RecordType(char),
    /// 008/23 marks an online resource
    OnlineResource,
    /// 040 $b is missing or not English; carries the value found
    CatalogingLanguage(Option<String>),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::RecordType(c) => write!(f, "wrong record type: {:?}", c),
            RejectionReason::OnlineResource => write!(f, "online resource"),
            RejectionReason::CatalogingLanguage(Some(lang)) => {
                write!(f, "wrong language of cataloging: {}", lang)
            }
            RejectionReason::CatalogingLanguage(None) => {
                write!(f, "no language of cataloging")
            }
        }
    }
}

/// Run every quality check, returning all failures (empty = usable)
pub fn check_quality(record: &Record) -> Vec<RejectionReason> {
    let mut reasons = Vec::new();

    let record_type = record.leader_code(LeaderPosition::RecordType);
    if !SOUND_RECORDING_TYPES.contains(&record_type) {
        reasons.push(RejectionReason::RecordType(record_type));
    }

    if form_of_item(record) == Some(FORM_ONLINE) {
        reasons.push(RejectionReason::OnlineResource);
    }

    let language = record
        .data_field("040")
        .and_then(|f| f.first_value('b'))
        .map(str::to_string);
    if language.as_deref() != Some(CATALOGING_LANGUAGE) {
        reasons.push(RejectionReason::CatalogingLanguage(language));
    }

    reasons
}

/// True when the record passes every quality check
///
/// Each failure is logged with the record's OCLC number.
pub fn record_is_usable(record: &Record) -> bool {
    let reasons = check_quality(record);
    if reasons.is_empty() {
        return true;
    }

    let id = external_id(record).unwrap_or_else(|| "(no 001)".to_string());
    for reason in &reasons {
        info!("Rejected {}: {}", id, reason);
    }
    false
}

/// 008/23, or `None` when the 008 is missing or too short
fn form_of_item(record: &Record) -> Option<char> {
    record
        .control_value("008")
        .and_then(|data| data.chars().nth(FORM_OF_ITEM_POS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marc::{build_field, empty_record};

    fn usable_record() -> Record {
        let mut record = empty_record();
        record.set_leader_code(LeaderPosition::RecordType, 'j');
        record.add_control_field("001".to_string(), "ocm00012345".to_string());
        record.add_control_field(
            "008".to_string(),
            "240101s2001    xx ||nn           n ||| d".to_string(),
        );
        record.add_field(build_field(
            "040",
            [' ', ' '],
            [('a', "DLC"), ('b', "eng"), ('c', "DLC")],
        ));
        record
    }

    #[test]
    fn test_default_candidate_passes() {
        let record = usable_record();
        assert!(check_quality(&record).is_empty());
        assert!(record_is_usable(&record));
    }

    #[test]
    fn test_nonmusical_sound_recording_passes() {
        let mut record = usable_record();
        record.set_leader_code(LeaderPosition::RecordType, 'i');
        assert!(record_is_usable(&record));
    }

    #[test]
    fn test_language_material_rejected() {
        let mut record = usable_record();
        record.set_leader_code(LeaderPosition::RecordType, 'a');
        assert_eq!(check_quality(&record), vec![RejectionReason::RecordType('a')]);
        assert!(!record_is_usable(&record));
    }

    #[test]
    fn test_online_resource_rejected() {
        let mut record = usable_record();
        assert!(record.set_control_positions("008", 23, "o"));
        assert_eq!(check_quality(&record), vec![RejectionReason::OnlineResource]);
    }

    #[test]
    fn test_french_cataloging_rejected() {
        let mut record = usable_record();
        assert!(record.data_field_mut("040").unwrap().replace_value('b', "fre"));
        assert_eq!(
            check_quality(&record),
            vec![RejectionReason::CatalogingLanguage(Some("fre".to_string()))]
        );
    }

    #[test]
    fn test_missing_040_rejected() {
        let mut record = usable_record();
        record.drop_fields("040");
        assert_eq!(
            check_quality(&record),
            vec![RejectionReason::CatalogingLanguage(None)]
        );
    }

    #[test]
    fn test_040_without_b_rejected() {
        let mut record = usable_record();
        record.drop_fields("040");
        record.add_field(build_field("040", [' ', ' '], [('a', "DLC")]));
        assert!(!record_is_usable(&record));
    }

    #[test]
    fn test_short_008_is_not_online() {
        let mut record = usable_record();
        record.drop_fields("008");
        record.add_control_field("008".to_string(), "240101s2001".to_string());
        assert!(record_is_usable(&record));
    }

    #[test]
    fn test_all_failures_reported() {
        let mut record = usable_record();
        record.set_leader_code(LeaderPosition::RecordType, 'g');
        assert!(record.set_control_positions("008", 23, "o"));
        assert!(record.data_field_mut("040").unwrap().replace_value('b', "spa"));
        assert_eq!(check_quality(&record).len(), 3);
    }
}
