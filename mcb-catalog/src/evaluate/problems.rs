//! Review notes for a chosen catalog record
//!
//! A record with problems is still used; the notes tell a cataloger what to
//! check by hand.

use crate::marc::{FieldExt, Record, RecordExt};

/// Fields whose individual absence is reported
const REQUIRED_FIELDS: [&str; 3] = ["007", "300", "650"];
/// Groups where at least one member should be present
const REQUIRED_GROUPS: [&[&str]; 3] = [
    &["100", "110", "700", "710"],
    &["260", "264"],
    &["500", "505", "511", "518"],
];

/// Problems found in a record, in a stable order
pub fn record_problems(record: &Record) -> Vec<String> {
    let mut messages = Vec::new();

    for tag in REQUIRED_FIELDS {
        if !record.has_any_tag(&[tag]) {
            messages.push(format!("No {} field", tag));
        }
    }

    for group in REQUIRED_GROUPS {
        if !record.has_any_tag(group) {
            messages.push(format!("No {} fields", group.join("/")));
        }
    }

    // 490 $v usually means one disc of a multi-disc set
    for field in record.data_fields("490") {
        let volumes = field.values_in(&['v']);
        if !volumes.is_empty() {
            messages.push(format!("490 $v found: {:?}", volumes));
        }
    }

    messages
}
