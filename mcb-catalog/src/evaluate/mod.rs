//! Candidate evaluation
//!
//! Decides which catalog records are usable for an item and which one wins:
//!
//! - `normalize` / `similarity` - comparison keys and title scores
//! - `quality` - record type, form of item, language of cataloging
//! - `title` - agreement with the item's reference titles
//! - `holdings` - discards every candidate when one is already held
//! - `ranking` - encoding-level tournament
//! - `problems` - review notes for the chosen record
//!
//! Everything except the holdings guard is synchronous and pure.

pub mod holdings;
pub mod normalize;
pub mod problems;
pub mod quality;
pub mod ranking;
pub mod similarity;
pub mod title;

pub use holdings::{check_holdings, HoldingsCheck};
pub use normalize::{normalize, normalize_oclc_number, normalize_title, strip_punctuation};
pub use problems::record_problems;
pub use quality::{check_quality, record_is_usable, RejectionReason};
pub use ranking::{best_record, compare_records, encoding_level_score};
pub use similarity::similarity;
pub use title::{evaluate_title, title_is_close_enough, ReferenceTitles, TitleVerdict};

use crate::marc::{Record, RecordExt};
use tracing::debug;

/// OCLC number of a catalog record, taken from its 001
pub fn external_id(record: &Record) -> Option<String> {
    record.control_number().and_then(normalize_oclc_number)
}

/// Keep only candidates that pass the quality checks and title acceptance
pub fn usable_records(records: Vec<Record>, titles: &ReferenceTitles) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| {
            debug!(
                "Checking OCLC# {} -> {}",
                external_id(record).unwrap_or_default(),
                record.title_statement().unwrap_or_default()
            );
            // Both checks run so every rejection reason is logged
            let usable = record_is_usable(record);
            let title_ok = title_is_close_enough(record, titles);
            usable && title_ok
        })
        .collect()
}
