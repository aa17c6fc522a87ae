//! Encoding-level ranking of catalog candidates

use super::external_id;
use crate::marc::{LeaderPosition, Record, RecordExt};
use tracing::debug;

/// Encoding levels, worst to best; a blank level is written as `#`
///
/// A code's score is its position here.
const ENCODING_LEVELS_WORST_FIRST: &str = "3LMK71I4#";

/// Score an encoding level code; unknown codes score -1
pub fn encoding_level_score(code: char) -> i32 {
    let code = if code == ' ' { '#' } else { code };
    ENCODING_LEVELS_WORST_FIRST
        .chars()
        .position(|c| c == code)
        .map_or(-1, |pos| pos as i32)
}

fn record_score(record: &Record) -> i32 {
    encoding_level_score(record.leader_code(LeaderPosition::EncodingLevel))
}

/// Pick the better of two records; the incumbent wins ties
pub fn compare_records<'a>(incumbent: &'a Record, challenger: &'a Record) -> &'a Record {
    let incumbent_score = record_score(incumbent);
    let challenger_score = record_score(challenger);

    let (winner, loser, winner_score, loser_score) = if incumbent_score >= challenger_score {
        (incumbent, challenger, incumbent_score, challenger_score)
    } else {
        (challenger, incumbent, challenger_score, incumbent_score)
    };
    debug!(
        "{} ({}) beats {} ({})",
        external_id(winner).unwrap_or_default(),
        winner_score,
        external_id(loser).unwrap_or_default(),
        loser_score
    );
    winner
}

/// Best candidate by left fold over `compare_records`
///
/// Only the running winner meets each challenger, so the result depends on
/// candidate order when scores tie.
pub fn best_record(records: &[Record]) -> Option<&Record> {
    let (first, rest) = records.split_first()?;
    Some(rest.iter().fold(first, compare_records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marc::empty_record;

    const PREFERENCE_BEST_FIRST: [char; 9] = [' ', '4', 'I', '1', '7', 'K', 'M', 'L', '3'];

    fn record(oclc: &str, level: char) -> Record {
        let mut record = empty_record();
        record.set_leader_code(LeaderPosition::EncodingLevel, level);
        record.add_control_field("001".to_string(), oclc.to_string());
        record
    }

    #[test]
    fn test_score_endpoints() {
        assert_eq!(encoding_level_score('3'), 0);
        assert_eq!(encoding_level_score(' '), 8);
        assert_eq!(encoding_level_score('#'), 8);
        assert_eq!(encoding_level_score('z'), -1);
    }

    #[test]
    fn test_preference_order_is_strict() {
        for (i, better) in PREFERENCE_BEST_FIRST.iter().enumerate() {
            for worse in &PREFERENCE_BEST_FIRST[i + 1..] {
                assert!(
                    encoding_level_score(*better) > encoding_level_score(*worse),
                    "{:?} should outrank {:?}",
                    better,
                    worse
                );
            }
            assert!(encoding_level_score(*better) > encoding_level_score('z'));
        }
    }

    #[test]
    fn test_no_candidates() {
        assert!(best_record(&[]).is_none());
    }

    #[test]
    fn test_single_candidate_wins() {
        let records = vec![record("1", 'z')];
        assert_eq!(best_record(&records).unwrap().control_number(), Some("1"));
    }

    #[test]
    fn test_best_level_wins() {
        let records = vec![record("1", 'M'), record("2", ' '), record("3", 'I')];
        assert_eq!(best_record(&records).unwrap().control_number(), Some("2"));
    }

    #[test]
    fn test_tie_keeps_incumbent() {
        let records = vec![record("1", '4'), record("2", '4'), record("3", '7')];
        assert_eq!(best_record(&records).unwrap().control_number(), Some("1"));
    }

    #[test]
    fn test_later_better_candidate_replaces_incumbent() {
        let records = vec![record("1", '3'), record("2", 'K'), record("3", 'K')];
        assert_eq!(best_record(&records).unwrap().control_number(), Some("2"));
    }

    #[test]
    fn test_compare_records_directly() {
        let a = record("1", 'L');
        let b = record("2", '1');
        assert_eq!(compare_records(&a, &b).control_number(), Some("2"));
        assert_eq!(compare_records(&b, &a).control_number(), Some("2"));
    }
}
