//! Title acceptance
//!
//! A candidate's 245 is compared against every reference title gathered for
//! the item (the official title plus provider release titles). Individual
//! titles may diverge (alternate languages, added subtitles); only the mean
//! score decides.

use super::external_id;
use super::similarity::similarity;
use crate::marc::{FieldExt, Record, RecordExt};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Below this a per-title score falls back to the short title
pub const TITLE_FALLBACK_THRESHOLD: f64 = 0.4;
/// A candidate whose mean score is below this is rejected
pub const TITLE_REJECT_THRESHOLD: f64 = 0.37;

/// Unique reference titles for one item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTitles(BTreeSet<String>);

impl ReferenceTitles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Official title plus every provider release title
    pub fn gather<'a>(
        official_title: &str,
        provider_titles: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut titles = Self::new();
        titles.insert(official_title);
        for title in provider_titles {
            titles.insert(title);
        }
        titles
    }

    pub fn insert(&mut self, title: impl Into<String>) {
        self.0.insert(title.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceTitles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Outcome of comparing one candidate against the reference titles
#[derive(Debug, Clone, PartialEq)]
pub struct TitleVerdict {
    /// Score contributed by each reference title, in iteration order
    pub per_title: Vec<(String, f64)>,
    pub mean_score: f64,
    pub accepted: bool,
}

/// 245 $a $n $p $b in record order, space separated
pub fn full_title(record: &Record) -> String {
    record
        .data_field("245")
        .map(|f| f.values_in(&['a', 'n', 'p', 'b']).join(" "))
        .unwrap_or_default()
}

/// 245 $a only
pub fn short_title(record: &Record) -> String {
    record
        .data_field("245")
        .map(|f| f.values_in(&['a']).join(" "))
        .unwrap_or_default()
}

/// Score a candidate's title against the reference titles
pub fn evaluate_title(record: &Record, titles: &ReferenceTitles) -> TitleVerdict {
    let id = external_id(record).unwrap_or_default();
    let full = full_title(record);
    let short = short_title(record);

    let mut per_title = Vec::with_capacity(titles.len());
    let mut total = 0.0;

    for title in titles.iter() {
        let mut score = similarity(&full, title);
        debug!("{:.2}: {:?} -> {:?}", score, full, title);

        if score < TITLE_FALLBACK_THRESHOLD && short != full {
            // The short-title score replaces the full-title one, even if lower
            score = similarity(&short, title);
            debug!("{:.2}: {:?} -> {:?}", score, short, title);
            if score < TITLE_FALLBACK_THRESHOLD {
                warn!(
                    "Titles are too different ({:.2}): MARC {:?} ({}) vs {:?}",
                    score, full, id, title
                );
            }
        }

        total += score;
        per_title.push((title.to_string(), score));
    }

    let mean_score = if titles.is_empty() {
        1.0
    } else {
        total / titles.len() as f64
    };
    let accepted = mean_score >= TITLE_REJECT_THRESHOLD;

    if accepted {
        info!("Average title score for {}: {:.2}", id, mean_score);
    } else {
        info!("Rejected {}: titles are too different ({:.2})", id, mean_score);
    }

    TitleVerdict {
        per_title,
        mean_score,
        accepted,
    }
}

/// True when the candidate's title agrees closely enough with the references
pub fn title_is_close_enough(record: &Record, titles: &ReferenceTitles) -> bool {
    evaluate_title(record, titles).accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marc::{build_field, empty_record};

    fn record_with_245(subfields: &[(char, &str)]) -> Record {
        let mut record = empty_record();
        record.add_control_field("001".to_string(), "ocm99".to_string());
        record.add_field(build_field("245", ['1', '0'], subfields.iter().copied()));
        record
    }

    #[test]
    fn test_full_and_short_title() {
        let record = record_with_245(&[
            ('a', "Symphonies."),
            ('n', "No. 5 ;"),
            ('c', "Beethoven."),
            ('b', "live"),
        ]);
        assert_eq!(full_title(&record), "Symphonies. No. 5 ; live");
        assert_eq!(short_title(&record), "Symphonies.");
    }

    #[test]
    fn test_missing_245_gives_empty_titles() {
        let record = empty_record();
        assert_eq!(full_title(&record), "");
        assert_eq!(short_title(&record), "");
    }

    #[test]
    fn test_empty_reference_set_accepts() {
        let record = record_with_245(&[('a', "Anything at all")]);
        let verdict = evaluate_title(&record, &ReferenceTitles::new());
        assert!(verdict.accepted);
        assert_eq!(verdict.mean_score, 1.0);
        assert!(verdict.per_title.is_empty());
    }

    #[test]
    fn test_identical_titles_score_one() {
        let record = record_with_245(&[('a', "Blue train /")]);
        let titles: ReferenceTitles = ["Blue train /", "Blue Train"].into_iter().collect();
        let verdict = evaluate_title(&record, &titles);
        assert!(verdict.accepted);
        assert_eq!(verdict.mean_score, 1.0);
    }

    #[test]
    fn test_unrelated_title_rejected() {
        let record = record_with_245(&[('a', "Mass in B minor")]);
        let titles = ReferenceTitles::gather("Greatest hits of 1987", ["Party anthems"]);
        assert!(!title_is_close_enough(&record, &titles));
    }

    #[test]
    fn test_short_title_fallback_replaces_score() {
        // The part title drags the full-title score under the fallback threshold
        let record = record_with_245(&[
            ('a', "Jazz"),
            ('p', "an extremely long part name nobody else uses"),
        ]);
        let titles: ReferenceTitles = ["Jazz"].into_iter().collect();
        let verdict = evaluate_title(&record, &titles);
        assert_eq!(verdict.per_title, vec![("Jazz".to_string(), 1.0)]);
        assert!(verdict.accepted);
    }

    #[test]
    fn test_one_divergent_title_tolerated() {
        let record = record_with_245(&[('a', "The four seasons")]);
        let titles = ReferenceTitles::gather(
            "The Four Seasons",
            ["The Four Seasons", "Le quattro stagioni", "Four seasons"],
        );
        let verdict = evaluate_title(&record, &titles);
        assert_eq!(verdict.per_title.len(), 3);
        assert!(verdict.accepted, "mean {}", verdict.mean_score);
    }

    #[test]
    fn test_reference_titles_deduplicate() {
        let titles = ReferenceTitles::gather("Abbey Road", ["Abbey Road", "Abbey Road"]);
        assert_eq!(titles.len(), 1);
    }
}
