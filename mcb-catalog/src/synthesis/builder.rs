//! Record construction in three stages
//!
//! `BaseRecord` (constant template) -> `SourcedRecord` (provider data, or a
//! catalog winner taken as is) -> `LocalizedRecord` (local fields, see
//! `local_fields`). Each stage owns its record and only hands out shared
//! references, so a finished stage cannot change behind the next one.

use super::types::{LabelEntry, ProviderKind, SynthesisInput};
use crate::evaluate::normalize;
use crate::marc::{build_field, empty_record, Field, LeaderPosition, Record, RecordExt};
use chrono::NaiveDate;
use mcb_common::config::LocalFieldsConfig;
use mcb_common::time::yymmdd;
use std::collections::HashSet;

/// 007 for an audio CD
const PHYSICAL_DESCRIPTION_007: &str = "sd fungnn|||eu";
/// 008 after the date-entered positions: dates unknown, no place, music recording
const GENERAL_INFO_008_TAIL: &str = "nuuuuuuuuxx ||nn           n ||| d";

// 008 positions
const DATE_TYPE_POS: usize = 6;
const DATE1_POS: usize = 7;
const DATE2_POS: usize = 11;
const LANGUAGE_POS: usize = 35;

const NO_LINGUISTIC_CONTENT: &str = "zxx";
const PLACE_NOT_IDENTIFIED: &str = "[Place of publication not identified] :";
const PUBLISHER_NOT_IDENTIFIED: &str = "[publisher not identified]";
const DATE_NOT_IDENTIFIED: &str = "[date of publication not identified]";

/// Where a record in the pipeline came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrigin {
    /// Catalog record chosen by ranking
    Catalog,
    /// Built from provider data
    Synthesized(ProviderKind),
}

fn blank_data<S: Into<String>>(tag: &str, subfields: impl IntoIterator<Item = (char, S)>) -> Field {
    build_field(tag, [' ', ' '], subfields)
}

/// Stage 1: the constant template for an abbreviated CD record
#[derive(Debug, Clone)]
pub struct BaseRecord {
    record: Record,
}

impl BaseRecord {
    /// Template dated `entered` (008/00-05)
    pub fn new(entered: NaiveDate, config: &LocalFieldsConfig) -> Self {
        let mut record = empty_record();
        record.set_leader_code(LeaderPosition::RecordType, 'j');
        record.set_leader_code(LeaderPosition::BibliographicLevel, 'm');
        record.set_leader_code(LeaderPosition::EncodingLevel, '3');
        record.set_leader_code(LeaderPosition::CatalogingForm, 'i');

        record.add_control_field("007".to_string(), PHYSICAL_DESCRIPTION_007.to_string());
        record.add_control_field(
            "008".to_string(),
            format!("{}{}", yymmdd(entered), GENERAL_INFO_008_TAIL),
        );
        let agency = config.cataloging_agency.as_str();
        record.add_field(blank_data("040", [('a', agency), ('b', "eng"), ('c', agency)]));

        // RDA content, media and carrier terms
        record.add_field(blank_data(
            "336",
            [('a', "performed music"), ('b', "prm"), ('2', "rdacontent")],
        ));
        record.add_field(blank_data(
            "337",
            [('a', "audio"), ('b', "s"), ('2', "rdamedia")],
        ));
        record.add_field(blank_data(
            "338",
            [('a', "audio disc"), ('b', "sd"), ('2', "rdacarrier")],
        ));
        record.add_field(blank_data("340", [('b', "4 3/4 in.")]));
        record.add_field(blank_data("344", [('a', "digital"), ('2', "rdatr")]));
        record.add_field(blank_data("344", [('b', "optical"), ('2', "rdarm")]));
        record.add_field(blank_data("347", [('a', "audio file"), ('2', "rdaft")]));
        record.add_field(blank_data("347", [('b', "CD audio")]));

        Self { record }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Stage 2: add the provider's data
    pub fn with_source(self, input: &SynthesisInput) -> SourcedRecord {
        let mut record = self.record;

        set_dates_and_language(&mut record, input);

        for barcode in &input.barcodes {
            record.insert_in_tag_order(build_field("024", ['8', ' '], [('a', barcode.as_str())]));
        }

        for label in unique_labels(&input.labels) {
            let subfields = [('a', &label.catalog_number), ('b', &label.name)]
                .into_iter()
                .filter_map(|(code, value)| value.as_deref().map(|v| (code, v)));
            record.insert_in_tag_order(build_field("028", ['0', '2'], subfields));
        }

        record.insert_in_tag_order(title_statement(&input.title, input.artist.as_deref()));
        record.insert_in_tag_order(publication_statement(input));
        record.insert_in_tag_order(physical_description(input.disc_count));
        record.insert_in_tag_order(blank_data(
            "500",
            [('a', format!("Record generated from {} database.", input.source))],
        ));

        if !input.tracks.is_empty() {
            record.insert_in_tag_order(build_field(
                "505",
                ['0', ' '],
                [('a', format!("{}.", input.tracks.join(" -- ")))],
            ));
        }

        if !input.genres.is_empty() {
            record.insert_in_tag_order(build_field(
                "653",
                [' ', '6'],
                input.genres.iter().map(|genre| ('a', genre.as_str())),
            ));
        }

        if let Some(sort_name) = &input.artist_sort {
            record.insert_in_tag_order(blank_data("720", [('a', format!("{}.", sort_name))]));
        }

        SourcedRecord {
            record,
            origin: RecordOrigin::Synthesized(input.source),
        }
    }
}

/// 008/06-14 from the year, 008/35-37 from the text language
fn set_dates_and_language(record: &mut Record, input: &SynthesisInput) {
    if let Some(year) = &input.year {
        record.set_control_positions("008", DATE_TYPE_POS, "s");
        record.set_control_positions("008", DATE1_POS, year);
        record.set_control_positions("008", DATE2_POS, "    ");
    }
    let language = if input.english_text {
        "eng"
    } else {
        NO_LINGUISTIC_CONTENT
    };
    record.set_control_positions("008", LANGUAGE_POS, language);
}

/// Labels with a catalog number, first occurrence of each
/// normalized catalog number + name key
fn unique_labels(labels: &[LabelEntry]) -> Vec<&LabelEntry> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .filter(|label| label.catalog_number.is_some())
        .filter(|label| {
            let key = normalize(&format!(
                "{}{}",
                label.catalog_number.as_deref().unwrap_or(""),
                label.name.as_deref().unwrap_or("")
            ));
            seen.insert(key)
        })
        .collect()
}

/// Second indicator: characters to skip for filing
fn nonfiling_indicator(title: &str) -> char {
    let lower = title.to_lowercase();
    if lower.starts_with("the ") {
        '4'
    } else if lower.starts_with("a ") {
        '2'
    } else if lower.starts_with("an ") {
        '3'
    } else {
        '0'
    }
}

fn title_statement(title: &str, artist: Option<&str>) -> Field {
    let subfields = match artist {
        Some(artist) => vec![('a', format!("{} /", title)), ('c', format!("{}.", artist))],
        None => vec![('a', format!("{}.", title))],
    };
    build_field("245", ['0', nonfiling_indicator(title)], subfields)
}

fn publication_statement(input: &SynthesisInput) -> Field {
    let publisher = input.publisher.as_deref().unwrap_or(PUBLISHER_NOT_IDENTIFIED);
    let date = match &input.year {
        Some(year) => format!("[{}]", year),
        None => DATE_NOT_IDENTIFIED.to_string(),
    };
    build_field(
        "264",
        [' ', '1'],
        [
            ('a', PLACE_NOT_IDENTIFIED.to_string()),
            ('b', format!("{},", publisher)),
            ('c', date),
        ],
    )
}

fn physical_description(disc_count: u32) -> Field {
    let count = disc_count.max(1);
    let extent = if count > 1 {
        format!("{} audio discs :", count)
    } else {
        format!("{} audio disc :", count)
    };
    blank_data(
        "300",
        [
            ('a', extent),
            ('b', "digital ;".to_string()),
            ('c', "4 3/4 in.".to_string()),
        ],
    )
}

/// Stage 2: a record with its descriptive data in place
#[derive(Debug, Clone)]
pub struct SourcedRecord {
    record: Record,
    origin: RecordOrigin,
}

impl SourcedRecord {
    /// Wrap a catalog record chosen by ranking; its fields are kept as is
    pub fn from_catalog(record: Record) -> Self {
        Self {
            record,
            origin: RecordOrigin::Catalog,
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn origin(&self) -> RecordOrigin {
        self.origin
    }

    pub(crate) fn into_parts(self) -> (Record, RecordOrigin) {
        (self.record, self.origin)
    }
}

/// Build stages 1 and 2 for a provider release
pub fn synthesize(
    input: &SynthesisInput,
    entered: NaiveDate,
    config: &LocalFieldsConfig,
) -> SourcedRecord {
    BaseRecord::new(entered, config).with_source(input)
}
