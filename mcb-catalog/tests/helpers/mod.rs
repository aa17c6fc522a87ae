//! Test Helper Utilities
//!
//! In-memory collaborators and record builders shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use mcb_catalog::marc::{build_field, empty_record, LeaderPosition, Record, RecordExt};
use mcb_catalog::sources::{
    CatalogSource, DiscogsSource, MusicBrainzSource, SearchIndex, SearchResults, SourceError,
    SourceResult,
};
use mcb_catalog::synthesis::discogs::{DiscogsArtist, DiscogsLabel, DiscogsTrack};
use mcb_catalog::synthesis::{DiscogsRelease, MusicBrainzRelease};
use mcb_catalog::workflow::{BatchItem, ProcessingDates};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn processing_dates() -> ProcessingDates {
    ProcessingDates::on(NaiveDate::from_ymd_opt(2024, 11, 5).unwrap())
}

pub fn batch_item(product_code: &str, title: &str) -> BatchItem {
    BatchItem {
        product_code: product_code.to_string(),
        call_number: "CDA 1234".to_string(),
        barcode: "L0091234567".to_string(),
        official_title: title.to_string(),
    }
}

/// A catalog record that passes every quality check
pub fn catalog_record(oclc_number: &str, title: &str, encoding_level: char) -> Record {
    let mut record = empty_record();
    record.set_leader_code(LeaderPosition::RecordType, 'j');
    record.set_leader_code(LeaderPosition::EncodingLevel, encoding_level);
    record.add_control_field("001".to_string(), format!("ocm{}", oclc_number));
    record.add_control_field("008".to_string(), " ".repeat(40));
    record.add_field(build_field(
        "040",
        [' ', ' '],
        [('a', "DLC"), ('b', "eng"), ('c', "DLC")],
    ));
    record.add_field(build_field("245", ['1', '0'], [('a', title)]));
    record
}

/// A catalog record with every field the problem report looks for
pub fn complete_catalog_record(oclc_number: &str, title: &str, encoding_level: char) -> Record {
    let mut record = catalog_record(oclc_number, title, encoding_level);
    record.add_control_field("007".to_string(), "sd fsngnnmmned".to_string());
    for (tag, value) in [
        ("100", "Davis, Miles."),
        ("264", "New York :"),
        ("300", "1 audio disc ;"),
        ("500", "Compact disc."),
        ("650", "Jazz."),
    ] {
        record.insert_in_tag_order(build_field(tag, [' ', '0'], [('a', value)]));
    }
    record
}

/// ISO 2709 bytes assembled by hand, so field data can be MARC-8
///
/// Leader/06 `j`, Leader/09 from `coding`, encoding level blank.
pub fn raw_marc(coding: u8, fields: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut data = Vec::new();
    for (tag, bytes) in fields {
        let start = data.len();
        data.extend_from_slice(bytes);
        data.push(0x1E);
        directory.extend_from_slice(format!("{}{:04}{:05}", tag, bytes.len() + 1, start).as_bytes());
    }
    directory.push(0x1E);
    let base = 24 + directory.len();
    let length = base + data.len() + 1;

    let mut raw = format!("{:05}njm {}22{:05} i 4500", length, coding as char, base).into_bytes();
    raw.extend(directory);
    raw.extend(data);
    raw.push(0x1D);
    raw
}

/// A usable MARC-8 catalog record whose 245 $a is "Café au lait" with the
/// acute written as a MARC-8 combining mark
pub fn marc8_catalog_record(oclc_number: &str) -> Vec<u8> {
    let mut title = b"10\x1faCaf".to_vec();
    title.extend_from_slice(&[0xE2, b'e']);
    title.extend_from_slice(b" au lait");
    raw_marc(
        b' ',
        &[
            ("001", format!("ocm{}", oclc_number).into_bytes()),
            ("008", vec![b' '; 40]),
            ("040", b"  \x1faDLC\x1fbeng".to_vec()),
            ("245", title),
        ],
    )
}

/// Fold a decomposed e-acute so either normalization form compares equal
pub fn composed(text: &str) -> String {
    text.replace("e\u{301}", "é")
}

pub fn discogs_release(id: u64, title: &str, catno: &str) -> DiscogsRelease {
    DiscogsRelease {
        id,
        title: title.to_string(),
        year: 1997,
        artists: vec![DiscogsArtist {
            name: "Miles Davis".to_string(),
        }],
        labels: vec![DiscogsLabel {
            name: Some("Columbia".to_string()),
            catno: Some(catno.to_string()),
        }],
        tracklist: vec![
            DiscogsTrack {
                position: Some("1".to_string()),
                title: "So What".to_string(),
            },
            DiscogsTrack {
                position: Some("2".to_string()),
                title: "Freddie Freeloader".to_string(),
            },
        ],
        ..Default::default()
    }
}

pub fn musicbrainz_release(title: &str) -> MusicBrainzRelease {
    MusicBrainzRelease {
        id: "mb-1".to_string(),
        title: title.to_string(),
        date: Some("1997".to_string()),
        ..Default::default()
    }
}

/// Catalog answering searches from a fixed table
#[derive(Default)]
pub struct FakeCatalog {
    /// `(index label, term)` to OCLC numbers
    results: HashMap<(String, String), Vec<String>>,
    records: HashMap<String, Record>,
    held: HashSet<String>,
    fail_search: bool,
    searches: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `record` the result of searching `index` for `term`
    pub fn with_result(mut self, index: SearchIndex, term: &str, record: Record) -> Self {
        let id = record
            .control_number()
            .map(|n| n.trim_start_matches("ocm").to_string())
            .unwrap_or_default();
        self.results
            .entry((index.label().to_string(), term.to_string()))
            .or_default()
            .push(id.clone());
        self.records.insert(id, record);
        self
    }

    pub fn with_held(mut self, oclc_number: &str) -> Self {
        self.held.insert(oclc_number.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_search = true;
        self
    }

    /// `index:term` for each search made, in order
    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn search(&self, term: &str, index: SearchIndex) -> SourceResult<SearchResults> {
        self.searches
            .lock()
            .unwrap()
            .push(format!("{}:{}", index, term));
        if self.fail_search {
            return Err(SourceError::Status {
                service: "WorldCat",
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let ids = self
            .results
            .get(&(index.label().to_string(), term.to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(SearchResults::from_identifiers(ids))
    }

    async fn records(&self, ids: &[String]) -> SourceResult<Vec<Record>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect())
    }

    async fn is_held_locally(&self, oclc_number: &str) -> SourceResult<bool> {
        Ok(self.held.contains(oclc_number))
    }
}

/// Discogs returning the same releases for any code
#[derive(Default)]
pub struct FakeDiscogs {
    releases: Vec<DiscogsRelease>,
}

impl FakeDiscogs {
    pub fn new(releases: Vec<DiscogsRelease>) -> Self {
        Self { releases }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiscogsSource for FakeDiscogs {
    async fn find_ids_by_code(&self, _code: &str) -> SourceResult<Vec<u64>> {
        Ok(self.releases.iter().map(|r| r.id).collect())
    }

    async fn fetch_full(&self, ids: &[u64]) -> SourceResult<Vec<DiscogsRelease>> {
        Ok(self
            .releases
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }
}

/// MusicBrainz returning the same releases for any code
#[derive(Default)]
pub struct FakeMusicBrainz {
    releases: Vec<MusicBrainzRelease>,
}

impl FakeMusicBrainz {
    pub fn new(releases: Vec<MusicBrainzRelease>) -> Self {
        Self { releases }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MusicBrainzSource for FakeMusicBrainz {
    async fn find_by_code(&self, _code: &str) -> SourceResult<Vec<MusicBrainzRelease>> {
        Ok(self.releases.clone())
    }
}
