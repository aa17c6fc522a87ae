//! Provider-neutral synthesis input

use super::discogs::DiscogsRelease;
use super::musicbrainz::MusicBrainzRelease;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Metadata provider a release came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    Discogs,
    MusicBrainz,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Discogs => f.write_str("Discogs"),
            ProviderKind::MusicBrainz => f.write_str("MusicBrainz"),
        }
    }
}

/// Raw release payload, tagged by provider
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderRelease {
    Discogs(DiscogsRelease),
    MusicBrainz(MusicBrainzRelease),
}

impl ProviderRelease {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderRelease::Discogs(_) => ProviderKind::Discogs,
            ProviderRelease::MusicBrainz(_) => ProviderKind::MusicBrainz,
        }
    }
}

/// A provider release as seen by the rest of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalReleaseRecord {
    pub title: String,
    pub artist: Option<String>,
    /// First catalog number the provider lists, unnormalized
    pub publisher_number: Option<String>,
    pub release: ProviderRelease,
}

impl ExternalReleaseRecord {
    pub fn provider(&self) -> ProviderKind {
        self.release.kind()
    }

    /// Map the raw payload into synthesis input
    pub fn synthesis_input(&self) -> SynthesisInput {
        match &self.release {
            ProviderRelease::Discogs(release) => release.to_synthesis_input(),
            ProviderRelease::MusicBrainz(release) => release.to_synthesis_input(),
        }
    }
}

/// One (catalog number, label name) pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelEntry {
    pub catalog_number: Option<String>,
    pub name: Option<String>,
}

impl LabelEntry {
    pub fn new(catalog_number: Option<&str>, name: Option<&str>) -> Self {
        Self {
            catalog_number: non_empty(catalog_number),
            name: non_empty(name),
        }
    }
}

/// Everything the record builder needs, independent of provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisInput {
    pub source: ProviderKind,
    pub title: String,
    pub artist: Option<String>,
    /// Release year, only when it is exactly four digits
    pub year: Option<String>,
    /// Provider states the text is in English
    pub english_text: bool,
    /// Normalized barcodes
    pub barcodes: BTreeSet<String>,
    /// In provider order, duplicates included
    pub labels: Vec<LabelEntry>,
    pub publisher: Option<String>,
    /// Number of discs; at least 1
    pub disc_count: u32,
    pub tracks: Vec<String>,
    pub genres: Vec<String>,
    pub artist_sort: Option<String>,
}

impl SynthesisInput {
    /// Input with only the required values set
    pub fn new(source: ProviderKind, title: impl Into<String>) -> Self {
        Self {
            source,
            title: title.into(),
            artist: None,
            year: None,
            english_text: false,
            barcodes: BTreeSet::new(),
            labels: Vec::new(),
            publisher: None,
            disc_count: 1,
            tracks: Vec::new(),
            genres: Vec::new(),
            artist_sort: None,
        }
    }
}

/// Trimmed value, or `None` when empty
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A year string accepted for 008/07-10 and 264 $c
pub(crate) fn four_digit_year(value: &str) -> Option<String> {
    let year: String = value.chars().take(4).collect();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) && year != "0000" {
        Some(year)
    } else {
        None
    }
}

/// Disc count, defaulting to 1 when absent, zero or unparseable
pub(crate) fn disc_count(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}
