//! MusicBrainz release payload (search results, `fmt=json`)

use super::types::{
    four_digit_year, non_empty, ExternalReleaseRecord, LabelEntry, ProviderKind,
    ProviderRelease, SynthesisInput,
};
use crate::evaluate::normalize;
use serde::{Deserialize, Serialize};

/// Language code MusicBrainz uses for English text
const ENGLISH: &str = "eng";

/// `GET /ws/2/release?query=...` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MusicBrainzSearch {
    pub count: u64,
    pub releases: Vec<MusicBrainzRelease>,
}

/// One release in a search response
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MusicBrainzRelease {
    pub id: String,
    pub title: String,
    #[serde(rename = "artist-credit")]
    pub artist_credit: Vec<MBArtistCredit>,
    /// YYYY, YYYY-MM or YYYY-MM-DD
    pub date: Option<String>,
    pub barcode: Option<String>,
    #[serde(rename = "text-representation")]
    pub text_representation: Option<MBTextRepresentation>,
    #[serde(rename = "label-info")]
    pub label_info: Vec<MBLabelInfo>,
    pub media: Vec<MBMedium>,
    pub tags: Vec<MBTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MBArtistCredit {
    /// Credited name (may differ from the artist's own name)
    pub name: String,
    pub joinphrase: Option<String>,
    pub artist: MBArtist,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MBArtist {
    pub id: String,
    pub name: String,
    #[serde(rename = "sort-name")]
    pub sort_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MBTextRepresentation {
    pub language: Option<String>,
    pub script: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MBLabelInfo {
    #[serde(rename = "catalog-number")]
    pub catalog_number: Option<String>,
    pub label: Option<MBLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MBLabel {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MBMedium {
    pub format: Option<String>,
    #[serde(rename = "track-count")]
    pub track_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MBTag {
    pub count: i64,
    pub name: String,
}

impl MBLabelInfo {
    fn label_name(&self) -> Option<&str> {
        self.label.as_ref().and_then(|l| l.name.as_deref())
    }
}

impl MusicBrainzRelease {
    /// Credited artist phrase, e.g. "Simon & Garfunkel"
    pub fn artist(&self) -> Option<String> {
        let phrase: String = self
            .artist_credit
            .iter()
            .map(|credit| {
                let name = if credit.name.is_empty() {
                    credit.artist.name.as_str()
                } else {
                    credit.name.as_str()
                };
                format!("{}{}", name, credit.joinphrase.as_deref().unwrap_or(""))
            })
            .collect();
        non_empty(Some(phrase.as_str()))
    }

    /// First catalog number present, which is not always on the first label
    pub fn publisher_number(&self) -> Option<String> {
        self.label_info
            .iter()
            .find_map(|info| non_empty(info.catalog_number.as_deref()))
    }

    pub fn to_synthesis_input(&self) -> SynthesisInput {
        let mut input = SynthesisInput::new(ProviderKind::MusicBrainz, self.title.trim());
        input.artist = self.artist();
        input.year = self.date.as_deref().and_then(four_digit_year);
        input.english_text = self
            .text_representation
            .as_ref()
            .and_then(|t| t.language.as_deref())
            == Some(ENGLISH);
        input.barcodes = non_empty(self.barcode.as_deref())
            .map(|barcode| normalize(&barcode))
            .into_iter()
            .collect();
        input.labels = self
            .label_info
            .iter()
            .map(|info| LabelEntry::new(info.catalog_number.as_deref(), info.label_name()))
            .collect();
        input.publisher = self
            .label_info
            .first()
            .and_then(|info| non_empty(info.label_name()));
        input.disc_count = u32::try_from(self.media.len()).unwrap_or(1).max(1);
        input.genres = self
            .tags
            .iter()
            .map(|tag| tag.name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        input.artist_sort = self
            .artist_credit
            .first()
            .and_then(|credit| non_empty(credit.artist.sort_name.as_deref()));
        input
    }
}

impl From<MusicBrainzRelease> for ExternalReleaseRecord {
    fn from(release: MusicBrainzRelease) -> Self {
        Self {
            title: release.title.clone(),
            artist: release.artist(),
            publisher_number: release.publisher_number(),
            release: ProviderRelease::MusicBrainz(release),
        }
    }
}
