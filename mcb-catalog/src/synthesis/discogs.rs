//! Discogs release payload
//!
//! Only the keys the synthesizer reads are modeled; every key is optional so
//! a sparse release still deserializes.

use super::types::{
    disc_count, four_digit_year, non_empty, ExternalReleaseRecord, LabelEntry, ProviderKind,
    ProviderRelease, SynthesisInput,
};
use crate::evaluate::normalize;
use serde::{Deserialize, Serialize};

/// `GET /releases/{id}` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscogsRelease {
    pub id: u64,
    pub title: String,
    /// 0 when unknown
    pub year: u32,
    pub artists: Vec<DiscogsArtist>,
    pub artists_sort: Option<String>,
    pub labels: Vec<DiscogsLabel>,
    pub identifiers: Vec<DiscogsIdentifier>,
    pub formats: Vec<DiscogsFormat>,
    pub tracklist: Vec<DiscogsTrack>,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscogsArtist {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscogsLabel {
    pub name: Option<String>,
    pub catno: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscogsIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscogsFormat {
    pub name: Option<String>,
    /// Quantity as Discogs sends it (a string)
    pub qty: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscogsTrack {
    pub position: Option<String>,
    pub title: String,
}

impl DiscogsRelease {
    /// Artist names joined with ", "
    pub fn artist(&self) -> Option<String> {
        let names: Vec<&str> = self
            .artists
            .iter()
            .map(|a| a.name.trim())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }

    /// Catalog number of the first label
    pub fn publisher_number(&self) -> Option<String> {
        self.labels
            .first()
            .and_then(|label| non_empty(label.catno.as_deref()))
    }

    /// Barcodes worth recording: type Barcode, not a "Text" transcription
    fn barcodes(&self) -> impl Iterator<Item = &str> {
        self.identifiers
            .iter()
            .filter(|id| id.kind == "Barcode")
            .filter(|id| id.description.as_deref() != Some("Text"))
            .filter_map(|id| id.value.as_deref())
            .filter(|value| !value.trim().is_empty())
    }

    pub fn to_synthesis_input(&self) -> SynthesisInput {
        let mut input = SynthesisInput::new(ProviderKind::Discogs, self.title.trim());
        input.artist = self.artist();
        input.year = four_digit_year(&self.year.to_string());
        input.barcodes = self.barcodes().map(normalize).collect();
        input.labels = self
            .labels
            .iter()
            .map(|label| LabelEntry::new(label.catno.as_deref(), label.name.as_deref()))
            .collect();
        input.publisher = self
            .labels
            .first()
            .and_then(|label| non_empty(label.name.as_deref()));
        input.disc_count = disc_count(self.formats.first().and_then(|f| f.qty.as_deref()));
        input.tracks = self
            .tracklist
            .iter()
            .map(|track| track.title.trim().to_string())
            .filter(|title| !title.is_empty())
            .collect();
        input.genres = self.genres.clone();
        input.artist_sort = non_empty(self.artists_sort.as_deref());
        input
    }
}

impl From<DiscogsRelease> for ExternalReleaseRecord {
    fn from(release: DiscogsRelease) -> Self {
        Self {
            title: release.title.clone(),
            artist: release.artist(),
            publisher_number: release.publisher_number(),
            release: ProviderRelease::Discogs(release),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": 1234,
            "title": "The Köln Concert",
            "year": 1975,
            "artists": [{"name": "Keith Jarrett", "id": 1}],
            "artists_sort": "Jarrett, Keith",
            "labels": [
                {"name": "ECM Records", "catno": "ECM 1064/65 ST"},
                {"name": "ECM Records", "catno": "ECM 1064/65 ST"}
            ],
            "identifiers": [
                {"type": "Barcode", "value": "0 42281 01422 5"},
                {"type": "Barcode", "value": "042281014225", "description": "Scanned"},
                {"type": "Barcode", "value": "0 42281 01422 5 text", "description": "Text"},
                {"type": "Matrix / Runout", "value": "ECM 1064"}
            ],
            "formats": [{"name": "CD", "qty": "2"}],
            "tracklist": [
                {"position": "1", "title": "Part I"},
                {"position": "2", "title": "Part II a"}
            ],
            "genres": ["Jazz"]
        }"#
    }

    #[test]
    fn test_parse_release() {
        let release: DiscogsRelease = serde_json::from_str(sample_json()).unwrap();
        let record = ExternalReleaseRecord::from(release);
        assert_eq!(record.title, "The Köln Concert");
        assert_eq!(record.artist.as_deref(), Some("Keith Jarrett"));
        assert_eq!(record.publisher_number.as_deref(), Some("ECM 1064/65 ST"));
        assert_eq!(record.provider(), ProviderKind::Discogs);
    }

    #[test]
    fn test_synthesis_input_mapping() {
        let release: DiscogsRelease = serde_json::from_str(sample_json()).unwrap();
        let input = release.to_synthesis_input();
        assert_eq!(input.year.as_deref(), Some("1975"));
        assert!(!input.english_text);
        assert_eq!(input.barcodes.len(), 1);
        assert!(input.barcodes.contains("042281014225"));
        assert_eq!(input.labels.len(), 2);
        assert_eq!(input.publisher.as_deref(), Some("ECM Records"));
        assert_eq!(input.disc_count, 2);
        assert_eq!(input.tracks, vec!["Part I", "Part II a"]);
        assert_eq!(input.genres, vec!["Jazz"]);
        assert_eq!(input.artist_sort.as_deref(), Some("Jarrett, Keith"));
    }

    #[test]
    fn test_sparse_release_uses_defaults() {
        let release: DiscogsRelease = serde_json::from_str(r#"{"title": "Untitled"}"#).unwrap();
        let input = release.to_synthesis_input();
        assert_eq!(input.year, None);
        assert!(input.barcodes.is_empty());
        assert!(input.labels.is_empty());
        assert_eq!(input.publisher, None);
        assert_eq!(input.disc_count, 1);
        assert!(input.tracks.is_empty());
        assert_eq!(input.artist, None);
        assert_eq!(release.publisher_number(), None);
    }

    #[test]
    fn test_year_zero_is_unknown() {
        let release = DiscogsRelease {
            title: "X".to_string(),
            year: 0,
            ..Default::default()
        };
        assert_eq!(release.to_synthesis_input().year, None);
    }
}
