//! Record synthesis from provider metadata
//!
//! Provider payloads (`discogs`, `musicbrainz`) are mapped into one
//! provider-neutral `SynthesisInput`; `builder` turns that into a record and
//! `local_fields` finishes any record for output.

pub mod builder;
pub mod discogs;
pub mod local_fields;
pub mod musicbrainz;
pub mod types;

pub use builder::{synthesize, BaseRecord, RecordOrigin, SourcedRecord};
pub use discogs::DiscogsRelease;
pub use local_fields::{add_local_fields, ItemLocal, LocalizedRecord};
pub use musicbrainz::{MusicBrainzRelease, MusicBrainzSearch};
pub use types::{ExternalReleaseRecord, LabelEntry, ProviderKind, ProviderRelease, SynthesisInput};

use crate::evaluate::normalize;
use std::collections::BTreeSet;

/// Release to synthesize from: the first Discogs release, else the first
/// MusicBrainz release
pub fn preferred_release<'a>(
    discogs: &'a [ExternalReleaseRecord],
    musicbrainz: &'a [ExternalReleaseRecord],
) -> Option<&'a ExternalReleaseRecord> {
    discogs.first().or_else(|| musicbrainz.first())
}

/// Normalized, non-empty publisher numbers from every release, sorted
pub fn publisher_numbers<'a>(
    releases: impl IntoIterator<Item = &'a ExternalReleaseRecord>,
) -> BTreeSet<String> {
    releases
        .into_iter()
        .filter_map(|release| release.publisher_number.as_deref())
        .map(normalize)
        .filter(|number| !number.is_empty())
        .collect()
}
