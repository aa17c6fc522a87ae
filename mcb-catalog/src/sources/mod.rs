//! External data sources
//!
//! The evaluation engine only sees the traits defined here. HTTP
//! implementations live in the submodules:
//!
//! - `worldcat` - union catalog search, full bibs, holdings (OAuth client credentials)
//! - `discogs` - release search and full release data (personal token)
//! - `musicbrainz` - release search by barcode (anonymous)
//!
//! Every HTTP client shares the same user agent, timeouts and a 1 request per
//! second rate limit.

pub mod discogs;
pub mod musicbrainz;
pub mod worldcat;

pub use discogs::DiscogsClient;
pub use musicbrainz::MusicBrainzClient;
pub use worldcat::WorldcatClient;

use crate::marc::{MarcError, Record};
use crate::synthesis::{DiscogsRelease, ExternalReleaseRecord, MusicBrainzRelease};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

/// User agent sent to every service
pub const USER_AGENT: &str = concat!(
    "music-cd-batch/",
    env!("CARGO_PKG_VERSION"),
    " +https://github.com/UCLALibrary/music-cd-batch"
);

/// Total request timeout
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// Connection timeout
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Direct (unkeyed) token-bucket limiter shared by the HTTP clients
pub(crate) type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// One request per second
pub(crate) fn one_per_second() -> DirectRateLimiter {
    RateLimiter::direct(Quota::per_second(NonZeroU32::MIN))
}

/// HTTP client with the shared user agent and timeouts
pub(crate) fn http_client() -> SourceResult<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

/// Errors raised by source clients
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {service} response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid MARC data: {0}")]
    Marc(#[from] MarcError),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// WorldCat search indexes used by the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchIndex {
    /// Standard number (UPC/EAN, ISBN, ...)
    StandardNumber,
    /// Music publisher number
    PublisherNumber,
}

impl SearchIndex {
    /// Index label used in WorldCat query syntax
    pub fn label(self) -> &'static str {
        match self {
            SearchIndex::StandardNumber => "sn",
            SearchIndex::PublisherNumber => "mn",
        }
    }
}

impl fmt::Display for SearchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Brief-bib search response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchResults {
    pub number_of_records: u64,
    pub brief_records: Vec<BriefRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BriefRecord {
    pub oclc_number: String,
    pub title: Option<String>,
}

impl SearchResults {
    /// Results listing the given OCLC numbers
    pub fn from_identifiers<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let brief_records: Vec<BriefRecord> = ids
            .into_iter()
            .map(|id| BriefRecord {
                oclc_number: id.into(),
                title: None,
            })
            .collect();
        Self {
            number_of_records: brief_records.len() as u64,
            brief_records,
        }
    }
}

/// Union catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Search one index for a term
    async fn search(&self, term: &str, index: SearchIndex) -> SourceResult<SearchResults>;

    /// OCLC numbers listed in a search response
    fn identifiers(&self, results: &SearchResults) -> Vec<String> {
        if results.number_of_records == 0 {
            return Vec::new();
        }
        results
            .brief_records
            .iter()
            .map(|r| r.oclc_number.clone())
            .filter(|id| !id.is_empty())
            .collect()
    }

    /// Full records for the given OCLC numbers
    async fn records(&self, ids: &[String]) -> SourceResult<Vec<Record>>;

    /// Whether the home institution already holds this OCLC number
    async fn is_held_locally(&self, oclc_number: &str) -> SourceResult<bool>;
}

/// Discogs (rich metadata: labels, catalog numbers, track lists)
#[async_trait]
pub trait DiscogsSource: Send + Sync {
    /// Release ids of CDs matching a product code
    async fn find_ids_by_code(&self, code: &str) -> SourceResult<Vec<u64>>;

    /// Full release data; ids that cannot be fetched are skipped
    async fn fetch_full(&self, ids: &[u64]) -> SourceResult<Vec<DiscogsRelease>>;

    fn parse(&self, releases: Vec<DiscogsRelease>) -> Vec<ExternalReleaseRecord> {
        releases.into_iter().map(ExternalReleaseRecord::from).collect()
    }
}

/// MusicBrainz (alternate metadata)
#[async_trait]
pub trait MusicBrainzSource: Send + Sync {
    /// CD releases whose barcode matches a product code
    async fn find_by_code(&self, code: &str) -> SourceResult<Vec<MusicBrainzRelease>>;

    fn parse(&self, releases: Vec<MusicBrainzRelease>) -> Vec<ExternalReleaseRecord> {
        releases.into_iter().map(ExternalReleaseRecord::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_index_labels() {
        assert_eq!(SearchIndex::StandardNumber.to_string(), "sn");
        assert_eq!(SearchIndex::PublisherNumber.to_string(), "mn");
    }

    #[test]
    fn test_search_results_deserialize() {
        let json = r#"{
            "numberOfRecords": 2,
            "briefRecords": [
                {"oclcNumber": "1011080915", "title": "Kind of blue"},
                {"oclcNumber": "48067282"}
            ]
        }"#;
        let results: SearchResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.number_of_records, 2);
        assert_eq!(results.brief_records[1].oclc_number, "48067282");
        assert!(results.brief_records[1].title.is_none());
    }

    #[test]
    fn test_empty_search_deserializes_without_brief_records() {
        let results: SearchResults = serde_json::from_str(r#"{"numberOfRecords": 0}"#).unwrap();
        assert!(results.brief_records.is_empty());
    }

    #[test]
    fn test_user_agent_names_tool() {
        assert!(USER_AGENT.starts_with("music-cd-batch/"));
    }
}
