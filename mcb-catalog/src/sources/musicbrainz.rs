//! MusicBrainz API client
//!
//! Anonymous access; MusicBrainz asks for at most 1 request per second and a
//! meaningful user agent.
//!
//! API Documentation: https://musicbrainz.org/doc/MusicBrainz_API

use super::{
    http_client, one_per_second, DirectRateLimiter, MusicBrainzSource, SourceError, SourceResult,
};
use crate::synthesis::{MusicBrainzRelease, MusicBrainzSearch};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const SERVICE: &str = "MusicBrainz";
const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";

/// MusicBrainz API client
pub struct MusicBrainzClient {
    client: Client,
    base_url: String,
    rate_limiter: DirectRateLimiter,
}

impl MusicBrainzClient {
    pub fn new() -> SourceResult<Self> {
        Self::with_base_url(MUSICBRAINZ_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> SourceResult<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: one_per_second(),
        })
    }

    fn search_url(&self, code: &str) -> SourceResult<reqwest::Url> {
        reqwest::Url::parse_with_params(
            &format!("{}/release", self.base_url),
            &[("query", barcode_query(code).as_str()), ("fmt", "json")],
        )
        .map_err(|e| SourceError::Decode {
            service: SERVICE,
            message: format!("search URL: {}", e),
        })
    }
}

/// Lucene query for CD releases with this barcode
fn barcode_query(code: &str) -> String {
    format!("barcode:{} AND format:CD", code)
}

#[async_trait]
impl MusicBrainzSource for MusicBrainzClient {
    async fn find_by_code(&self, code: &str) -> SourceResult<Vec<MusicBrainzRelease>> {
        let url = self.search_url(code)?;
        self.rate_limiter.until_ready().await;

        debug!(url = %url, "Querying MusicBrainz");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let search: MusicBrainzSearch = response.json().await.map_err(|e| SourceError::Decode {
            service: SERVICE,
            message: format!("search response: {}", e),
        })?;
        debug!("MusicBrainz matched {} release(s) for {}", search.count, code);
        Ok(search.releases)
    }
}
