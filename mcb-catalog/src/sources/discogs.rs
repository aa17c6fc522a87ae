//! Discogs API client
//!
//! API Documentation: https://www.discogs.com/developers

use super::{http_client, one_per_second, DirectRateLimiter, DiscogsSource, SourceError, SourceResult};
use crate::synthesis::DiscogsRelease;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

const SERVICE: &str = "Discogs";
const DISCOGS_BASE_URL: &str = "https://api.discogs.com";

/// `GET /database/search` response (only the fields used here)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchHit {
    id: u64,
}

/// Discogs API client (personal access token)
pub struct DiscogsClient {
    client: Client,
    user_token: String,
    base_url: String,
    rate_limiter: DirectRateLimiter,
}

impl DiscogsClient {
    pub fn new(user_token: String) -> SourceResult<Self> {
        Self::with_base_url(user_token, DISCOGS_BASE_URL)
    }

    pub fn with_base_url(user_token: String, base_url: impl Into<String>) -> SourceResult<Self> {
        Ok(Self {
            client: http_client()?,
            user_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: one_per_second(),
        })
    }

    fn search_url(&self, code: &str) -> SourceResult<reqwest::Url> {
        reqwest::Url::parse_with_params(
            &format!("{}/database/search", self.base_url),
            &[("q", code), ("type", "release"), ("format", "CD")],
        )
        .map_err(|e| SourceError::Decode {
            service: SERVICE,
            message: format!("search URL: {}", e),
        })
    }

    fn release_url(&self, id: u64) -> String {
        format!("{}/releases/{}", self.base_url, id)
    }

    /// Rate-limited, authenticated GET; `None` for 404
    async fn get(&self, url: &str) -> SourceResult<Option<reqwest::Response>> {
        self.rate_limiter.until_ready().await;

        debug!(url = %url, "Querying Discogs");
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Discogs token={}", self.user_token))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SourceError::Status {
                    service: SERVICE,
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

#[async_trait]
impl DiscogsSource for DiscogsClient {
    async fn find_ids_by_code(&self, code: &str) -> SourceResult<Vec<u64>> {
        let url = self.search_url(code)?;
        let Some(response) = self.get(url.as_str()).await? else {
            return Ok(Vec::new());
        };
        let search: SearchResponse = response.json().await.map_err(|e| SourceError::Decode {
            service: SERVICE,
            message: format!("search response: {}", e),
        })?;
        Ok(release_ids(search))
    }

    async fn fetch_full(&self, ids: &[u64]) -> SourceResult<Vec<DiscogsRelease>> {
        let mut releases = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(response) = self.get(&self.release_url(id)).await? else {
                warn!("Discogs release {} not found, skipping", id);
                continue;
            };
            match response.json::<DiscogsRelease>().await {
                Ok(release) => releases.push(release),
                Err(e) => warn!("Discogs release {} could not be decoded: {}", id, e),
            }
        }
        Ok(releases)
    }
}

fn release_ids(search: SearchResponse) -> Vec<u64> {
    search
        .results
        .into_iter()
        .map(|hit| hit.id)
        .filter(|&id| id != 0)
        .collect()
}
