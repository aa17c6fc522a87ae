//! WorldCat Metadata API client
//!
//! Authenticates with OAuth client credentials; the access token is cached
//! and refreshed shortly before it expires.
//!
//! API Documentation: https://developer.api.oclc.org/wc-metadata-v2

use super::{
    http_client, one_per_second, CatalogSource, DirectRateLimiter, SearchIndex, SearchResults,
    SourceError, SourceResult,
};
use crate::marc::{MarcReader, Record};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const SERVICE: &str = "WorldCat";
const TOKEN_URL: &str = "https://oauth.oclc.org/token";
const METADATA_BASE_URL: &str = "https://metadata.api.oclc.org/worldcat";
const SCOPE: &str = "WorldCatMetadataAPI";
/// Refresh a token this long before it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);
const MARC_MEDIA_TYPE: &str = "application/marc";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// `institution/holdings/current` response
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HoldingsResponse {
    holdings: Vec<HoldingStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HoldingStatus {
    requested_control_number: String,
    holding_set: bool,
}

/// WorldCat Metadata API client
pub struct WorldcatClient {
    client: Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    base_url: String,
    token: Mutex<Option<AccessToken>>,
    rate_limiter: DirectRateLimiter,
}

impl WorldcatClient {
    /// Client for the production endpoints
    pub fn new(client_id: String, client_secret: String) -> SourceResult<Self> {
        Self::with_endpoints(client_id, client_secret, TOKEN_URL, METADATA_BASE_URL)
    }

    /// Client for alternate token and API endpoints (sandbox, local proxy)
    pub fn with_endpoints(
        client_id: String,
        client_secret: String,
        token_url: impl Into<String>,
        base_url: impl Into<String>,
    ) -> SourceResult<Self> {
        Ok(Self {
            client: http_client()?,
            client_id,
            client_secret,
            token_url: token_url.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Mutex::new(None),
            rate_limiter: one_per_second(),
        })
    }

    /// Current access token, fetching a new one when missing or about to expire
    async fn access_token(&self) -> SourceResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        debug!("Requesting WorldCat access token");
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", SCOPE)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Auth(format!(
                "token request returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| SourceError::Decode {
            service: SERVICE,
            message: format!("token response: {}", e),
        })?;

        info!("WorldCat access token valid for {}s", token.expires_in);
        let fresh = AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        };
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    /// Authenticated, rate-limited GET
    async fn get(&self, url: &str, accept: &str) -> SourceResult<reqwest::Response> {
        let token = self.access_token().await?;
        self.rate_limiter.until_ready().await;

        debug!(url = %url, "Querying WorldCat");
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(ACCEPT, accept)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn full_record(&self, oclc_number: &str) -> SourceResult<Option<Record>> {
        let url = format!("{}/manage/bibs/{}", self.base_url, oclc_number);
        let bytes = self.get(&url, MARC_MEDIA_TYPE).await?.bytes().await?;
        let mut reader = MarcReader::new(bytes.as_ref());
        Ok(reader.read_record()?)
    }
}

#[async_trait]
impl CatalogSource for WorldcatClient {
    async fn search(&self, term: &str, index: SearchIndex) -> SourceResult<SearchResults> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/search/brief-bibs", self.base_url),
            &[("q", search_query(term, index))],
        )
        .map_err(|e| SourceError::Decode {
            service: SERVICE,
            message: format!("search URL: {}", e),
        })?;

        let response = self.get(url.as_str(), "application/json").await?;
        response.json().await.map_err(|e| SourceError::Decode {
            service: SERVICE,
            message: format!("search response: {}", e),
        })
    }

    async fn records(&self, ids: &[String]) -> SourceResult<Vec<Record>> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match self.full_record(id).await? {
                Some(record) => records.push(record),
                None => warn!("WorldCat returned no record for OCLC {}", id),
            }
        }
        Ok(records)
    }

    async fn is_held_locally(&self, oclc_number: &str) -> SourceResult<bool> {
        let url = format!(
            "{}/manage/institution/holdings/current?oclcNumbers={}",
            self.base_url, oclc_number
        );
        let response = self.get(&url, "application/json").await?;
        let holdings: HoldingsResponse =
            response.json().await.map_err(|e| SourceError::Decode {
                service: SERVICE,
                message: format!("holdings response: {}", e),
            })?;
        Ok(holding_set(&holdings, oclc_number))
    }
}

/// `index:term`, as WorldCat query syntax expects
fn search_query(term: &str, index: SearchIndex) -> String {
    format!("{}:{}", index.label(), term)
}

/// Holdings are set for the requested number (or for the only entry returned)
fn holding_set(response: &HoldingsResponse, oclc_number: &str) -> bool {
    match response.holdings.as_slice() {
        [only] => only.holding_set,
        many => many
            .iter()
            .any(|h| h.requested_control_number == oclc_number && h.holding_set),
    }
}
