//! Credential resolution
//!
//! Credentials resolve from environment variables first, then from the TOML
//! config file. Environment variables win so a shared config file can be used
//! with personal credentials.

use mcb_common::config::TomlConfig;
use mcb_common::{Error, Result};
use tracing::{info, warn};

pub const WORLDCAT_CLIENT_ID_ENV: &str = "MCB_WORLDCAT_CLIENT_ID";
pub const WORLDCAT_CLIENT_SECRET_ENV: &str = "MCB_WORLDCAT_CLIENT_SECRET";
pub const DISCOGS_TOKEN_ENV: &str = "MCB_DISCOGS_TOKEN";

/// WorldCat client credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldcatCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Resolve WorldCat client id and secret
///
/// Both halves must come from the same source; a lone environment variable
/// does not mix with the secret from TOML.
pub fn resolve_worldcat_credentials(toml_config: &TomlConfig) -> Result<WorldcatCredentials> {
    let env_pair = env_value(WORLDCAT_CLIENT_ID_ENV).zip(env_value(WORLDCAT_CLIENT_SECRET_ENV));
    let toml_pair = valid(toml_config.worldcat.client_id.as_deref())
        .zip(valid(toml_config.worldcat.client_secret.as_deref()));

    if env_pair.is_some() && toml_pair.is_some() {
        warn!("WorldCat credentials found in multiple sources: environment, TOML. Using environment (highest priority).");
    }

    if let Some((client_id, client_secret)) = env_pair {
        info!("WorldCat credentials loaded from environment variables");
        return Ok(WorldcatCredentials {
            client_id,
            client_secret,
        });
    }

    if let Some((client_id, client_secret)) = toml_pair {
        info!("WorldCat credentials loaded from TOML config");
        return Ok(WorldcatCredentials {
            client_id,
            client_secret,
        });
    }

    Err(Error::Config(format!(
        "WorldCat credentials not configured. Please configure using one of:\n\
         1. Environment: {}=your-id and {}=your-secret\n\
         2. TOML config: [worldcat] client_id = \"...\", client_secret = \"...\"\n\
         \n\
         Request a WSKey at: https://platform.worldcat.org/wskey/",
        WORLDCAT_CLIENT_ID_ENV, WORLDCAT_CLIENT_SECRET_ENV
    )))
}

/// Resolve the Discogs personal access token
pub fn resolve_discogs_token(toml_config: &TomlConfig) -> Result<String> {
    let env_token = env_value(DISCOGS_TOKEN_ENV);
    let toml_token = valid(toml_config.discogs.user_token.as_deref());

    if env_token.is_some() && toml_token.is_some() {
        warn!("Discogs token found in multiple sources: environment, TOML. Using environment (highest priority).");
    }

    if let Some(token) = env_token {
        info!("Discogs token loaded from environment variable");
        return Ok(token);
    }

    if let Some(token) = toml_token {
        info!("Discogs token loaded from TOML config");
        return Ok(token);
    }

    Err(Error::Config(format!(
        "Discogs token not configured. Please configure using one of:\n\
         1. Environment: {}=your-token\n\
         2. TOML config: [discogs] user_token = \"your-token\"\n\
         \n\
         Generate a token at: https://www.discogs.com/settings/developers",
        DISCOGS_TOKEN_ENV
    )))
}

/// Validate a credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn valid(value: Option<&str>) -> Option<String> {
    value.filter(|v| is_valid_key(v)).map(|v| v.trim().to_string())
}

fn env_value(name: &str) -> Option<String> {
    valid(std::env::var(name).ok().as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   \t"));
    }

    #[test]
    fn test_valid_trims() {
        assert_eq!(valid(Some("  tok ")), Some("tok".to_string()));
        assert_eq!(valid(Some(" ")), None);
        assert_eq!(valid(None), None);
    }
}
