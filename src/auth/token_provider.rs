use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token refresh buffer time in seconds (refresh 5 minutes before expiry)
pub const TOKEN_REFRESH_BUFFER_SECS: u64 = 300;

/// Source of OAuth access tokens for Google APIs
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a token valid for at least the refresh buffer
    async fn access_token(&self) -> Result<String>;

    /// Authorization header value for the current token
    async fn auth_header(&self) -> Result<String> {
        Ok(format!("Bearer {}", self.access_token().await?))
    }
}

/// Token response from a Google OAuth token endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
}

/// An access token together with its absolute expiry (unix seconds)
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: u64,
}

impl CachedToken {
    pub fn from_response(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            expires_at: now_secs() + response.expires_in,
        }
    }

    pub fn is_fresh(&self) -> bool {
        now_secs() + TOKEN_REFRESH_BUFFER_SECS < self.expires_at
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Fixed token handed in from the environment
pub struct StaticTokenAuth {
    token: String,
}

impl StaticTokenAuth {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenAuth {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
