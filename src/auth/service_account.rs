use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::auth::token_provider::{now_secs, CachedToken, TokenProvider, TokenResponse};

/// Default OAuth token endpoint for service accounts
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scopes needed to read Drive content and write bucket objects
pub const SYNC_SCOPES: &str = "https://www.googleapis.com/auth/drive.readonly https://www.googleapis.com/auth/devstorage.read_write";

/// JWT bearer grant type
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each signed assertion
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Service account key as stored in the secret payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    pub project_id: Option<String>,
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Parse the JSON credential blob
    pub fn from_json(payload: &str) -> Result<Self> {
        let key: Self =
            serde_json::from_str(payload).context("Credential payload is not a service account key")?;
        if let Some(key_type) = key.key_type.as_deref() {
            if key_type != "service_account" {
                return Err(anyhow!("Unsupported credential type: {}", key_type));
            }
        }
        Ok(key)
    }
}

/// Claims of the signed assertion exchanged for an access token
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
}

impl AssertionClaims {
    pub fn new(key: &ServiceAccountKey, scope: &str, issued_at: u64) -> Self {
        Self {
            iss: key.client_email.clone(),
            scope: scope.to_string(),
            aud: key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Access tokens minted from a service account key
pub struct ServiceAccountAuth {
    client: Client,
    key: ServiceAccountKey,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self::with_scope(key, SYNC_SCOPES)
    }

    pub fn with_scope(key: ServiceAccountKey, scope: &str) -> Self {
        Self {
            client: Client::new(),
            key,
            scope: scope.to_string(),
            cached: Mutex::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Sign a JWT bearer assertion with the account's private key
    fn sign_assertion(&self) -> Result<String> {
        let claims = AssertionClaims::new(&self.key, &self.scope, now_secs());
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .context("Service account private key is not a valid RSA PEM")?;
        jsonwebtoken::encode(&header, &claims, &encoding_key).context("Failed to sign assertion")
    }

    /// Exchange a fresh assertion for an access token
    async fn request_token(&self) -> Result<CachedToken> {
        let assertion = self.sign_assertion()?;
        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&params)
            .send()
            .await
            .context("Failed to send token request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Token exchange failed with status {}: {}", status, error_text));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;
        info!("Obtained access token for {}", self.key.client_email);
        Ok(CachedToken::from_response(token_response))
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountAuth {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh() {
                return Ok(token.access_token.clone());
            }
            debug!("Access token for {} is expiring, refreshing", self.key.client_email);
        }
        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}
