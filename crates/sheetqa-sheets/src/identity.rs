//! Identity providers for the Sheets API
//!
//! A service account is exchanged for an access token with the OAuth2
//! JWT-bearer grant: an RS256-signed assertion is posted to the account's
//! `token_uri`. Credentials are parsed on every call so malformed material
//! surfaces as a request failure rather than a startup failure.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sheetqa_core::{IdentityProvider, Result, SheetQaError};

/// Read-only access to spreadsheets
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a service-account key file that the token exchange needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Parse a serialized service-account key
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(SheetQaError::UpstreamFetch(
                "Service account credentials are not configured".to_string(),
            ));
        }

        serde_json::from_str(raw).map_err(|e| {
            SheetQaError::UpstreamFetch(format!("Invalid service account credentials: {e}"))
        })
    }
}

/// Claims of the JWT-bearer assertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign an assertion for `scope`, issued at `now`
pub fn sign_assertion(key: &ServiceAccountKey, scope: &str, now: DateTime<Utc>) -> Result<String> {
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: scope.to_string(),
        aud: key.token_uri.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| SheetQaError::UpstreamFetch(format!("Invalid service account key: {e}")))?;

    encode(&header, &claims, &signing_key)
        .map_err(|e| SheetQaError::UpstreamFetch(format!("Failed to sign assertion: {e}")))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges a service-account key for access tokens
pub struct ServiceAccountIdentity {
    client: Client,
    raw_credentials: String,
}

impl ServiceAccountIdentity {
    /// Create an identity from a serialized key; parsing is deferred
    pub fn new(client: Client, raw_credentials: impl Into<String>) -> Self {
        Self {
            client,
            raw_credentials: raw_credentials.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for ServiceAccountIdentity {
    async fn access_token(&self) -> Result<String> {
        let key = ServiceAccountKey::parse(&self.raw_credentials)?;
        let assertion = sign_assertion(&key, SHEETS_READONLY_SCOPE, Utc::now())?;

        tracing::debug!(
            client_email = %key.client_email,
            token_uri = %key.token_uri,
            "Exchanging service account assertion"
        );

        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| SheetQaError::UpstreamFetch(format!("Token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SheetQaError::UpstreamFetch(format!(
                "Token exchange rejected ({status}): {error_text}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            SheetQaError::UpstreamFetch(format!("Failed to parse token response: {e}"))
        })?;

        Ok(token.access_token)
    }
}

/// Hands out a fixed bearer token
pub struct StaticTokenIdentity {
    token: String,
}

impl StaticTokenIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentity {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
