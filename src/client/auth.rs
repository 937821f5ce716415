//! Access tokens for the PingOne management API.
//!
//! The server authenticates as a PingOne worker application using the OAuth2
//! client-credentials grant. Tokens are cached until shortly before they
//! expire; a pre-issued token can be supplied instead for short sessions.

use super::{ClientProvider, PingOneApi};
use crate::context::RequestContext;
use crate::error::AuthError;
use crate::model::EnvironmentId;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Seconds before expiry at which a cached token is considered stale.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Source of bearer tokens for API requests.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a currently valid access token.
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// A fixed, pre-issued access token.
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenSource")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<String, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::MissingCredentials {
                message: "access token is empty".to_string(),
            });
        }
        Ok(self.token.clone())
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// OAuth2 client-credentials grant against a PingOne authorization server.
pub struct ClientCredentialsTokenSource {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ClientCredentialsTokenSource {
    /// Create a token source for a worker application.
    ///
    /// # Arguments
    /// * `auth_base_url` - Regional auth host, e.g. `https://auth.pingone.com`
    /// * `auth_environment_id` - Environment the worker application lives in
    /// * `client_id` / `client_secret` - Worker application credentials
    pub fn new(
        auth_base_url: &str,
        auth_environment_id: &EnvironmentId,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: format!(
                "{}/{}/as/token",
                auth_base_url.trim_end_matches('/'),
                auth_environment_id
            ),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: Mutex::new(None),
        }
    }

    /// Use a preconfigured HTTP client (proxies, timeouts).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Token endpoint this source posts to.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Drop the cached token so the next call fetches a fresh one.
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    async fn request_token(&self) -> Result<CachedToken, AuthError> {
        let credentials = basic_credentials(&self.client_id, &self.client_secret);

        let response = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, format!("Basic {credentials}"))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|source| AuthError::Request {
                url: self.token_url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| AuthError::Request {
                url: self.token_url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(AuthError::Rejected {
                url: self.token_url.clone(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let token: TokenResponse =
            serde_json::from_slice(&body).map_err(|e| AuthError::InvalidResponse {
                url: self.token_url.clone(),
                message: e.to_string(),
            })?;

        let lifetime = (token.expires_in - EXPIRY_MARGIN_SECS).max(0);
        info!("Obtained PingOne access token valid for {}s", token.expires_in);

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(lifetime),
        })
    }
}

impl fmt::Debug for ClientCredentialsTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentialsTokenSource")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsTokenSource {
    async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.access_token.clone());
            }
            debug!("Cached PingOne access token expired, refreshing");
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}

/// Hands out a shared API client once a token is known to be obtainable.
///
/// Checking the token up front means a missing or rejected credential shows
/// up as an [`AuthError`] rather than as a failed API call.
pub struct TokenClientProvider {
    client: Arc<dyn PingOneApi>,
    tokens: Arc<dyn TokenSource>,
}

impl TokenClientProvider {
    pub fn new(client: Arc<dyn PingOneApi>, tokens: Arc<dyn TokenSource>) -> Self {
        Self { client, tokens }
    }
}

#[async_trait]
impl ClientProvider for TokenClientProvider {
    async fn client(&self, context: &RequestContext) -> Result<Arc<dyn PingOneApi>, AuthError> {
        debug!("Acquiring PingOne client for request {}", context.request_id);
        self.tokens.access_token().await?;
        Ok(Arc::clone(&self.client))
    }
}

/// HTTP Basic credentials for a client; each part is form-urlencoded first
/// (RFC 6749 section 2.3.1).
fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    STANDARD.encode(format!(
        "{}:{}",
        urlencoding::encode(client_id),
        urlencoding::encode(client_secret)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token_source() {
        let source = StaticTokenSource::new("abc");
        assert_eq!(source.access_token().await.unwrap(), "abc");

        let empty = StaticTokenSource::new("");
        assert!(matches!(
            empty.access_token().await,
            Err(AuthError::MissingCredentials { .. })
        ));
    }

    #[test]
    fn test_token_url_and_redaction() {
        let environment_id: EnvironmentId =
            "5d3c9c1e-7a65-4a37-9d0b-8f8a2f0c1e11".parse().unwrap();
        let source = ClientCredentialsTokenSource::new(
            "https://auth.pingone.com/",
            &environment_id,
            "client",
            "super-secret",
        );
        assert_eq!(
            source.token_url(),
            "https://auth.pingone.com/5d3c9c1e-7a65-4a37-9d0b-8f8a2f0c1e11/as/token"
        );
        assert!(!format!("{source:?}").contains("super-secret"));
    }

    #[test]
    fn test_basic_credentials_encode_each_part() {
        assert_eq!(basic_credentials("worker", "s3cret"), STANDARD.encode("worker:s3cret"));

        let encoded = basic_credentials("app:1", "p@ss:w%rd");
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, "app%3A1:p%40ss%3Aw%25rd");
        assert_eq!(decoded.matches(':').count(), 1);
    }
}
