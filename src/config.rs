//! Server configuration.
//!
//! Configuration comes from environment variables, optionally overridden by
//! command-line flags in the binary. [`ServerConfig::from_lookup`] takes the
//! variable lookup as a closure so tests never touch the process
//! environment.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `PINGONE_CLIENT_ID` / `PINGONE_CLIENT_SECRET` | Worker application credentials |
//! | `PINGONE_AUTH_ENVIRONMENT_ID` | Environment hosting the worker application |
//! | `PINGONE_ACCESS_TOKEN` | Pre-issued token, used instead of client credentials |
//! | `PINGONE_REGION` | `NA`, `EU`, `CA`, `AP`, `AU` or `SG` (default `NA`) |
//! | `PINGONE_API_BASE_URL` / `PINGONE_AUTH_BASE_URL` | Explicit host overrides |
//! | `PINGONE_MCP_INCLUDE_TOOLS` / `PINGONE_MCP_EXCLUDE_TOOLS` | Comma-separated tool names |
//! | `PINGONE_MCP_INCLUDE_COLLECTIONS` / `PINGONE_MCP_EXCLUDE_COLLECTIONS` | Comma-separated collections |

use crate::client::{
    ClientCredentialsTokenSource, ClientProvider, HttpPingOneClient, StaticTokenSource,
    TokenClientProvider, TokenSource,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::EnvironmentId;
use crate::tools::{Collection, ToolFilter};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const CLIENT_ID: &str = "PINGONE_CLIENT_ID";
pub const CLIENT_SECRET: &str = "PINGONE_CLIENT_SECRET";
pub const AUTH_ENVIRONMENT_ID: &str = "PINGONE_AUTH_ENVIRONMENT_ID";
pub const ACCESS_TOKEN: &str = "PINGONE_ACCESS_TOKEN";
pub const REGION: &str = "PINGONE_REGION";
pub const API_BASE_URL: &str = "PINGONE_API_BASE_URL";
pub const AUTH_BASE_URL: &str = "PINGONE_AUTH_BASE_URL";
pub const INCLUDE_TOOLS: &str = "PINGONE_MCP_INCLUDE_TOOLS";
pub const EXCLUDE_TOOLS: &str = "PINGONE_MCP_EXCLUDE_TOOLS";
pub const INCLUDE_COLLECTIONS: &str = "PINGONE_MCP_INCLUDE_COLLECTIONS";
pub const EXCLUDE_COLLECTIONS: &str = "PINGONE_MCP_EXCLUDE_COLLECTIONS";

/// PingOne geography. Each region has its own API and auth hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    NorthAmerica,
    Europe,
    Canada,
    AsiaPacific,
    Australia,
    Singapore,
}

impl Region {
    fn domain(&self) -> &'static str {
        match self {
            Self::NorthAmerica => "pingone.com",
            Self::Europe => "pingone.eu",
            Self::Canada => "pingone.ca",
            Self::AsiaPacific => "pingone.asia",
            Self::Australia => "pingone.com.au",
            Self::Singapore => "pingone.sg",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NorthAmerica => "NA",
            Self::Europe => "EU",
            Self::Canada => "CA",
            Self::AsiaPacific => "AP",
            Self::Australia => "AU",
            Self::Singapore => "SG",
        }
    }

    pub fn api_base_url(&self) -> String {
        format!("https://api.{}", self.domain())
    }

    pub fn auth_base_url(&self) -> String {
        format!("https://auth.{}", self.domain())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NA" | "COM" => Ok(Self::NorthAmerica),
            "EU" => Ok(Self::Europe),
            "CA" => Ok(Self::Canada),
            "AP" | "ASIA" => Ok(Self::AsiaPacific),
            "AU" => Ok(Self::Australia),
            "SG" => Ok(Self::Singapore),
            _ => Err(ConfigError::invalid(
                REGION,
                s,
                "expected one of NA, EU, CA, AP, AU, SG",
            )),
        }
    }
}

/// How the server authenticates to PingOne.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Worker application client credentials
    ClientCredentials {
        auth_environment_id: EnvironmentId,
        client_id: String,
        client_secret: String,
    },
    /// A pre-issued bearer token
    AccessToken(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientCredentials {
                auth_environment_id,
                client_id,
                ..
            } => f
                .debug_struct("ClientCredentials")
                .field("auth_environment_id", auth_environment_id)
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
            Self::AccessToken(_) => f.debug_tuple("AccessToken").field(&"<redacted>").finish(),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub credentials: Credentials,
    pub region: Region,
    /// API host, e.g. `https://api.pingone.com`
    pub api_base_url: String,
    /// Auth host, e.g. `https://auth.pingone.com`
    pub auth_base_url: String,
    pub tool_filter: ToolFilter,
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut builder = Self::builder();

        if let Some(token) = get(ACCESS_TOKEN) {
            builder = builder.with_access_token(token);
        } else {
            let client_id = get(CLIENT_ID).ok_or_else(|| ConfigError::missing(CLIENT_ID))?;
            let client_secret =
                get(CLIENT_SECRET).ok_or_else(|| ConfigError::missing(CLIENT_SECRET))?;
            let raw_environment =
                get(AUTH_ENVIRONMENT_ID).ok_or_else(|| ConfigError::missing(AUTH_ENVIRONMENT_ID))?;
            let auth_environment_id = raw_environment.trim().parse().map_err(|_| {
                ConfigError::invalid(AUTH_ENVIRONMENT_ID, &raw_environment, "expected a UUID")
            })?;
            builder = builder.with_client_credentials(auth_environment_id, client_id, client_secret);
        }

        if let Some(region) = get(REGION) {
            builder = builder.with_region(region.parse()?);
        }
        if let Some(url) = get(API_BASE_URL) {
            builder = builder.with_api_base_url(url);
        }
        if let Some(url) = get(AUTH_BASE_URL) {
            builder = builder.with_auth_base_url(url);
        }

        let filter = ToolFilter {
            include_tools: get(INCLUDE_TOOLS).map(|v| split_list(&v)).unwrap_or_default(),
            exclude_tools: get(EXCLUDE_TOOLS).map(|v| split_list(&v)).unwrap_or_default(),
            include_collections: get(INCLUDE_COLLECTIONS)
                .map(|v| parse_collections(&v))
                .transpose()?
                .unwrap_or_default(),
            exclude_collections: get(EXCLUDE_COLLECTIONS)
                .map(|v| parse_collections(&v))
                .transpose()?
                .unwrap_or_default(),
        };

        builder.with_tool_filter(filter).build()
    }

    /// Switch region, resetting both hosts to the region's defaults.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self.api_base_url = region.api_base_url();
        self.auth_base_url = region.auth_base_url();
        self
    }

    /// Ensure the hosts are usable URLs.
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, url) in [
            (API_BASE_URL, &self.api_base_url),
            (AUTH_BASE_URL, &self.auth_base_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ConfigError::invalid(
                    name,
                    url.as_str(),
                    "must start with http:// or https://",
                ));
            }
        }
        Ok(())
    }

    /// Token source for the configured credentials.
    pub fn token_source(&self) -> Arc<dyn TokenSource> {
        match &self.credentials {
            Credentials::ClientCredentials {
                auth_environment_id,
                client_id,
                client_secret,
            } => Arc::new(ClientCredentialsTokenSource::new(
                &self.auth_base_url,
                auth_environment_id,
                client_id.clone(),
                client_secret.clone(),
            )),
            Credentials::AccessToken(token) => Arc::new(StaticTokenSource::new(token.clone())),
        }
    }

    /// HTTP-backed client provider for the configured credentials and region.
    pub fn client_provider(&self) -> Arc<dyn ClientProvider> {
        let tokens = self.token_source();
        let client = Arc::new(HttpPingOneClient::new(
            self.api_base_url.clone(),
            Arc::clone(&tokens),
        ));
        Arc::new(TokenClientProvider::new(client, tokens))
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    credentials: Option<Credentials>,
    region: Region,
    api_base_url: Option<String>,
    auth_base_url: Option<String>,
    tool_filter: ToolFilter,
}

impl ServerConfigBuilder {
    pub fn with_client_credentials(
        mut self,
        auth_environment_id: EnvironmentId,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::ClientCredentials {
            auth_environment_id,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        });
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::AccessToken(token.into()));
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Override the API host regardless of region.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Override the auth host regardless of region.
    pub fn with_auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = Some(url.into());
        self
    }

    pub fn with_tool_filter(mut self, tool_filter: ToolFilter) -> Self {
        self.tool_filter = tool_filter;
        self
    }

    pub fn build(self) -> ConfigResult<ServerConfig> {
        let credentials = self
            .credentials
            .ok_or_else(|| ConfigError::missing(CLIENT_ID))?;

        let config = ServerConfig {
            credentials,
            region: self.region,
            api_base_url: self
                .api_base_url
                .unwrap_or_else(|| self.region.api_base_url()),
            auth_base_url: self
                .auth_base_url
                .unwrap_or_else(|| self.region.auth_base_url()),
            tool_filter: self.tool_filter,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_collections(value: &str) -> ConfigResult<Vec<Collection>> {
    split_list(value).iter().map(|item| item.parse()).collect()
}
