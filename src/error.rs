//! Error types for PingOne MCP server operations.
//!
//! Errors are layered the same way requests flow through the server: token
//! acquisition ([`AuthError`]), PingOne API calls ([`ApiError`]), argument
//! extraction ([`ExtractionError`]), environment protection
//! ([`ValidationError`]) and finally the JSON-RPC surface ([`McpError`]).

use crate::validation::OperationType;

/// Errors raised while obtaining credentials for the PingOne API.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable credentials are configured
    #[error("no PingOne credentials available: {message}")]
    MissingCredentials { message: String },

    /// The token endpoint could not be reached
    #[error("token request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The token endpoint rejected the client credentials
    #[error("token endpoint {url} rejected the client credentials with status {status}: {body}")]
    Rejected { url: String, status: u16, body: String },

    /// The token endpoint returned something other than a token response
    #[error("invalid token response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

/// Errors raised by calls to the PingOne management API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network-level failure before a response was received
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("{method} {url} returned status {status}: {message}")]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    /// The response body could not be decoded
    #[error("failed to decode response from {method} {url}: {message}")]
    Decode {
        method: String,
        url: String,
        message: String,
    },

    /// A bearer token could not be attached to the request
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Backend failure without HTTP context
    #[error("PingOne API error: {message}")]
    Backend { message: String },
}

/// Errors raised while pulling `environmentId` out of raw tool arguments.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// Tool arguments were present but not a JSON object
    #[error("tool arguments must be a JSON object")]
    ArgumentsNotObject,

    /// The `environmentId` field is absent
    #[error("request arguments do not include the required 'environmentId' field")]
    MissingEnvironmentId,

    /// The `environmentId` field is not a UUID string
    #[error("'environmentId' must be a UUID string, got {value}")]
    InvalidEnvironmentId { value: String },
}

/// Errors raised by environment protection checks.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The target environment could not be determined from the request
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// An authenticated client could not be established
    #[error("failed to initialize authenticated client: {0}")]
    Authentication(#[source] AuthError),

    /// The environment lookup failed
    #[error("failed to get environment {environment_id}: {source}")]
    Api {
        environment_id: String,
        #[source]
        source: ApiError,
    },

    /// The environment lookup succeeded but carried no entity
    #[error("no environment data in response for environment {environment_id}")]
    NoEnvironmentData { environment_id: String },

    /// The caller cancelled the request while the environment was being resolved
    #[error("validation of environment {environment_id} was cancelled")]
    Cancelled { environment_id: String },

    /// Write against a PRODUCTION environment
    #[error(
        "write operation is not allowed against PRODUCTION environments: environment '{environment_name}' ({environment_id}) is of type PRODUCTION and writes are blocked to prevent unintended or breaking changes"
    )]
    ProductionWriteBlocked {
        environment_id: String,
        environment_name: String,
    },

    /// Read against a PRODUCTION environment
    #[error(
        "read operation is not allowed against PRODUCTION environments: environment '{environment_name}' ({environment_id}) is of type PRODUCTION and reads are blocked to protect sensitive data"
    )]
    ProductionReadBlocked {
        environment_id: String,
        environment_name: String,
    },
}

/// Errors surfaced to MCP clients as JSON-RPC errors.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    /// The message was not valid JSON
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The message was JSON but not a valid JSON-RPC request
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// No handler exists for the method
    #[error("method not found: {method}")]
    MethodNotFound { method: String },

    /// The params did not match what the method expects
    #[error("invalid params: {message}")]
    InvalidParams { message: String },

    /// Environment protection denied the tool call
    #[error("environment validation failed: {0}")]
    EnvironmentValidation(#[source] ValidationError),

    /// Unexpected server-side failure
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Errors raised while loading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting is absent
    #[error("missing required configuration value {name}")]
    Missing { name: String },

    /// A setting has an unusable value
    #[error("invalid value '{value}' for {name}: {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },
}

impl ApiError {
    /// Create a backend error without HTTP context
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// HTTP status of the failed call, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ValidationError {
    /// Create the denial for an operation against a PRODUCTION environment
    pub fn production_blocked(
        operation: OperationType,
        environment_id: impl Into<String>,
        environment_name: impl Into<String>,
    ) -> Self {
        let environment_id = environment_id.into();
        let environment_name = environment_name.into();
        match operation {
            OperationType::Read => Self::ProductionReadBlocked {
                environment_id,
                environment_name,
            },
            OperationType::Write => Self::ProductionWriteBlocked {
                environment_id,
                environment_name,
            },
        }
    }

    /// Whether this is a policy denial rather than a failure to validate
    pub fn is_policy_denial(&self) -> bool {
        matches!(
            self,
            Self::ProductionReadBlocked { .. } | Self::ProductionWriteBlocked { .. }
        )
    }
}

impl McpError {
    /// Create an invalid params error
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// JSON-RPC error code for this error
    pub fn code(&self) -> i64 {
        match self {
            Self::Parse { .. } => -32700,
            Self::InvalidRequest { .. } => -32600,
            Self::MethodNotFound { .. } => -32601,
            Self::InvalidParams { .. } => -32602,
            Self::EnvironmentValidation(_) | Self::Internal { .. } => -32603,
        }
    }
}

impl ConfigError {
    /// Create a missing setting error
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing { name: name.into() }
    }

    /// Create an invalid setting error
    pub fn invalid(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

// Result type aliases for convenience
pub type ApiResult<T> = Result<T, ApiError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type McpResult<T> = Result<T, McpError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
