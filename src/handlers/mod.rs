//! Tool handlers.
//!
//! Handlers turn validated tool arguments into PingOne API calls and reshape
//! the responses into compact JSON for the model. They run after environment
//! protection has passed and never re-check it.
//!
//! Handler failures are tool results, not protocol errors: the MCP client
//! gets an `isError` result carrying an `error` message and a stable
//! `error_code`, mirroring how the PingOne API itself reports problems.

pub mod applications;
pub mod directory;
pub mod environments;
pub mod populations;

use crate::client::{ApiResponse, ClientProvider, PingOneApi};
use crate::context::RequestContext;
use crate::error::{ApiError, AuthError};
use crate::tools::names;
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Outcome of a tool execution.
#[derive(Debug, Clone, PartialEq)]
pub struct PingOneToolResult {
    /// Whether the tool execution was successful
    pub success: bool,
    /// The entity data, or `{"error", "error_code"}` on failure
    pub content: Value,
    /// Optional context about the operation
    pub metadata: Option<Value>,
}

impl PingOneToolResult {
    pub fn success(content: Value, tool_name: &str) -> Self {
        Self {
            success: true,
            content,
            metadata: Some(json!({ "tool": tool_name })),
        }
    }

    /// Render as an MCP `CallToolResult`.
    pub fn into_call_result(self) -> Value {
        let text = serde_json::to_string_pretty(&self.content)
            .unwrap_or_else(|_| self.content.to_string());

        let mut result = json!({
            "content": [{ "type": "text", "text": text }],
            "isError": !self.success,
        });
        if self.content.is_object() {
            result["structuredContent"] = self.content;
        }
        if let Some(metadata) = self.metadata {
            result["_meta"] = metadata;
        }
        result
    }
}

/// A handler failure with a stable error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    pub code: &'static str,
    pub message: String,
}

impl ToolFailure {
    pub const INVALID_ARGUMENTS: &'static str = "INVALID_ARGUMENTS";
    pub const AUTHENTICATION_FAILED: &'static str = "AUTHENTICATION_FAILED";
    pub const API_ERROR: &'static str = "API_ERROR";
    pub const EMPTY_RESPONSE: &'static str = "EMPTY_RESPONSE";
    pub const UNKNOWN_TOOL: &'static str = "UNKNOWN_TOOL";
    pub const INTERNAL: &'static str = "INTERNAL_ERROR";

    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_ARGUMENTS, message)
    }

    pub fn into_result(self, tool_name: &str) -> PingOneToolResult {
        PingOneToolResult {
            success: false,
            content: json!({
                "error": self.message,
                "error_code": self.code,
            }),
            metadata: Some(json!({ "tool": tool_name })),
        }
    }
}

impl From<AuthError> for ToolFailure {
    fn from(error: AuthError) -> Self {
        Self::new(
            Self::AUTHENTICATION_FAILED,
            format!("failed to initialize authenticated client: {error}"),
        )
    }
}

impl From<ApiError> for ToolFailure {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Auth(auth) => Self::from(auth),
            other => Self::new(Self::API_ERROR, other.to_string()),
        }
    }
}

pub(crate) type ToolOutcome = Result<Value, ToolFailure>;

/// Executes tools against an authenticated PingOne client.
#[derive(Clone)]
pub struct ToolHandlers {
    client_provider: Arc<dyn ClientProvider>,
}

impl ToolHandlers {
    pub fn new(client_provider: Arc<dyn ClientProvider>) -> Self {
        Self { client_provider }
    }

    /// Run a tool by name.
    pub async fn execute(
        &self,
        context: &RequestContext,
        tool_name: &str,
        arguments: Value,
    ) -> PingOneToolResult {
        debug!(
            "Executing tool {} for request {}",
            tool_name, context.request_id
        );

        let outcome = match tool_name {
            names::LIST_ENVIRONMENTS => environments::list_environments(self, context).await,
            names::GET_ENVIRONMENT => {
                environments::get_environment(self, context, arguments).await
            }
            names::CREATE_ENVIRONMENT => {
                environments::create_environment(self, context, arguments).await
            }
            names::UPDATE_ENVIRONMENT => {
                environments::update_environment(self, context, arguments).await
            }
            names::GET_ENVIRONMENT_SERVICES => {
                environments::get_environment_services(self, context, arguments).await
            }
            names::UPDATE_ENVIRONMENT_SERVICES => {
                environments::update_environment_services(self, context, arguments).await
            }

            names::LIST_APPLICATIONS => {
                applications::list_applications(self, context, arguments).await
            }
            names::GET_APPLICATION => {
                applications::get_application(self, context, arguments).await
            }
            names::CREATE_OIDC_APPLICATION => {
                applications::create_oidc_application(self, context, arguments).await
            }
            names::UPDATE_OIDC_APPLICATION => {
                applications::update_oidc_application(self, context, arguments).await
            }

            names::LIST_POPULATIONS => populations::list_populations(self, context, arguments).await,
            names::GET_POPULATION => populations::get_population(self, context, arguments).await,
            names::CREATE_POPULATION => {
                populations::create_population(self, context, arguments).await
            }
            names::UPDATE_POPULATION => {
                populations::update_population(self, context, arguments).await
            }

            names::GET_TOTAL_IDENTITIES_BY_ENVIRONMENT => {
                directory::get_total_identities(self, context, arguments).await
            }

            _ => Err(ToolFailure::new(
                ToolFailure::UNKNOWN_TOOL,
                format!("unknown tool: {tool_name}"),
            )),
        };

        match outcome {
            Ok(content) => PingOneToolResult::success(content, tool_name),
            Err(failure) => {
                warn!(
                    "Tool {} failed for request {}: [{}] {}",
                    tool_name, context.request_id, failure.code, failure.message
                );
                failure.into_result(tool_name)
            }
        }
    }

    pub(crate) async fn client(
        &self,
        context: &RequestContext,
    ) -> Result<Arc<dyn PingOneApi>, ToolFailure> {
        Ok(self.client_provider.client(context).await?)
    }
}

/// Decode tool arguments. Absent arguments decode as an empty object.
pub(crate) fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolFailure> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| ToolFailure::invalid_arguments(e.to_string()))
}

/// The entity of a response that must carry one.
pub(crate) fn require<T>(response: ApiResponse<T>, what: &str) -> Result<T, ToolFailure> {
    response.data.ok_or_else(|| {
        ToolFailure::new(
            ToolFailure::EMPTY_RESPONSE,
            format!("PingOne returned status {} with no {what}", response.status),
        )
    })
}

/// Serialize an entity as tool content.
pub(crate) fn to_content<T: Serialize>(value: &T) -> ToolOutcome {
    serde_json::to_value(value).map_err(|e| ToolFailure::new(ToolFailure::INTERNAL, e.to_string()))
}

/// `{"<collection>": [...], "count": n}`
pub(crate) fn list_content(collection: &str, items: Vec<Value>) -> Value {
    let count = items.len();
    let mut content = Map::new();
    content.insert(collection.to_string(), Value::Array(items));
    content.insert("count".to_string(), json!(count));
    Value::Object(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_result_shape() {
        let result = PingOneToolResult::success(json!({"id": "p1"}), "get_population");
        let rendered = result.into_call_result();
        assert_eq!(rendered["isError"], false);
        assert_eq!(rendered["structuredContent"]["id"], "p1");
        assert_eq!(rendered["content"][0]["type"], "text");
        assert!(rendered["content"][0]["text"].as_str().unwrap().contains("p1"));
    }

    #[test]
    fn test_failure_result_shape() {
        let rendered = ToolFailure::invalid_arguments("missing field `name`")
            .into_result("create_population")
            .into_call_result();
        assert_eq!(rendered["isError"], true);
        assert_eq!(rendered["structuredContent"]["error_code"], "INVALID_ARGUMENTS");
    }

    #[test]
    fn test_api_auth_failure_maps_to_authentication_code() {
        let failure = ToolFailure::from(ApiError::Auth(AuthError::MissingCredentials {
            message: "none".to_string(),
        }));
        assert_eq!(failure.code, ToolFailure::AUTHENTICATION_FAILED);
    }

    #[test]
    fn test_list_content() {
        let content = list_content("populations", vec![json!({"id": "a"}), json!({"id": "b"})]);
        assert_eq!(content["count"], 2);
        assert_eq!(content["populations"][1]["id"], "b");
    }

    #[test]
    fn test_parse_null_arguments_as_empty_object() {
        #[derive(serde::Deserialize)]
        struct Empty {}
        assert!(parse_arguments::<Empty>(Value::Null).is_ok());
    }
}
