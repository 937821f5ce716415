//! JSON-RPC 2.0 and MCP wire types.

use crate::error::McpError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Method names the server recognizes.
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const PING: &str = "ping";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const NOTIFICATION_INITIALIZED: &str = "notifications/initialized";
    pub const NOTIFICATION_CANCELLED: &str = "notifications/cancelled";
}

/// An inbound request or notification. Notifications carry no `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, error: &McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError::from(error)),
        }
    }
}

impl From<&McpError> for JsonRpcError {
    fn from(error: &McpError) -> Self {
        let data = match error {
            McpError::EnvironmentValidation(validation) => Some(json!({
                "kind": "environment_validation",
                "policyDenial": validation.is_policy_denial(),
            })),
            _ => None,
        };
        Self {
            code: error.code(),
            message: error.to_string(),
            data,
        }
    }
}

/// Params of a `tools/call` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// Params of a `notifications/cancelled` notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledParams {
    pub request_id: Value,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Name and version reported during `initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for McpServerInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Result of `initialize`.
pub fn initialize_result(info: &McpServerInfo) -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": info.name,
            "version": info.version
        },
        "instructions": "PingOne administration tools. Operations against PRODUCTION environments are blocked unless a tool explicitly allows them."
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, ValidationError};

    #[test]
    fn test_notification_detection() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .unwrap();
        assert!(request.is_notification());

        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#).unwrap();
        assert!(!request.is_notification());
    }

    #[test]
    fn test_error_response_serialization() {
        let error = McpError::EnvironmentValidation(ValidationError::from(
            ExtractionError::MissingEnvironmentId,
        ));
        let response = JsonRpcResponse::error(json!(3), &error);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["id"], 3);
        assert_eq!(value["error"]["code"], -32603);
        assert_eq!(value["error"]["data"]["policyDenial"], false);
        assert!(value.get("result").is_none());
    }
}
