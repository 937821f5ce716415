//! MCP server over JSON-RPC.
//!
//! [`PingOneMcpServer`] owns the request pipeline:
//!
//! ```text
//! line -> JSON-RPC decode -> EnvironmentValidationMiddleware -> ToolDispatcher -> tool handler
//! ```
//!
//! Each request runs with its own [`RequestContext`], whose cancellation
//! token is a child of the server's shutdown token and is registered under
//! the JSON-RPC request ID so that `notifications/cancelled` can abort it.
//!
//! # Example
//!
//! ```rust
//! use pingone_mcp_server::client::{InMemoryPingOne, StaticClientProvider};
//! use pingone_mcp_server::server::PingOneMcpServer;
//! use pingone_mcp_server::tools::ToolRegistry;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let provider = Arc::new(StaticClientProvider::new(Arc::new(InMemoryPingOne::new())));
//! let server = PingOneMcpServer::new(provider, ToolRegistry::with_builtin_tools());
//!
//! let response = server
//!     .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#)
//!     .await;
//! assert!(response.is_some());
//! # }
//! ```

pub mod dispatcher;
pub mod handler;
pub mod protocol;
pub mod stdio;

pub use dispatcher::ToolDispatcher;
pub use handler::RequestHandler;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServerInfo};

use crate::client::ClientProvider;
use crate::context::RequestContext;
use crate::error::McpError;
use crate::handlers::ToolHandlers;
use crate::tools::ToolRegistry;
use crate::validation::{EnvironmentValidationMiddleware, EnvironmentValidator};
use log::{debug, info, warn};
use protocol::{CancelledParams, JSONRPC_VERSION, methods};
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub struct PingOneMcpServer {
    handler: Arc<dyn RequestHandler>,
    registry: Arc<ToolRegistry>,
    validator: Arc<EnvironmentValidator>,
    shutdown: CancellationToken,
    in_flight: Mutex<HashMap<String, CancellationToken>>,
}

impl PingOneMcpServer {
    /// Build the full pipeline with the default server info.
    pub fn new(client_provider: Arc<dyn ClientProvider>, registry: ToolRegistry) -> Self {
        Self::with_info(client_provider, registry, McpServerInfo::default())
    }

    pub fn with_info(
        client_provider: Arc<dyn ClientProvider>,
        registry: ToolRegistry,
        info: McpServerInfo,
    ) -> Self {
        let registry = Arc::new(registry);
        let validator = Arc::new(EnvironmentValidator::new(Arc::clone(&client_provider)));
        let dispatcher = Arc::new(ToolDispatcher::new(
            Arc::clone(&registry),
            ToolHandlers::new(client_provider),
            info,
        ));
        let handler = Arc::new(EnvironmentValidationMiddleware::new(
            registry.clone(),
            validator.clone(),
            dispatcher,
        ));

        info!("PingOne MCP server ready with {} tools", registry.len());

        Self {
            handler,
            registry,
            validator,
            shutdown: CancellationToken::new(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// The environment validator, for cache administration.
    pub fn validator(&self) -> &Arc<EnvironmentValidator> {
        &self.validator
    }

    /// Cancel every in-flight request.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Handle one JSON-RPC message. Returns the serialized response, or `None`
    /// for notifications.
    pub async fn handle_message(&self, message: &str) -> Option<String> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                return Some(encode(JsonRpcResponse::error(
                    Value::Null,
                    &McpError::Parse {
                        message: e.to_string(),
                    },
                )));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(encode(JsonRpcResponse::error(
                    Value::Null,
                    &McpError::InvalidRequest {
                        message: e.to_string(),
                    },
                )));
            }
        };

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request).await;
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(encode(JsonRpcResponse::error(
                id,
                &McpError::InvalidRequest {
                    message: format!("unsupported jsonrpc version '{}'", request.jsonrpc),
                },
            )));
        }

        let key = request_key(&id);
        let token = self.shutdown.child_token();
        match self.in_flight.lock().await.entry(key.clone()) {
            Entry::Occupied(_) => {
                warn!("Rejecting request {}: ID is already in flight", key);
                return Some(encode(JsonRpcResponse::error(
                    id,
                    &McpError::InvalidRequest {
                        message: format!("request id {key} is already in flight"),
                    },
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(token.clone());
            }
        }
        let context = RequestContext::new(key.clone()).with_cancellation(token);

        let params = request.params.unwrap_or(Value::Null);
        let outcome = self.handler.handle(&context, &request.method, params).await;

        self.in_flight.lock().await.remove(&key);

        let response = match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                match &error {
                    McpError::EnvironmentValidation(_) => warn!(
                        "Request {} ({}) rejected: {}",
                        key, request.method, error
                    ),
                    _ => debug!("Request {} ({}) failed: {}", key, request.method, error),
                }
                JsonRpcResponse::error(id, &error)
            }
        };
        Some(encode(response))
    }

    async fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            methods::NOTIFICATION_INITIALIZED => info!("MCP client initialized"),
            methods::NOTIFICATION_CANCELLED => {
                let Some(params) = request
                    .params
                    .clone()
                    .and_then(|params| serde_json::from_value::<CancelledParams>(params).ok())
                else {
                    warn!("Ignoring malformed cancellation notification");
                    return;
                };
                let key = request_key(&params.request_id);
                match self.in_flight.lock().await.get(&key) {
                    Some(token) => {
                        info!(
                            "Cancelling request {}: {}",
                            key,
                            params.reason.as_deref().unwrap_or("no reason given")
                        );
                        token.cancel();
                    }
                    None => debug!("Cancellation for unknown or finished request {}", key),
                }
            }
            other => debug!("Ignoring notification {}", other),
        }
    }
}

/// String IDs are used as-is; numeric IDs by their JSON text.
fn request_key(id: &Value) -> String {
    match id {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}

fn encode(response: JsonRpcResponse) -> String {
    serde_json::to_string(&response).unwrap_or_else(|e| {
        warn!("Failed to serialize response: {}", e);
        r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"failed to serialize response"}}"#
            .to_string()
    })
}
