//! Common test utilities for PingOne MCP server testing.
//!
//! Builds servers over an [`InMemoryPingOne`] backend and provides JSON-RPC
//! message helpers so integration tests read as protocol exchanges.

use pingone_mcp_server::client::{InMemoryPingOne, StaticClientProvider};
use pingone_mcp_server::model::{Environment, EnvironmentId, EnvironmentType};
use pingone_mcp_server::{PingOneMcpServer, ToolRegistry};
use serde_json::{Value, json};
use std::sync::Arc;

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A server over a fresh in-memory backend with every built-in tool.
pub fn test_server() -> (Arc<InMemoryPingOne>, Arc<PingOneMcpServer>) {
    init_logging();
    let api = Arc::new(InMemoryPingOne::new());
    let server = PingOneMcpServer::new(
        Arc::new(StaticClientProvider::new(api.clone())),
        ToolRegistry::with_builtin_tools(),
    );
    (api, Arc::new(server))
}

/// Add an environment to the backend and return its ID.
pub async fn add_environment(
    api: &InMemoryPingOne,
    name: &str,
    environment_type: EnvironmentType,
) -> EnvironmentId {
    let id = EnvironmentId::generate();
    api.insert_environment(Environment::new(id, name, environment_type))
        .await;
    id
}

/// A serialized `tools/call` request.
pub fn tool_call(id: u64, tool: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {
            "name": tool,
            "arguments": arguments
        }
    })
    .to_string()
}

/// Send one message and decode the response.
pub async fn send(server: &PingOneMcpServer, message: &str) -> Value {
    let response = server
        .handle_message(message)
        .await
        .expect("request should produce a response");
    serde_json::from_str(&response).expect("response should be valid JSON")
}

/// The error message of a JSON-RPC error response.
pub fn error_message(response: &Value) -> &str {
    response["error"]["message"]
        .as_str()
        .expect("response should be a JSON-RPC error")
}
