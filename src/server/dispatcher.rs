//! Terminal request handler: answers MCP methods and runs tools.

use super::RequestHandler;
use super::protocol::{CallToolParams, McpServerInfo, initialize_result, methods};
use crate::context::RequestContext;
use crate::error::{McpError, McpResult};
use crate::handlers::ToolHandlers;
use crate::tools::ToolRegistry;
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    handlers: ToolHandlers,
    info: McpServerInfo,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, handlers: ToolHandlers, info: McpServerInfo) -> Self {
        Self {
            registry,
            handlers,
            info,
        }
    }

    fn list_tools(&self) -> Value {
        let tools: Vec<Value> = self
            .registry
            .definitions()
            .iter()
            .map(|tool| tool.to_mcp())
            .collect();
        json!({ "tools": tools })
    }

    async fn call_tool(&self, context: &RequestContext, params: Value) -> McpResult<Value> {
        let call = CallToolParams::deserialize(&params).map_err(|e| {
            McpError::invalid_params(format!("malformed tools/call params: {e}"))
        })?;

        if !self.registry.contains(&call.name) {
            return Err(McpError::invalid_params(format!("unknown tool: {}", call.name)));
        }

        let result = self
            .handlers
            .execute(context, &call.name, call.arguments.unwrap_or(Value::Null))
            .await;
        Ok(result.into_call_result())
    }
}

#[async_trait]
impl RequestHandler for ToolDispatcher {
    async fn handle(
        &self,
        context: &RequestContext,
        method: &str,
        params: Value,
    ) -> McpResult<Value> {
        debug!("Dispatching {} (request {})", method, context.request_id);
        match method {
            methods::INITIALIZE => Ok(initialize_result(&self.info)),
            methods::PING => Ok(json!({})),
            methods::TOOLS_LIST => Ok(self.list_tools()),
            methods::TOOLS_CALL => self.call_tool(context, params).await,
            other => Err(McpError::MethodNotFound {
                method: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{InMemoryPingOne, StaticClientProvider};
    use crate::model::{Environment, EnvironmentId, EnvironmentType};

    async fn dispatcher() -> (ToolDispatcher, EnvironmentId) {
        let api = Arc::new(InMemoryPingOne::new());
        let id = EnvironmentId::generate();
        api.insert_environment(Environment::new(id, "Dev", EnvironmentType::Sandbox))
            .await;
        let dispatcher = ToolDispatcher::new(
            Arc::new(ToolRegistry::with_builtin_tools()),
            ToolHandlers::new(Arc::new(StaticClientProvider::new(api))),
            McpServerInfo::default(),
        );
        (dispatcher, id)
    }

    #[tokio::test]
    async fn test_initialize_and_list() {
        let (dispatcher, _id) = dispatcher().await;
        let context = RequestContext::new("1");

        let init = dispatcher
            .handle(&context, methods::INITIALIZE, json!({}))
            .await
            .unwrap();
        assert_eq!(init["protocolVersion"], "2025-06-18");

        let listed = dispatcher
            .handle(&context, methods::TOOLS_LIST, Value::Null)
            .await
            .unwrap();
        assert_eq!(listed["tools"].as_array().unwrap().len(), 15);
    }

    #[tokio::test]
    async fn test_call_tool() {
        let (dispatcher, id) = dispatcher().await;
        let result = dispatcher
            .handle(
                &RequestContext::new("1"),
                methods::TOOLS_CALL,
                json!({"name": "get_environment", "arguments": {"environmentId": id}}),
            )
            .await
            .unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"]["name"], "Dev");
    }

    #[tokio::test]
    async fn test_unknown_tool_and_method() {
        let (dispatcher, _id) = dispatcher().await;
        let context = RequestContext::new("1");

        let error = dispatcher
            .handle(&context, methods::TOOLS_CALL, json!({"name": "drop_tables"}))
            .await
            .unwrap_err();
        assert_eq!(error.code(), -32602);

        let error = dispatcher
            .handle(&context, "resources/list", json!({}))
            .await
            .unwrap_err();
        assert_eq!(error.code(), -32601);
    }
}
