//! Environment protection for `tools/call` requests.
//!
//! [`EnvironmentValidationMiddleware`] sits in front of the tool dispatcher.
//! Every method other than `tools/call` passes straight through. For tool
//! calls it looks up the tool's metadata, classifies the call as READ or
//! WRITE, consults the tool's [`ProductionPolicy`](super::ProductionPolicy)
//! and, unless the policy waives it, asks an [`EnvironmentGuard`] whether the
//! targeted environment may be touched. The wrapped handler only ever sees
//! calls that passed, and it sees them unmodified.

use super::{EnvironmentGuard, OperationType, extract_environment_id};
use crate::context::RequestContext;
use crate::error::{McpError, McpResult, ValidationError};
use crate::server::RequestHandler;
use crate::server::protocol::{CallToolParams, methods};
use crate::tools::ToolCatalog;
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Request handler that enforces production protection before tool dispatch.
pub struct EnvironmentValidationMiddleware {
    tools: Arc<dyn ToolCatalog>,
    guard: Arc<dyn EnvironmentGuard>,
    next: Arc<dyn RequestHandler>,
}

impl EnvironmentValidationMiddleware {
    pub fn new(
        tools: Arc<dyn ToolCatalog>,
        guard: Arc<dyn EnvironmentGuard>,
        next: Arc<dyn RequestHandler>,
    ) -> Self {
        Self { tools, guard, next }
    }

    async fn enforce(&self, context: &RequestContext, params: &Value) -> McpResult<()> {
        let call = CallToolParams::deserialize(params).map_err(|e| {
            McpError::invalid_params(format!("malformed tools/call params: {e}"))
        })?;

        // Unknown tools are the dispatcher's to reject.
        let Some(tool) = self.tools.tool_metadata(&call.name) else {
            debug!(
                "No metadata for tool '{}', skipping environment validation",
                call.name
            );
            return Ok(());
        };

        let operation = OperationType::for_tool(Some(&tool));
        if tool.policy.permits(operation) {
            debug!(
                "Tool '{}' policy {:?} waives environment validation for {} operations",
                tool.name, tool.policy, operation
            );
            return Ok(());
        }

        let environment_id = extract_environment_id(call.arguments.as_ref())
            .map_err(|e| McpError::EnvironmentValidation(ValidationError::from(e)))?;

        debug!(
            "Validating {} call to '{}' against environment {} (request {})",
            operation, tool.name, environment_id, context.request_id
        );

        self.guard
            .validate_environment(context, &environment_id, operation)
            .await
            .map_err(McpError::EnvironmentValidation)
    }
}

#[async_trait]
impl RequestHandler for EnvironmentValidationMiddleware {
    async fn handle(
        &self,
        context: &RequestContext,
        method: &str,
        params: Value,
    ) -> McpResult<Value> {
        if method == methods::TOOLS_CALL {
            self.enforce(context, &params).await?;
        }
        self.next.handle(context, method, params).await
    }
}
