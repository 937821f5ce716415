//! The request handling seam shared by the dispatcher and its middleware.

use crate::context::RequestContext;
use crate::error::McpResult;
use async_trait::async_trait;
use serde_json::Value;

/// Handles one JSON-RPC method call and produces its result.
///
/// Middleware implements this trait by wrapping another handler, so checks
/// can be layered in front of dispatch without the dispatcher knowing.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(
        &self,
        context: &RequestContext,
        method: &str,
        params: Value,
    ) -> McpResult<Value>;
}
