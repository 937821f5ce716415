//! Request context for tool calls.
//!
//! Every inbound JSON-RPC message gets its own context carrying a request ID
//! for log correlation and a cancellation token that long-running work
//! (token acquisition, PingOne API calls) races against.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Request context for MCP operations.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request
    pub request_id: String,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Create a new request context with a specific request ID.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Create a new request context with a generated request ID.
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Attach a cancellation token, typically a child of the session's token.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Cancel this request.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Check whether the request has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolves once the request is cancelled.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::with_generated_id()
    }
}
