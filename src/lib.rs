//! Model Context Protocol server for PingOne administration.
//!
//! Exposes PingOne management operations (environments, applications,
//! populations, directory statistics) as MCP tools that AI agents can
//! discover and call, while refusing to let those agents touch PRODUCTION
//! environments unless a tool is explicitly allowed to.
//!
//! # Core Components
//!
//! - [`PingOneMcpServer`] - JSON-RPC pipeline and stdio transport
//! - [`EnvironmentValidator`] - resolves environment types and caches PRODUCTION ones
//! - [`EnvironmentValidationMiddleware`] - enforces per-tool production policy
//! - [`PingOneApi`] - PingOne management API, over HTTP or in memory
//! - [`ToolRegistry`] - enabled tool definitions and their policies
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pingone_mcp_server::{PingOneMcpServer, ServerConfig, ToolRegistry};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let server = PingOneMcpServer::new(
//!     config.client_provider(),
//!     ToolRegistry::filtered(&config.tool_filter),
//! );
//! Arc::new(server).run_stdio().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod model;
pub mod server;
pub mod tools;
pub mod validation;

// Re-export commonly used types for convenience
pub use client::{ClientProvider, InMemoryPingOne, PingOneApi, StaticClientProvider};
pub use config::{Region, ServerConfig};
pub use context::RequestContext;
pub use error::{
    ApiError, AuthError, ConfigError, ExtractionError, McpError, McpResult, ValidationError,
    ValidationResult,
};
pub use model::{Environment, EnvironmentId, EnvironmentType};
pub use server::{PingOneMcpServer, RequestHandler};
pub use tools::{ToolCatalog, ToolDefinition, ToolFilter, ToolRegistry};
pub use validation::{
    EnvironmentGuard, EnvironmentValidationMiddleware, EnvironmentValidator, OperationType,
    ProductionPolicy, ToolValidationPolicy,
};
