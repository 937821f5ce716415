//! PingOne MCP server test suite.
//!
//! ## Test Organization
//!
//! - `integration/` - end-to-end tests through the public API
//!   - `environment_protection` - production blocking through JSON-RPC
//!   - `http_client` - HTTP client and token source against a mock PingOne
//!   - `stdio_session` - a full MCP session over a byte stream
//!
//! ## Test Utilities
//!
//! The `common` module builds servers over the in-memory PingOne backend
//! and provides JSON-RPC message helpers.

mod common;
mod integration;
