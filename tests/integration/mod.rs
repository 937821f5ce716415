//! Integration tests exercising the server through its public API.

pub mod environment_protection;
pub mod http_client;
pub mod stdio_session;
