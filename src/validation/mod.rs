//! Production environment protection.
//!
//! Tool calls that target a PingOne environment are checked before they run:
//! unless the tool's policy says otherwise, operations against PRODUCTION
//! environments are refused. The pieces are:
//!
//! - [`OperationType`] classifies a call as READ or WRITE
//! - [`ToolValidationPolicy`] / [`ProductionPolicy`] describe what a tool may do
//! - [`extract_environment_id`] finds the target in raw arguments
//! - [`EnvironmentValidator`] resolves and caches environment types
//! - [`EnvironmentValidationMiddleware`] wires it all in front of dispatch

pub mod extract;
pub mod middleware;
pub mod operation;
pub mod policy;
pub mod validator;

pub use extract::{ENVIRONMENT_ID_FIELD, extract_environment_id};
pub use middleware::EnvironmentValidationMiddleware;
pub use operation::OperationType;
pub use policy::{ProductionPolicy, ToolValidationPolicy};
pub use validator::{EnvironmentGuard, EnvironmentValidator};
