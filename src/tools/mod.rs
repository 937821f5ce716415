//! Tool definitions exposed to MCP clients.
//!
//! Each tool is described once by a [`ToolDefinition`]: its name, the
//! collection it belongs to, its JSON input schema, whether it is read-only,
//! and its resolved production policy. The [`ToolRegistry`] holds the
//! enabled definitions and serves both `tools/list` and the metadata lookups
//! that environment protection depends on.
//!
//! # Collections
//!
//! - **environments** - environment lifecycle and enabled services
//! - **applications** - OpenID Connect applications
//! - **populations** - user populations
//! - **directory** - identity statistics

pub mod application_schemas;
pub mod directory_schemas;
pub mod environment_schemas;
pub mod filter;
pub mod population_schemas;
pub mod registry;

pub use filter::ToolFilter;
pub use registry::{ToolCatalog, ToolMetadata, ToolRegistry};

use crate::error::ConfigError;
use crate::validation::{ProductionPolicy, ToolValidationPolicy};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// Names of the built-in tools.
pub mod names {
    pub const LIST_ENVIRONMENTS: &str = "list_environments";
    pub const GET_ENVIRONMENT: &str = "get_environment";
    pub const CREATE_ENVIRONMENT: &str = "create_environment";
    pub const UPDATE_ENVIRONMENT: &str = "update_environment";
    pub const GET_ENVIRONMENT_SERVICES: &str = "get_environment_services";
    pub const UPDATE_ENVIRONMENT_SERVICES: &str = "update_environment_services";

    pub const LIST_APPLICATIONS: &str = "list_applications";
    pub const GET_APPLICATION: &str = "get_application";
    pub const CREATE_OIDC_APPLICATION: &str = "create_oidc_application";
    pub const UPDATE_OIDC_APPLICATION: &str = "update_oidc_application";

    pub const LIST_POPULATIONS: &str = "list_populations";
    pub const GET_POPULATION: &str = "get_population";
    pub const CREATE_POPULATION: &str = "create_population";
    pub const UPDATE_POPULATION: &str = "update_population";

    pub const GET_TOTAL_IDENTITIES_BY_ENVIRONMENT: &str = "get_total_identities_by_environment";
}

/// Group of related tools that can be enabled or disabled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Environments,
    Applications,
    Populations,
    Directory,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Environments,
        Collection::Applications,
        Collection::Populations,
        Collection::Directory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Environments => "environments",
            Self::Applications => "applications",
            Self::Populations => "populations",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|collection| collection.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ConfigError::invalid(
                    "collection",
                    s,
                    "expected one of environments, applications, populations, directory",
                )
            })
    }
}

/// Everything the server knows about one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub title: String,
    pub description: String,
    pub collection: Collection,
    /// The tool never mutates PingOne state
    pub read_only: bool,
    /// The tool replaces existing state rather than adding to it
    pub destructive: bool,
    pub input_schema: Value,
    pub policy: ProductionPolicy,
}

impl ToolDefinition {
    /// A tool with an empty object schema and [`ProductionPolicy::Restricted`].
    pub fn new(name: impl Into<String>, collection: Collection, read_only: bool) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            description: String::new(),
            collection,
            read_only,
            destructive: false,
            input_schema: json!({"type": "object", "properties": {}}),
            policy: ProductionPolicy::Restricted,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    pub fn with_input_schema(mut self, input_schema: Value) -> Self {
        self.input_schema = input_schema;
        self
    }

    pub fn with_validation_policy(mut self, policy: ToolValidationPolicy) -> Self {
        self.policy = ProductionPolicy::from(policy);
        self
    }

    /// The subset of this definition environment protection needs.
    pub fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: self.name.clone(),
            read_only: self.read_only,
            policy: self.policy,
        }
    }

    /// The `tools/list` entry for this tool.
    pub fn to_mcp(&self) -> Value {
        json!({
            "name": self.name,
            "title": self.title,
            "description": self.description,
            "inputSchema": self.input_schema,
            "annotations": {
                "title": self.title,
                "readOnlyHint": self.read_only,
                "destructiveHint": self.destructive,
            }
        })
    }
}

/// Every built-in tool, in presentation order.
pub fn builtin_tools() -> Vec<ToolDefinition> {
    let mut tools = environment_schemas::tools();
    tools.extend(application_schemas::tools());
    tools.extend(population_schemas::tools());
    tools.extend(directory_schemas::tools());
    tools
}

/// Schema for the `environmentId` argument shared by environment-scoped tools.
pub(crate) fn environment_id_property() -> Value {
    json!({
        "type": "string",
        "format": "uuid",
        "description": "ID of the PingOne environment to operate on"
    })
}
