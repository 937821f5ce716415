//! Environment tool definitions.
//!
//! Environment tools manage the environments themselves and the products
//! (services) enabled in them.
//!
//! - [`list_environments_tool`] and [`create_environment_tool`] have no
//!   environment target, so production protection does not apply.
//! - Reads of a single environment are allowed against PRODUCTION; they
//!   expose configuration metadata only.
//! - Updates to an environment or its enabled services are restricted.

use super::{Collection, ToolDefinition, environment_id_property, names};
use crate::validation::ToolValidationPolicy;
use serde_json::json;

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        list_environments_tool(),
        get_environment_tool(),
        create_environment_tool(),
        update_environment_tool(),
        get_environment_services_tool(),
        update_environment_services_tool(),
    ]
}

pub fn list_environments_tool() -> ToolDefinition {
    ToolDefinition::new(names::LIST_ENVIRONMENTS, Collection::Environments, true)
        .with_title("List Environments")
        .with_description("List all PingOne environments visible to the configured worker application")
        .with_input_schema(json!({
            "type": "object",
            "properties": {}
        }))
        .with_validation_policy(ToolValidationPolicy::not_applicable())
}

pub fn get_environment_tool() -> ToolDefinition {
    ToolDefinition::new(names::GET_ENVIRONMENT, Collection::Environments, true)
        .with_title("Get Environment")
        .with_description("Get the configuration of a single PingOne environment, including its type and region")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "environmentId": environment_id_property()
            },
            "required": ["environmentId"]
        }))
        .with_validation_policy(ToolValidationPolicy::allow_read())
}

pub fn create_environment_tool() -> ToolDefinition {
    ToolDefinition::new(names::CREATE_ENVIRONMENT, Collection::Environments, false)
        .with_title("Create Environment")
        .with_description("Create a new PingOne environment")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name of the new environment"
                },
                "region": {
                    "type": "string",
                    "enum": ["NA", "EU", "CA", "AP", "AU", "SG"],
                    "description": "Region the environment is hosted in"
                },
                "licenseId": {
                    "type": "string",
                    "description": "ID of the license to assign"
                },
                "type": {
                    "type": "string",
                    "enum": ["SANDBOX", "PRODUCTION"],
                    "default": "SANDBOX",
                    "description": "Environment type"
                },
                "description": {
                    "type": "string"
                },
                "products": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Product types to enable, e.g. PING_ONE_BASE"
                }
            },
            "required": ["name", "region", "licenseId"]
        }))
        .with_validation_policy(ToolValidationPolicy::not_applicable())
}

pub fn update_environment_tool() -> ToolDefinition {
    ToolDefinition::new(names::UPDATE_ENVIRONMENT, Collection::Environments, false)
        .with_title("Update Environment")
        .destructive()
        .with_description("Replace the name, description, region, license or type of a SANDBOX environment")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "environmentId": environment_id_property(),
                "name": {"type": "string"},
                "region": {
                    "type": "string",
                    "enum": ["NA", "EU", "CA", "AP", "AU", "SG"]
                },
                "licenseId": {"type": "string"},
                "type": {
                    "type": "string",
                    "enum": ["SANDBOX", "PRODUCTION"]
                },
                "description": {"type": "string"}
            },
            "required": ["environmentId", "name", "region", "licenseId", "type"]
        }))
}

pub fn get_environment_services_tool() -> ToolDefinition {
    ToolDefinition::new(names::GET_ENVIRONMENT_SERVICES, Collection::Environments, true)
        .with_title("Get Environment Services")
        .with_description("List the products (bill of materials) enabled in an environment")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "environmentId": environment_id_property()
            },
            "required": ["environmentId"]
        }))
        .with_validation_policy(ToolValidationPolicy::allow_read())
}

pub fn update_environment_services_tool() -> ToolDefinition {
    ToolDefinition::new(names::UPDATE_ENVIRONMENT_SERVICES, Collection::Environments, false)
        .with_title("Update Environment Services")
        .destructive()
        .with_description("Replace the set of products enabled in a SANDBOX environment")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "environmentId": environment_id_property(),
                "products": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": 1,
                    "description": "Product types to enable"
                }
            },
            "required": ["environmentId", "products"]
        }))
}
