//! Population tool definitions.
//!
//! Listing and reading populations is allowed against PRODUCTION. Creating
//! or changing one is not.

use super::{Collection, ToolDefinition, environment_id_property, names};
use crate::validation::ToolValidationPolicy;
use serde_json::json;

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        list_populations_tool(),
        get_population_tool(),
        create_population_tool(),
        update_population_tool(),
    ]
}

pub fn list_populations_tool() -> ToolDefinition {
    ToolDefinition::new(names::LIST_POPULATIONS, Collection::Populations, true)
        .with_title("List Populations")
        .with_description("List the populations in an environment with their user counts")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "environmentId": environment_id_property()
            },
            "required": ["environmentId"]
        }))
        .with_validation_policy(ToolValidationPolicy::allow_read())
}

pub fn get_population_tool() -> ToolDefinition {
    ToolDefinition::new(names::GET_POPULATION, Collection::Populations, true)
        .with_title("Get Population")
        .with_description("Get one population")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "environmentId": environment_id_property(),
                "populationId": {"type": "string"}
            },
            "required": ["environmentId", "populationId"]
        }))
        .with_validation_policy(ToolValidationPolicy::allow_read())
}

pub fn create_population_tool() -> ToolDefinition {
    ToolDefinition::new(names::CREATE_POPULATION, Collection::Populations, false)
        .with_title("Create Population")
        .with_description("Create a population in a SANDBOX environment")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "environmentId": environment_id_property(),
                "name": {"type": "string"},
                "description": {"type": "string"},
                "passwordPolicyId": {
                    "type": "string",
                    "description": "Password policy to assign instead of the environment default"
                }
            },
            "required": ["environmentId", "name"]
        }))
}

pub fn update_population_tool() -> ToolDefinition {
    ToolDefinition::new(names::UPDATE_POPULATION, Collection::Populations, false)
        .with_title("Update Population")
        .with_description("Replace the name, description or password policy of a population in a SANDBOX environment")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "environmentId": environment_id_property(),
                "populationId": {"type": "string"},
                "name": {"type": "string"},
                "description": {"type": "string"},
                "passwordPolicyId": {"type": "string"}
            },
            "required": ["environmentId", "populationId", "name"]
        }))
}
