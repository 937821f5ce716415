//! Directory statistics tool definitions.

use super::{Collection, ToolDefinition, environment_id_property, names};
use crate::validation::ToolValidationPolicy;
use serde_json::json;

pub fn tools() -> Vec<ToolDefinition> {
    vec![get_total_identities_by_environment_tool()]
}

/// Identity counts are aggregate figures, so reading them from PRODUCTION is allowed.
pub fn get_total_identities_by_environment_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::GET_TOTAL_IDENTITIES_BY_ENVIRONMENT,
        Collection::Directory,
        true,
    )
    .with_title("Get Total Identities")
    .with_description("Count the identities in an environment over a reporting window")
    .with_input_schema(json!({
        "type": "object",
        "properties": {
            "environmentId": environment_id_property(),
            "startDate": {
                "type": "string",
                "format": "date-time",
                "description": "Inclusive start of the window (RFC 3339)"
            },
            "endDate": {
                "type": "string",
                "format": "date-time",
                "description": "Exclusive end of the window (RFC 3339)"
            }
        },
        "required": ["environmentId", "startDate", "endDate"]
    }))
    .with_validation_policy(ToolValidationPolicy::allow_read())
}
