//! Application tool definitions.

use super::{Collection, ToolDefinition, environment_id_property, names};
use crate::validation::ToolValidationPolicy;
use serde_json::{Value, json};

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        list_applications_tool(),
        get_application_tool(),
        create_oidc_application_tool(),
        update_oidc_application_tool(),
    ]
}

pub fn list_applications_tool() -> ToolDefinition {
    ToolDefinition::new(names::LIST_APPLICATIONS, Collection::Applications, true)
        .with_title("List Applications")
        .with_description("List the applications configured in an environment")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "environmentId": environment_id_property()
            },
            "required": ["environmentId"]
        }))
        .with_validation_policy(ToolValidationPolicy::allow_read())
}

pub fn get_application_tool() -> ToolDefinition {
    ToolDefinition::new(names::GET_APPLICATION, Collection::Applications, true)
        .with_title("Get Application")
        .with_description("Get the full configuration of one application")
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "environmentId": environment_id_property(),
                "applicationId": {
                    "type": "string",
                    "description": "ID of the application"
                }
            },
            "required": ["environmentId", "applicationId"]
        }))
        .with_validation_policy(ToolValidationPolicy::allow_read())
}

pub fn create_oidc_application_tool() -> ToolDefinition {
    ToolDefinition::new(names::CREATE_OIDC_APPLICATION, Collection::Applications, false)
        .with_title("Create OIDC Application")
        .with_description("Create an OpenID Connect application in a SANDBOX environment")
        .with_input_schema(oidc_application_schema(false))
}

pub fn update_oidc_application_tool() -> ToolDefinition {
    ToolDefinition::new(names::UPDATE_OIDC_APPLICATION, Collection::Applications, false)
        .with_title("Update OIDC Application")
        .with_description("Replace the configuration of an OpenID Connect application in a SANDBOX environment")
        .with_input_schema(oidc_application_schema(true))
}

fn oidc_application_schema(with_application_id: bool) -> Value {
    let mut schema = json!({
        "type": "object",
        "properties": {
            "environmentId": environment_id_property(),
            "name": {"type": "string"},
            "description": {"type": "string"},
            "enabled": {"type": "boolean", "default": true},
            "type": {
                "type": "string",
                "enum": ["WEB_APP", "NATIVE_APP", "SINGLE_PAGE_APP", "WORKER", "CUSTOM_APP"],
                "description": "Application type"
            },
            "grantTypes": {
                "type": "array",
                "items": {
                    "type": "string",
                    "enum": ["AUTHORIZATION_CODE", "IMPLICIT", "REFRESH_TOKEN", "CLIENT_CREDENTIALS", "DEVICE_CODE"]
                },
                "minItems": 1
            },
            "responseTypes": {
                "type": "array",
                "items": {"type": "string", "enum": ["CODE", "TOKEN", "ID_TOKEN"]}
            },
            "redirectUris": {
                "type": "array",
                "items": {"type": "string", "format": "uri"}
            },
            "tokenEndpointAuthMethod": {
                "type": "string",
                "enum": ["NONE", "CLIENT_SECRET_BASIC", "CLIENT_SECRET_POST", "CLIENT_SECRET_JWT", "PRIVATE_KEY_JWT"]
            }
        },
        "required": ["environmentId", "name", "type", "grantTypes"]
    });

    if with_application_id {
        schema["properties"]["applicationId"] = json!({
            "type": "string",
            "description": "ID of the application to replace"
        });
        if let Some(required) = schema["required"].as_array_mut() {
            required.push(json!("applicationId"));
        }
    }

    schema
}
