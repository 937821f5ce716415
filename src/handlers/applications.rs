//! Application tool handlers.

use super::{ToolFailure, ToolHandlers, ToolOutcome, list_content, parse_arguments, require, to_content};
use crate::context::RequestContext;
use crate::model::{Application, EnvironmentId, OidcApplicationRequest};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListArgs {
    environment_id: EnvironmentId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetArgs {
    environment_id: EnvironmentId,
    application_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateArgs {
    environment_id: EnvironmentId,
    #[serde(flatten)]
    application: OidcApplicationRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateArgs {
    environment_id: EnvironmentId,
    application_id: String,
    #[serde(flatten)]
    application: OidcApplicationRequest,
}

fn application_summary(application: &Application) -> Value {
    json!({
        "id": application.id,
        "name": application.name,
        "type": application.application_type,
        "protocol": application.protocol,
        "enabled": application.enabled,
    })
}

fn check_request(request: &OidcApplicationRequest) -> Result<(), ToolFailure> {
    if request.name.trim().is_empty() {
        return Err(ToolFailure::invalid_arguments("'name' must not be empty"));
    }
    if request.grant_types.is_empty() {
        return Err(ToolFailure::invalid_arguments(
            "'grantTypes' must name at least one grant type",
        ));
    }
    Ok(())
}

pub async fn list_applications(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: ListArgs = parse_arguments(arguments)?;
    let client = handlers.client(context).await?;
    let applications = client
        .list_applications(&args.environment_id)
        .await?
        .data
        .unwrap_or_default();
    Ok(list_content(
        "applications",
        applications.iter().map(application_summary).collect(),
    ))
}

pub async fn get_application(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: GetArgs = parse_arguments(arguments)?;
    let client = handlers.client(context).await?;
    let application = require(
        client
            .get_application(&args.environment_id, &args.application_id)
            .await?,
        "application",
    )?;
    to_content(&application)
}

pub async fn create_oidc_application(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: CreateArgs = parse_arguments(arguments)?;
    check_request(&args.application)?;

    let client = handlers.client(context).await?;
    let application = require(
        client
            .create_oidc_application(&args.environment_id, &args.application)
            .await?,
        "application",
    )?;
    to_content(&application)
}

pub async fn update_oidc_application(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: UpdateArgs = parse_arguments(arguments)?;
    check_request(&args.application)?;

    let client = handlers.client(context).await?;
    let application = require(
        client
            .update_oidc_application(&args.environment_id, &args.application_id, &args.application)
            .await?,
        "application",
    )?;
    to_content(&application)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{InMemoryPingOne, StaticClientProvider};
    use crate::model::{Environment, EnvironmentType};
    use std::sync::Arc;

    async fn setup() -> (ToolHandlers, EnvironmentId) {
        let api = Arc::new(InMemoryPingOne::new());
        let id = EnvironmentId::generate();
        api.insert_environment(Environment::new(id, "Dev", EnvironmentType::Sandbox))
            .await;
        (
            ToolHandlers::new(Arc::new(StaticClientProvider::new(api))),
            id,
        )
    }

    #[tokio::test]
    async fn test_create_then_list_and_get() {
        let (handlers, id) = setup().await;
        let context = RequestContext::new("1");

        let created = create_oidc_application(
            &handlers,
            &context,
            json!({
                "environmentId": id,
                "name": "Portal",
                "type": "WEB_APP",
                "grantTypes": ["AUTHORIZATION_CODE"],
                "responseTypes": ["CODE"],
                "redirectUris": ["https://portal.example.com/callback"],
                "tokenEndpointAuthMethod": "CLIENT_SECRET_BASIC"
            }),
        )
        .await
        .unwrap();
        assert_eq!(created["protocol"], "OPENID_CONNECT");
        assert_eq!(created["enabled"], true);

        let listed = list_applications(&handlers, &context, json!({"environmentId": id}))
            .await
            .unwrap();
        assert_eq!(listed["count"], 1);
        assert_eq!(listed["applications"][0]["name"], "Portal");

        let fetched = get_application(
            &handlers,
            &context,
            json!({"environmentId": id, "applicationId": created["id"]}),
        )
        .await
        .unwrap();
        assert_eq!(fetched["redirectUris"][0], "https://portal.example.com/callback");
    }

    #[tokio::test]
    async fn test_create_requires_grant_types() {
        let (handlers, id) = setup().await;
        let failure = create_oidc_application(
            &handlers,
            &RequestContext::new("1"),
            json!({"environmentId": id, "name": "Portal", "type": "WEB_APP", "grantTypes": []}),
        )
        .await
        .unwrap_err();
        assert_eq!(failure.code, ToolFailure::INVALID_ARGUMENTS);
    }

    #[tokio::test]
    async fn test_update_unknown_application() {
        let (handlers, id) = setup().await;
        let failure = update_oidc_application(
            &handlers,
            &RequestContext::new("1"),
            json!({
                "environmentId": id,
                "applicationId": "missing",
                "name": "Portal",
                "type": "WEB_APP",
                "grantTypes": ["AUTHORIZATION_CODE"]
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(failure.code, ToolFailure::API_ERROR);
    }
}
