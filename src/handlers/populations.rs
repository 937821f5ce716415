//! Population tool handlers.

use super::{ToolFailure, ToolHandlers, ToolOutcome, list_content, parse_arguments, require};
use crate::context::RequestContext;
use crate::model::{EntityRef, EnvironmentId, Population, PopulationRequest};
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
    population_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PopulationArgs {
    environment_id: EnvironmentId,
    #[serde(default)]
    population_id: Option<String>,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    password_policy_id: Option<String>,
}

impl PopulationArgs {
    fn request(&self) -> Result<PopulationRequest, ToolFailure> {
        if self.name.trim().is_empty() {
            return Err(ToolFailure::invalid_arguments("'name' must not be empty"));
        }
        Ok(PopulationRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            password_policy: self
                .password_policy_id
                .clone()
                .map(|id| EntityRef { id }),
        })
    }
}

fn population_summary(population: &Population) -> Value {
    json!({
        "id": population.id,
        "name": population.name,
        "description": population.description,
        "userCount": population.user_count,
        "default": population.default,
        "passwordPolicyId": population.password_policy.as_ref().map(|policy| &policy.id),
        "createdAt": population.created_at,
        "updatedAt": population.updated_at,
    })
}

pub async fn list_populations(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: ListArgs = parse_arguments(arguments)?;
    let client = handlers.client(context).await?;
    let populations = client
        .list_populations(&args.environment_id)
        .await?
        .data
        .unwrap_or_default();
    Ok(list_content(
        "populations",
        populations.iter().map(population_summary).collect(),
    ))
}

pub async fn get_population(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: GetArgs = parse_arguments(arguments)?;
    let client = handlers.client(context).await?;
    let population = require(
        client
            .get_population(&args.environment_id, &args.population_id)
            .await?,
        "population",
    )?;
    Ok(population_summary(&population))
}

pub async fn create_population(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: PopulationArgs = parse_arguments(arguments)?;
    let request = args.request()?;

    let client = handlers.client(context).await?;
    let population = require(
        client
            .create_population(&args.environment_id, &request)
            .await?,
        "population",
    )?;
    Ok(population_summary(&population))
}

pub async fn update_population(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: PopulationArgs = parse_arguments(arguments)?;
    let Some(population_id) = args.population_id.as_deref() else {
        return Err(ToolFailure::invalid_arguments("missing field `populationId`"));
    };
    let request = args.request()?;

    let client = handlers.client(context).await?;
    let population = require(
        client
            .update_population(&args.environment_id, population_id, &request)
            .await?,
        "population",
    )?;
    Ok(population_summary(&population))
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
    async fn test_population_lifecycle() {
        let (handlers, id) = setup().await;
        let context = RequestContext::new("1");

        let created = create_population(
            &handlers,
            &context,
            json!({"environmentId": id, "name": "Customers", "passwordPolicyId": "pp-1"}),
        )
        .await
        .unwrap();
        assert_eq!(created["name"], "Customers");
        assert_eq!(created["passwordPolicyId"], "pp-1");

        let updated = update_population(
            &handlers,
            &context,
            json!({
                "environmentId": id,
                "populationId": created["id"],
                "name": "Customers EU",
                "description": "European customers"
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated["name"], "Customers EU");
        assert!(updated["passwordPolicyId"].is_null());

        let listed = list_populations(&handlers, &context, json!({"environmentId": id}))
            .await
            .unwrap();
        assert_eq!(listed["count"], 1);
        assert_eq!(listed["populations"][0]["description"], "European customers");
    }

    #[tokio::test]
    async fn test_update_requires_population_id() {
        let (handlers, id) = setup().await;
        let failure = update_population(
            &handlers,
            &RequestContext::new("1"),
            json!({"environmentId": id, "name": "Customers"}),
        )
        .await
        .unwrap_err();
        assert_eq!(failure.code, ToolFailure::INVALID_ARGUMENTS);
        assert!(failure.message.contains("populationId"));
    }

    #[tokio::test]
    async fn test_invalid_environment_id_argument() {
        let (handlers, _id) = setup().await;
        let failure = list_populations(
            &handlers,
            &RequestContext::new("1"),
            json!({"environmentId": "env-42"}),
        )
        .await
        .unwrap_err();
        assert_eq!(failure.code, ToolFailure::INVALID_ARGUMENTS);
    }
}
