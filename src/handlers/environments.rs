//! Environment tool handlers.
//!
//! Environments are reshaped into a compact summary: identity, type, region
//! and timestamps. License details are reduced to the license ID.

use super::{ToolFailure, ToolHandlers, ToolOutcome, list_content, parse_arguments, require};
use crate::context::RequestContext;
use crate::model::{
    BillOfMaterials, CreateEnvironmentRequest, EntityRef, Environment, EnvironmentId,
    EnvironmentType, UpdateEnvironmentRequest,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentArgs {
    environment_id: EnvironmentId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEnvironmentArgs {
    name: String,
    region: String,
    license_id: String,
    #[serde(rename = "type", default)]
    environment_type: EnvironmentType,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    products: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEnvironmentArgs {
    environment_id: EnvironmentId,
    name: String,
    region: String,
    license_id: String,
    #[serde(rename = "type")]
    environment_type: EnvironmentType,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateServicesArgs {
    environment_id: EnvironmentId,
    products: Vec<String>,
}

pub(crate) fn environment_summary(environment: &Environment) -> Value {
    json!({
        "id": environment.id,
        "name": environment.name,
        "type": environment.environment_type,
        "region": environment.region,
        "description": environment.description,
        "licenseId": environment.license.as_ref().map(|license| &license.id),
        "createdAt": environment.created_at,
        "updatedAt": environment.updated_at,
    })
}

fn services_content(environment_id: &EnvironmentId, services: &BillOfMaterials) -> Value {
    let products: Vec<Value> = services
        .products
        .iter()
        .map(|product| {
            json!({
                "type": product.product_type,
                "id": product.id,
                "description": product.description,
            })
        })
        .collect();

    json!({
        "environmentId": environment_id,
        "products": products,
        "count": services.products.len(),
        "updatedAt": services.updated_at,
    })
}

pub async fn list_environments(handlers: &ToolHandlers, context: &RequestContext) -> ToolOutcome {
    let client = handlers.client(context).await?;
    let environments = client.list_environments().await?.data.unwrap_or_default();
    Ok(list_content(
        "environments",
        environments.iter().map(environment_summary).collect(),
    ))
}

pub async fn get_environment(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: EnvironmentArgs = parse_arguments(arguments)?;
    let client = handlers.client(context).await?;
    let environment = require(client.get_environment(&args.environment_id).await?, "environment")?;
    Ok(environment_summary(&environment))
}

pub async fn create_environment(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: CreateEnvironmentArgs = parse_arguments(arguments)?;
    if args.name.trim().is_empty() {
        return Err(ToolFailure::invalid_arguments("'name' must not be empty"));
    }

    let request = CreateEnvironmentRequest {
        name: args.name,
        region: args.region,
        environment_type: args.environment_type,
        license: EntityRef { id: args.license_id },
        description: args.description,
        bill_of_materials: (!args.products.is_empty())
            .then(|| BillOfMaterials::with_products(args.products)),
    };

    let client = handlers.client(context).await?;
    let environment = require(client.create_environment(&request).await?, "environment")?;
    Ok(environment_summary(&environment))
}

pub async fn update_environment(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: UpdateEnvironmentArgs = parse_arguments(arguments)?;
    let request = UpdateEnvironmentRequest {
        name: args.name,
        region: args.region,
        environment_type: args.environment_type,
        license: EntityRef { id: args.license_id },
        description: args.description,
    };

    let client = handlers.client(context).await?;
    let environment = require(
        client
            .update_environment(&args.environment_id, &request)
            .await?,
        "environment",
    )?;
    Ok(environment_summary(&environment))
}

pub async fn get_environment_services(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: EnvironmentArgs = parse_arguments(arguments)?;
    let client = handlers.client(context).await?;
    let services = require(
        client.get_environment_services(&args.environment_id).await?,
        "bill of materials",
    )?;
    Ok(services_content(&args.environment_id, &services))
}

pub async fn update_environment_services(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: UpdateServicesArgs = parse_arguments(arguments)?;
    if args.products.is_empty() {
        return Err(ToolFailure::invalid_arguments(
            "'products' must name at least one product",
        ));
    }

    let client = handlers.client(context).await?;
    let services = require(
        client
            .update_environment_services(
                &args.environment_id,
                &BillOfMaterials::with_products(args.products),
            )
            .await?,
        "bill of materials",
    )?;
    Ok(services_content(&args.environment_id, &services))
}
