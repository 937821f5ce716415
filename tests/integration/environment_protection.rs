//! End-to-end environment protection through the JSON-RPC pipeline.

use crate::common::{add_environment, error_message, send, test_server, tool_call};
use futures::future::join_all;
use pingone_mcp_server::client::PingOneApi;
use pingone_mcp_server::model::EnvironmentType;
use serde_json::json;

#[tokio::test]
async fn test_production_write_is_blocked_before_the_handler() {
    let (api, server) = test_server();
    let prod = add_environment(&api, "Customer Prod", EnvironmentType::Production).await;

    let response = send(
        &server,
        &tool_call(1, "create_population", json!({"environmentId": prod, "name": "Customers"})),
    )
    .await;

    let message = error_message(&response);
    assert!(message.starts_with("environment validation failed: write operation is not allowed"));
    assert!(message.contains("Customer Prod"));
    assert_eq!(response["error"]["data"]["policyDenial"], true);

    let populations = api.list_populations(&prod).await.unwrap().data.unwrap();
    assert!(populations.is_empty());
}

#[tokio::test]
async fn test_production_read_allowed_by_policy() {
    let (api, server) = test_server();
    let prod = add_environment(&api, "Customer Prod", EnvironmentType::Production).await;

    let response = send(
        &server,
        &tool_call(1, "list_populations", json!({"environmentId": prod})),
    )
    .await;

    assert_eq!(response["result"]["isError"], false);
    assert_eq!(response["result"]["structuredContent"]["count"], 0);
    // Policy waived the check, so the validator never looked the environment up.
    assert_eq!(api.environment_lookups(&prod).await, 0);
}

#[tokio::test]
async fn test_sandbox_write_reaches_the_handler() {
    let (api, server) = test_server();
    let dev = add_environment(&api, "Dev", EnvironmentType::Sandbox).await;

    let response = send(
        &server,
        &tool_call(1, "create_population", json!({"environmentId": dev, "name": "Customers"})),
    )
    .await;

    assert_eq!(response["result"]["isError"], false);
    assert_eq!(response["result"]["structuredContent"]["name"], "Customers");
    assert_eq!(api.list_populations(&dev).await.unwrap().data.unwrap().len(), 1);
    assert_eq!(server.validator().cache_len().await, 0);
}

#[tokio::test]
async fn test_promoted_environment_is_blocked_on_next_write() {
    let (api, server) = test_server();
    let env = add_environment(&api, "Staging", EnvironmentType::Sandbox).await;
    let call = tool_call(1, "create_population", json!({"environmentId": env, "name": "A"}));

    assert_eq!(send(&server, &call).await["result"]["isError"], false);

    api.set_environment_type(&env, EnvironmentType::Production)
        .await;

    let response = send(&server, &call).await;
    assert!(error_message(&response).contains("write operation is not allowed"));
}

#[tokio::test]
async fn test_production_lookups_are_cached_across_requests() {
    let (api, server) = test_server();
    let prod = add_environment(&api, "Prod", EnvironmentType::Production).await;

    for id in 0..5 {
        let response = send(
            &server,
            &tool_call(id, "update_population", json!({
                "environmentId": prod,
                "populationId": "p1",
                "name": "Renamed"
            })),
        )
        .await;
        assert!(response.get("error").is_some());
    }

    assert_eq!(api.environment_lookups(&prod).await, 1);

    server.validator().clear_cache().await;
    send(
        &server,
        &tool_call(9, "create_population", json!({"environmentId": prod, "name": "X"})),
    )
    .await;
    assert_eq!(api.environment_lookups(&prod).await, 2);
}

#[tokio::test]
async fn test_concurrent_production_calls_all_denied() {
    let (api, server) = test_server();
    let prod = add_environment(&api, "Prod", EnvironmentType::Production).await;

    let calls: Vec<String> = (0..16)
        .map(|id| tool_call(id, "create_population", json!({"environmentId": prod, "name": "X"})))
        .collect();
    let responses = join_all(calls.iter().map(|call| send(&server, call))).await;

    for response in &responses {
        assert!(error_message(response).contains("write operation is not allowed"));
    }
    let lookups = api.environment_lookups(&prod).await;
    assert!((1..=16).contains(&lookups));
    assert_eq!(server.validator().cache_len().await, 1);
}

#[tokio::test]
async fn test_missing_environment_id_is_rejected() {
    let (_api, server) = test_server();

    let response = send(
        &server,
        &tool_call(1, "create_population", json!({"name": "Customers"})),
    )
    .await;

    assert_eq!(response["error"]["code"], -32603);
    assert!(error_message(&response).contains("'environmentId'"));
    assert_eq!(response["error"]["data"]["policyDenial"], false);
}

#[tokio::test]
async fn test_unknown_environment_fails_closed() {
    let (_api, server) = test_server();

    let response = send(
        &server,
        &tool_call(
            1,
            "update_environment",
            json!({
                "environmentId": "5a0e9a9e-3a7c-4f8e-9c1d-2b3c4d5e6f70",
                "name": "x",
                "region": "NA",
                "licenseId": "l",
                "type": "SANDBOX"
            }),
        ),
    )
    .await;

    assert!(error_message(&response).contains("failed to get environment"));
}

#[tokio::test]
async fn test_not_applicable_tools_skip_validation() {
    let (api, server) = test_server();
    add_environment(&api, "Prod", EnvironmentType::Production).await;

    let response = send(&server, &tool_call(1, "list_environments", json!({}))).await;
    assert_eq!(response["result"]["structuredContent"]["count"], 1);
    assert_eq!(api.total_environment_lookups().await, 0);
}
