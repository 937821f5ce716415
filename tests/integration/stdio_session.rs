//! A full MCP session over an in-memory byte stream.

use crate::common::{add_environment, test_server, tool_call};
use pingone_mcp_server::model::EnvironmentType;
use serde_json::{Value, json};
use std::collections::HashMap;

#[tokio::test]
async fn test_session_initialize_list_and_call() {
    let (api, server) = test_server();
    let dev = add_environment(&api, "Dev", EnvironmentType::Sandbox).await;
    let prod = add_environment(&api, "Prod", EnvironmentType::Production).await;

    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
            "protocolVersion": "2025-06-18",
            "capabilities": {},
            "clientInfo": {"name": "test", "version": "0"}
        }})
        .to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string(),
        tool_call(3, "create_population", json!({"environmentId": dev, "name": "Customers"})),
        tool_call(4, "create_population", json!({"environmentId": prod, "name": "Customers"})),
        json!({"jsonrpc": "2.0", "id": 5, "method": "resources/list"}).to_string(),
    ]
    .join("\n");

    let mut output = Vec::new();
    server
        .clone()
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    let responses: HashMap<i64, Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap())
        .map(|response| (response["id"].as_i64().unwrap(), response))
        .collect();

    assert_eq!(responses.len(), 5);
    assert_eq!(
        responses[&1]["result"]["serverInfo"]["name"],
        "pingone-mcp-server"
    );

    let tools = responses[&2]["result"]["tools"].as_array().unwrap();
    let create = tools
        .iter()
        .find(|tool| tool["name"] == "create_population")
        .unwrap();
    assert_eq!(create["annotations"]["readOnlyHint"], false);

    assert_eq!(responses[&3]["result"]["isError"], false);
    assert_eq!(responses[&4]["error"]["code"], -32603);
    assert_eq!(responses[&5]["error"]["code"], -32601);
}
