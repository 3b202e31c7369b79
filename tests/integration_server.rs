//! Integration tests for resources, prompts and the HTTP transport

mod common;

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use common::test_utils::{CUSTOMERS, Fixture};
use csv_clean_mcp::config::ServerConfig;
use csv_clean_mcp::transport::TransportFactory;
use rmcp::model::{ErrorCode, PromptMessageContent, PromptMessageRole, ResourceContents};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

const SESSION_HEADER: &str = "mcp-session-id";

/// POST one JSON-RPC message to `/mcp`, returning the status, session id and body
async fn post_mcp(
    router: &Router,
    session: Option<&str>,
    message: Value,
) -> Result<(StatusCode, Option<String>, String)> {
    let mut request = Request::builder()
        .method(Method::POST)
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(id) = session {
        request = request.header(SESSION_HEADER, id);
    }

    let response = router
        .clone()
        .oneshot(request.body(Body::from(message.to_string()))?)
        .await?;
    let status = response.status();
    let session = response
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = tokio::time::timeout(
        Duration::from_secs(10),
        axum::body::to_bytes(response.into_body(), usize::MAX),
    )
    .await??;
    Ok((status, session, String::from_utf8(body.to_vec())?))
}

/// First JSON payload carried by an SSE `data:` line
fn sse_json(body: &str) -> Result<Value> {
    let data = body
        .lines()
        .find_map(|line| line.strip_prefix("data:"))
        .ok_or_else(|| anyhow::anyhow!("no data event in {body:?}"))?;
    Ok(serde_json::from_str(data.trim())?)
}

#[tokio::test]
async fn test_datasets_are_listed_and_readable() -> Result<()> {
    let fixture = Fixture::new();
    fixture.write("orders.csv", "order,total\n1,9.5\n");
    fixture.write("readme.txt", "not a dataset");
    let server = fixture.server();

    let listed = server.resource_list().await?;
    let uris: Vec<&str> = listed.iter().map(|r| r.raw.uri.as_str()).collect();
    assert_eq!(
        uris,
        vec![
            "csv://guide/operations",
            "csv://datasets/customers.csv",
            "csv://datasets/orders.csv",
        ]
    );
    assert_eq!(listed[1].raw.mime_type.as_deref(), Some("text/csv"));

    let read = server
        .resource_contents("csv://datasets/customers.csv")
        .await?;
    match &read.contents[0] {
        ResourceContents::TextResourceContents { text, .. } => assert_eq!(text, CUSTOMERS),
        other => panic!("expected text contents, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_oversized_dataset_is_refused() -> Result<()> {
    let fixture = Fixture::new();
    let server = csv_clean_mcp::CsvCleaningServer::new(ServerConfig {
        max_input_bytes: 8,
        ..fixture.config()
    });

    let err = server
        .resource_contents("csv://datasets/customers.csv")
        .await
        .unwrap_err();
    assert!(err.message.contains("too large"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_resource_is_not_found() {
    let fixture = Fixture::new();
    let server = fixture.server();
    let err = server
        .resource_contents("csv://datasets/missing.csv")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
}

#[test]
fn test_clean_csv_prompt() -> Result<()> {
    let fixture = Fixture::new();
    let server = fixture.server();
    let arguments = json!({"csv_path": "customers.csv", "goal": "a mailing list"});

    let prompt = server.prompt("clean_csv", arguments.as_object())?;
    assert_eq!(prompt.messages.len(), 1);
    assert_eq!(prompt.messages[0].role, PromptMessageRole::User);
    match &prompt.messages[0].content {
        PromptMessageContent::Text { text } => {
            assert!(text.contains("customers.csv"));
            assert!(text.contains("a mailing list"));
        }
        other => panic!("expected text prompt, got {other:?}"),
    }

    let err = server.prompt("data_quality_report", None).unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    Ok(())
}

#[tokio::test]
async fn test_health_endpoint_allows_cross_origin() -> Result<()> {
    let fixture = Fixture::new();
    let transport = TransportFactory::create_http("127.0.0.1", 0, fixture.server());

    let response = transport
        .router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    Ok(())
}

#[tokio::test]
async fn test_mcp_endpoint_handshake_and_tools_list() -> Result<()> {
    let fixture = Fixture::new();
    let router = TransportFactory::create_http("127.0.0.1", 0, fixture.server()).router();

    let (status, session, body) = post_mcp(
        &router,
        None,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": {"name": "integration-test", "version": "0.0.0"}
            }
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let initialized = sse_json(&body)?;
    assert_eq!(initialized["id"], 1);
    assert_eq!(initialized["result"]["serverInfo"]["name"], "csv-clean-mcp");
    assert!(initialized["result"]["capabilities"]["tools"].is_object());
    let session = session.expect("initialize assigns a session id");

    let (status, _, _) = post_mcp(
        &router,
        Some(&session),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await?;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, _, body) = post_mcp(
        &router,
        Some(&session),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list", "params": {}}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let listed = sse_json(&body)?;
    assert_eq!(listed["id"], 2);
    let mut names: Vec<&str> = listed["result"]["tools"]
        .as_array()
        .expect("tools array")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "add_numbers",
            "fill_missing_values",
            "filter_rows",
            "greet",
            "inspect_csv",
            "remove_duplicates",
            "remove_null_rows",
            "standardize_columns",
            "subtract_numbers",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_mcp_endpoint_requires_initialize_first() -> Result<()> {
    let fixture = Fixture::new();
    let router = TransportFactory::create_http("127.0.0.1", 0, fixture.server()).router();

    let (status, session, _) = post_mcp(
        &router,
        None,
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": {}}),
    )
    .await?;
    assert!(status.is_client_error());
    assert_eq!(session, None);
    Ok(())
}
