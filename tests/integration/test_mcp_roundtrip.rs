//! End-to-end MCP session over an in-memory duplex pipe

use crate::common::note_service;
use fastnotes::mcp::NotesServer;
use rmcp::model::{CallToolRequestParam, CallToolResult, RawContent};
use rmcp::service::{RoleClient, RunningService};
use rmcp::ServiceExt;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

async fn connect(dir: &TempDir) -> anyhow::Result<RunningService<RoleClient, ()>> {
    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    let server = NotesServer::new(Arc::new(note_service(dir)));

    tokio::spawn(async move {
        if let Ok(running) = server.serve(server_io).await {
            let _ = running.waiting().await;
        }
    });

    Ok(().serve(client_io).await?)
}

async fn call(
    client: &RunningService<RoleClient, ()>,
    name: &'static str,
    arguments: serde_json::Value,
) -> anyhow::Result<CallToolResult> {
    Ok(client
        .call_tool(CallToolRequestParam {
            name: name.into(),
            arguments: arguments.as_object().cloned(),
        })
        .await?)
}

fn text_of(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|content| match &**content {
            RawContent::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_handshake_lists_the_four_tools() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let client = connect(&dir).await?;

    let server_info = client.peer_info().expect("server info after handshake");
    assert_eq!(server_info.server_info.name, "FastSemanticNotes");

    let tools = client.list_tools(Default::default()).await?;
    let mut names: Vec<String> = tools.tools.iter().map(|t| t.name.to_string()).collect();
    names.sort();
    assert_eq!(
        names,
        vec!["delete_note", "list_notes", "save_note", "search_notes"]
    );

    let save = tools
        .tools
        .iter()
        .find(|t| t.name == "save_note")
        .expect("save_note registered");
    assert_eq!(
        save.description.as_deref(),
        Some("Saves a note but blocks it if a similar one exists.")
    );

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn test_note_lifecycle_over_the_wire() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let client = connect(&dir).await?;

    let saved = call(&client, "save_note", json!({ "content": "Buy milk" })).await?;
    assert_eq!(
        text_of(&saved),
        "Note saved successfully using local FastEmbed."
    );

    let duplicate = call(&client, "save_note", json!({ "content": "milk and bread" })).await?;
    assert!(text_of(&duplicate).starts_with("SEMANTIC DUPLICATE DETECTED"));

    let found = call(&client, "search_notes", json!({ "query": "shopping" })).await?;
    assert_eq!(text_of(&found), "Relevant Context Found:\n• Buy milk");

    let note_id = fastnotes::calculate_hash("Buy milk");
    let deleted = call(&client, "delete_note", json!({ "note_id": note_id })).await?;
    assert_eq!(text_of(&deleted), "Note deleted successfully.");

    let listed = call(&client, "list_notes", json!({})).await?;
    assert_eq!(text_of(&listed), "Notes in your history:\n");

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn test_bad_calls_are_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let client = connect(&dir).await?;

    assert!(call(&client, "find_symbol", json!({})).await.is_err());
    assert!(call(&client, "save_note", json!({ "text": "wrong key" })).await.is_err());

    client.cancel().await?;
    Ok(())
}
