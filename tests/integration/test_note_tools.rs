//! Tool handlers of the MCP server, called in-process

use crate::common::{BrokenStore, note_service};
use fastnotes::NoteService;
use fastnotes::mcp::{
    DeleteNoteRequest, NotesServer, SERVER_NAME, SaveNoteRequest, SearchNotesRequest,
};
use fastnotes::notes::DuplicatePolicy;
use rmcp::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, RawContent};
use std::sync::Arc;
use tempfile::TempDir;

fn text_of(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|content| match &**content {
            RawContent::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn server(dir: &TempDir) -> NotesServer {
    NotesServer::new(Arc::new(note_service(dir)))
}

async fn save(server: &NotesServer, content: &str) -> String {
    let result = server
        .save_note(Parameters(SaveNoteRequest {
            content: content.to_string(),
        }))
        .await
        .unwrap();
    text_of(&result)
}

async fn search(server: &NotesServer, query: &str) -> String {
    let result = server
        .search_notes(Parameters(SearchNotesRequest {
            query: query.to_string(),
        }))
        .await
        .unwrap();
    text_of(&result)
}

#[test]
fn test_server_identity() {
    let dir = TempDir::new().unwrap();
    let info = server(&dir).get_info();

    assert_eq!(info.server_info.name, SERVER_NAME);
    assert_eq!(info.server_info.name, "FastSemanticNotes");
    assert!(info.capabilities.tools.is_some());
}

#[tokio::test]
async fn test_save_then_duplicate() {
    let dir = TempDir::new().unwrap();
    let server = server(&dir);

    assert_eq!(
        save(&server, "Buy milk").await,
        "Note saved successfully using local FastEmbed."
    );
    assert_eq!(
        save(&server, "Purchase milk from the store").await,
        "SEMANTIC DUPLICATE DETECTED\nExisting Note: \"Buy milk\"\nThis covers the same topic. Should I merge or ignore?"
    );

    let listed = server.list_notes().await.unwrap();
    assert_eq!(text_of(&listed), "Notes in your history:\n• Buy milk");
}

#[tokio::test]
async fn test_search_on_empty_and_populated_history() {
    let dir = TempDir::new().unwrap();
    let server = server(&dir);

    assert_eq!(
        search(&server, "groceries").await,
        "No relevant notes found in your history."
    );

    save(&server, "Buy milk").await;
    save(&server, "Quantum computing uses qubits").await;

    let found = search(&server, "groceries").await;
    assert!(found.starts_with("Relevant Context Found:\n• Buy milk"), "{found}");
    assert!(found.contains("• Quantum computing uses qubits"));
}

#[tokio::test]
async fn test_delete_by_id() {
    let dir = TempDir::new().unwrap();
    let server = server(&dir);
    save(&server, "Buy milk").await;

    let note_id = fastnotes::calculate_hash("Buy milk");
    let result = server
        .delete_note(Parameters(DeleteNoteRequest { note_id }))
        .await
        .unwrap();
    assert_eq!(text_of(&result), "Note deleted successfully.");

    // Unknown ids are acknowledged the same way
    let result = server
        .delete_note(Parameters(DeleteNoteRequest {
            note_id: "no-such-note".to_string(),
        }))
        .await
        .unwrap();
    assert_eq!(text_of(&result), "Note deleted successfully.");

    let listed = server.list_notes().await.unwrap();
    assert_eq!(text_of(&listed), "Notes in your history:\n");
}

#[tokio::test]
async fn test_store_failure_is_a_protocol_error() {
    let service = NoteService::new(Arc::new(BrokenStore), DuplicatePolicy::default());
    let server = NotesServer::new(Arc::new(service));

    let err = server
        .save_note(Parameters(SaveNoteRequest {
            content: "Buy milk".to_string(),
        }))
        .await
        .unwrap_err();
    assert!(err.message.contains("embedding backend unavailable"), "{}", err.message);

    assert!(server.list_notes().await.is_err());
}
