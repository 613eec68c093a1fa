//! `fastnotes mcp <tool>` execution without a transport

use crate::common::note_service;
use fastnotes::io::ExitCode;
use fastnotes::mcp::direct::ToolCall;
use tempfile::TempDir;

fn words(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_save_from_shell_words() {
    let dir = TempDir::new().unwrap();
    let service = note_service(&dir);

    let call = ToolCall::from_cli("save_note", &words(&["Remember:", "buy", "milk"]), None).unwrap();
    let output = call.execute(&service).await.unwrap();

    assert_eq!(output.text, "Note saved successfully using local FastEmbed.");
    assert_eq!(output.exit_code, ExitCode::Success);
    assert_eq!(output.data["status"], "saved");
    assert_eq!(
        output.data["id"],
        fastnotes::calculate_hash("Remember: buy milk")
    );
}

#[tokio::test]
async fn test_duplicate_exit_code() {
    let dir = TempDir::new().unwrap();
    let service = note_service(&dir);

    ToolCall::from_cli("save_note", &words(&["Buy", "milk"]), None)
        .unwrap()
        .execute(&service)
        .await
        .unwrap();

    let output = ToolCall::from_cli("save_note", &words(&["content:milk"]), None)
        .unwrap()
        .execute(&service)
        .await
        .unwrap();

    assert_eq!(output.exit_code, ExitCode::Duplicate);
    assert_eq!(output.data["status"], "duplicate");
    assert_eq!(output.data["existing"], "Buy milk");
}

#[tokio::test]
async fn test_list_and_search_data() {
    let dir = TempDir::new().unwrap();
    let service = note_service(&dir);
    service.save_note("Buy milk").await.unwrap();
    service.save_note("Dentist appointment on Friday").await.unwrap();

    let listed = ToolCall::ListNotes.execute(&service).await.unwrap();
    let notes = listed.data["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[1]["document"], "Dentist appointment on Friday");

    let args = serde_json::json!({ "query": "doctor" });
    let found = ToolCall::from_cli("search_notes", &[], args.as_object())
        .unwrap()
        .execute(&service)
        .await
        .unwrap();
    let hits = found.data["notes"].as_array().unwrap();
    assert_eq!(hits[0]["document"], "Dentist appointment on Friday");
    assert!(hits[0]["distance"].as_f64().unwrap() < 0.01);
}

#[tokio::test]
async fn test_url_in_note_text_is_kept() {
    let dir = TempDir::new().unwrap();
    let service = note_service(&dir);

    let call = ToolCall::from_cli(
        "save_note",
        &words(&["Read", "https://example.com/post", "later", "todo:call"]),
        None,
    )
    .unwrap();
    let output = call.execute(&service).await.unwrap();

    let text = "Read https://example.com/post later todo:call";
    assert_eq!(output.exit_code, ExitCode::Success);
    assert_eq!(output.data["id"], fastnotes::calculate_hash(text));

    let listed = service.list_notes().await.unwrap();
    assert_eq!(listed.notes.len(), 1);
    assert_eq!(listed.notes[0].document, text);
}

#[test]
fn test_named_and_free_text_together_is_rejected() {
    let result = ToolCall::from_cli("save_note", &words(&["Buy", "content:milk"]), None);
    assert!(matches!(
        result,
        Err(fastnotes::McpError::InvalidArguments { .. })
    ));
}
