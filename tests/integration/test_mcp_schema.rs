//! Verify the JSON schemas the note tools advertise

use fastnotes::mcp::{DeleteNoteRequest, SaveNoteRequest, SearchNotesRequest};
use serde_json::Value;

fn schema_json<T: rmcp::schemars::JsonSchema>() -> Value {
    let schema = rmcp::schemars::schema_for!(T);
    serde_json::to_value(&schema).unwrap()
}

fn required_fields(schema: &Value) -> Vec<String> {
    schema["required"]
        .as_array()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_request_schemas_require_their_single_argument() {
    let cases = [
        ("SaveNoteRequest", schema_json::<SaveNoteRequest>(), "content"),
        ("SearchNotesRequest", schema_json::<SearchNotesRequest>(), "query"),
        ("DeleteNoteRequest", schema_json::<DeleteNoteRequest>(), "note_id"),
    ];

    for (name, schema, field) in cases {
        println!("{name}: {}", serde_json::to_string_pretty(&schema).unwrap());

        assert_eq!(required_fields(&schema), vec![field.to_string()], "{name}");
        assert_eq!(
            schema["properties"][field]["type"], "string",
            "{name}.{field} should be a string"
        );
    }
}

#[test]
fn test_schemas_carry_field_descriptions() {
    let schema = schema_json::<SaveNoteRequest>();
    let description = schema["properties"]["content"]["description"]
        .as_str()
        .unwrap_or_default();
    assert!(!description.is_empty(), "content should be documented");
}

#[test]
fn test_requests_deserialize_from_tool_arguments() {
    let save: SaveNoteRequest = serde_json::from_value(serde_json::json!({
        "content": "Buy milk"
    }))
    .unwrap();
    assert_eq!(save.content, "Buy milk");

    let missing = serde_json::from_value::<DeleteNoteRequest>(serde_json::json!({}));
    assert!(missing.is_err(), "note_id is required");
}
