//! Direct tool execution for `fastnotes mcp <tool>`.
//!
//! Runs a tool against an in-process [`NoteService`] without a transport,
//! accepting the same argument names the MCP tools declare.

use crate::error::{McpError, McpResult, NoteResult};
use crate::io::ExitCode;
use crate::io::args::{get_required_string, parse_positional_args};
use crate::notes::NoteService;
use serde_json::{Map, Value};

/// Names of the tools the server registers.
pub const TOOL_NAMES: &[&str] = &["save_note", "search_notes", "delete_note", "list_notes"];

/// A parsed tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    SaveNote { content: String },
    SearchNotes { query: String },
    DeleteNote { note_id: String },
    ListNotes,
}

/// Text, structured data and exit code of one executed tool call.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub text: String,
    pub data: Value,
    pub exit_code: ExitCode,
}

impl ToolCall {
    /// Build a call from CLI input.
    ///
    /// Named values come from `--args` JSON and `key:value` words whose key
    /// the tool declares; every other word is part of the main argument.
    /// Giving the main argument both by name and as free text is rejected,
    /// as are JSON keys the tool does not declare.
    pub fn from_cli(
        tool: &str,
        positional: &[String],
        json_args: Option<&Map<String, Value>>,
    ) -> McpResult<Self> {
        let declared: &[&str] = match tool {
            "save_note" => &["content"],
            "search_notes" => &["query"],
            "delete_note" => &["note_id"],
            "list_notes" => &[],
            other => {
                return Err(McpError::UnknownTool {
                    name: other.to_string(),
                });
            }
        };

        let (text, mut params) = parse_positional_args(positional, declared);

        if let Some(map) = json_args {
            for (key, value) in map {
                if !declared.contains(&key.as_str()) {
                    return Err(McpError::InvalidArguments {
                        reason: format!("'{tool}' has no parameter '{key}'"),
                    });
                }
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                params.entry(key.clone()).or_insert(value);
            }
        }

        let required = |key: &str| {
            if let (Some(text), Some(_)) = (&text, params.get(key)) {
                return Err(McpError::InvalidArguments {
                    reason: format!(
                        "'{tool}' got {key} by name and also the text \"{text}\"; quote the whole value instead"
                    ),
                });
            }
            get_required_string(
                text.clone(),
                &params,
                key,
                &format!("'{tool}' needs a {key} (e.g. fastnotes mcp {tool} <{key}>)"),
            )
            .map_err(|reason| McpError::InvalidArguments { reason })
        };

        match tool {
            "save_note" => Ok(Self::SaveNote {
                content: required("content")?,
            }),
            "search_notes" => Ok(Self::SearchNotes {
                query: required("query")?,
            }),
            "delete_note" => Ok(Self::DeleteNote {
                note_id: required("note_id")?,
            }),
            _ => Ok(Self::ListNotes),
        }
    }

    /// Run the call against `service`.
    pub async fn execute(self, service: &NoteService) -> NoteResult<ToolOutput> {
        let output = match self {
            Self::SaveNote { content } => {
                let outcome = service.save_note(&content).await?;
                ToolOutput {
                    text: outcome.to_string(),
                    exit_code: ExitCode::from_save_outcome(&outcome),
                    data: serde_json::to_value(&outcome)?,
                }
            }
            Self::SearchNotes { query } => {
                let outcome = service.search_notes(&query).await?;
                ToolOutput {
                    text: outcome.to_string(),
                    exit_code: ExitCode::Success,
                    data: serde_json::to_value(&outcome)?,
                }
            }
            Self::DeleteNote { note_id } => {
                let outcome = service.delete_note(&note_id).await?;
                ToolOutput {
                    text: outcome.to_string(),
                    exit_code: ExitCode::Success,
                    data: serde_json::to_value(&outcome)?,
                }
            }
            Self::ListNotes => {
                let outcome = service.list_notes().await?;
                ToolOutput {
                    text: outcome.to_string(),
                    exit_code: ExitCode::Success,
                    data: serde_json::to_value(&outcome)?,
                }
            }
        };
        Ok(output)
    }
}
