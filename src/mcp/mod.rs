//! MCP (Model Context Protocol) server exposing the note tools
//!
//! Four tools are registered: `save_note`, `search_notes`, `delete_note`
//! and `list_notes`. Each one delegates to [`NoteService`] and returns the
//! outcome's text. Service failures surface as protocol errors rather
//! than as tool text, so callers can tell "duplicate" from "broken".
//!
//! ## Transports
//!
//! 1. **stdio** (`fastnotes serve`): one client, launched by the assistant.
//! 2. **HTTP/SSE** (`fastnotes serve --http`, `http-server` feature): a
//!    long-running server at `/mcp/sse` sharing one service across clients.

pub mod client;
pub mod direct;
pub mod http_server;

use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::NoteError;
use crate::notes::NoteService;
use crate::{NoteResult, Settings};

/// Name the server reports during the MCP handshake.
pub const SERVER_NAME: &str = "FastSemanticNotes";

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SaveNoteRequest {
    /// Text of the note to save
    pub content: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SearchNotesRequest {
    /// What to look for, in natural language
    pub query: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct DeleteNoteRequest {
    /// Identifier of the note to delete
    pub note_id: String,
}

/// Convert a service failure into an MCP protocol error.
pub fn note_error_to_mcp(err: NoteError) -> McpError {
    McpError::internal_error(
        err.to_string(),
        Some(serde_json::json!({
            "code": err.status_code(),
            "suggestions": err.recovery_suggestions(),
        })),
    )
}

#[derive(Clone)]
pub struct NotesServer {
    service: Arc<NoteService>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NotesServer {
    pub fn new(service: Arc<NoteService>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    /// Load the model and open the configured collection.
    pub fn from_settings(settings: &Settings) -> NoteResult<Self> {
        Ok(Self::new(Arc::new(NoteService::from_settings(settings)?)))
    }

    /// The service shared by every connection of this server.
    pub fn service(&self) -> Arc<NoteService> {
        self.service.clone()
    }

    #[tool(description = "Saves a note but blocks it if a similar one exists.")]
    pub async fn save_note(
        &self,
        Parameters(SaveNoteRequest { content }): Parameters<SaveNoteRequest>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .service
            .save_note(&content)
            .await
            .map_err(note_error_to_mcp)?;

        Ok(CallToolResult::success(vec![Content::text(
            outcome.to_string(),
        )]))
    }

    #[tool(description = "Finds notes based on meaning, not just exact words.")]
    pub async fn search_notes(
        &self,
        Parameters(SearchNotesRequest { query }): Parameters<SearchNotesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .service
            .search_notes(&query)
            .await
            .map_err(note_error_to_mcp)?;

        Ok(CallToolResult::success(vec![Content::text(
            outcome.to_string(),
        )]))
    }

    #[tool(description = "Deletes a note by its ID.")]
    pub async fn delete_note(
        &self,
        Parameters(DeleteNoteRequest { note_id }): Parameters<DeleteNoteRequest>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .service
            .delete_note(&note_id)
            .await
            .map_err(note_error_to_mcp)?;

        Ok(CallToolResult::success(vec![Content::text(
            outcome.to_string(),
        )]))
    }

    #[tool(description = "Lists all notes in the collection.")]
    pub async fn list_notes(&self) -> Result<CallToolResult, McpError> {
        let outcome = self
            .service
            .list_notes()
            .await
            .map_err(note_error_to_mcp)?;

        Ok(CallToolResult::success(vec![Content::text(
            outcome.to_string(),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for NotesServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Private semantic notes. Use 'save_note' to remember something; it refuses \
                notes that cover the same topic as an existing one and shows the existing note. \
                Use 'search_notes' to recall notes by meaning, 'list_notes' to see everything, \
                and 'delete_note' with a note id to forget one."
                    .to_string(),
            ),
        }
    }
}
