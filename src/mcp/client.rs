//! MCP client for smoke-testing the notes server

use anyhow::{Result, anyhow};
use serde_json::Value;
use std::path::PathBuf;

pub struct NotesClient;

impl NotesClient {
    /// Spawn the server over stdio, list its tools, and optionally call one.
    pub async fn test_server(
        server_binary: PathBuf,
        config_path: Option<PathBuf>,
        tool: Option<String>,
        args: Option<String>,
    ) -> Result<()> {
        use rmcp::{
            model::{CallToolRequestParam, JsonObject},
            service::ServiceExt,
            transport::{ConfigureCommandExt, TokioChildProcess},
        };
        use tokio::process::Command;

        println!("Starting MCP server process...");

        let client = ()
            .serve(TokioChildProcess::new(
                Command::new(&server_binary).configure(|cmd| {
                    if let Some(cfg) = &config_path {
                        cmd.arg("--config");
                        cmd.arg(cfg);
                    }

                    cmd.arg("serve");
                }),
            )?)
            .await?;

        let server_info = client.peer_info();
        println!("Connected to server: {server_info:#?}");

        println!("\nListing available tools...");
        let tools = client.list_tools(Default::default()).await?;

        for tool in &tools.tools {
            println!(
                "  - {}: {}",
                tool.name,
                tool.description.as_deref().unwrap_or("No description")
            );
        }

        // list_notes takes no arguments, so it doubles as a health check
        println!("\nCalling list_notes tool...");
        let list_result = client
            .call_tool(CallToolRequestParam {
                name: "list_notes".into(),
                arguments: None,
            })
            .await?;
        Self::print_tool_output(&list_result);

        if let Some(tool_name) = tool {
            println!("\nCalling tool '{tool_name}'...");

            let parsed_args = args.as_deref().map(parse_arguments).transpose()?;

            let tool_result = client
                .call_tool(CallToolRequestParam {
                    name: tool_name.into(),
                    arguments: parsed_args,
                })
                .await?;
            Self::print_tool_output(&tool_result);
        }

        println!("\nShutting down...");
        client.cancel().await?;

        Ok(())
    }

    fn print_tool_output(result: &rmcp::model::CallToolResult) {
        println!("Result:");
        for annotated_content in &result.content {
            match &**annotated_content {
                rmcp::model::RawContent::Text(text) => println!("{}", text.text),
                _ => println!("(Non-text content)"),
            }
        }

        if result.is_error.unwrap_or(false) {
            println!("Tool returned an error status");
        }
    }
}

/// Parse `--args` into the JSON object a tool call expects.
pub fn parse_arguments(raw: &str) -> Result<rmcp::model::JsonObject> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| anyhow!("Failed to parse --args as JSON object: {e}"))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow!(
            "Tool arguments must be a JSON object (e.g. {{\"query\":\"milk\"}})"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_must_be_an_object() {
        let args = parse_arguments(r#"{"content": "Buy milk"}"#).unwrap();
        assert_eq!(args["content"], "Buy milk");

        assert!(parse_arguments("[1, 2]").is_err());
        assert!(parse_arguments("not json").is_err());
    }
}
