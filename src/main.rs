//! CLI entry point for fastnotes.
//!
//! Provides commands for configuring the store, serving the note tools over
//! MCP, and calling the tools directly from the shell.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use console::style;
use fastnotes::io::format::format_unix_timestamp;
use fastnotes::io::{ExitCode, JsonResponse, OutputFormat, ResponseMeta};
use fastnotes::mcp::NotesServer;
use fastnotes::mcp::direct::{TOOL_NAMES, ToolCall};
use fastnotes::vector::CollectionMetadata;
use fastnotes::{NoteService, Settings};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Serialize)]
struct CollectionInfo {
    path: PathBuf,
    model_name: String,
    dimension: usize,
    metric: String,
    notes: usize,
    created: String,
    updated: String,
}

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Semantic notes with near-duplicate detection
#[derive(Parser)]
#[command(
    name = "fastnotes",
    version = env!("CARGO_PKG_VERSION"),
    about = "Semantic notes MCP server",
    long_about = "Save, search, list and delete private notes by meaning. Near-duplicate notes are refused.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Quick Start:\n  $ fastnotes init                     # Write .fastnotes/settings.toml\n  $ fastnotes mcp save_note Buy milk   # Save a note from the shell\n  $ fastnotes serve                    # MCP server on stdio"
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Initialize project
    #[command(about = "Set up .fastnotes directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,

    /// Start MCP server
    #[command(
        about = "Start MCP server",
        after_help = "Examples:\n  fastnotes serve\n  fastnotes serve --http\n  fastnotes serve --http --bind 0.0.0.0:3000\n\nModes:\n  Default: stdio\n  --http: SSE at /mcp/sse (needs the http-server feature)"
    )]
    Serve {
        /// Enable HTTP server mode instead of stdio
        #[arg(long, help = "Run as HTTP server instead of stdio transport")]
        http: bool,

        /// Bind address for HTTP server (defaults to server.bind)
        #[arg(long, help = "Address to bind HTTP server to")]
        bind: Option<String>,
    },

    /// Test MCP connection
    #[command(name = "mcp-test", about = "Test MCP connection and list tools")]
    McpTest {
        /// Path to server binary (defaults to current binary)
        #[arg(long)]
        server_binary: Option<PathBuf>,

        /// Tool to call after list_notes
        #[arg(long)]
        tool: Option<String>,

        /// Tool arguments as JSON
        #[arg(long)]
        args: Option<String>,
    },

    /// Call MCP tools directly
    #[command(
        about = "Execute note tools directly",
        long_about = "Execute note tools directly without spawning a server.\n\nSupports bare words, key:value pairs, and JSON arguments.",
        after_help = "Examples:\n  fastnotes mcp save_note Buy milk\n  fastnotes mcp search_notes groceries\n  fastnotes mcp list_notes --json | jq '.data.notes[].id'\n  fastnotes mcp delete_note note_id:<id>\n\nTools:\n  save_note     Save a note unless a similar one exists\n  search_notes  Find notes by meaning\n  delete_note   Delete a note by id\n  list_notes    List every note"
    )]
    Mcp {
        /// Tool to call
        tool: String,

        /// Positional arguments (free text or key:value pairs)
        #[arg(num_args = 0..)]
        positional: Vec<String>,

        /// Tool arguments as JSON
        #[arg(long)]
        args: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show collection statistics
    #[command(about = "Show model, metric and note count of the collection")]
    Info {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn exit_with(code: ExitCode) -> ! {
    std::process::exit(code.into())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Init { .. }) && cli.config.is_none() {
        if let Err(warning) = Settings::check_init() {
            eprintln!("Warning: {warning}");
            eprintln!("Using default configuration for now.");
        }
    }

    let config = if let Some(config_path) = &cli.config {
        Settings::load_from(config_path).unwrap_or_else(|e| {
            eprintln!(
                "Configuration error loading from {}: {e}",
                config_path.display()
            );
            exit_with(ExitCode::ConfigError)
        })
    } else {
        Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            Settings::default()
        })
    };

    fastnotes::logging::init_logging(&config);

    match cli.command {
        Commands::Init { force } => {
            match Settings::init_config_file(force) {
                Ok(path) => {
                    println!("Created configuration file at: {}", path.display());
                    println!("Edit this file to customize your settings.");
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    exit_with(ExitCode::ConfigError);
                }
            }
        }

        Commands::Config => {
            println!("{}", style("Current Configuration:").cyan().bold());
            println!("{}", "=".repeat(50));
            match toml::to_string_pretty(&config) {
                Ok(toml_str) => println!("{toml_str}"),
                Err(e) => eprintln!("Error displaying config: {e}"),
            }
        }

        Commands::Serve { http, bind } => {
            let bind_address = bind.unwrap_or_else(|| config.server.bind.clone());

            if http || config.server.mode == "http" {
                eprintln!("Starting MCP server in HTTP mode");
                use fastnotes::mcp::http_server::serve_http;
                if let Err(e) = serve_http(config, bind_address).await {
                    eprintln!("HTTP server error: {e}");
                    exit_with(ExitCode::GeneralError);
                }
            } else if let Err(e) = serve_stdio(&config).await {
                eprintln!("MCP server error: {e}");
                exit_with(ExitCode::GeneralError);
            }
        }

        Commands::McpTest {
            server_binary,
            tool,
            args,
        } => {
            use fastnotes::mcp::client::NotesClient;

            let server_path = match server_binary.map(Ok).unwrap_or_else(std::env::current_exe) {
                Ok(path) => path,
                Err(e) => {
                    eprintln!("Failed to get current executable path: {e}");
                    exit_with(ExitCode::GeneralError);
                }
            };

            if let Err(e) = NotesClient::test_server(server_path, cli.config, tool, args).await {
                eprintln!("MCP test failed: {e}");
                exit_with(ExitCode::GeneralError);
            }
        }

        Commands::Mcp {
            tool,
            positional,
            args,
            json,
        } => {
            let format = OutputFormat::from_json_flag(json);
            let code = run_tool(&config, &tool, &positional, args.as_deref(), format).await;
            if !code.is_success() {
                exit_with(code);
            }
        }

        Commands::Info { json } => {
            let code = show_info(&config, OutputFormat::from_json_flag(json));
            if !code.is_success() {
                exit_with(code);
            }
        }
    }
}

async fn serve_stdio(config: &Settings) -> anyhow::Result<()> {
    use rmcp::{ServiceExt, transport::stdio};

    eprintln!("Starting MCP server on stdio transport");
    eprintln!("To test: npx @modelcontextprotocol/inspector cargo run -- serve");

    let server = NotesServer::from_settings(config)?;
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

/// Print an error in the requested format and return its exit code.
fn report_error(
    format: OutputFormat,
    code: ExitCode,
    message: &str,
    suggestions: Vec<&str>,
) -> ExitCode {
    if format.is_json() {
        let response = JsonResponse::error(code, message, suggestions);
        println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
    } else {
        eprintln!("Error: {message}");
        for suggestion in suggestions {
            eprintln!("  - {suggestion}");
        }
    }
    code
}

async fn run_tool(
    config: &Settings,
    tool: &str,
    positional: &[String],
    args: Option<&str>,
    format: OutputFormat,
) -> ExitCode {
    let json_args = match args.map(fastnotes::mcp::client::parse_arguments).transpose() {
        Ok(map) => map,
        Err(e) => {
            return report_error(format, ExitCode::InvalidArguments, &e.to_string(), vec![]);
        }
    };

    let call = match ToolCall::from_cli(tool, positional, json_args.as_ref()) {
        Ok(call) => call,
        Err(e) => {
            let tools = format!("Available tools: {}", TOOL_NAMES.join(", "));
            return report_error(
                format,
                ExitCode::InvalidArguments,
                &e.to_string(),
                vec![tools.as_str()],
            );
        }
    };

    let started = Instant::now();
    let service = match NoteService::from_settings(config) {
        Ok(service) => Arc::new(service),
        Err(e) => return print_note_error(format, &e),
    };

    match call.execute(&service).await {
        Ok(output) => {
            if format.is_json() {
                let elapsed = started.elapsed().as_millis() as u64;
                let response = JsonResponse::success(output.data)
                    .with_message(output.text)
                    .with_exit_code(output.exit_code)
                    .with_meta(ResponseMeta::now(Some(elapsed)));
                println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
            } else {
                println!("{}", output.text);
            }
            output.exit_code
        }
        Err(e) => print_note_error(format, &e),
    }
}

fn print_note_error(format: OutputFormat, error: &fastnotes::NoteError) -> ExitCode {
    if format.is_json() {
        let response = JsonResponse::from_error(error);
        println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
    } else {
        eprintln!("Error: {error}");
        for suggestion in error.recovery_suggestions() {
            eprintln!("  - {suggestion}");
        }
    }
    ExitCode::from_error(error)
}

fn show_info(config: &Settings, format: OutputFormat) -> ExitCode {
    let path = config.store.path.join(&config.store.collection);

    if !CollectionMetadata::exists(&path) {
        let message = format!("No collection at {}", path.display());
        return report_error(format, ExitCode::GeneralError, &message, vec![
            "Save a note first: fastnotes mcp save_note <text>",
        ]);
    }

    let metadata = match CollectionMetadata::load(&path) {
        Ok(metadata) => metadata,
        Err(e) => return print_note_error(format, &e.into()),
    };

    let info = CollectionInfo {
        path,
        model_name: metadata.model_name,
        dimension: metadata.dimension.get(),
        metric: metadata.metric.to_string(),
        notes: metadata.note_count,
        created: format_unix_timestamp(metadata.created_at),
        updated: format_unix_timestamp(metadata.updated_at),
    };

    if format.is_json() {
        let response = JsonResponse::success(&info);
        println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
    } else {
        println!("{}", style("Collection").cyan().bold());
        println!("  Path:      {}", info.path.display());
        println!("  Model:     {}", info.model_name);
        println!("  Dimension: {}", info.dimension);
        println!("  Metric:    {}", info.metric);
        println!("  Notes:     {}", info.notes);
        println!("  Created:   {}", info.created);
        println!("  Updated:   {}", info.updated);
    }
    ExitCode::Success
}
