//! Task Manager MCP Server
//!
//! A Rust MCP server exposing per-user task management tools, the embeddable
//! widget resources behind them, and an optional browser UI.

use anyhow::Result;
use clap::Parser;
use rmcp::{
    ErrorData, RoleServer, ServerHandler, ServiceExt,
    model::{
        CallToolRequestParams, CallToolResult, Content, InitializeResult,
        ListResourceTemplatesResult, ListResourcesResult, ListToolsResult, LoggingLevel,
        PaginatedRequestParams, ReadResourceRequestParams, ReadResourceResult, ResourceContents,
        ServerCapabilities,
    },
    service::RequestContext,
    transport::io::stdio,
};
use serde_json::{Value, json};
use std::fs::OpenOptions;
use std::sync::Arc;
use task_manager_mcp::config::{self, Config, UiMode};
use task_manager_mcp::db::Database;
use task_manager_mcp::logging::LogLevelFilter;
use task_manager_mcp::resources::ResourceHandler;
use task_manager_mcp::tools::ToolHandler;
use task_manager_mcp::web;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Task manager MCP server with optional web UI.
#[derive(Parser, Debug)]
#[command(name = "task-manager-mcp", version, about)]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Path to the SQLite database (overrides config)
    #[arg(short, long)]
    database: Option<std::path::PathBuf>,

    /// Enable debug-level logging
    #[arg(short, long)]
    verbose: bool,

    /// Log destination: 0/off, 1/stdout, 2/stderr, or a file path
    #[arg(long, default_value = "2")]
    log: String,

    /// UI mode: none or web (overrides config)
    #[arg(long)]
    ui: Option<UiMode>,

    /// Port for the web UI (overrides config)
    #[arg(long)]
    ui_port: Option<u16>,
}

const INSTRUCTIONS: &str = "\
Per-user task manager. Call show_task_manager to open the interface, \
create_task / list_tasks / get_task / update_task / delete_task to manage \
tasks. Users are identified by first and last name and created on first use.";

/// MCP server handler.
#[derive(Clone)]
struct TaskManagerServer {
    tool_handler: Arc<ToolHandler>,
    resource_handler: Arc<ResourceHandler>,
    /// Atomic level filter for logging (client can adjust via logging/setLevel).
    level_filter: Arc<LogLevelFilter>,
}

impl ServerHandler for TaskManagerServer {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: Default::default(),
            server_info: rmcp::model::Implementation {
                name: "task-manager-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            capabilities: ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                resources: Some(rmcp::model::ResourcesCapability::default()),
                logging: Some(Default::default()),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn set_level(
        &self,
        request: rmcp::model::SetLevelRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<(), ErrorData> {
        self.level_filter.set(request.level);
        tracing::info!(level = ?request.level, "Logging level updated via MCP");
        Ok(())
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.tool_handler.get_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let tool_name = request.name.clone();
        let start = std::time::Instant::now();

        let args = Value::Object(request.arguments.unwrap_or_default());
        let envelope = self.tool_handler.call_tool(&tool_name, args);

        // Per-call logging honors the client-set level from logging/setLevel.
        let elapsed = start.elapsed();
        if envelope.is_error {
            if self.level_filter.should_log(LoggingLevel::Warning) {
                warn!(
                    tool = %tool_name,
                    duration_ms = elapsed.as_millis() as u64,
                    error = %envelope.text,
                    "Tool call failed"
                );
            }
        } else if self.level_filter.should_log(LoggingLevel::Debug) {
            debug!(
                tool = %tool_name,
                duration_ms = elapsed.as_millis() as u64,
                "Tool call succeeded"
            );
        }

        Ok(CallToolResult {
            content: vec![Content::text(envelope.text.clone())],
            is_error: envelope.is_error.then_some(true),
            meta: envelope
                .widget
                .and_then(|w| serde_json::from_value(w.meta_json()).ok()),
            structured_content: envelope.structured.clone(),
        })
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult {
            resources: self.resource_handler.get_resources(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourceTemplatesResult, ErrorData> {
        // The widget set is fixed; no parameterized resources.
        Ok(ListResourceTemplatesResult {
            resource_templates: Vec::new(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, ErrorData> {
        let uri_string = request.uri.to_string();
        match self.resource_handler.read_resource(&uri_string) {
            Ok(widget) => {
                let contents = serde_json::from_value::<ResourceContents>(json!({
                    "uri": uri_string,
                    "mimeType": "text/html+skybridge",
                    "text": widget.html,
                }))
                .unwrap_or_else(|_| ResourceContents::text(widget.html.clone(), request.uri));
                Ok(ReadResourceResult {
                    contents: vec![contents],
                })
            }
            Err(e) => {
                warn!(
                    resource_uri = %uri_string,
                    error = %e,
                    "Resource read failed"
                );
                Err(ErrorData::resource_not_found(
                    format!("Unknown resource: {}", uri_string),
                    Some(json!({ "error": e.to_string() })),
                ))
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new().create(true).append(true).open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    // If an explicit config path was given, surface it to the loader.
    // SAFETY: this runs at startup before any other threads are spawned.
    if let Some(config_path) = &cli.config {
        unsafe {
            std::env::set_var(config::CONFIG_PATH_ENV, config_path);
        }
    }
    let mut cfg = Config::load()?;

    // CLI overrides
    if let Some(db_path) = &cli.database {
        cfg.server.db_path = Some(db_path.clone());
    }
    if let Some(ui) = cli.ui {
        cfg.server.ui_mode = ui;
    }
    if let Some(ui_port) = cli.ui_port {
        cfg.server.ui_port = ui_port;
        cfg.server.base_url = format!("http://localhost:{}", ui_port);
    }

    run_server(cfg).await
}

async fn run_server(cfg: Config) -> Result<()> {
    cfg.ensure_db_dir()?;
    let db_path = cfg.require_db_path()?;
    let db = Arc::new(Database::open(db_path)?);
    info!(path = %db_path.display(), "Database opened");

    let tool_handler = Arc::new(ToolHandler::new(Arc::clone(&db)));
    let resource_handler = Arc::new(ResourceHandler::new(&cfg.server.base_url));

    let server = TaskManagerServer {
        tool_handler: Arc::clone(&tool_handler),
        resource_handler,
        level_filter: Arc::new(LogLevelFilter::default()),
    };

    // Keep the shutdown sender alive for the life of the process.
    let _web_shutdown = match cfg.server.ui_mode {
        UiMode::Web => Some(web::start_server(tool_handler, cfg.server.ui_port).await?),
        UiMode::None => None,
    };

    let transport = stdio();
    let service = server.serve(transport).await?;
    service.waiting().await?;

    Ok(())
}
