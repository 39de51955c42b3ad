//! HTTP server for the browser UI.
//!
//! Serves the embedded HTML pages and a thin POST bridge that forwards tool
//! calls to the same handler the MCP transport uses, so the two surfaces can
//! never drift apart.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::templates;
use crate::tools::ToolHandler;

/// Web server state shared across handlers.
#[derive(Clone)]
pub struct WebServer {
    tools: Arc<ToolHandler>,
}

impl WebServer {
    pub fn new(tools: Arc<ToolHandler>) -> Self {
        Self { tools }
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

fn page(template: &str) -> Html<String> {
    // Pages served directly talk to their own origin.
    Html(templates::render(template, ""))
}

async fn home_page() -> Html<String> {
    page(templates::HOME)
}

async fn tasks_page() -> Html<String> {
    page(templates::TASK_LIST)
}

async fn task_form_page() -> Html<String> {
    page(templates::TASK_FORM)
}

async fn task_detail_page() -> Html<String> {
    page(templates::TASK_DETAIL)
}

async fn user_info_page() -> Html<String> {
    page(templates::USER_INFO)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Bridge endpoint: POST /api/tools/{name} with a JSON argument object.
/// The response body is the full tool envelope, errors included, so the
/// pages see exactly what an MCP client would.
async fn api_call_tool(
    State(state): State<WebServer>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> impl IntoResponse {
    let args = body.map(|Json(v)| v).unwrap_or_else(|| json!({}));
    let envelope = state.tools.call_tool(&name, args);
    (StatusCode::OK, Json(envelope.to_json()))
}

fn build_router(state: WebServer) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home_page))
        .route("/tasks", get(tasks_page))
        .route("/tasks/new", get(task_form_page))
        .route("/tasks/{id}", get(task_detail_page))
        .route("/user-info", get(user_info_page))
        .route("/health", get(health))
        .route("/api/tools/{name}", post(api_call_tool))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web UI server.
///
/// Tries the configured port first, then the next few ports up, so a stale
/// instance does not block startup. Returns a shutdown sender and the bound
/// address.
pub async fn start_server(
    tools: Arc<ToolHandler>,
    port: u16,
) -> anyhow::Result<(oneshot::Sender<()>, SocketAddr)> {
    let state = WebServer::new(tools);
    let app = build_router(state);

    let mut listener = None;
    for candidate in port..port.saturating_add(10) {
        let addr = SocketAddr::from(([127, 0, 0, 1], candidate));
        match tokio::net::TcpListener::bind(addr).await {
            Ok(l) => {
                listener = Some(l);
                break;
            }
            Err(e) => warn!("Port {} unavailable: {}", candidate, e),
        }
    }
    let listener =
        listener.ok_or_else(|| anyhow::anyhow!("no free port in {}..{}", port, port + 10))?;
    let bound_addr = listener.local_addr()?;

    info!("Web UI listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Web UI shutting down");
            })
            .await
        {
            // Log but don't crash; the MCP transport keeps running.
            tracing::error!("Web UI server error: {}", e);
        }
    });

    Ok((shutdown_tx, bound_addr))
}
