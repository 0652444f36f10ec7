//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for storing webpage content and asking questions
//! about it, with conventional success/error JSON envelopes.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::SporreError;
use crate::qa::{DeleteOutcome, QaService, StoreRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    qa: QaService,
    settings: Settings,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let qa = QaService::from_settings(&settings)?;

    let state = Arc::new(AppState { qa, settings });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/webpage/store", post(store_webpage))
        .route("/api/webpage/ask", post(ask_question))
        .route("/api/webpage/sessions", get(list_sessions))
        .route("/api/webpage/session/{session_id}", delete(delete_session))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Sporre API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET    /api/health");
    Output::kv("Store", "POST   /api/webpage/store");
    Output::kv("Ask", "POST   /api/webpage/ask");
    Output::kv("Sessions", "GET    /api/webpage/sessions");
    Output::kv("Delete", "DELETE /api/webpage/session/:id");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request Types ===

#[derive(Deserialize)]
struct StoreBody {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
    #[serde(default)]
    metadata: serde_json::Map<String, Value>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
}

#[derive(Deserialize)]
struct AskBody {
    session_id: Option<String>,
    question: Option<String>,
    top_k: Option<usize>,
}

// === Envelope Helpers ===

fn success(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn failure(status: StatusCode, error: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "error": error })))
}

fn map_error(e: &SporreError) -> (StatusCode, Json<Value>) {
    let status = match e {
        SporreError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        SporreError::EmptyContent | SporreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    failure(status, &e.to_string())
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "API is running",
        "service": "Sporre Webpage Q&A API"
    }))
}

async fn store_webpage(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StoreBody>,
) -> impl IntoResponse {
    let content = match body.content {
        Some(c) if !c.trim().is_empty() => c,
        _ => return failure(StatusCode::BAD_REQUEST, "No content provided").into_response(),
    };

    let title = body.title.unwrap_or_else(|| "Untitled Page".to_string());
    let url = body.url.unwrap_or_default();

    let mut request = StoreRequest::new(title, url, content);
    request.metadata = body.metadata;
    request.chunk_size = body.chunk_size;
    request.chunk_overlap = body.chunk_overlap;

    match state.qa.store(request).await {
        Ok(session_id) => match state.qa.session_info(&session_id) {
            Some(session) => success(json!({
                "session_id": session_id,
                "title": session.title,
                "url": session.url,
                "chunks": session.chunk_count,
                "content_length": session.content_length,
                "stored_at": session.created_at,
            }))
            .into_response(),
            None => success(json!({ "session_id": session_id })).into_response(),
        },
        Err(e) => map_error(&e).into_response(),
    }
}

async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskBody>,
) -> impl IntoResponse {
    let Some(session_id) = body.session_id else {
        return failure(StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };
    let Some(question) = body.question else {
        return failure(StatusCode::BAD_REQUEST, "question is required").into_response();
    };

    let top_k = body.top_k.unwrap_or(state.settings.qa.top_k);

    match state.qa.ask(&session_id, &question, top_k).await {
        Ok(answer) => {
            let session = state.qa.session_info(&session_id);

            success(json!({
                "answer": answer,
                "question": question,
                "session": session.map(|s| json!({ "title": s.title, "url": s.url })),
            }))
            .into_response()
        }
        Err(e) => map_error(&e).into_response(),
    }
}

async fn list_sessions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sessions = state.qa.list_sessions();

    success(json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.qa.delete_session(&session_id).await {
        DeleteOutcome::Deleted => Json(json!({
            "success": true,
            "message": "Session deleted successfully"
        }))
        .into_response(),
        DeleteOutcome::NotFound => {
            failure(StatusCode::NOT_FOUND, "Session not found").into_response()
        }
        DeleteOutcome::IndexDeleteFailed => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Index deletion failed; session retained",
        )
        .into_response(),
    }
}
