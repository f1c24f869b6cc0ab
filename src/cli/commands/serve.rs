//! Web UI and HTTP API server.
//!
//! Serves the single-page generator UI and the JSON endpoints it calls.

use crate::agent::AgentFactory;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{Artifact, Pipeline, PipelineError, Stage, SystemStatus};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("page.html");

/// Shared application state.
struct AppState {
    factory: AgentFactory,
}

/// Run the web server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    match preflight::check(Operation::Serve, &settings, None) {
        Ok(warnings) => {
            for warning in &warnings {
                Output::warning(warning);
            }
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    }
    if let Err(e) = settings.model.api_key() {
        Output::warning(&format!("{} Requests will fail until it is set.", e));
    }

    let state = Arc::new(AppState {
        factory: AgentFactory::from_settings(&settings)?,
    });

    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Scriptcast Server");
    println!();
    Output::success(&format!("Open http://{} in your browser", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Web UI", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Status", "GET  /status");
    Output::kv("Generate", "POST /generate");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/generate", post(generate))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct GenerateRequest {
    topic: String,
}

#[derive(Serialize)]
struct GenerateResponse {
    request_id: Uuid,
    topic: String,
    research: String,
    script: String,
    generated_at: DateTime<Utc>,
    artifacts: Vec<Artifact>,
}

#[derive(Serialize)]
struct StageFailureResponse {
    request_id: Uuid,
    stage: Stage,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    research: Option<String>,
}

#[derive(Serialize)]
struct StatusResponse {
    status: SystemStatus,
    agents: Vec<String>,
}

#[derive(Serialize)]
struct WarningResponse {
    warning: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pipeline = Pipeline::from_factory(&state.factory);
    let agents = [pipeline.research_agent(), pipeline.script_agent()]
        .into_iter()
        .filter_map(|slot| slot.handle().map(|handle| handle.describe()))
        .collect();

    Json(StatusResponse {
        status: pipeline.status(),
        agents,
    })
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();

    if req.topic.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(WarningResponse {
                warning: PipelineError::EmptyTopic.to_string(),
            }),
        )
            .into_response();
    }

    info!(%request_id, "Generating for topic: {}", req.topic.trim());

    // Each request gets its own agent pair.
    let pipeline = Pipeline::from_factory(&state.factory);
    let topic = req.topic;
    let run = tokio::spawn(async move { pipeline.generate(&topic).await });

    match run.await {
        Ok(Ok(output)) => Json(GenerateResponse {
            request_id,
            artifacts: output.artifacts().to_vec(),
            topic: output.topic,
            research: output.research,
            script: output.script,
            generated_at: output.generated_at,
        })
        .into_response(),
        Ok(Err(PipelineError::EmptyTopic)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(WarningResponse {
                warning: PipelineError::EmptyTopic.to_string(),
            }),
        )
            .into_response(),
        Ok(Err(e)) => {
            warn!(%request_id, "Pipeline failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(StageFailureResponse {
                    request_id,
                    stage: e.stage().unwrap_or(Stage::Research),
                    error: e.to_string(),
                    research: e.research().map(str::to_string),
                }),
            )
                .into_response()
        }
        Err(join_error) => {
            error!(%request_id, "Unexpected error: {:?}", join_error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "An unexpected error occurred".to_string(),
                }),
            )
                .into_response()
        }
    }
}
