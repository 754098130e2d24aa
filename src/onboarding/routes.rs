//! REST endpoints for both onboarding flows.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::warn;

use super::agents::{AgentOutcome, Orchestrator};
use super::model::{Deliverable, Department, Employee, parse_start_date};
use super::roster::Roster;
use super::state::OnboardingStage;
use crate::error::OnboardingError;
use crate::llm::{TextGenerator, respond};

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub generator: Arc<dyn TextGenerator>,
    /// The staged flow, once an employee has been submitted.
    pub flow: Arc<RwLock<Option<Orchestrator>>>,
    pub roster: Arc<RwLock<Roster>>,
}

impl OnboardingRouteState {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            flow: Arc::new(RwLock::new(None)),
            roster: Arc::new(RwLock::new(Roster::new())),
        }
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/onboarding/status", get(get_status))
        .route("/api/onboarding/employee", post(start_flow))
        .route("/api/onboarding/agents/run", post(run_agent))
        .route("/api/onboarding/complete", post(complete_stage))
        .route("/api/onboarding/outputs/{deliverable}", put(edit_output))
        .route("/api/onboarding/outputs/{deliverable}/send", post(send_output))
        .route("/api/roster", get(list_roster).post(add_employee))
        .route(
            "/api/roster/{name}/generate/{deliverable}",
            post(generate_draft),
        )
        .route("/api/roster/{name}/drafts/{deliverable}", put(edit_draft))
        .route("/api/roster/{name}/send/{deliverable}", post(send_draft))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({"error": message.into()}))).into_response()
}

fn onboarding_error(err: OnboardingError) -> Response {
    let status = match &err {
        OnboardingError::StageMismatch { .. } | OnboardingError::AlreadyComplete => {
            StatusCode::CONFLICT
        }
        OnboardingError::EmployeeNotFound(_)
        | OnboardingError::NotGenerated(_)
        | OnboardingError::NoDraft { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    warn!(status = status.as_u16(), error = %err, "Onboarding request rejected");
    error_response(status, err.to_string())
}

fn no_flow() -> Response {
    error_response(StatusCode::NOT_FOUND, "No onboarding flow started")
}

fn flow_status(flow: &Orchestrator) -> serde_json::Value {
    serde_json::json!({
        "flow_id": flow.id(),
        "stage": flow.state().stage,
        "stage_label": flow.state().stage.to_string(),
        "current_agent": flow.current_agent(),
        "agents": flow.agent_names(),
        "state": flow.state(),
    })
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "onboard-assist"
    }))
}

// ── Staged flow ─────────────────────────────────────────────────────────

/// GET /api/onboarding/status
async fn get_status(State(state): State<OnboardingRouteState>) -> Response {
    let flow = state.flow.read().await;
    match flow.as_ref() {
        Some(flow) => Json(flow_status(flow)).into_response(),
        None => no_flow(),
    }
}

#[derive(Deserialize)]
struct StartFlowRequest {
    name: String,
    start_date: String,
    role: String,
}

/// POST /api/onboarding/employee
///
/// Starts a fresh flow for the submitted employee, discarding any previous one.
async fn start_flow(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<StartFlowRequest>,
) -> Response {
    let employee = match parse_start_date(&body.start_date)
        .and_then(|date| Employee::for_staged(&body.name, date, &body.role))
    {
        Ok(employee) => employee,
        Err(e) => return onboarding_error(e),
    };

    let orchestrator = Orchestrator::new(employee, Arc::clone(&state.generator));
    let status = flow_status(&orchestrator);
    *state.flow.write().await = Some(orchestrator);
    (StatusCode::CREATED, Json(status)).into_response()
}

#[derive(Deserialize)]
struct RunAgentRequest {
    agent: String,
}

/// POST /api/onboarding/agents/run
async fn run_agent(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<RunAgentRequest>,
) -> Response {
    let mut flow = state.flow.write().await;
    let Some(flow) = flow.as_mut() else {
        return no_flow();
    };

    let outcome = flow.run_agent(&body.agent).await;
    let status = match outcome {
        AgentOutcome::NotFound => StatusCode::NOT_FOUND,
        AgentOutcome::Skipped { .. } => StatusCode::CONFLICT,
        AgentOutcome::Completed { .. } => StatusCode::OK,
    };
    let message = outcome.message();
    (
        status,
        Json(serde_json::json!({
            "result": outcome,
            "message": message,
            "status": flow_status(flow),
        })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct CompleteRequest {
    stage: String,
}

/// POST /api/onboarding/complete
async fn complete_stage(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<CompleteRequest>,
) -> Response {
    let stage: OnboardingStage = match body.stage.parse() {
        Ok(stage) => stage,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let mut flow = state.flow.write().await;
    let Some(flow) = flow.as_mut() else {
        return no_flow();
    };

    match flow.complete_stage(stage) {
        Ok(_) => Json(flow_status(flow)).into_response(),
        Err(e) => onboarding_error(e),
    }
}

#[derive(Deserialize)]
struct EditRequest {
    text: String,
}

/// PUT /api/onboarding/outputs/{deliverable}
async fn edit_output(
    State(state): State<OnboardingRouteState>,
    Path(deliverable): Path<String>,
    Json(body): Json<EditRequest>,
) -> Response {
    let deliverable: Deliverable = match deliverable.parse() {
        Ok(d) => d,
        Err(e) => return onboarding_error(e),
    };

    let mut flow = state.flow.write().await;
    let Some(flow) = flow.as_mut() else {
        return no_flow();
    };

    match flow.edit(deliverable, body.text) {
        Ok(()) => Json(flow_status(flow)).into_response(),
        Err(e) => onboarding_error(e),
    }
}

/// POST /api/onboarding/outputs/{deliverable}/send
async fn send_output(
    State(state): State<OnboardingRouteState>,
    Path(deliverable): Path<String>,
) -> Response {
    let deliverable: Deliverable = match deliverable.parse() {
        Ok(d) => d,
        Err(e) => return onboarding_error(e),
    };

    let mut flow = state.flow.write().await;
    let Some(flow) = flow.as_mut() else {
        return no_flow();
    };

    match flow.mark_sent(deliverable) {
        Ok(()) => Json(flow_status(flow)).into_response(),
        Err(e) => onboarding_error(e),
    }
}

// ── Roster ──────────────────────────────────────────────────────────────

/// GET /api/roster
async fn list_roster(State(state): State<OnboardingRouteState>) -> Response {
    let roster = state.roster.read().await;
    Json(serde_json::json!(roster.entries())).into_response()
}

#[derive(Deserialize)]
struct AddEmployeeRequest {
    name: String,
    email: String,
    department: String,
    role: String,
}

/// POST /api/roster
async fn add_employee(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<AddEmployeeRequest>,
) -> Response {
    let department: Department = match body.department.parse() {
        Ok(d) => d,
        Err(e) => return onboarding_error(e),
    };

    let mut roster = state.roster.write().await;
    match roster.add_employee(&body.name, &body.email, department, &body.role) {
        Ok(entry) => (StatusCode::CREATED, Json(serde_json::json!(entry))).into_response(),
        Err(e) => onboarding_error(e),
    }
}

/// POST /api/roster/{name}/generate/{deliverable}
async fn generate_draft(
    State(state): State<OnboardingRouteState>,
    Path((name, deliverable)): Path<(String, String)>,
) -> Response {
    let deliverable: Deliverable = match deliverable.parse() {
        Ok(d) => d,
        Err(e) => return onboarding_error(e),
    };

    // The roster lock is released while the endpoint generates.
    let prompt = match state.roster.read().await.prompt_for(&name, deliverable) {
        Ok(prompt) => prompt,
        Err(e) => return onboarding_error(e),
    };
    let text = respond(state.generator.as_ref(), &prompt).await;

    let mut roster = state.roster.write().await;
    match roster.store_draft(&name, deliverable, text) {
        Ok(draft) => Json(serde_json::json!(draft)).into_response(),
        Err(e) => onboarding_error(e),
    }
}

/// PUT /api/roster/{name}/drafts/{deliverable}
async fn edit_draft(
    State(state): State<OnboardingRouteState>,
    Path((name, deliverable)): Path<(String, String)>,
    Json(body): Json<EditRequest>,
) -> Response {
    let deliverable: Deliverable = match deliverable.parse() {
        Ok(d) => d,
        Err(e) => return onboarding_error(e),
    };

    let mut roster = state.roster.write().await;
    match roster.edit(&name, deliverable, body.text) {
        Ok(draft) => Json(serde_json::json!(draft)).into_response(),
        Err(e) => onboarding_error(e),
    }
}

/// POST /api/roster/{name}/send/{deliverable}
async fn send_draft(
    State(state): State<OnboardingRouteState>,
    Path((name, deliverable)): Path<(String, String)>,
) -> Response {
    let deliverable: Deliverable = match deliverable.parse() {
        Ok(d) => d,
        Err(e) => return onboarding_error(e),
    };

    let mut roster = state.roster.write().await;
    match roster.mark_sent(&name, deliverable) {
        Ok(draft) => Json(serde_json::json!(draft)).into_response(),
        Err(e) => onboarding_error(e),
    }
}
