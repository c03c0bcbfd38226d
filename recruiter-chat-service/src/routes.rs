use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::Json,
    routing::{get, post},
};
use recruit_flow::{ConversationState, Filter, FlowError, FlowRunner, Turn, UserInput};
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub runner: FlowRunner,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/dialogues", post(open_dialogue))
        .route(
            "/dialogues/{id}",
            get(get_dialogue).delete(cancel_dialogue),
        )
        .route("/dialogues/{id}/messages", post(submit_message))
        .route("/dialogues/{id}/filter", get(get_filter))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(correlation_id_middleware))
        .with_state(state)
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> axum::response::Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

async fn health_check() -> &'static str {
    "OK"
}

async fn open_dialogue(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Turn>), StatusCode> {
    let turn = state.runner.open().await.map_err(|e| {
        error!(error = %e, "Failed to open dialogue");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!(session_id = %turn.session_id, "Dialogue opened");
    Ok((StatusCode::CREATED, Json(turn)))
}

async fn submit_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(input): Json<UserInput>,
) -> Result<Json<Turn>, StatusCode> {
    validate_session_id(&session_id)?;

    info!(
        session_id = %session_id,
        input = ?input,
        "Processing dialogue message"
    );

    let turn = state
        .runner
        .submit(&session_id, input)
        .await
        .map_err(|e| flow_error_status(&session_id, e))?;

    if let Some(filter) = &turn.filter {
        info!(
            session_id = %session_id,
            role = %filter.role,
            skills = filter.skills.len(),
            "Dialogue complete, filter ready"
        );
    }

    Ok(Json(turn))
}

async fn get_dialogue(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ConversationState>, StatusCode> {
    validate_session_id(&session_id)?;

    let session = state
        .runner
        .session(&session_id)
        .await
        .map_err(|e| flow_error_status(&session_id, e))?;
    Ok(Json(session.state))
}

async fn get_filter(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Filter>, StatusCode> {
    validate_session_id(&session_id)?;

    let filter = state
        .runner
        .filter(&session_id)
        .await
        .map_err(|e| flow_error_status(&session_id, e))?;
    Ok(Json(filter))
}

async fn cancel_dialogue(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    validate_session_id(&session_id)?;

    state
        .runner
        .cancel(&session_id)
        .await
        .map_err(|e| flow_error_status(&session_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_session_id(session_id: &str) -> Result<(), StatusCode> {
    if Uuid::parse_str(session_id).is_err() {
        error!(session_id = %session_id, "Invalid session ID format");
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(())
}

fn flow_error_status(session_id: &str, err: FlowError) -> StatusCode {
    match err {
        FlowError::SessionNotFound(_) => {
            info!(session_id = %session_id, "Session not found");
            StatusCode::NOT_FOUND
        }
        other => {
            error!(session_id = %session_id, error = %other, "Dialogue request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use recruit_flow::{InMemorySessionStorage, recruiter_table};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let runner = FlowRunner::new(
            Arc::new(recruiter_table()),
            Arc::new(InMemorySessionStorage::new()),
        );
        router(AppState { runner })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_full_dialogue_over_http() {
        let app = app();
        let (status, opened) = send(&app, "POST", "/dialogues", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(opened["expected_input"]["class"], "free_text");
        let session_id = opened["session_id"].as_str().unwrap().to_string();
        let messages = format!("/dialogues/{session_id}/messages");

        let inputs = [
            json!({ "text": "Backend Engineer" }),
            json!({ "text": "5" }),
            json!({ "selection": ["Go", "Kubernetes"] }),
            json!({ "choice": false }),
            json!({ "choice": true }),
            json!({ "text": "google, amazon" }),
            json!({ "choice": false }),
            json!({ "choice": false }),
            json!({ "choice": false }),
        ];
        for input in inputs {
            let (status, turn) = send(&app, "POST", &messages, Some(input)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(turn["complete"], false);
        }

        let (status, turn) = send(&app, "POST", &messages, Some(json!({ "choice": false }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(turn["complete"], true);
        assert_eq!(turn["outcome"]["kind"], "completed");
        assert_eq!(turn["filter"]["companiesWorkedAt"], json!(["GOOGLE", "AMAZON"]));
        assert_eq!(turn["filter"]["skills"], json!(["Go", "Kubernetes"]));

        let (status, filter) = send(&app, "GET", &format!("/dialogues/{session_id}/filter"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(filter["role"], "Backend Engineer");

        let (status, state) = send(&app, "GET", &format!("/dialogues/{session_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["current_step"], "complete");
        assert_eq!(state["is_terminal"], true);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_sessions() {
        let app = app();
        let missing = Uuid::new_v4();

        let (status, _) = send(
            &app,
            "POST",
            &format!("/dialogues/{missing}/messages"),
            Some(json!({ "text": "SRE" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/dialogues/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cancel_discards_dialogue() {
        let app = app();
        let (_, opened) = send(&app, "POST", "/dialogues", None).await;
        let session_id = opened["session_id"].as_str().unwrap().to_string();
        let uri = format!("/dialogues/{session_id}");

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
