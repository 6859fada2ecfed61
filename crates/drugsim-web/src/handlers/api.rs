//! JSON endpoints mirroring the wizard form actions.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use drugsim_common::SimError;
use drugsim_molecules::wizard::WizardEvent;

use crate::handlers::{dispatch, read_session, session_for, WizardReply};
use crate::state::SharedState;

#[derive(Deserialize, Default)]
pub struct CreateRequest {
    #[serde(default)]
    pub molecule: String,
}

type ApiResponse = (StatusCode, CookieJar, Json<Value>);

/// Status code for a wizard error.
pub fn status_for(err: &SimError) -> StatusCode {
    match err {
        SimError::EmptyInput | SimError::InvalidArgument(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SimError::MissingDrug | SimError::InvalidTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /api/session - current wizard state without changing it
pub async fn api_session(State(state): State<SharedState>, jar: CookieJar) -> ApiResponse {
    let (session, jar) = session_for(&state, jar).await;
    let (snapshot, charts, notices) = read_session(&session).await;
    let body = json!({
        "status": "success",
        "session": snapshot,
        "notices": notices,
        "charts": charts,
    });
    (StatusCode::OK, jar, Json(body))
}

/// POST /api/drug - create a drug from a molecule description
pub async fn api_create(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(payload): Json<CreateRequest>,
) -> ApiResponse {
    run(&state, jar, WizardEvent::Create(payload.molecule)).await
}

/// POST /api/proceed - move from review to testing
pub async fn api_proceed(State(state): State<SharedState>, jar: CookieJar) -> ApiResponse {
    run(&state, jar, WizardEvent::Proceed).await
}

/// POST /api/test - run the prediction for the current drug
pub async fn api_test(State(state): State<SharedState>, jar: CookieJar) -> ApiResponse {
    run(&state, jar, WizardEvent::Test).await
}

async fn run(state: &SharedState, jar: CookieJar, event: WizardEvent) -> ApiResponse {
    let (session, jar) = session_for(state, jar).await;
    let (outcome, reply) = dispatch(state, session, event).await;
    let (status, body) = match outcome {
        Ok(()) => (StatusCode::OK, reply_json("success", None, reply)),
        Err(e) => (status_for(&e), reply_json("error", Some(e.to_string()), reply)),
    };
    (status, jar, Json(body))
}

fn reply_json(status: &str, error: Option<String>, reply: Option<WizardReply>) -> Value {
    match reply {
        Some(reply) => json!({
            "status": status,
            "error": error,
            "session": reply.session,
            "notices": reply.notices,
            "charts": reply.charts,
        }),
        None => json!({ "status": status, "error": error }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_errors_map_to_client_statuses() {
        assert_eq!(status_for(&SimError::EmptyInput), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(&SimError::MissingDrug), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&SimError::InvalidTransition { action: "proceed", phase: "input".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&SimError::CollaboratorFailure("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
