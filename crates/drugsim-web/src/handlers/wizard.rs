//! Wizard page: create, review and test a fabricated drug.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use minijinja::context;
use serde::Deserialize;
use tracing::error;

use drugsim_molecules::wizard::WizardEvent;

use crate::handlers::{dispatch, read_session, report_lost_reply, session_for};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub molecule: String,
}

pub async fn wizard_page(State(state): State<SharedState>, jar: CookieJar) -> Response {
    let (session, jar) = session_for(&state, jar).await;
    let (snapshot, charts, notices) = read_session(&session).await;

    let charts_json = serde_json::to_string(&charts).unwrap_or_else(|_| "[]".to_string());
    let rendered = state
        .templates
        .get_template("wizard.html")
        .and_then(|tmpl| {
            tmpl.render(context! {
                variant => snapshot.variant,
                phase => snapshot.phase,
                can_create => snapshot.can_create,
                can_proceed => snapshot.can_proceed,
                can_test => snapshot.can_test,
                busy => snapshot.busy,
                model_phase => snapshot.model_phase,
                drug => snapshot.drug,
                result => snapshot.result,
                charts => charts,
                charts_json => charts_json,
                notices => notices,
            })
        });

    match rendered {
        Ok(html) => (jar, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render wizard page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, jar, "Failed to render page").into_response()
        }
    }
}

pub async fn create_submit(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<CreateForm>,
) -> (CookieJar, Redirect) {
    run_and_redirect(&state, jar, WizardEvent::Create(form.molecule)).await
}

pub async fn proceed_submit(State(state): State<SharedState>, jar: CookieJar) -> (CookieJar, Redirect) {
    run_and_redirect(&state, jar, WizardEvent::Proceed).await
}

pub async fn test_submit(State(state): State<SharedState>, jar: CookieJar) -> (CookieJar, Redirect) {
    run_and_redirect(&state, jar, WizardEvent::Test).await
}

/// Outcomes (including warnings) are left in the session's panels for the
/// page to show after the redirect.
async fn run_and_redirect(
    state: &SharedState,
    jar: CookieJar,
    event: WizardEvent,
) -> (CookieJar, Redirect) {
    let (session, jar) = session_for(state, jar).await;
    let (outcome, reply) = dispatch(state, Arc::clone(&session), event).await;
    if let (Err(e), None) = (&outcome, &reply) {
        report_lost_reply(&session, e).await;
    }
    (jar, Redirect::to("/"))
}
