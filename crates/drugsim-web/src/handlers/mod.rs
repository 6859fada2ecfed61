//! HTTP handlers for all web routes.

pub mod api;
pub mod system;
pub mod wizard;

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use drugsim_common::SimError;
use drugsim_model::ModelPhase;
use drugsim_molecules::charts::ChartData;
use drugsim_molecules::wizard::{WizardEvent, WizardSnapshot, WizardView};

use crate::panels::Notice;
use crate::session::{Session, SessionInner};
use crate::state::{AppEvent, SharedState};

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "drugsim_session";

/// What one wizard action produced.
#[derive(Debug, Clone, Serialize)]
pub struct WizardReply {
    pub session: WizardSnapshot,
    pub notices: Vec<Notice>,
    pub charts: Vec<ChartData>,
}

/// Resolve (or start) the caller's session and make sure the cookie is set.
pub async fn session_for(state: &SharedState, jar: CookieJar) -> (Arc<Session>, CookieJar) {
    let requested = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok());
    let (session, created) = state.sessions.get_or_create(requested).await;

    let jar = if created {
        let cookie = Cookie::build((SESSION_COOKIE, session.id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        jar.add(cookie)
    } else {
        jar
    };
    (session, jar)
}

/// Run one wizard event on a detached task so a dropped request cannot
/// abandon the controller mid-prediction. The reply is `None` only if the
/// task itself died.
pub async fn dispatch(
    state: &SharedState,
    session: Arc<Session>,
    event: WizardEvent,
) -> (Result<(), SimError>, Option<WizardReply>) {
    let shared = Arc::clone(state);
    let task = tokio::spawn(async move {
        let session_id = session.id.to_string();
        let mut inner = session.inner.lock().await;
        let SessionInner { controller, panels } = &mut *inner;

        let is_create = matches!(event, WizardEvent::Create(_));
        let is_test = matches!(event, WizardEvent::Test);
        let training_due = is_test
            && controller.can_test()
            && controller.model_phase() == Some(ModelPhase::Unloaded);
        if training_due {
            shared.publish(AppEvent::ModelTraining { session_id: session_id.clone() });
        }

        let running = (is_test && controller.can_test())
            .then(|| session.mark_busy(controller.snapshot()));
        let outcome = controller.handle(event, panels).await;
        drop(running);

        if outcome.is_ok() {
            if let (true, Some(drug)) = (is_create, controller.drug()) {
                shared.publish(AppEvent::DrugCreated {
                    session_id: session_id.clone(),
                    name: drug.name.clone(),
                    structure: drug.structure.clone(),
                });
            }
            if training_due {
                shared.publish(AppEvent::ModelReady {
                    session_id: session_id.clone(),
                    training_runs: controller.training_runs(),
                });
            }
            if let (true, Some(result)) = (is_test, controller.result()) {
                shared.publish(AppEvent::TestCompleted {
                    session_id,
                    efficacy: result.efficacy.to_string(),
                    toxicity: result.toxicity.to_string(),
                });
            }
        }

        if let Err(e) = &outcome {
            if !e.is_recoverable() {
                shared.publish(AppEvent::TestFailed {
                    session_id: session.id.to_string(),
                    message: e.to_string(),
                });
            }
        }

        let reply = WizardReply {
            session: controller.snapshot(),
            notices: panels.take_notices(),
            charts: panels.charts.clone(),
        };
        (outcome, reply)
    });

    match task.await {
        Ok((outcome, reply)) => (outcome, Some(reply)),
        Err(e) => {
            error!("Wizard task failed: {}", e);
            (Err(SimError::CollaboratorFailure(e.to_string())), None)
        }
    }
}

/// Leave an error notice for a wizard event whose task died before it could
/// report back.
pub async fn report_lost_reply(session: &Session, err: &SimError) {
    session.inner.lock().await.panels.fail(&err.to_string());
}

/// Current snapshot and charts. While a prediction holds the controller the
/// snapshot recorded at its start is returned instead, with no charts.
pub async fn read_session(session: &Session) -> (WizardSnapshot, Vec<ChartData>, Vec<Notice>) {
    if let Ok(mut inner) = session.inner.try_lock() {
        let notices = inner.panels.take_notices();
        return (inner.controller.snapshot(), inner.panels.charts.clone(), notices);
    }
    if let Some(snapshot) = session.busy_snapshot() {
        return (snapshot, Vec::new(), Vec::new());
    }
    let mut inner = session.inner.lock().await;
    let notices = inner.panels.take_notices();
    (inner.controller.snapshot(), inner.panels.charts.clone(), notices)
}
