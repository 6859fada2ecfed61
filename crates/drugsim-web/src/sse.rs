//! Server-Sent Events (SSE) streaming for live wizard updates.
//!
//! A client only receives events for its own session.

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use futures_core::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::handlers::SESSION_COOKIE;
use crate::state::{AppEvent, SharedState};

/// SSE endpoint: clients subscribe here for training and test progress.
pub async fn sse_handler(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let own_session = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let rx = state.subscribe();
    let stream = BroadcastStream::new(rx)
        .filter_map(move |result| {
            let event = result.ok()?;
            let (name, data) = frame_for(own_session.as_deref(), &event)?;
            Some(Ok(Event::default().event(name).data(data)))
        });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

/// Event name and JSON payload for `event`, or `None` when it belongs to a
/// session other than `own_session`.
fn frame_for(own_session: Option<&str>, event: &AppEvent) -> Option<(&'static str, String)> {
    if own_session != Some(event.session_id()) {
        return None;
    }
    let data = serde_json::to_string(event).ok()?;
    Some((event.name(), data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::AppState;

    fn every_event(session_id: &str) -> Vec<AppEvent> {
        let id = session_id.to_string();
        vec![
            AppEvent::DrugCreated { session_id: id.clone(), name: "FX-AB12C".into(), structure: "eniaffac-mol".into() },
            AppEvent::ModelTraining { session_id: id.clone() },
            AppEvent::ModelReady { session_id: id.clone(), training_runs: 1 },
            AppEvent::TestCompleted { session_id: id.clone(), efficacy: "42.0".into(), toxicity: "7.5".into() },
            AppEvent::TestFailed { session_id: id, message: "boom".into() },
        ]
    }

    #[test]
    fn test_other_sessions_are_filtered_out() {
        for event in every_event("session-a") {
            assert!(frame_for(Some("session-b"), &event).is_none());
            assert!(frame_for(None, &event).is_none());
            assert!(frame_for(Some("session-a"), &event).is_some());
        }
    }

    #[test]
    fn test_event_name_matches_type_tag() {
        for event in every_event("s") {
            let (name, data) = frame_for(Some("s"), &event).unwrap();
            let json: serde_json::Value = serde_json::from_str(&data).unwrap();
            assert_eq!(json["type"], name);
            assert_eq!(json["session_id"], "s");
        }
    }

    #[tokio::test]
    async fn test_published_events_reach_subscribers() {
        let state = AppState::new(Config::default()).unwrap();
        let mut rx = state.subscribe();
        state.publish(AppEvent::ModelTraining { session_id: "a".into() });
        state.publish(AppEvent::ModelReady { session_id: "b".into(), training_runs: 1 });

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(frame_for(Some("b"), &first).is_none());
        let (name, _) = frame_for(Some("b"), &second).unwrap();
        assert_eq!(name, "model_ready");
    }
}
