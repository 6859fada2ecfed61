//! Shared application state for the web server.

use std::sync::Arc;
use minijinja::Environment;
use tokio::sync::broadcast;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::session::{SessionSettings, SessionStore};

/// Wizard page template, compiled into the binary.
pub const WIZARD_TEMPLATE: &str = include_str!("../templates/wizard.html");

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A drug was fabricated in a session
    DrugCreated { session_id: String, name: String, structure: String },
    /// The session's placeholder network started training
    ModelTraining { session_id: String },
    /// The session's placeholder network finished training
    ModelReady { session_id: String, training_runs: usize },
    /// A test produced a result
    TestCompleted { session_id: String, efficacy: String, toxicity: String },
    /// A prediction collaborator failed
    TestFailed { session_id: String, message: String },
}

impl AppEvent {
    pub fn session_id(&self) -> &str {
        match self {
            AppEvent::DrugCreated { session_id, .. }
            | AppEvent::ModelTraining { session_id }
            | AppEvent::ModelReady { session_id, .. }
            | AppEvent::TestCompleted { session_id, .. }
            | AppEvent::TestFailed { session_id, .. } => session_id,
        }
    }

    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::DrugCreated { .. } => "drug_created",
            AppEvent::ModelTraining { .. } => "model_training",
            AppEvent::ModelReady { .. } => "model_ready",
            AppEvent::TestCompleted { .. } => "test_completed",
            AppEvent::TestFailed { .. } => "test_failed",
        }
    }
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub templates: Environment<'static>,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let (event_tx, _) = broadcast::channel(256);
        let sessions = SessionStore::new(SessionSettings::from(&config));

        let mut templates = Environment::new();
        templates.add_template("wizard.html", WIZARD_TEMPLATE)?;

        Ok(Self { config, sessions, templates, event_tx })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    /// Fire-and-forget; having no subscribers is not an error.
    pub fn publish(&self, event: AppEvent) {
        let _ = self.event_tx.send(event);
    }
}

pub type SharedState = Arc<AppState>;
