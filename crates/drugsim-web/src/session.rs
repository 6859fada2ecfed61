//! Per-browser session store.
//!
//! Each session owns one wizard controller and its panels. Sessions idle past
//! the TTL are evicted on access; the store never holds more than
//! `max_sessions` entries (least recently seen goes first).
//!
//! The controller lock is held for the whole of a prediction, so a session
//! also keeps a lock-free busy flag and the snapshot taken when the
//! prediction started. Readers use those while the lock is taken.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use drugsim_common::Variant;
use drugsim_model::ModelConfig;
use drugsim_molecules::prediction::predictor_for;
use drugsim_molecules::randomizer::Randomizer;
use drugsim_molecules::wizard::{WizardController, WizardSnapshot};

use crate::config::Config;
use crate::panels::Panels;

/// Everything needed to start a fresh session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub variant: Variant,
    pub seed: Option<u64>,
    pub model: ModelConfig,
    pub ttl: Duration,
    pub max_sessions: usize,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        let mut model = config.model.clone();
        if model.seed.is_none() {
            model.seed = config.simulation.seed;
        }
        Self {
            variant: config.simulation.variant,
            seed: config.simulation.seed,
            model,
            ttl: config.sessions.ttl(),
            max_sessions: config.sessions.max_sessions,
        }
    }
}

pub struct SessionInner {
    pub controller: WizardController,
    pub panels: Panels,
}

pub struct Session {
    pub id: Uuid,
    pub inner: Mutex<SessionInner>,
    last_seen: StdMutex<Instant>,
    busy: AtomicBool,
    busy_snapshot: StdMutex<Option<WizardSnapshot>>,
}

/// Marks a session busy until dropped.
pub struct BusyGuard<'a> {
    session: &'a Session,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.session.busy_snapshot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        self.session.busy.store(false, Ordering::Release);
    }
}

impl Session {
    fn new(id: Uuid, settings: &SessionSettings) -> Self {
        let controller = WizardController::new(
            settings.variant,
            predictor_for(settings.variant, settings.model.clone()),
            Randomizer::new(settings.seed),
        );
        Self {
            id,
            inner: Mutex::new(SessionInner { controller, panels: Panels::default() }),
            last_seen: StdMutex::new(Instant::now()),
            busy: AtomicBool::new(false),
            busy_snapshot: StdMutex::new(None),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Publish `snapshot` as the session's state until the guard drops.
    /// Actions are shown as unavailable while busy.
    pub fn mark_busy(&self, mut snapshot: WizardSnapshot) -> BusyGuard<'_> {
        snapshot.busy = true;
        snapshot.can_create = false;
        snapshot.can_proceed = false;
        snapshot.can_test = false;
        *self.busy_snapshot.lock().unwrap_or_else(|e| e.into_inner()) = Some(snapshot);
        self.busy.store(true, Ordering::Release);
        BusyGuard { session: self }
    }

    /// Snapshot recorded by [`Session::mark_busy`], if a prediction is running.
    pub fn busy_snapshot(&self) -> Option<WizardSnapshot> {
        if !self.is_busy() {
            return None;
        }
        self.busy_snapshot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen.lock().unwrap_or_else(|e| e.into_inner()).elapsed()
    }
}

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
    settings: SessionSettings,
}

impl SessionStore {
    pub fn new(settings: SessionSettings) -> Self {
        Self { sessions: RwLock::new(HashMap::new()), settings }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Existing live session for `id`, or a new one. The flag is true when
    /// the session was just created.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Arc<Session>, bool) {
        if let Some(id) = id {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(&id) {
                if session.idle_for() <= self.settings.ttl {
                    session.touch();
                    return (Arc::clone(session), false);
                }
            }
        }

        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions);

        let id = Uuid::new_v4();
        let session = Arc::new(Session::new(id, &self.settings));
        sessions.insert(id, Arc::clone(&session));
        info!("Started {} session {} ({} live)", self.settings.variant, id, sessions.len());
        (session, true)
    }

    fn evict(&self, sessions: &mut HashMap<Uuid, Arc<Session>>) {
        let ttl = self.settings.ttl;
        let before = sessions.len();
        sessions.retain(|_, s| s.idle_for() <= ttl);

        while sessions.len() >= self.settings.max_sessions {
            let oldest = sessions
                .iter()
                .max_by_key(|(_, s)| s.idle_for())
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        if sessions.len() < before {
            debug!("Evicted {} idle sessions", before - sessions.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(ttl: Duration, max_sessions: usize) -> SessionSettings {
        SessionSettings {
            variant: Variant::Basic,
            seed: Some(1),
            model: ModelConfig::default(),
            ttl,
            max_sessions,
        }
    }

    #[tokio::test]
    async fn test_known_id_returns_same_session() {
        let store = SessionStore::new(settings(Duration::from_secs(60), 8));
        let (first, created) = store.get_or_create(None).await;
        assert!(created);

        let (again, created) = store.get_or_create(Some(first.id)).await;
        assert!(!created);
        assert_eq!(again.id, first.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_starts_fresh_session() {
        let store = SessionStore::new(settings(Duration::from_secs(60), 8));
        let stranger = Uuid::new_v4();
        let (session, created) = store.get_or_create(Some(stranger)).await;
        assert!(created);
        assert_ne!(session.id, stranger);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recent() {
        let store = SessionStore::new(settings(Duration::from_secs(60), 2));
        let (a, _) = store.get_or_create(None).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let (b, _) = store.get_or_create(None).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let (_c, _) = store.get_or_create(None).await;

        assert_eq!(store.len().await, 2);
        let (b_again, created) = store.get_or_create(Some(b.id)).await;
        assert!(!created);
        assert_eq!(b_again.id, b.id);
        let (_, created) = store.get_or_create(Some(a.id)).await;
        assert!(created, "oldest session should have been evicted");
    }

    #[tokio::test]
    async fn test_expired_session_is_replaced() {
        let store = SessionStore::new(settings(Duration::from_millis(1), 8));
        let (a, _) = store.get_or_create(None).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let (b, created) = store.get_or_create(Some(a.id)).await;
        assert!(created);
        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_busy_snapshot_lives_as_long_as_guard() {
        let store = SessionStore::new(settings(Duration::from_secs(60), 8));
        let (session, _) = store.get_or_create(None).await;
        assert!(session.busy_snapshot().is_none());

        let snapshot = session.inner.lock().await.controller.snapshot();
        {
            let _guard = session.mark_busy(snapshot);
            assert!(session.is_busy());
            let busy = session.busy_snapshot().unwrap();
            assert!(busy.busy);
            assert!(!busy.can_create && !busy.can_test);
        }
        assert!(!session.is_busy());
        assert!(session.busy_snapshot().is_none());
    }

    #[test]
    fn test_settings_share_simulation_seed_with_model() {
        let mut config = Config::default();
        config.simulation.seed = Some(77);
        let s = SessionSettings::from(&config);
        assert_eq!(s.seed, Some(77));
        assert_eq!(s.model.seed, Some(77));
    }
}
