use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use quizdesk::quiz::{QuizSession, SessionStore, SessionToken, StoreError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One isolated session per token; the hosting process keeps them only for
/// its own lifetime, matching the no-persistence contract.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionToken, QuizSession>>>,
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, token: SessionToken, session: QuizSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&token) {
            return Err(StoreError::Conflict);
        }
        guard.insert(token, session);
        Ok(())
    }

    fn fetch(&self, token: &SessionToken) -> Result<Option<QuizSession>, StoreError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    fn update(&self, token: &SessionToken, session: QuizSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(token) {
            guard.insert(token.clone(), session);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
