use std::fmt;

use serde::{Deserialize, Serialize};

use super::session::QuizSession;

/// Opaque handle tying one respondent interaction to one stored session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub String);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage abstraction so the hosting layer decides how sessions are isolated
/// per respondent. The core never holds a process-wide singleton session.
pub trait SessionStore: Send + Sync {
    fn insert(&self, token: SessionToken, session: QuizSession) -> Result<(), StoreError>;
    fn fetch(&self, token: &SessionToken) -> Result<Option<QuizSession>, StoreError>;
    fn update(&self, token: &SessionToken, session: QuizSession) -> Result<(), StoreError>;
}

/// Error enumeration for session-store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
