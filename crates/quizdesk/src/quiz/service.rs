use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use super::bank::{QuestionBank, QuestionView};
use super::notify::{DeliveryOutcome, ReportNotifier};
use super::report::{CsvExport, ExportError, QuizReport};
use super::scoring::{self, PassStatus};
use super::session::{QuizSession, SessionError, SessionPhase};
use super::store::{SessionStore, SessionToken, StoreError};

/// Facade composing the question bank, session store, and notifier.
///
/// The store seam keeps one isolated session per respondent interaction; the
/// notifier runs exactly once per successful submit, after the state
/// transition is persisted, so a delivery failure can never roll it back.
pub struct QuizService<S, N> {
    bank: Arc<QuestionBank>,
    store: Arc<S>,
    notifier: Arc<N>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_token() -> SessionToken {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionToken(format!("quiz-{id:06}"))
}

impl<S, N> QuizService<S, N>
where
    S: SessionStore + 'static,
    N: ReportNotifier + 'static,
{
    pub fn new(bank: QuestionBank, store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            bank: Arc::new(bank),
            store,
            notifier,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Sanitized question list for the presentation layer.
    pub fn questions(&self) -> Vec<QuestionView> {
        self.bank.views()
    }

    /// Opens a new session for the named respondent and hands back its token.
    pub fn start(&self, respondent_name: &str) -> Result<SessionSnapshot, ServiceError> {
        let mut session = QuizSession::new();
        session.start(respondent_name)?;

        let token = next_session_token();
        self.store.insert(token.clone(), session.clone())?;
        info!(%token, "quiz session started");
        Ok(self.snapshot(token, &session))
    }

    pub fn record_answer(
        &self,
        token: &SessionToken,
        index: usize,
        option: &str,
    ) -> Result<SessionSnapshot, ServiceError> {
        let mut session = self.fetch(token)?;
        session.record_answer(&self.bank, index, option)?;
        self.store.update(token, session.clone())?;
        Ok(self.snapshot(token.clone(), &session))
    }

    /// Scores and freezes the session, then dispatches the report. The
    /// delivery outcome rides along in the receipt so callers branch on it
    /// explicitly; `Failed` is a warning, never an error.
    pub fn submit(
        &self,
        token: &SessionToken,
        now: NaiveDateTime,
    ) -> Result<SubmissionReceipt, ServiceError> {
        let mut session = self.fetch(token)?;
        let score = session.submit(&self.bank)?;
        self.store.update(token, session.clone())?;

        let report = QuizReport::from_session(&session, &self.bank, now);
        let delivery = self.notifier.notify(&report);
        match &delivery {
            DeliveryOutcome::Failed(reason) => {
                warn!(%token, %reason, "submission stored, report delivery failed");
            }
            outcome => {
                info!(%token, outcome = outcome.label(), "submission stored");
            }
        }

        Ok(SubmissionReceipt {
            session_token: token.clone(),
            respondent_name: report.respondent_name.clone(),
            score,
            total_questions: self.bank.len(),
            percentage: report.percentage,
            percentage_display: report.percentage_display(),
            status: report.status,
            delivery,
        })
    }

    /// Retake: clears the stored session back to its pre-start state.
    pub fn reset(&self, token: &SessionToken) -> Result<SessionSnapshot, ServiceError> {
        let mut session = self.fetch(token)?;
        session.reset();
        self.store.update(token, session.clone())?;
        Ok(self.snapshot(token.clone(), &session))
    }

    /// Read accessor the presentation layer uses to pick a view.
    pub fn session(&self, token: &SessionToken) -> Result<SessionSnapshot, ServiceError> {
        let session = self.fetch(token)?;
        Ok(self.snapshot(token.clone(), &session))
    }

    /// Report projection for display; total over unsubmitted sessions too.
    pub fn report(
        &self,
        token: &SessionToken,
        now: NaiveDateTime,
    ) -> Result<QuizReport, ServiceError> {
        let session = self.fetch(token)?;
        Ok(QuizReport::from_session(&session, &self.bank, now))
    }

    pub fn export_csv(
        &self,
        token: &SessionToken,
        now: NaiveDateTime,
    ) -> Result<CsvExport, ServiceError> {
        let report = self.report(token, now)?;
        Ok(report.to_csv()?)
    }

    fn fetch(&self, token: &SessionToken) -> Result<QuizSession, ServiceError> {
        self.store
            .fetch(token)?
            .ok_or_else(|| ServiceError::UnknownSession(token.clone()))
    }

    fn snapshot(&self, token: SessionToken, session: &QuizSession) -> SessionSnapshot {
        SessionSnapshot {
            session_token: token,
            respondent_name: session.respondent().map(str::to_string),
            phase: session.phase(),
            answered: session.answers().len(),
            total_questions: self.bank.len(),
            answers: session.answers().clone(),
            score: session.score(),
            percentage: session
                .score()
                .map(|score| scoring::percentage(score, self.bank.len())),
        }
    }
}

/// Serializable view of the stored session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_token: SessionToken,
    pub respondent_name: Option<String>,
    pub phase: SessionPhase,
    pub answered: usize,
    pub total_questions: usize,
    pub answers: BTreeMap<usize, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

/// Outcome of a successful submit, including how report delivery went.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub session_token: SessionToken,
    pub respondent_name: String,
    pub score: u32,
    pub total_questions: usize,
    pub percentage: f64,
    pub percentage_display: String,
    pub status: PassStatus,
    pub delivery: DeliveryOutcome,
}

/// Error raised by the quiz service facade.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("unknown session '{0}'")]
    UnknownSession(SessionToken),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
