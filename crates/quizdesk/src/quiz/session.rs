use std::collections::BTreeMap;

use serde::Serialize;

use super::bank::QuestionBank;
use super::scoring;

/// Lifecycle phase of a [`QuizSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Empty,
    InProgress,
    Submitted,
}

impl SessionPhase {
    pub const fn label(self) -> &'static str {
        match self {
            SessionPhase::Empty => "empty",
            SessionPhase::InProgress => "in_progress",
            SessionPhase::Submitted => "submitted",
        }
    }
}

/// Mutable record of one respondent's attempt.
///
/// The hosting layer owns exactly one instance per respondent interaction;
/// nothing here is shared across respondents. Answers are keyed by question
/// index and frozen once the session is submitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuizSession {
    respondent: Option<String>,
    answers: BTreeMap<usize, String>,
    score: Option<u32>,
    submitted: bool,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifies the respondent. From `InProgress` this only updates the name
    /// (the form's name input stays live while answering); recorded answers are
    /// kept.
    pub fn start(&mut self, respondent_name: &str) -> Result<(), SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        let trimmed = respondent_name.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyRespondentName);
        }
        self.respondent = Some(trimmed.to_string());
        Ok(())
    }

    /// Records the selected option for one question, overwriting any earlier
    /// selection for the same index.
    pub fn record_answer(
        &mut self,
        bank: &QuestionBank,
        index: usize,
        option: &str,
    ) -> Result<(), SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        if self.respondent.is_none() {
            return Err(SessionError::NotStarted);
        }
        let question = bank
            .question(index)
            .ok_or_else(|| SessionError::QuestionOutOfRange {
                index,
                total: bank.len(),
            })?;
        if !question.offers(option) {
            return Err(SessionError::UnknownOption {
                index,
                option: option.to_string(),
            });
        }
        self.answers.insert(index, option.to_string());
        Ok(())
    }

    /// One-way transition into `Submitted`. Requires every question answered;
    /// on success the score is computed and the answers freeze.
    pub fn submit(&mut self, bank: &QuestionBank) -> Result<u32, SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        if self.respondent.is_none() {
            return Err(SessionError::NotStarted);
        }
        let total = bank.len();
        let answered = self.answers.len();
        if answered < total {
            return Err(SessionError::IncompleteSubmission {
                missing: total - answered,
                total,
            });
        }

        let score = scoring::score(&self.answers, bank);
        self.score = Some(score);
        self.submitted = true;
        Ok(score)
    }

    /// Clears everything back to the pre-`start` state, including the
    /// respondent name. Permitted from any phase.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self) -> SessionPhase {
        if self.submitted {
            SessionPhase::Submitted
        } else if self.respondent.is_some() {
            SessionPhase::InProgress
        } else {
            SessionPhase::Empty
        }
    }

    pub fn respondent(&self) -> Option<&str> {
        self.respondent.as_deref()
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn score(&self) -> Option<u32> {
        self.score
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }
}

/// Caller-correctable failures of session operations. None of these mutate the
/// session they were raised from.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("respondent name must not be empty")]
    EmptyRespondentName,
    #[error("no respondent has started this session")]
    NotStarted,
    #[error("question {index} does not exist (quiz has {total} questions)")]
    QuestionOutOfRange { index: usize, total: usize },
    #[error("'{option}' is not one of the offered choices for question {index}")]
    UnknownOption { index: usize, option: String },
    #[error("{missing} of {total} questions still unanswered")]
    IncompleteSubmission { missing: usize, total: usize },
    #[error("session was already submitted")]
    AlreadySubmitted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> QuestionBank {
        QuestionBank::standard()
    }

    fn started() -> QuizSession {
        let mut session = QuizSession::new();
        session.start("Jordan Ellis").expect("start succeeds");
        session
    }

    #[test]
    fn fresh_session_is_empty() {
        let session = QuizSession::new();
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.respondent().is_none());
        assert!(session.answers().is_empty());
        assert!(session.score().is_none());
    }

    #[test]
    fn start_rejects_blank_names() {
        let mut session = QuizSession::new();
        assert_eq!(session.start(""), Err(SessionError::EmptyRespondentName));
        assert_eq!(session.start("   "), Err(SessionError::EmptyRespondentName));
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn start_trims_and_moves_to_in_progress() {
        let mut session = QuizSession::new();
        session.start("  Jordan Ellis  ").expect("start succeeds");
        assert_eq!(session.respondent(), Some("Jordan Ellis"));
        assert_eq!(session.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn restart_updates_name_and_keeps_answers() {
        let bank = bank();
        let mut session = started();
        session
            .record_answer(&bank, 0, "Ethos")
            .expect("answer records");
        session.start("J. Ellis").expect("rename succeeds");
        assert_eq!(session.respondent(), Some("J. Ellis"));
        assert_eq!(session.answer(0), Some("Ethos"));
    }

    #[test]
    fn record_answer_requires_start() {
        let bank = bank();
        let mut session = QuizSession::new();
        assert_eq!(
            session.record_answer(&bank, 0, "Ethos"),
            Err(SessionError::NotStarted)
        );
    }

    #[test]
    fn record_answer_validates_index_and_option() {
        let bank = bank();
        let mut session = started();
        assert_eq!(
            session.record_answer(&bank, 9, "Ethos"),
            Err(SessionError::QuestionOutOfRange { index: 9, total: 3 })
        );
        assert_eq!(
            session.record_answer(&bank, 0, "Kairos"),
            Err(SessionError::UnknownOption {
                index: 0,
                option: "Kairos".to_string()
            })
        );
        assert!(session.answers().is_empty());
    }

    #[test]
    fn reselection_is_idempotent() {
        let bank = bank();
        let mut session = started();
        session
            .record_answer(&bank, 0, "Pathos")
            .expect("first selection");
        let once = session.answers().clone();
        session
            .record_answer(&bank, 0, "Pathos")
            .expect("re-selection");
        assert_eq!(session.answers(), &once);

        session
            .record_answer(&bank, 0, "Ethos")
            .expect("overwrite selection");
        assert_eq!(session.answer(0), Some("Ethos"));
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn submit_rejects_every_incomplete_subset() {
        let bank = bank();
        // Every non-empty proper subset of answered indices still fails.
        for mask in 1u32..(1 << 3) - 1 {
            let mut session = started();
            for index in 0..3 {
                if mask & (1 << index) != 0 {
                    let option = bank
                        .question(index)
                        .expect("question exists")
                        .correct_option()
                        .to_string();
                    session
                        .record_answer(&bank, index, &option)
                        .expect("answer records");
                }
            }
            let answered = session.answers().len();
            let err = session.submit(&bank).expect_err("incomplete must fail");
            assert_eq!(
                err,
                SessionError::IncompleteSubmission {
                    missing: 3 - answered,
                    total: 3
                }
            );
            assert!(!session.is_submitted());
            assert_eq!(session.phase(), SessionPhase::InProgress);
        }
    }

    #[test]
    fn submit_scores_and_freezes() {
        let bank = bank();
        let mut session = started();
        session.record_answer(&bank, 0, "Ethos").expect("q1");
        session.record_answer(&bank, 1, "Logos").expect("q2");
        session.record_answer(&bank, 2, "Logos").expect("q3");

        let score = session.submit(&bank).expect("submit succeeds");
        assert_eq!(score, 2);
        assert_eq!(session.score(), Some(2));
        assert_eq!(session.phase(), SessionPhase::Submitted);

        assert_eq!(
            session.record_answer(&bank, 1, "Pathos"),
            Err(SessionError::AlreadySubmitted)
        );
        assert_eq!(session.submit(&bank), Err(SessionError::AlreadySubmitted));
        assert_eq!(session.score(), Some(2));
        assert_eq!(session.start("Someone Else"), Err(SessionError::AlreadySubmitted));
    }

    #[test]
    fn reset_returns_to_pristine_state() {
        let bank = bank();
        let mut session = started();
        session.record_answer(&bank, 0, "Ethos").expect("q1");
        session.record_answer(&bank, 1, "Pathos").expect("q2");
        session.record_answer(&bank, 2, "Logos").expect("q3");
        session.submit(&bank).expect("submit succeeds");

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.respondent().is_none());
        assert!(session.answers().is_empty());
        assert!(session.score().is_none());
        assert!(!session.is_submitted());
    }
}
