use chrono::NaiveDateTime;
use serde::Serialize;

use crate::quiz::bank::QuestionBank;
use crate::quiz::scoring::{self, PassStatus};
use crate::quiz::session::QuizSession;

/// Sentinel shown for questions with no recorded answer at format time.
pub const NOT_ANSWERED: &str = "Not answered";

/// Per-question line of the breakdown, aligned by zero-based index.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionOutcome {
    pub index: usize,
    pub prompt: String,
    pub given_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl QuestionOutcome {
    pub fn given_or_sentinel(&self) -> &str {
        self.given_answer.as_deref().unwrap_or(NOT_ANSWERED)
    }
}

/// Point-in-time projection of a session against the question bank.
///
/// Recomputed on demand, never cached; the timestamp is captured at format
/// time, so two exports of the same submission carry different stamps.
#[derive(Debug, Clone, Serialize)]
pub struct QuizReport {
    pub respondent_name: String,
    pub score: u32,
    pub total_questions: usize,
    pub percentage: f64,
    pub status: PassStatus,
    pub timestamp: NaiveDateTime,
    pub per_question: Vec<QuestionOutcome>,
}

impl QuizReport {
    /// Builds the breakdown for any session, submitted or not. Pre-submit the
    /// score is computed defensively over whatever answers exist.
    pub fn from_session(session: &QuizSession, bank: &QuestionBank, now: NaiveDateTime) -> Self {
        let score = session
            .score()
            .unwrap_or_else(|| scoring::score(session.answers(), bank));
        let percentage = scoring::percentage(score, bank.len());

        let per_question = bank
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let given_answer = session.answer(index).map(str::to_string);
                let is_correct = given_answer
                    .as_deref()
                    .is_some_and(|given| question.is_correct(given));
                QuestionOutcome {
                    index,
                    prompt: question.prompt().to_string(),
                    given_answer,
                    correct_answer: question.correct_option().to_string(),
                    is_correct,
                }
            })
            .collect();

        Self {
            respondent_name: session.respondent().unwrap_or_default().to_string(),
            score,
            total_questions: bank.len(),
            percentage,
            status: PassStatus::from_percentage(percentage),
            timestamp: now,
            per_question,
        }
    }

    /// Percentage to one decimal place, e.g. `66.7%`.
    pub fn percentage_display(&self) -> String {
        format!("{:.1}%", self.percentage)
    }

    pub fn timestamp_display(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 7)
            .expect("valid date")
            .and_hms_opt(14, 5, 9)
            .expect("valid time")
    }

    fn session_with(answers: &[(usize, &str)], submit: bool) -> (QuizSession, QuestionBank) {
        let bank = QuestionBank::standard();
        let mut session = QuizSession::new();
        session.start("Jordan Ellis").expect("start");
        for (index, option) in answers {
            session
                .record_answer(&bank, *index, option)
                .expect("answer records");
        }
        if submit {
            session.submit(&bank).expect("submit succeeds");
        }
        (session, bank)
    }

    #[test]
    fn submitted_session_projects_breakdown() {
        let (session, bank) =
            session_with(&[(0, "Ethos"), (1, "Logos"), (2, "Logos")], true);
        let report = QuizReport::from_session(&session, &bank, stamp());

        assert_eq!(report.respondent_name, "Jordan Ellis");
        assert_eq!(report.score, 2);
        assert_eq!(report.total_questions, 3);
        assert_eq!(report.percentage_display(), "66.7%");
        assert_eq!(report.status, PassStatus::ReviewNeeded);
        assert_eq!(report.timestamp_display(), "2026-08-07 14:05:09");

        assert_eq!(report.per_question.len(), 3);
        assert!(report.per_question[0].is_correct);
        assert!(!report.per_question[1].is_correct);
        assert_eq!(report.per_question[1].given_answer.as_deref(), Some("Logos"));
        assert_eq!(report.per_question[1].correct_answer, "Pathos");
    }

    #[test]
    fn unanswered_questions_use_sentinel() {
        let (session, bank) = session_with(&[(0, "Ethos")], false);
        let report = QuizReport::from_session(&session, &bank, stamp());

        assert_eq!(report.score, 1);
        assert_eq!(report.per_question[1].given_answer, None);
        assert_eq!(report.per_question[1].given_or_sentinel(), NOT_ANSWERED);
        assert!(!report.per_question[1].is_correct);
    }

    #[test]
    fn perfect_run_is_passed() {
        let (session, bank) =
            session_with(&[(0, "Ethos"), (1, "Pathos"), (2, "Logos")], true);
        let report = QuizReport::from_session(&session, &bank, stamp());
        assert_eq!(report.score, 3);
        assert_eq!(report.percentage_display(), "100.0%");
        assert_eq!(report.status, PassStatus::Passed);
    }
}
