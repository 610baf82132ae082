use std::collections::BTreeMap;

use serde::Serialize;

use super::bank::QuestionBank;

/// Percentage at or above which a submission counts as passed.
pub const PASS_THRESHOLD: f64 = 70.0;

/// Counts exact matches between recorded answers and the bank's correct
/// options. Total over any answers mapping: missing indices simply score 0, so
/// the engine can be called defensively on incomplete data.
pub fn score(answers: &BTreeMap<usize, String>, bank: &QuestionBank) -> u32 {
    bank.iter()
        .enumerate()
        .filter(|(index, question)| {
            answers
                .get(index)
                .is_some_and(|given| question.is_correct(given))
        })
        .count() as u32
}

/// Score as a percentage of the question count. An empty bank yields 0.0
/// rather than dividing by zero.
pub fn percentage(score: u32, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * f64::from(score) / total as f64
}

/// Pass/fail verdict derived from the percentage. The boundary is exact:
/// 70.0 itself passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    Passed,
    ReviewNeeded,
}

impl PassStatus {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= PASS_THRESHOLD {
            PassStatus::Passed
        } else {
            PassStatus::ReviewNeeded
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PassStatus::Passed => "Passed",
            PassStatus::ReviewNeeded => "Review Needed",
        }
    }

    pub const fn marker(self) -> &'static str {
        match self {
            PassStatus::Passed => "\u{2713}",
            PassStatus::ReviewNeeded => "\u{2717}",
        }
    }
}
