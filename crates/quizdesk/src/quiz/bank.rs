use serde::Serialize;

/// A single multiple-choice question with a closed option set.
///
/// Fields stay private so every constructed question upholds the bank
/// invariants: at least two distinct options, and the correct option is one of
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_option: String,
}

impl Question {
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
    ) -> Result<Self, QuestionBankError> {
        let question = Self {
            prompt: prompt.into(),
            options,
            correct_option: correct_option.into(),
        };
        question.validate(0)?;
        Ok(question)
    }

    fn validate(&self, index: usize) -> Result<(), QuestionBankError> {
        if self.options.len() < 2 {
            return Err(QuestionBankError::TooFewOptions { index });
        }
        for (position, option) in self.options.iter().enumerate() {
            if self.options[..position].contains(option) {
                return Err(QuestionBankError::DuplicateOption {
                    index,
                    option: option.clone(),
                });
            }
        }
        if !self.options.contains(&self.correct_option) {
            return Err(QuestionBankError::CorrectOptionMissing {
                index,
                option: self.correct_option.clone(),
            });
        }
        Ok(())
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }

    pub fn is_correct(&self, given: &str) -> bool {
        given == self.correct_option
    }

    /// Projection safe to hand to the presentation layer: no correct answer.
    pub fn to_view(&self, index: usize) -> QuestionView {
        QuestionView {
            index,
            prompt: self.prompt.clone(),
            options: self.options.clone(),
        }
    }
}

/// Sanitized question representation served to respondents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<String>,
}

/// Ordered, immutable set of questions shared read-only across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        for (index, question) in questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(Self { questions })
    }

    /// The built-in rhetorical-appeals quiz served by the form.
    pub fn standard() -> Self {
        let questions = vec![
            Question {
                prompt: "Which rhetorical appeal focuses on credibility?".to_string(),
                options: string_options(&["Ethos", "Pathos", "Logos"]),
                correct_option: "Ethos".to_string(),
            },
            Question {
                prompt: "Which appeal is based on emotion?".to_string(),
                options: string_options(&["Logos", "Ethos", "Pathos"]),
                correct_option: "Pathos".to_string(),
            },
            Question {
                prompt: "Statistics and evidence mainly appeal to:".to_string(),
                options: string_options(&["Pathos", "Logos", "Ethos"]),
                correct_option: "Logos".to_string(),
            },
        ];

        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn views(&self) -> Vec<QuestionView> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| question.to_view(index))
            .collect()
    }
}

fn string_options(options: &[&str]) -> Vec<String> {
    options.iter().map(|option| option.to_string()).collect()
}

/// Violations of the question-bank invariants.
#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("question bank must contain at least one question")]
    Empty,
    #[error("question {index} needs at least two options")]
    TooFewOptions { index: usize },
    #[error("question {index} lists duplicate option '{option}'")]
    DuplicateOption { index: usize, option: String },
    #[error("correct option '{option}' is not offered by question {index}")]
    CorrectOptionMissing { index: usize, option: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bank_satisfies_invariants() {
        let bank = QuestionBank::standard();
        assert_eq!(bank.len(), 3);
        QuestionBank::new(bank.questions.clone()).expect("standard bank revalidates");
    }

    #[test]
    fn rejects_correct_option_outside_choices() {
        let err = Question::new(
            "Pick one",
            string_options(&["A", "B"]),
            "C",
        )
        .expect_err("correct option must be offered");
        assert!(matches!(
            err,
            QuestionBankError::CorrectOptionMissing { index: 0, .. }
        ));
    }

    #[test]
    fn rejects_duplicate_options() {
        let err = Question::new(
            "Pick one",
            string_options(&["A", "B", "A"]),
            "B",
        )
        .expect_err("duplicates rejected");
        assert!(matches!(err, QuestionBankError::DuplicateOption { .. }));
    }

    #[test]
    fn rejects_single_option_question() {
        let err = Question::new("Pick one", string_options(&["A"]), "A")
            .expect_err("single option rejected");
        assert!(matches!(err, QuestionBankError::TooFewOptions { index: 0 }));
    }

    #[test]
    fn rejects_empty_bank() {
        assert!(matches!(
            QuestionBank::new(Vec::new()),
            Err(QuestionBankError::Empty)
        ));
    }

    #[test]
    fn views_omit_correct_answers() {
        let views = QuestionBank::standard().views();
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].index, 0);
        let serialized = serde_json::to_string(&views).expect("views serialize");
        assert!(!serialized.contains("correct"));
    }
}
