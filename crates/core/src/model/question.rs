use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised while validating a question received from the quiz service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("multiple-choice question needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("correct answer index {index} is out of range for {options} options")]
    ChoiceOutOfRange { index: usize, options: usize },

    #[error("correct answer type does not match question type")]
    AnswerTypeMismatch,

    #[error("essay questions carry no automatic correct answer")]
    EssayWithAnswer,
}

//
// ─── ENUMS ─────────────────────────────────────────────────────────────────────
//

/// How a question is answered and scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Pick one option by index.
    Multiple,
    /// True / false.
    Boolean,
    /// Free text; excluded from automatic scoring.
    Essay,
}

/// Thematic category of a question.
///
/// Wire names are the Spanish labels the quiz service uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "personajes")]
    Characters,
    #[serde(rename = "temas")]
    Themes,
    #[serde(rename = "simbolismo")]
    Symbolism,
}

impl Category {
    /// All categories, in the order the progress views list them.
    pub const ALL: [Category; 3] = [Category::Characters, Category::Themes, Category::Symbolism];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

//
// ─── ANSWER VALUE ──────────────────────────────────────────────────────────────
//

/// A submitted answer. The shape depends on the question type: an option
/// index for multiple choice, a boolean for true/false, free text for essays.
///
/// Serialized untagged to match the service's `int | bool | string` union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Choice(usize),
    Text(String),
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<usize> for AnswerValue {
    fn from(value: usize) -> Self {
        AnswerValue::Choice(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single quiz question, immutable once fetched.
///
/// The correct-answer reference is `None` for essays, which are graded
/// manually and never counted by the automatic scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    #[serde(rename = "type")]
    question_type: QuestionType,
    category: Category,
    difficulty: Difficulty,
    #[serde(rename = "question")]
    prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_answer: Option<AnswerValue>,
    explanation: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt is empty, a multiple-choice
    /// question has fewer than two options or a correct index out of range,
    /// the correct answer type does not match the question type, or an essay
    /// carries an automatic correct answer.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestionId,
        question_type: QuestionType,
        category: Category,
        difficulty: Difficulty,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: Option<AnswerValue>,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        match (question_type, &correct_answer) {
            (QuestionType::Multiple, Some(AnswerValue::Choice(index))) => {
                if options.len() < 2 {
                    return Err(QuestionError::TooFewOptions(options.len()));
                }
                if *index >= options.len() {
                    return Err(QuestionError::ChoiceOutOfRange {
                        index: *index,
                        options: options.len(),
                    });
                }
            }
            (QuestionType::Boolean, Some(AnswerValue::Bool(_))) => {}
            (QuestionType::Essay, None) => {}
            (QuestionType::Essay, Some(_)) => return Err(QuestionError::EssayWithAnswer),
            _ => return Err(QuestionError::AnswerTypeMismatch),
        }

        Ok(Self {
            id,
            question_type,
            category,
            difficulty,
            prompt,
            options,
            correct_answer,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> Option<&AnswerValue> {
        self.correct_answer.as_ref()
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Check a submitted answer against the correct reference.
    ///
    /// Exact-match equality for multiple-choice and boolean questions.
    /// Returns `None` for essays, which cannot be checked automatically.
    #[must_use]
    pub fn check(&self, answer: &AnswerValue) -> Option<bool> {
        match self.question_type {
            QuestionType::Essay => None,
            QuestionType::Multiple | QuestionType::Boolean => {
                Some(self.correct_answer.as_ref() == Some(answer))
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
