use serde::{Deserialize, Serialize};

use crate::model::question::{Category, Difficulty};

/// Mode tag the quiz service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    Practice,
    Exam,
    Review,
}

/// Where the service should draw questions from when a quiz starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    /// The full catalog, optionally narrowed by category and difficulty.
    Catalog {
        category: Option<Category>,
        difficulty: Option<Difficulty>,
    },
    /// Questions the user previously answered incorrectly.
    MissedQuestions,
}

/// Exam mode countdown, in seconds (30 minutes).
pub const EXAM_TIME_LIMIT_SECS: u32 = 1800;

/// Number of questions drawn for an exam.
pub const EXAM_QUESTION_COUNT: u32 = 20;

/// The three orthogonal behaviors the practice/exam/review tag controls:
/// timer presence, explanation visibility, and question source.
///
/// Components branch on these named fields instead of comparing mode strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeConfig {
    mode: QuizMode,
    time_limit: Option<u32>,
    show_feedback: bool,
    source: QuestionSource,
    question_count: Option<u32>,
}

impl ModeConfig {
    /// Untimed, immediate feedback, drawn from the full catalog.
    #[must_use]
    pub fn practice() -> Self {
        Self {
            mode: QuizMode::Practice,
            time_limit: None,
            show_feedback: true,
            source: QuestionSource::Catalog {
                category: None,
                difficulty: None,
            },
            question_count: None,
        }
    }

    /// Timed (30 minutes), no feedback, 20 random questions.
    #[must_use]
    pub fn exam() -> Self {
        Self {
            mode: QuizMode::Exam,
            time_limit: Some(EXAM_TIME_LIMIT_SECS),
            show_feedback: false,
            source: QuestionSource::Catalog {
                category: None,
                difficulty: None,
            },
            question_count: Some(EXAM_QUESTION_COUNT),
        }
    }

    /// Untimed, no feedback, sourced from previously missed questions.
    #[must_use]
    pub fn review() -> Self {
        Self {
            mode: QuizMode::Review,
            time_limit: None,
            show_feedback: false,
            source: QuestionSource::MissedQuestions,
            question_count: None,
        }
    }

    /// Narrow the catalog to a category (practice mode filter).
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        if let QuestionSource::Catalog {
            category: slot, ..
        } = &mut self.source
        {
            *slot = Some(category);
        }
        self
    }

    /// Narrow the catalog to a difficulty (practice mode filter).
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        if let QuestionSource::Catalog {
            difficulty: slot, ..
        } = &mut self.source
        {
            *slot = Some(difficulty);
        }
        self
    }

    /// Override how many questions the service should draw.
    #[must_use]
    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = Some(count);
        self
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    /// Countdown length in seconds; `None` when untimed.
    #[must_use]
    pub fn time_limit(&self) -> Option<u32> {
        self.time_limit
    }

    /// Whether correctness and explanation are surfaced right after answering.
    #[must_use]
    pub fn show_feedback(&self) -> bool {
        self.show_feedback
    }

    #[must_use]
    pub fn source(&self) -> &QuestionSource {
        &self.source
    }

    #[must_use]
    pub fn question_count(&self) -> Option<u32> {
        self.question_count
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exam_is_timed_without_feedback() {
        let config = ModeConfig::exam();
        assert_eq!(config.time_limit(), Some(EXAM_TIME_LIMIT_SECS));
        assert!(!config.show_feedback());
        assert_eq!(config.question_count(), Some(EXAM_QUESTION_COUNT));
    }

    #[test]
    fn practice_is_untimed_with_feedback() {
        let config = ModeConfig::practice();
        assert_eq!(config.time_limit(), None);
        assert!(config.show_feedback());
    }

    #[test]
    fn review_draws_from_missed_questions_without_feedback() {
        let config = ModeConfig::review();
        assert_eq!(*config.source(), QuestionSource::MissedQuestions);
        assert_eq!(config.time_limit(), None);
        assert!(!config.show_feedback());
    }

    #[test]
    fn catalog_filters_apply_only_to_catalog_source() {
        let practice = ModeConfig::practice().with_category(Category::Themes);
        assert_eq!(
            *practice.source(),
            QuestionSource::Catalog {
                category: Some(Category::Themes),
                difficulty: None,
            }
        );

        let review = ModeConfig::review().with_category(Category::Themes);
        assert_eq!(*review.source(), QuestionSource::MissedQuestions);
    }

    #[test]
    fn mode_tag_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&QuizMode::Exam).unwrap(), "\"exam\"");
    }
}
