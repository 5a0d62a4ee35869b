use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quiz_core::model::{
    AnswerSheet, AnswerValue, Category, Difficulty, ModeConfig, Question, QuestionId,
    QuestionSource, QuizId, QuizMode, UserStats,
};

use crate::auth::AuthToken;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by quiz service adapters.
///
/// No adapter retries anything: every failure is reported once and the caller
/// decides whether it is fatal (quiz entry) or a notification (answer relay).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("authentication rejected")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("quiz service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("quiz service returned an empty question list")]
    EmptyQuiz,

    #[error("quiz service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

/// Body of `POST /quiz/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStartRequest {
    pub mode: QuizMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_count: Option<u32>,
}

impl QuizStartRequest {
    /// Flatten a mode configuration into the request the service expects.
    ///
    /// Review mode carries no catalog filters; the service derives the
    /// question set from the user's miss history.
    #[must_use]
    pub fn from_config(config: &ModeConfig) -> Self {
        let (category, difficulty) = match config.source() {
            QuestionSource::Catalog {
                category,
                difficulty,
            } => (*category, *difficulty),
            QuestionSource::MissedQuestions => (None, None),
        };

        Self {
            mode: config.mode(),
            category,
            difficulty,
            question_count: config.question_count(),
        }
    }
}

/// Response of `POST /quiz/start`: a fresh attempt id and its question set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizStartResponse {
    pub quiz_id: QuizId,
    pub questions: Vec<Question>,
    pub start_time: DateTime<Utc>,
}

/// Body of `POST /quiz/{id}/answer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub user_answer: AnswerValue,
}

/// Correctness feedback for one submitted answer.
///
/// Only surfaced to the user in modes with `show_feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One entry of the completion payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    pub user_answer: AnswerValue,
}

/// Body of `POST /quiz/{id}/finish`: the full answer set at completion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizCompletion {
    pub end_time: DateTime<Utc>,
    pub answers: Vec<SubmittedAnswer>,
}

impl QuizCompletion {
    /// Snapshot an answer sheet into the wire shape, ordered by the given
    /// question sequence so the service sees display order.
    #[must_use]
    pub fn from_sheet(
        end_time: DateTime<Utc>,
        questions: &[Question],
        sheet: &AnswerSheet,
    ) -> Self {
        let answers = questions
            .iter()
            .filter_map(|question| {
                sheet.get(question.id()).map(|answer| SubmittedAnswer {
                    question_id: question.id(),
                    user_answer: answer.clone(),
                })
            })
            .collect();

        Self { end_time, answers }
    }
}

//
// ─── BACKEND CONTRACT ──────────────────────────────────────────────────────────
//

/// The remote Quiz Service, seen from the session engine.
///
/// Credentials are threaded through every call instead of living in
/// process-wide state, so two views with different tokens can coexist.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// Open a new quiz attempt and fetch its ordered question set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on any service failure; callers treat this as
    /// fatal for quiz entry.
    async fn start_quiz(
        &self,
        token: &AuthToken,
        request: &QuizStartRequest,
    ) -> Result<QuizStartResponse, ApiError>;

    /// Relay one answer for immediate correctness feedback.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on failure; callers keep their local record and
    /// surface the failure as a notification.
    async fn submit_answer(
        &self,
        token: &AuthToken,
        quiz_id: QuizId,
        submission: &AnswerSubmission,
    ) -> Result<AnswerFeedback, ApiError>;

    /// Notify the service that an attempt finished. Best-effort: local
    /// scoring never depends on this call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn finish_quiz(
        &self,
        token: &AuthToken,
        quiz_id: QuizId,
        completion: &QuizCompletion,
    ) -> Result<(), ApiError>;

    /// Fetch the user's lifetime statistics for the progress views.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on failure.
    async fn fetch_stats(&self, token: &AuthToken) -> Result<UserStats, ApiError>;
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionType, EXAM_QUESTION_COUNT};
    use quiz_core::time::fixed_now;

    #[test]
    fn exam_request_carries_count_but_no_filters() {
        let request = QuizStartRequest::from_config(&ModeConfig::exam());
        assert_eq!(request.mode, QuizMode::Exam);
        assert_eq!(request.question_count, Some(EXAM_QUESTION_COUNT));
        assert_eq!(request.category, None);
    }

    #[test]
    fn review_request_drops_catalog_filters() {
        let config = ModeConfig::review();
        let request = QuizStartRequest::from_config(&config);
        assert_eq!(request.mode, QuizMode::Review);
        assert_eq!(request.category, None);
        assert_eq!(request.difficulty, None);
    }

    #[test]
    fn practice_filters_reach_the_wire() {
        let config = ModeConfig::practice()
            .with_category(Category::Themes)
            .with_difficulty(Difficulty::Hard);
        let json = serde_json::to_value(QuizStartRequest::from_config(&config)).unwrap();
        assert_eq!(json["category"], "temas");
        assert_eq!(json["difficulty"], "hard");
    }

    #[test]
    fn completion_preserves_display_order() {
        let q1 = Question::new(
            QuestionId::generate(),
            QuestionType::Boolean,
            Category::Characters,
            Difficulty::Easy,
            "P1",
            Vec::new(),
            Some(AnswerValue::Bool(true)),
            "",
        )
        .unwrap();
        let q2 = Question::new(
            QuestionId::generate(),
            QuestionType::Boolean,
            Category::Themes,
            Difficulty::Easy,
            "P2",
            Vec::new(),
            Some(AnswerValue::Bool(false)),
            "",
        )
        .unwrap();

        let mut sheet = AnswerSheet::new();
        // recorded out of order on purpose
        sheet.record(q2.id(), AnswerValue::Bool(false));
        sheet.record(q1.id(), AnswerValue::Bool(true));

        let completion =
            QuizCompletion::from_sheet(fixed_now(), &[q1.clone(), q2.clone()], &sheet);

        let ids: Vec<_> = completion
            .answers
            .iter()
            .map(|entry| entry.question_id)
            .collect();
        assert_eq!(ids, vec![q1.id(), q2.id()]);
    }
}
