use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use quiz_core::Clock;
use quiz_core::model::{Question, QuizId, QuizMode, UserStats};

use crate::api::{
    AnswerFeedback, AnswerSubmission, ApiError, QuizBackend, QuizCompletion, QuizStartRequest,
    QuizStartResponse,
};
use crate::auth::AuthToken;

#[derive(Default)]
struct BackendState {
    catalog: Vec<Question>,
    missed: Vec<Question>,
    stats: UserStats,
    clock: Clock,
    issued: HashMap<QuizId, Vec<Question>>,
    submissions: Vec<(QuizId, AnswerSubmission)>,
    completions: Vec<(QuizId, QuizCompletion)>,
    fail_start: bool,
    fail_submit: bool,
    fail_finish: bool,
}

/// In-memory quiz service for tests and prototyping.
///
/// Serves a configured catalog, checks submitted answers against it, and
/// records everything it is sent. Failure toggles simulate an unreachable
/// service so callers can exercise the fatal start path and the non-fatal
/// submit path.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<BackendState>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new(catalog: Vec<Question>) -> Self {
        let backend = Self::default();
        backend.with_state(|state| state.catalog = catalog);
        backend
    }

    /// Set the questions served to review-mode quizzes.
    pub fn set_missed(&self, missed: Vec<Question>) {
        self.with_state(|state| state.missed = missed);
    }

    pub fn set_stats(&self, stats: UserStats) {
        self.with_state(|state| state.stats = stats);
    }

    /// Pin the clock that stamps `start_time` on issued quizzes.
    pub fn set_clock(&self, clock: Clock) {
        self.with_state(|state| state.clock = clock);
    }

    pub fn fail_next_start(&self, fail: bool) {
        self.with_state(|state| state.fail_start = fail);
    }

    pub fn fail_submissions(&self, fail: bool) {
        self.with_state(|state| state.fail_submit = fail);
    }

    pub fn fail_finish(&self, fail: bool) {
        self.with_state(|state| state.fail_finish = fail);
    }

    /// Answers relayed so far, in arrival order.
    #[must_use]
    pub fn submissions(&self) -> Vec<(QuizId, AnswerSubmission)> {
        self.state
            .lock()
            .map(|state| state.submissions.clone())
            .unwrap_or_default()
    }

    /// Completion notifications received so far.
    #[must_use]
    pub fn completions(&self) -> Vec<(QuizId, QuizCompletion)> {
        self.state
            .lock()
            .map(|state| state.completions.clone())
            .unwrap_or_default()
    }

    fn with_state(&self, mutate: impl FnOnce(&mut BackendState)) {
        if let Ok(mut state) = self.state.lock() {
            mutate(&mut state);
        }
    }

    fn select_questions(
        state: &BackendState,
        request: &QuizStartRequest,
    ) -> Vec<Question> {
        if request.mode == QuizMode::Review {
            return state.missed.clone();
        }

        let mut questions: Vec<Question> = state
            .catalog
            .iter()
            .filter(|q| request.category.is_none_or(|c| q.category() == c))
            .filter(|q| request.difficulty.is_none_or(|d| q.difficulty() == d))
            .cloned()
            .collect();

        if let Some(count) = request.question_count {
            questions.truncate(count as usize);
        }
        questions
    }
}

#[async_trait]
impl QuizBackend for InMemoryBackend {
    async fn start_quiz(
        &self,
        _token: &AuthToken,
        request: &QuizStartRequest,
    ) -> Result<QuizStartResponse, ApiError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;

        if state.fail_start {
            return Err(ApiError::Unavailable("simulated start outage".into()));
        }

        let questions = Self::select_questions(&state, request);
        if questions.is_empty() {
            return Err(ApiError::EmptyQuiz);
        }

        let quiz_id = QuizId::generate();
        state.issued.insert(quiz_id, questions.clone());

        Ok(QuizStartResponse {
            quiz_id,
            questions,
            start_time: state.clock.now(),
        })
    }

    async fn submit_answer(
        &self,
        _token: &AuthToken,
        quiz_id: QuizId,
        submission: &AnswerSubmission,
    ) -> Result<AnswerFeedback, ApiError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;

        if state.fail_submit {
            return Err(ApiError::Unavailable("simulated submit outage".into()));
        }

        let question = state
            .issued
            .get(&quiz_id)
            .ok_or(ApiError::NotFound)?
            .iter()
            .find(|q| q.id() == submission.question_id)
            .cloned()
            .ok_or(ApiError::NotFound)?;

        state.submissions.push((quiz_id, submission.clone()));

        Ok(AnswerFeedback {
            // the real service treats essays as ungraded-but-accepted
            correct: question.check(&submission.user_answer).unwrap_or(true),
            explanation: Some(question.explanation().to_string()),
        })
    }

    async fn finish_quiz(
        &self,
        _token: &AuthToken,
        quiz_id: QuizId,
        completion: &QuizCompletion,
    ) -> Result<(), ApiError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;

        if state.fail_finish {
            return Err(ApiError::Unavailable("simulated finish outage".into()));
        }

        if !state.issued.contains_key(&quiz_id) {
            return Err(ApiError::NotFound);
        }

        state.completions.push((quiz_id, completion.clone()));
        Ok(())
    }

    async fn fetch_stats(&self, _token: &AuthToken) -> Result<UserStats, ApiError> {
        let state = self
            .state
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        Ok(state.stats.clone())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
