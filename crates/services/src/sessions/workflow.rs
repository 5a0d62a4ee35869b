use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{AnswerValue, ModeConfig, ScoreReport, UserStats};
use quiz_client::{
    AnswerFeedback, AnswerSubmission, ApiError, AuthToken, QuizBackend, QuizCompletion,
    QuizStartRequest,
};

use super::session::QuizSession;
use crate::error::SessionError;

/// Whether an answer reached the quiz service.
///
/// A failed relay never undoes the local record: local and remote state are
/// allowed to diverge on transient errors, and the reason is surfaced to the
/// user exactly once with no automatic retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Failed(String),
}

/// Result of recording one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Correctness and explanation, present only in modes that show feedback.
    pub feedback: Option<AnswerFeedback>,
    pub delivery: Delivery,
}

/// Orchestrates a session's network workflow: entry, answer relay, and the
/// completion notification.
///
/// The bearer token is threaded through every backend call rather than read
/// from shared state, so independent sessions can carry independent
/// credentials.
#[derive(Clone)]
pub struct SessionRunner {
    backend: Arc<dyn QuizBackend>,
    token: AuthToken,
    clock: Clock,
}

impl SessionRunner {
    #[must_use]
    pub fn new(backend: Arc<dyn QuizBackend>, token: AuthToken) -> Self {
        Self {
            backend,
            token,
            clock: Clock::default(),
        }
    }

    /// Override the clock that timestamps `finish`; session start uses the
    /// service's `start_time`.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Request a new quiz from the service and build the session over it.
    ///
    /// A single attempt: any failure is terminal for this quiz entry and no
    /// partial session is retained. The session is timestamped with the
    /// service's `start_time`, so the attempt's duration is measured against
    /// the clock that issued it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Start` if the service call fails and
    /// `SessionError::Empty` if it returns no questions.
    pub async fn start(&self, config: ModeConfig) -> Result<QuizSession, SessionError> {
        let request = QuizStartRequest::from_config(&config);
        let response = self
            .backend
            .start_quiz(&self.token, &request)
            .await
            .map_err(SessionError::Start)?;

        QuizSession::new(
            response.quiz_id,
            response.questions,
            config,
            response.start_time,
        )
    }

    /// Record an answer locally, then relay it to the service.
    ///
    /// The local write happens first and is kept regardless of what the
    /// relay does. Feedback is surfaced only in modes that show it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` if the session is already finished.
    /// Relay failures are not errors; they come back as `Delivery::Failed`.
    pub async fn record_answer(
        &self,
        session: &mut QuizSession,
        answer: AnswerValue,
    ) -> Result<RecordOutcome, SessionError> {
        let question_id = session.current_question().id();
        session.record_answer(answer.clone())?;

        let submission = AnswerSubmission {
            question_id,
            user_answer: answer,
        };

        match self
            .backend
            .submit_answer(&self.token, session.quiz_id(), &submission)
            .await
        {
            Ok(feedback) => Ok(RecordOutcome {
                feedback: session.config().show_feedback().then_some(feedback),
                delivery: Delivery::Delivered,
            }),
            Err(err) => {
                tracing::warn!(
                    quiz_id = %session.quiz_id(),
                    question = %question_id,
                    error = %err,
                    "answer relay failed; keeping local record"
                );
                Ok(RecordOutcome {
                    feedback: None,
                    delivery: Delivery::Failed(err.to_string()),
                })
            }
        }
    }

    /// Finish the session: tally locally, then notify the service.
    ///
    /// The local tally is idempotent and never depends on the notification;
    /// a failed notification is logged and swallowed. Only the first finish
    /// notifies the service.
    pub async fn finish(&self, session: &mut QuizSession) -> ScoreReport {
        let already_finished = session.is_finished();
        let finished_at = self.clock.now();
        let report = session.finish(finished_at).clone();

        if !already_finished {
            let completion =
                QuizCompletion::from_sheet(finished_at, session.questions(), session.answers());
            if let Err(err) = self
                .backend
                .finish_quiz(&self.token, session.quiz_id(), &completion)
                .await
            {
                tracing::warn!(
                    quiz_id = %session.quiz_id(),
                    error = %err,
                    "completion notification failed; local score stands"
                );
            }
        }

        report
    }

    /// Fetch lifetime statistics for the results/progress views.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    pub async fn fetch_stats(&self) -> Result<UserStats, ApiError> {
        self.backend.fetch_stats(&self.token).await
    }
}
