use std::sync::{Arc, Mutex};

use quiz_core::model::{AnswerValue, Question, ScoreReport};
use quiz_client::AnswerFeedback;

use super::progress::SessionProgress;
use super::session::{NavOutcome, QuizSession};
use super::timer::{ExamTimer, TimerTick};
use super::workflow::{RecordOutcome, SessionRunner};
use crate::error::SessionError;

/// What a view-level advance did.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    /// Moved to another question.
    Continue,
    /// The session finished (advancing past the last question, an explicit
    /// finish, or timer expiry) and this is its report.
    Finished(ScoreReport),
}

/// The surface the embedding view layer drives.
///
/// Wraps the session state machine together with its countdown and the
/// transient explanation flag: feedback from the last recorded answer is
/// shown until the next navigation clears it. Dropping the view stops the
/// countdown; there is no other state to clean up.
pub struct SessionView {
    session: QuizSession,
    timer: Option<Arc<Mutex<ExamTimer>>>,
    explanation: Option<AnswerFeedback>,
}

impl SessionView {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        let timer = ExamTimer::from_config(session.config())
            .map(|timer| Arc::new(Mutex::new(timer)));
        Self {
            session,
            timer,
            explanation: None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        self.session.current_question()
    }

    /// Zero-based cursor position.
    #[must_use]
    pub fn cursor_position(&self) -> usize {
        self.session.cursor()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.session.total_questions()
    }

    /// Seconds left on the countdown; `None` in untimed modes.
    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        let timer = self.timer.as_ref()?;
        timer.lock().ok().map(|timer| timer.remaining())
    }

    /// Shared handle to the countdown for a wall-clock driver task.
    #[must_use]
    pub fn timer_handle(&self) -> Option<Arc<Mutex<ExamTimer>>> {
        self.timer.clone()
    }

    /// Previously recorded answer for the displayed question, for pre-fill.
    #[must_use]
    pub fn prefilled_answer(&self) -> Option<&AnswerValue> {
        self.session.answer_for_current()
    }

    /// Feedback for the last recorded answer, until navigation clears it.
    #[must_use]
    pub fn explanation(&self) -> Option<&AnswerFeedback> {
        self.explanation.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Record an answer for the displayed question and latch its feedback
    /// for display (practice mode only).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the session is over.
    pub async fn record_answer(
        &mut self,
        runner: &SessionRunner,
        answer: AnswerValue,
    ) -> Result<RecordOutcome, SessionError> {
        let outcome = runner.record_answer(&mut self.session, answer).await?;
        self.explanation = outcome.feedback.clone();
        Ok(outcome)
    }

    /// Move to the next question, or finish when already at the last one.
    /// Clears the explanation flag either way.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the session is over.
    pub async fn advance(&mut self, runner: &SessionRunner) -> Result<ViewOutcome, SessionError> {
        self.explanation = None;
        match self.session.advance()? {
            NavOutcome::AtEnd => Ok(ViewOutcome::Finished(self.finish(runner).await)),
            NavOutcome::Moved | NavOutcome::AtStart => Ok(ViewOutcome::Continue),
        }
    }

    /// Move to the previous question; a no-op at the first one. Clears the
    /// explanation flag.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the session is over.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        self.explanation = None;
        self.session.retreat()?;
        Ok(())
    }

    /// Finish now (the exam-mode "Finalizar" button). Stops the countdown
    /// and tallies; idempotent like the underlying session.
    pub async fn finish(&mut self, runner: &SessionRunner) -> ScoreReport {
        if let Some(timer) = &self.timer {
            if let Ok(mut timer) = timer.lock() {
                timer.stop();
            }
        }
        runner.finish(&mut self.session).await
    }

    /// Apply one countdown transition from the driver. Expiry finishes the
    /// session automatically; if a manual finish won the race this is a
    /// no-op returning the existing report.
    pub async fn handle_tick(
        &mut self,
        runner: &SessionRunner,
        tick: TimerTick,
    ) -> Option<ScoreReport> {
        match tick {
            TimerTick::Expired => Some(self.finish(runner).await),
            TimerTick::Running(_) | TimerTick::Stopped => None,
        }
    }
}

impl Drop for SessionView {
    // navigating away cancels the countdown; in-flight calls just complete
    // into a dropped future
    fn drop(&mut self) {
        if let Some(timer) = &self.timer {
            if let Ok(mut timer) = timer.lock() {
                timer.stop();
            }
        }
    }
}
