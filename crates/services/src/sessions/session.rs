use chrono::{DateTime, Duration, Utc};
use std::fmt;

use quiz_core::model::{
    AnswerSheet, AnswerValue, ModeConfig, Question, QuizId, ScoreReport,
};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── NAVIGATION ────────────────────────────────────────────────────────────────
//

/// What a navigation call did with the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The cursor moved to another question.
    Moved,
    /// Already at the first question; nothing changed.
    AtStart,
    /// Already at the last question. The caller should finish the session
    /// instead of advancing.
    AtEnd,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt, from start to scoring.
///
/// A pure state machine: a fixed ordered question sequence, a cursor that is
/// always within `[0, len)`, and an answer sheet that only grows. Finishing
/// is the terminal transition; afterwards navigation and recording are
/// rejected and the tallied report is the only thing left to read.
pub struct QuizSession {
    quiz_id: QuizId,
    questions: Vec<Question>,
    config: ModeConfig,
    cursor: usize,
    answers: AnswerSheet,
    started_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    report: Option<ScoreReport>,
}

impl QuizSession {
    /// Create a session over the question sequence the service returned.
    ///
    /// The cursor starts at the first question with an empty answer sheet.
    /// Timed modes get a deadline of `started_at + time_limit`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        quiz_id: QuizId,
        questions: Vec<Question>,
        config: ModeConfig,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let deadline = config
            .time_limit()
            .map(|secs| started_at + Duration::seconds(i64::from(secs)));

        Ok(Self {
            quiz_id,
            questions,
            config,
            cursor: 0,
            answers: AnswerSheet::new(),
            started_at,
            deadline,
            finished_at: None,
            report: None,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn config(&self) -> &ModeConfig {
        &self.config
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Exam-mode cutoff; `None` for untimed modes.
    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based position of the displayed question.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The question under the cursor. Always valid: the cursor never leaves
    /// `[0, len)` and the question list is non-empty by construction.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.cursor]
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// Previously recorded answer for the displayed question, for pre-fill.
    #[must_use]
    pub fn answer_for_current(&self) -> Option<&AnswerValue> {
        self.answers.get(self.current_question().id())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// The tallied report, present once the session finished.
    #[must_use]
    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.answers.len(),
            remaining: self.total_questions().saturating_sub(self.answers.len()),
            is_finished: self.is_finished(),
        }
    }

    /// Record an answer for the displayed question, overwriting any prior
    /// value for it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` if the session is already finished.
    pub fn record_answer(&mut self, answer: AnswerValue) -> Result<(), SessionError> {
        if self.is_finished() {
            return Err(SessionError::Finished);
        }
        self.answers.record(self.current_question().id(), answer);
        Ok(())
    }

    /// Move the cursor forward. Never mutates the answer sheet.
    ///
    /// At the last question this reports `NavOutcome::AtEnd` and leaves the
    /// cursor in place; the caller finishes the session instead.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` if the session is already finished.
    pub fn advance(&mut self) -> Result<NavOutcome, SessionError> {
        if self.is_finished() {
            return Err(SessionError::Finished);
        }
        if self.cursor + 1 >= self.questions.len() {
            return Ok(NavOutcome::AtEnd);
        }
        self.cursor += 1;
        Ok(NavOutcome::Moved)
    }

    /// Move the cursor backward; a no-op at the first question. Never
    /// mutates the answer sheet.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` if the session is already finished.
    pub fn retreat(&mut self) -> Result<NavOutcome, SessionError> {
        if self.is_finished() {
            return Err(SessionError::Finished);
        }
        if self.cursor == 0 {
            return Ok(NavOutcome::AtStart);
        }
        self.cursor -= 1;
        Ok(NavOutcome::Moved)
    }

    /// Terminal transition: tally the score and freeze the session.
    ///
    /// Idempotent: the first call (user-initiated or timer expiry, whichever
    /// comes first) tallies once; later calls return the stored report
    /// unchanged.
    pub fn finish(&mut self, finished_at: DateTime<Utc>) -> &ScoreReport {
        if self.report.is_none() {
            self.finished_at = Some(finished_at);
        }
        let questions = &self.questions;
        let answers = &self.answers;
        self.report
            .get_or_insert_with(|| ScoreReport::tally(questions, answers))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz_id)
            .field("questions_len", &self.questions.len())
            .field("cursor", &self.cursor)
            .field("answered", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("finished_at", &self.finished_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Category, Difficulty, QuestionId, QuestionType};
    use quiz_core::time::fixed_now;

    fn boolean_question(correct: bool) -> Question {
        Question::new(
            QuestionId::generate(),
            QuestionType::Boolean,
            Category::Characters,
            Difficulty::Easy,
            "Pregunta de verdadero o falso",
            Vec::new(),
            Some(AnswerValue::Bool(correct)),
            "",
        )
        .unwrap()
    }

    fn multiple_question(correct: usize) -> Question {
        Question::new(
            QuestionId::generate(),
            QuestionType::Multiple,
            Category::Themes,
            Difficulty::Medium,
            "Pregunta de opción múltiple",
            vec!["a".into(), "b".into(), "c".into()],
            Some(AnswerValue::Choice(correct)),
            "",
        )
        .unwrap()
    }

    fn essay_question() -> Question {
        Question::new(
            QuestionId::generate(),
            QuestionType::Essay,
            Category::Symbolism,
            Difficulty::Hard,
            "Pregunta de desarrollo",
            Vec::new(),
            None,
            "",
        )
        .unwrap()
    }

    fn practice_session(questions: Vec<Question>) -> QuizSession {
        QuizSession::new(
            QuizId::generate(),
            questions,
            ModeConfig::practice(),
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err = QuizSession::new(
            QuizId::generate(),
            Vec::new(),
            ModeConfig::practice(),
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn cursor_stays_in_bounds_under_any_navigation() {
        let mut session = practice_session(vec![
            boolean_question(true),
            multiple_question(1),
            essay_question(),
        ]);

        assert_eq!(session.retreat().unwrap(), NavOutcome::AtStart);
        assert_eq!(session.cursor(), 0);

        assert_eq!(session.advance().unwrap(), NavOutcome::Moved);
        assert_eq!(session.advance().unwrap(), NavOutcome::Moved);
        assert_eq!(session.cursor(), 2);

        assert_eq!(session.advance().unwrap(), NavOutcome::AtEnd);
        assert_eq!(session.cursor(), 2);

        assert_eq!(session.retreat().unwrap(), NavOutcome::Moved);
        assert_eq!(session.cursor(), 1);
        assert!(session.cursor() < session.total_questions());
    }

    #[test]
    fn recorded_answer_prefills_after_round_trip_navigation() {
        let mut session = practice_session(vec![boolean_question(true), multiple_question(1)]);

        session.record_answer(AnswerValue::Bool(true)).unwrap();
        session.advance().unwrap();
        assert_eq!(session.answer_for_current(), None);

        session.retreat().unwrap();
        assert_eq!(session.answer_for_current(), Some(&AnswerValue::Bool(true)));
    }

    #[test]
    fn navigation_never_mutates_the_answer_sheet() {
        let mut session = practice_session(vec![boolean_question(true), multiple_question(1)]);
        session.record_answer(AnswerValue::Bool(true)).unwrap();

        let before = session.answers().clone();
        session.advance().unwrap();
        session.retreat().unwrap();
        assert_eq!(*session.answers(), before);
    }

    #[test]
    fn recording_overwrites_for_the_current_question() {
        let mut session = practice_session(vec![multiple_question(1)]);
        session.record_answer(AnswerValue::Choice(0)).unwrap();
        session.record_answer(AnswerValue::Choice(1)).unwrap();

        assert_eq!(session.answer_for_current(), Some(&AnswerValue::Choice(1)));
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn finish_tallies_the_three_question_example() {
        let q1 = boolean_question(true);
        let q2 = multiple_question(1);
        let q3 = essay_question();
        let mut session = practice_session(vec![q1, q2, q3]);

        session.record_answer(AnswerValue::Bool(true)).unwrap();
        session.advance().unwrap();
        session.record_answer(AnswerValue::Choice(1)).unwrap();
        session.advance().unwrap();
        session.record_answer(AnswerValue::Text("texto".into())).unwrap();

        let report = session.finish(fixed_now()).clone();
        assert_eq!(report.score(), 2);
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn finish_is_idempotent() {
        let mut session = practice_session(vec![boolean_question(true)]);
        session.record_answer(AnswerValue::Bool(true)).unwrap();

        let first = session.finish(fixed_now()).clone();

        // a second answer must not sneak in between finishes
        assert!(matches!(
            session.record_answer(AnswerValue::Bool(false)),
            Err(SessionError::Finished)
        ));

        let later = fixed_now() + Duration::seconds(60);
        let second = session.finish(later).clone();
        assert_eq!(first, second);
        assert_eq!(session.finished_at(), Some(fixed_now()));
    }

    #[test]
    fn finished_session_rejects_navigation_and_recording() {
        let mut session = practice_session(vec![boolean_question(true), multiple_question(0)]);
        session.finish(fixed_now());

        assert!(matches!(session.advance(), Err(SessionError::Finished)));
        assert!(matches!(session.retreat(), Err(SessionError::Finished)));
        assert!(matches!(
            session.record_answer(AnswerValue::Bool(true)),
            Err(SessionError::Finished)
        ));
    }

    #[test]
    fn exam_session_gets_a_deadline() {
        let session = QuizSession::new(
            QuizId::generate(),
            vec![boolean_question(true)],
            ModeConfig::exam(),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(
            session.deadline(),
            Some(fixed_now() + Duration::seconds(1800))
        );
    }

    #[test]
    fn progress_tracks_answered_counts() {
        let mut session = practice_session(vec![boolean_question(true), multiple_question(1)]);
        session.record_answer(AnswerValue::Bool(true)).unwrap();

        let progress = session.progress();
        assert_eq!(progress.total, 2);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 1);
        assert!(!progress.is_finished);
    }
}
