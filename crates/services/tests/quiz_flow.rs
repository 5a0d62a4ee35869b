use std::sync::Arc;

use quiz_core::model::{
    AnswerValue, Category, Difficulty, ModeConfig, Question, QuestionId, QuestionType,
};
use quiz_core::time::{fixed_clock, fixed_now};
use services::{
    Clock, Delivery, SessionError, SessionRunner, SessionView, TimerTick, ViewOutcome,
};
use quiz_client::{AuthToken, InMemoryBackend};

fn boolean_question(prompt: &str, correct: bool) -> Question {
    Question::new(
        QuestionId::generate(),
        QuestionType::Boolean,
        Category::Characters,
        Difficulty::Easy,
        prompt,
        Vec::new(),
        Some(AnswerValue::Bool(correct)),
        "Explicación de la respuesta",
    )
    .unwrap()
}

fn multiple_question(prompt: &str, correct: usize) -> Question {
    Question::new(
        QuestionId::generate(),
        QuestionType::Multiple,
        Category::Themes,
        Difficulty::Medium,
        prompt,
        vec!["a".into(), "b".into(), "c".into()],
        Some(AnswerValue::Choice(correct)),
        "Explicación de la respuesta",
    )
    .unwrap()
}

fn essay_question(prompt: &str) -> Question {
    Question::new(
        QuestionId::generate(),
        QuestionType::Essay,
        Category::Symbolism,
        Difficulty::Hard,
        prompt,
        Vec::new(),
        None,
        "Respuesta abierta",
    )
    .unwrap()
}

fn runner_over(backend: &InMemoryBackend) -> SessionRunner {
    SessionRunner::new(Arc::new(backend.clone()), AuthToken::new("test-token"))
        .with_clock(fixed_clock())
}

#[tokio::test]
async fn practice_flow_scores_and_notifies_completion() {
    let backend = InMemoryBackend::new(vec![
        boolean_question("P1", true),
        multiple_question("P2", 1),
        essay_question("P3"),
    ]);
    let runner = runner_over(&backend);

    let session = runner.start(ModeConfig::practice()).await.unwrap();
    let mut view = SessionView::new(session);
    assert_eq!(view.total_questions(), 3);
    assert_eq!(view.remaining_seconds(), None);

    // practice mode surfaces feedback immediately
    let outcome = view
        .record_answer(&runner, AnswerValue::Bool(true))
        .await
        .unwrap();
    assert_eq!(outcome.delivery, Delivery::Delivered);
    assert!(outcome.feedback.as_ref().unwrap().correct);
    assert!(view.explanation().is_some());

    // navigation clears the explanation flag
    assert_eq!(view.advance(&runner).await.unwrap(), ViewOutcome::Continue);
    assert!(view.explanation().is_none());

    view.record_answer(&runner, AnswerValue::Choice(1))
        .await
        .unwrap();
    view.advance(&runner).await.unwrap();
    view.record_answer(&runner, AnswerValue::Text("el simbolismo del bastón".into()))
        .await
        .unwrap();

    // advancing past the last question finishes
    let ViewOutcome::Finished(report) = view.advance(&runner).await.unwrap() else {
        panic!("expected the session to finish");
    };

    assert_eq!(report.score(), 2);
    assert_eq!(report.total(), 3);
    assert_eq!(backend.submissions().len(), 3);
    assert_eq!(backend.completions().len(), 1);
}

#[tokio::test]
async fn exam_mode_hides_feedback_and_counts_down() {
    let backend = InMemoryBackend::new(vec![
        boolean_question("P1", true),
        boolean_question("P2", false),
    ]);
    let runner = runner_over(&backend);

    let session = runner.start(ModeConfig::exam()).await.unwrap();
    let mut view = SessionView::new(session);

    assert_eq!(view.remaining_seconds(), Some(1800));

    let outcome = view
        .record_answer(&runner, AnswerValue::Bool(true))
        .await
        .unwrap();
    assert_eq!(outcome.delivery, Delivery::Delivered);
    assert_eq!(outcome.feedback, None);
    assert!(view.explanation().is_none());
}

#[tokio::test]
async fn timer_expiry_finishes_the_session_once() {
    let backend = InMemoryBackend::new(vec![boolean_question("P1", true)]);
    let runner = runner_over(&backend);

    let session = runner.start(ModeConfig::exam()).await.unwrap();
    let mut view = SessionView::new(session);
    view.record_answer(&runner, AnswerValue::Bool(true))
        .await
        .unwrap();

    // drive the countdown to zero without interaction
    let timer = view.timer_handle().unwrap();
    let expiry = loop {
        let tick = timer.lock().unwrap().tick();
        if tick == TimerTick::Expired {
            break tick;
        }
    };

    let report = view.handle_tick(&runner, expiry).await.unwrap();
    assert_eq!(report.score(), 1);
    assert!(view.is_finished());

    // a late manual finish is a no-op returning the same report
    let again = view.finish(&runner).await;
    assert_eq!(again, report);
    assert_eq!(backend.completions().len(), 1);
}

#[tokio::test]
async fn manual_finish_wins_the_race_against_the_timer() {
    let backend = InMemoryBackend::new(vec![boolean_question("P1", true)]);
    let runner = runner_over(&backend);

    let session = runner.start(ModeConfig::exam()).await.unwrap();
    let mut view = SessionView::new(session);
    let timer = view.timer_handle().unwrap();

    view.finish(&runner).await;

    // the stopped countdown no longer produces expiry
    assert_eq!(timer.lock().unwrap().tick(), TimerTick::Stopped);
    assert_eq!(backend.completions().len(), 1);
}

#[tokio::test]
async fn failed_relay_keeps_the_local_answer() {
    let backend = InMemoryBackend::new(vec![
        boolean_question("P1", true),
        boolean_question("P2", false),
    ]);
    let runner = runner_over(&backend);

    let session = runner.start(ModeConfig::practice()).await.unwrap();
    let mut view = SessionView::new(session);

    backend.fail_submissions(true);
    let outcome = view
        .record_answer(&runner, AnswerValue::Bool(true))
        .await
        .unwrap();

    assert!(matches!(outcome.delivery, Delivery::Failed(_)));
    assert_eq!(outcome.feedback, None);

    // the local record survives navigation despite the failed relay
    view.advance(&runner).await.unwrap();
    view.retreat().unwrap();
    assert_eq!(view.prefilled_answer(), Some(&AnswerValue::Bool(true)));
    assert!(backend.submissions().is_empty());
}

#[tokio::test]
async fn session_start_time_comes_from_the_service() {
    let backend = InMemoryBackend::new(vec![boolean_question("P1", true)]);
    backend.set_clock(fixed_clock());

    // a skewed local clock must not shift the attempt's start or deadline
    let local = Clock::fixed(fixed_now() + chrono::Duration::seconds(60));
    let runner =
        SessionRunner::new(Arc::new(backend.clone()), AuthToken::new("test-token"))
            .with_clock(local);

    let session = runner.start(ModeConfig::exam()).await.unwrap();
    assert_eq!(session.started_at(), fixed_now());
    assert_eq!(
        session.deadline(),
        Some(fixed_now() + chrono::Duration::seconds(1800))
    );
}

#[tokio::test]
async fn failed_start_is_fatal_for_quiz_entry() {
    let backend = InMemoryBackend::new(vec![boolean_question("P1", true)]);
    backend.fail_next_start(true);
    let runner = runner_over(&backend);

    let err = runner.start(ModeConfig::exam()).await.unwrap_err();
    assert!(matches!(err, SessionError::Start(_)));
}

#[tokio::test]
async fn failed_completion_notification_keeps_the_local_score() {
    let backend = InMemoryBackend::new(vec![boolean_question("P1", true)]);
    let runner = runner_over(&backend);

    let session = runner.start(ModeConfig::practice()).await.unwrap();
    let mut view = SessionView::new(session);
    view.record_answer(&runner, AnswerValue::Bool(true))
        .await
        .unwrap();

    backend.fail_finish(true);
    let report = view.finish(&runner).await;

    assert_eq!(report.score(), 1);
    assert!(backend.completions().is_empty());
}

#[tokio::test]
async fn review_mode_runs_over_missed_questions() {
    let backend = InMemoryBackend::new(vec![boolean_question("catalog", true)]);
    let missed = multiple_question("missed", 2);
    backend.set_missed(vec![missed.clone()]);
    let runner = runner_over(&backend);

    let session = runner.start(ModeConfig::review()).await.unwrap();
    assert_eq!(session.total_questions(), 1);
    assert_eq!(session.current_question().id(), missed.id());
    assert_eq!(session.deadline(), None);
}

#[tokio::test]
async fn review_mode_hides_feedback_like_exam_mode() {
    let backend = InMemoryBackend::new(vec![boolean_question("catalog", true)]);
    backend.set_missed(vec![multiple_question("missed", 2)]);
    let runner = runner_over(&backend);

    let session = runner.start(ModeConfig::review()).await.unwrap();
    let mut view = SessionView::new(session);

    let outcome = view
        .record_answer(&runner, AnswerValue::Choice(2))
        .await
        .unwrap();

    // only practice mode surfaces correctness and explanations
    assert_eq!(outcome.delivery, Delivery::Delivered);
    assert_eq!(outcome.feedback, None);
    assert!(view.explanation().is_none());
}
