#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::SessionError;
pub use sessions::{
    Delivery, ExamTimer, NavOutcome, QuizSession, RecordOutcome, SessionProgress, SessionRunner,
    SessionView, TimerTick, ViewOutcome,
};
