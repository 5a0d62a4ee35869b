mod progress;
mod session;
mod timer;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use session::{NavOutcome, QuizSession};
pub use timer::{ExamTimer, TimerTick, drive};
pub use view::{SessionView, ViewOutcome};
pub use workflow::{Delivery, RecordOutcome, SessionRunner};
