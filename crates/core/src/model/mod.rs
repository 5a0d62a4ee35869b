mod answers;
mod ids;
mod mode;
mod question;
mod report;
mod stats;

pub use answers::AnswerSheet;
pub use ids::{ParseIdError, QuestionId, QuizId};
pub use mode::{
    EXAM_QUESTION_COUNT, EXAM_TIME_LIMIT_SECS, ModeConfig, QuestionSource, QuizMode,
};
pub use question::{AnswerValue, Category, Difficulty, Question, QuestionError, QuestionType};
pub use report::{CategoryTally, ScoreReport};
pub use stats::{CategoryProgress, CategoryStats, UserStats};
