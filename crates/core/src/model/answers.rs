use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::question::AnswerValue;

/// Per-session record of submitted answers keyed by question identifier.
///
/// Keys are unique and the map only ever grows: recording overwrites, nothing
/// removes. Owned exclusively by one session and never shared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    answers: HashMap<QuestionId, AnswerValue>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, unconditionally overwriting any prior value.
    pub fn record(&mut self, question_id: QuestionId, answer: AnswerValue) {
        self.answers.insert(question_id, answer);
    }

    /// Look up the answer recorded for a question, if any.
    #[must_use]
    pub fn get(&self, question_id: QuestionId) -> Option<&AnswerValue> {
        self.answers.get(&question_id)
    }

    #[must_use]
    pub fn contains(&self, question_id: QuestionId) -> bool {
        self.answers.contains_key(&question_id)
    }

    /// Number of questions answered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &AnswerValue)> {
        self.answers.iter().map(|(id, answer)| (*id, answer))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
