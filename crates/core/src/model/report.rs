use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::answers::AnswerSheet;
use crate::model::ids::QuestionId;
use crate::model::question::{Category, Question, QuestionType};

/// Correct/total counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTally {
    pub correct: u32,
    pub total: u32,
}

/// Final score for a finished session, computed once at finish time.
///
/// Only multiple-choice and boolean questions are counted; essays appear in
/// the total but are never scored correct or incorrect automatically.
/// Unanswered non-essay questions count as incorrect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    score: u32,
    total: u32,
    percentage: f64,
    breakdown: BTreeMap<Category, CategoryTally>,
    incorrect_questions: Vec<QuestionId>,
}

impl ScoreReport {
    /// Tally a finished session in a single pass over the question sequence.
    #[must_use]
    pub fn tally(questions: &[Question], answers: &AnswerSheet) -> Self {
        let mut score = 0_u32;
        let mut breakdown: BTreeMap<Category, CategoryTally> = BTreeMap::new();
        let mut incorrect_questions = Vec::new();

        for question in questions {
            if question.question_type() == QuestionType::Essay {
                continue;
            }

            let tally = breakdown.entry(question.category()).or_default();
            tally.total += 1;

            let is_correct = answers
                .get(question.id())
                .and_then(|answer| question.check(answer))
                .unwrap_or(false);

            if is_correct {
                tally.correct += 1;
                score += 1;
            } else {
                incorrect_questions.push(question.id());
            }
        }

        let total = u32::try_from(questions.len()).unwrap_or(u32::MAX);
        let percentage = if total == 0 {
            0.0
        } else {
            (f64::from(score) / f64::from(total) * 1000.0).round() / 10.0
        };

        Self {
            score,
            total,
            percentage,
            breakdown,
            incorrect_questions,
        }
    }

    /// Count of correctly answered multiple-choice and boolean questions.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Total question count, essays included.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Score over total, rounded to one decimal.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Per-category correct/total counts (non-essay questions only).
    #[must_use]
    pub fn breakdown(&self) -> &BTreeMap<Category, CategoryTally> {
        &self.breakdown
    }

    /// Non-essay questions answered incorrectly or not at all, in display order.
    #[must_use]
    pub fn incorrect_questions(&self) -> &[QuestionId] {
        &self.incorrect_questions
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
