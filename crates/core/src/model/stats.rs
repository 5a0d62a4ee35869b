use serde::{Deserialize, Serialize};

use crate::model::question::Category;

/// Lifetime statistics the quiz service keeps per user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub level: String,
    pub xp: u32,
    /// Per-category counts, served alongside the totals.
    #[serde(default)]
    pub category_stats: CategoryProgress,
}

impl UserStats {
    /// Lifetime accuracy as a fraction in `[0, 1]`; `None` before any answers.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        if self.total_questions == 0 {
            None
        } else {
            Some(f64::from(self.correct_answers) / f64::from(self.total_questions))
        }
    }
}

/// Running correct/total counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub correct: u32,
    pub total: u32,
}

/// Per-category progress, keyed by the service's Spanish category names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProgress {
    #[serde(rename = "personajes")]
    pub characters: CategoryStats,
    #[serde(rename = "temas")]
    pub themes: CategoryStats,
    #[serde(rename = "simbolismo")]
    pub symbolism: CategoryStats,
}

impl CategoryProgress {
    #[must_use]
    pub fn for_category(&self, category: Category) -> CategoryStats {
        match category {
            Category::Characters => self.characters,
            Category::Themes => self.themes,
            Category::Symbolism => self.symbolism,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
