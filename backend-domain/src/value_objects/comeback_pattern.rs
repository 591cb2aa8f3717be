// Comeback pattern value object

use serde::{Deserialize, Serialize};

const EARLY_LEAD: f64 = 100.0;
const FINAL_LEAD: f64 = 500.0;

/// Shape of a match's gold-advantage trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComebackPattern {
    Dominated,
    Comeback,
    Throw,
    FellBehind,
    Neutral,
}

impl ComebackPattern {
    pub const ALL: [ComebackPattern; 5] = [
        ComebackPattern::Dominated,
        ComebackPattern::Comeback,
        ComebackPattern::Throw,
        ComebackPattern::FellBehind,
        ComebackPattern::Neutral,
    ];

    /// Evaluated in priority order; every input lands in exactly one variant.
    pub fn classify(early_dominance: f64, last_differential: f64) -> Self {
        if early_dominance > EARLY_LEAD && last_differential > FINAL_LEAD {
            ComebackPattern::Dominated
        } else if early_dominance < -EARLY_LEAD && last_differential > FINAL_LEAD {
            ComebackPattern::Comeback
        } else if early_dominance > EARLY_LEAD && last_differential < -FINAL_LEAD {
            ComebackPattern::Throw
        } else if early_dominance < -EARLY_LEAD && last_differential < -FINAL_LEAD {
            ComebackPattern::FellBehind
        } else {
            ComebackPattern::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComebackPattern::Dominated => "dominated",
            ComebackPattern::Comeback => "comeback",
            ComebackPattern::Throw => "throw",
            ComebackPattern::FellBehind => "fell_behind",
            ComebackPattern::Neutral => "neutral",
        }
    }
}

impl From<&str> for ComebackPattern {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dominated" => ComebackPattern::Dominated,
            "comeback" => ComebackPattern::Comeback,
            "throw" => ComebackPattern::Throw,
            "fell_behind" => ComebackPattern::FellBehind,
            _ => ComebackPattern::Neutral,
        }
    }
}
