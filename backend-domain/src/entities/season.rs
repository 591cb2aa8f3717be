// Season-level timeline rollup entities

use serde::{Deserialize, Serialize};

use crate::entities::{MapPoint, ObjectiveCounts, Player};
use crate::value_objects::ComebackPattern;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineAverages {
    pub early_dominance: f64,
    pub midgame_swing: f64,
    pub consistency: f64,
    pub spike: f64,
    pub throw: f64,
    pub roam: f64,
}

/// Mean of present milestone timestamps, milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MilestoneAverages {
    pub level6_at: Option<f64>,
    pub level11_at: Option<f64>,
    pub level16_at: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaystyleLabels {
    pub early_game: String,
    pub consistency: String,
    pub roaming: String,
    pub risk_profile: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComebackCounts {
    pub dominated: u32,
    pub comeback: u32,
    pub throw: u32,
    pub fell_behind: u32,
    pub neutral: u32,
}

impl ComebackCounts {
    pub fn record(&mut self, pattern: ComebackPattern) {
        match pattern {
            ComebackPattern::Dominated => self.dominated += 1,
            ComebackPattern::Comeback => self.comeback += 1,
            ComebackPattern::Throw => self.throw += 1,
            ComebackPattern::FellBehind => self.fell_behind += 1,
            ComebackPattern::Neutral => self.neutral += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.dominated + self.comeback + self.throw + self.fell_behind + self.neutral
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub kill_points: Vec<MapPoint>,
    pub objectives: ObjectiveCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineSeason {
    pub matches_analyzed: u32,
    pub averages: TimelineAverages,
    pub milestones: MilestoneAverages,
    pub playstyle: PlaystyleLabels,
    pub comeback_patterns: ComebackCounts,
    pub heatmap: Heatmap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSeasonReport {
    pub player: Player,
    pub season: TimelineSeason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineProcessReport {
    pub total_matches: usize,
    /// Already summarized before this run.
    pub skipped: usize,
    pub pending: usize,
    pub processed: usize,
    /// Fetch failures, missing participants and unproducible timelines.
    pub failed: usize,
}
