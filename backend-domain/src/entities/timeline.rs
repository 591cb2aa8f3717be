// Timeline summary entity
// Created at most once per (match id, player id)

use serde::{Deserialize, Serialize};

use crate::value_objects::{ComebackPattern, MatchKey, ObjectiveKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    pub fn distance(&self, other: &MapPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveCounts {
    pub dragon: u32,
    pub baron: u32,
    pub herald: u32,
    pub tower: u32,
    pub inhibitor: u32,
}

impl ObjectiveCounts {
    pub fn record(&mut self, kind: ObjectiveKind) {
        match kind {
            ObjectiveKind::Dragon => self.dragon += 1,
            ObjectiveKind::Baron => self.baron += 1,
            ObjectiveKind::Herald => self.herald += 1,
            ObjectiveKind::Tower => self.tower += 1,
            ObjectiveKind::Inhibitor => self.inhibitor += 1,
        }
    }

    pub fn merge(&mut self, other: &ObjectiveCounts) {
        self.dragon += other.dragon;
        self.baron += other.baron;
        self.herald += other.herald;
        self.tower += other.tower;
        self.inhibitor += other.inhibitor;
    }

    pub fn total(&self) -> u32 {
        self.dragon + self.baron + self.herald + self.tower + self.inhibitor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSummary {
    pub match_id: String,
    pub puuid: String,
    pub early_dominance: f64,
    pub midgame_swing: f64,
    pub consistency: f64,
    pub spike_score: f64,
    pub throw_score: f64,
    pub roam_score: f64,
    /// Frame timestamps (ms) at which levels 6, 11 and 16 were first reached.
    pub level6_at: Option<i64>,
    pub level11_at: Option<i64>,
    pub level16_at: Option<i64>,
    pub final_gold_diff: f64,
    pub kill_points: Vec<MapPoint>,
    pub objectives: ObjectiveCounts,
    pub comeback: ComebackPattern,
    /// Seconds, copied from the match record.
    pub duration: i64,
}

impl TimelineSummary {
    pub fn key(&self) -> MatchKey {
        MatchKey::new(&self.match_id, &self.puuid)
    }
}
