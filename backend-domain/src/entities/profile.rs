// Profile entities produced by the stats aggregator

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::Player;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileTotals {
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreAverages {
    pub kills: f64,
    pub deaths: f64,
    pub assists: f64,
    pub kda: f64,
    pub cs_per_min: f64,
    pub damage: f64,
    pub gold: f64,
    pub vision: f64,
}

/// Means of per-match ratios, each in [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactRatios {
    pub kill_participation: f64,
    pub damage_share: f64,
    pub gold_share: f64,
    pub vision_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionStats {
    pub champion: String,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub kda: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleStats {
    pub role: String,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub match_id: String,
    pub champion: String,
    pub game_start: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    pub most_kills: Option<Highlight>,
    pub most_deaths: Option<Highlight>,
    pub most_damage: Option<Highlight>,
    pub most_gold: Option<Highlight>,
    pub best_vision: Option<Highlight>,
    pub most_cs: Option<Highlight>,
    pub longest_game: Option<Highlight>,
    pub shortest_game: Option<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// `YYYY-MM`, UTC.
    pub month: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub win_rate: f64,
    pub averages: CoreAverages,
    pub impact: ImpactRatios,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub totals: ProfileTotals,
    pub averages: CoreAverages,
    pub impact: ImpactRatios,
    pub most_played_champion: Option<String>,
    pub champions: Vec<ChampionStats>,
    pub roles: Vec<RoleStats>,
    pub game_modes: BTreeMap<String, u32>,
    pub highlights: Highlights,
    pub monthly: Vec<MonthlyBucket>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// `startTime` (epoch seconds) the listing was bounded by.
    pub watermark: i64,
    pub ids_discovered: usize,
    pub new_ids: usize,
    pub fetched: usize,
    pub skipped: usize,
    pub inserted: usize,
    pub watermark_after: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player: Player,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncReport>,
    pub stats: SeasonStats,
}
