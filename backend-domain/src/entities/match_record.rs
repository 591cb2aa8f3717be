// Match record entity
// One row per (match id, player id); the same upstream match may back rows for several players.

use serde::{Deserialize, Serialize};

use crate::value_objects::MatchKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub puuid: String,
    pub game_mode: String,
    pub queue_id: i64,
    /// Seconds, always > 0.
    pub duration: i64,
    /// Epoch milliseconds.
    pub game_start: i64,
    pub champion: String,
    pub team_position: String,
    pub team_id: i64,
    pub win: bool,

    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub damage_to_champions: i64,
    pub damage_taken: i64,
    pub gold_earned: i64,
    pub minions_killed: i64,
    pub neutral_minions_killed: i64,
    pub vision_score: i64,
    pub wards_placed: i64,
    pub wards_killed: i64,
    pub turret_kills: i64,
    pub inhibitor_kills: i64,
    pub largest_multi_kill: i64,
    pub penta_kills: i64,
    pub first_blood: bool,

    pub team_dragons: i64,
    pub team_barons: i64,
    pub team_heralds: i64,
    pub team_towers: i64,
    pub team_inhibitors: i64,

    pub team_kills: i64,
    pub team_damage: i64,
    pub team_gold: i64,
    pub team_vision: i64,
}

impl MatchRecord {
    pub fn key(&self) -> MatchKey {
        MatchKey::new(&self.match_id, &self.puuid)
    }

    pub fn creep_score(&self) -> i64 {
        self.minions_killed + self.neutral_minions_killed
    }
}
