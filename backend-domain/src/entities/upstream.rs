// Upstream wire payloads
// Every optional field decodes to a named default here, once, at the fetch boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDto {
    #[serde(default)]
    pub puuid: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Query string of the match-id listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchIdQuery {
    /// Epoch seconds.
    pub start_time: i64,
    pub start: u32,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDto {
    pub info: MatchInfoDto,
}

fn unknown_game_mode() -> String {
    "UNKNOWN".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfoDto {
    #[serde(default = "unknown_game_mode")]
    pub game_mode: String,
    #[serde(default)]
    pub queue_id: i64,
    #[serde(default)]
    pub game_duration: i64,
    #[serde(default)]
    pub game_start_timestamp: i64,
    #[serde(default)]
    pub game_end_timestamp: Option<i64>,
    #[serde(default)]
    pub participants: Vec<ParticipantDto>,
    #[serde(default)]
    pub teams: Vec<TeamDto>,
}

impl MatchInfoDto {
    /// Duration in seconds. Payloads without `gameEndTimestamp` report milliseconds.
    pub fn duration_secs(&self) -> i64 {
        if self.game_end_timestamp.is_some() {
            self.game_duration
        } else {
            self.game_duration / 1000
        }
    }
}

fn unknown_champion() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    #[serde(default)]
    pub puuid: String,
    #[serde(default)]
    pub participant_id: i64,
    #[serde(default)]
    pub team_id: i64,
    #[serde(default = "unknown_champion")]
    pub champion_name: String,
    #[serde(default)]
    pub team_position: String,
    #[serde(default)]
    pub win: bool,
    #[serde(default)]
    pub kills: i64,
    #[serde(default)]
    pub deaths: i64,
    #[serde(default)]
    pub assists: i64,
    #[serde(default)]
    pub total_damage_dealt_to_champions: i64,
    #[serde(default)]
    pub total_damage_taken: i64,
    #[serde(default)]
    pub gold_earned: i64,
    #[serde(default)]
    pub total_minions_killed: i64,
    #[serde(default)]
    pub neutral_minions_killed: i64,
    #[serde(default)]
    pub vision_score: i64,
    #[serde(default)]
    pub wards_placed: i64,
    #[serde(default)]
    pub wards_killed: i64,
    #[serde(default)]
    pub turret_kills: i64,
    #[serde(default)]
    pub inhibitor_kills: i64,
    #[serde(default)]
    pub dragon_kills: i64,
    #[serde(default)]
    pub baron_kills: i64,
    #[serde(default)]
    pub largest_multi_kill: i64,
    #[serde(default)]
    pub penta_kills: i64,
    #[serde(default)]
    pub first_blood_kill: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    #[serde(default)]
    pub team_id: i64,
    #[serde(default)]
    pub win: bool,
    #[serde(default)]
    pub objectives: ObjectivesDto,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectivesDto {
    #[serde(default)]
    pub baron: Option<ObjectiveDto>,
    #[serde(default)]
    pub dragon: Option<ObjectiveDto>,
    #[serde(default)]
    pub rift_herald: Option<ObjectiveDto>,
    #[serde(default)]
    pub tower: Option<ObjectiveDto>,
    #[serde(default)]
    pub inhibitor: Option<ObjectiveDto>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ObjectiveDto {
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub kills: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineDto {
    pub info: TimelineInfoDto,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineInfoDto {
    #[serde(default)]
    pub frame_interval: i64,
    #[serde(default)]
    pub participants: Vec<TimelineParticipantDto>,
    #[serde(default)]
    pub frames: Vec<FrameDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineParticipantDto {
    #[serde(default)]
    pub participant_id: i64,
    #[serde(default)]
    pub puuid: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDto {
    #[serde(default)]
    pub timestamp: i64,
    /// Keyed by participant id rendered as a string ("1".."10").
    #[serde(default)]
    pub participant_frames: HashMap<String, ParticipantFrameDto>,
    #[serde(default)]
    pub events: Vec<EventDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantFrameDto {
    #[serde(default)]
    pub participant_id: Option<i64>,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub total_gold: i64,
    #[serde(default)]
    pub position: Option<PositionDto>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionDto {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub killer_id: Option<i64>,
    #[serde(default)]
    pub killer_team_id: Option<i64>,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub position: Option<PositionDto>,
    #[serde(default)]
    pub monster_type: Option<String>,
    #[serde(default)]
    pub building_type: Option<String>,
}
