// Narrative (recap) entities

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::CoreAverages;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeProfile {
    pub game_name: String,
    pub tag_line: String,
    pub total_matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
}

/// Input handed to the narrative collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativePayload {
    pub profile: NarrativeProfile,
    pub core_averages: CoreAverages,
    pub most_played_champion: Option<String>,
    pub role_distribution: BTreeMap<String, u32>,
    /// Season timeline summary with kill-location lists removed.
    pub timeline: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeInsights {
    pub personality_profile: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub playstyle_summary: String,
    pub actionable_tip: String,
    pub highlight: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeFailure {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NarrativeOutcome {
    Insights(NarrativeInsights),
    Failed(NarrativeFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecapReport {
    pub payload: NarrativePayload,
    pub narrative: NarrativeOutcome,
}
