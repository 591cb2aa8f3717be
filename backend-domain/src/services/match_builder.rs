use crate::entities::{MatchDto, MatchRecord, ObjectiveDto, ParticipantDto};
use crate::errors::DerivationError;

/// Validates a match payload for one player and folds it into a store row.
pub fn build_match_record(
    match_id: &str,
    puuid: &str,
    dto: &MatchDto,
) -> Result<MatchRecord, DerivationError> {
    let info = &dto.info;
    let participant = info
        .participants
        .iter()
        .find(|p| p.puuid == puuid)
        .ok_or_else(|| DerivationError::ParticipantNotFound {
            match_id: match_id.to_string(),
            puuid: puuid.to_string(),
        })?;

    let duration = info.duration_secs();
    if duration <= 0 {
        return Err(DerivationError::Invalid {
            match_id: match_id.to_string(),
            reason: format!("non-positive duration {}", info.game_duration),
        });
    }

    let teammates = info
        .participants
        .iter()
        .filter(|p| p.team_id == participant.team_id)
        .collect::<Vec<_>>();
    let team_sum = |field: fn(&ParticipantDto) -> i64| teammates.iter().map(|p| field(p)).sum::<i64>();

    let objectives = info
        .teams
        .iter()
        .find(|team| team.team_id == participant.team_id)
        .map(|team| team.objectives.clone())
        .unwrap_or_default();
    let kills_of = |objective: Option<ObjectiveDto>| objective.map(|o| o.kills).unwrap_or(0);

    let team_position = match participant.team_position.trim() {
        "" => "UNKNOWN".to_string(),
        position => position.to_uppercase(),
    };

    Ok(MatchRecord {
        match_id: match_id.to_string(),
        puuid: puuid.to_string(),
        game_mode: info.game_mode.clone(),
        queue_id: info.queue_id,
        duration,
        game_start: info.game_start_timestamp,
        champion: participant.champion_name.clone(),
        team_position,
        team_id: participant.team_id,
        win: participant.win,
        kills: participant.kills,
        deaths: participant.deaths,
        assists: participant.assists,
        damage_to_champions: participant.total_damage_dealt_to_champions,
        damage_taken: participant.total_damage_taken,
        gold_earned: participant.gold_earned,
        minions_killed: participant.total_minions_killed,
        neutral_minions_killed: participant.neutral_minions_killed,
        vision_score: participant.vision_score,
        wards_placed: participant.wards_placed,
        wards_killed: participant.wards_killed,
        turret_kills: participant.turret_kills,
        inhibitor_kills: participant.inhibitor_kills,
        largest_multi_kill: participant.largest_multi_kill,
        penta_kills: participant.penta_kills,
        first_blood: participant.first_blood_kill,
        team_dragons: kills_of(objectives.dragon),
        team_barons: kills_of(objectives.baron),
        team_heralds: kills_of(objectives.rift_herald),
        team_towers: kills_of(objectives.tower),
        team_inhibitors: kills_of(objectives.inhibitor),
        team_kills: team_sum(|p| p.kills),
        team_damage: team_sum(|p| p.total_damage_dealt_to_champions),
        team_gold: team_sum(|p| p.gold_earned),
        team_vision: team_sum(|p| p.vision_score),
    })
}
