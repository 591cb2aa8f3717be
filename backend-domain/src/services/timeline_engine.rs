use crate::entities::{EventDto, MapPoint, ObjectiveCounts, TimelineDto, TimelineSummary};
use crate::errors::DerivationError;
use crate::utils::{mean, round_to, variance};
use crate::value_objects::{ComebackPattern, ObjectiveKind};

const EARLY_GAME_END_MS: i64 = 600_000;
const MID_GAME_END_MS: i64 = 1_200_000;
const ROAM_DISTANCE: f64 = 3000.0;
const LEVEL_MILESTONES: [i64; 3] = [6, 11, 16];

const BLUE_TEAM: i64 = 100;
const RED_TEAM: i64 = 200;

fn team_of(participant_id: i64) -> i64 {
    if (1..=5).contains(&participant_id) {
        BLUE_TEAM
    } else {
        RED_TEAM
    }
}

fn opposing(team_id: i64) -> i64 {
    if team_id == BLUE_TEAM {
        RED_TEAM
    } else {
        BLUE_TEAM
    }
}

#[derive(Debug, Clone, Copy)]
struct DiffSample {
    timestamp: i64,
    value: f64,
}

/// Per-frame state collected for the target participant.
#[derive(Debug, Default)]
struct FrameWalk {
    milestones: [Option<i64>; 3],
    differentials: Vec<DiffSample>,
    positions: Vec<MapPoint>,
}

impl FrameWalk {
    fn collect(timeline: &TimelineDto, participant_id: i64) -> Self {
        let team = team_of(participant_id);
        let own_key = participant_id.to_string();
        let mut walk = FrameWalk::default();

        for frame in &timeline.info.frames {
            let Some(own) = frame.participant_frames.get(&own_key) else {
                continue;
            };

            for (slot, level) in LEVEL_MILESTONES.iter().enumerate() {
                if walk.milestones[slot].is_none() && own.level >= *level {
                    walk.milestones[slot] = Some(frame.timestamp);
                }
            }

            if let Some(position) = own.position {
                walk.positions.push(MapPoint { x: position.x, y: position.y });
            }

            let enemy_gold = frame
                .participant_frames
                .iter()
                .filter_map(|(key, data)| {
                    let id = data.participant_id.or_else(|| key.parse().ok())?;
                    (team_of(id) != team).then_some(data.total_gold as f64)
                })
                .collect::<Vec<_>>();
            if let Some(enemy_mean) = mean(&enemy_gold) {
                walk.differentials.push(DiffSample {
                    timestamp: frame.timestamp,
                    value: own.total_gold as f64 - enemy_mean,
                });
            }
        }

        walk
    }

    fn values(&self) -> Vec<f64> {
        self.differentials.iter().map(|s| s.value).collect()
    }

    fn early_dominance(&self) -> f64 {
        let early = self
            .differentials
            .iter()
            .filter(|s| s.timestamp <= EARLY_GAME_END_MS)
            .map(|s| s.value)
            .collect::<Vec<_>>();
        mean(&early).unwrap_or(0.0)
    }

    fn midgame_swing(&self) -> f64 {
        let mid = self
            .differentials
            .iter()
            .filter(|s| s.timestamp > EARLY_GAME_END_MS && s.timestamp <= MID_GAME_END_MS)
            .map(|s| s.value)
            .collect::<Vec<_>>();
        if mid.len() < 2 {
            return 0.0;
        }
        let max = mid.iter().cloned().fold(f64::MIN, f64::max);
        let min = mid.iter().cloned().fold(f64::MAX, f64::min);
        max - min
    }

    fn consistency(&self) -> f64 {
        let var = variance(&self.values()).unwrap_or(0.0);
        100.0 - (var / 100.0).min(100.0)
    }

    /// Largest frame-to-frame gain and loss.
    fn spike_and_throw(&self) -> (f64, f64) {
        let deltas = self
            .differentials
            .windows(2)
            .map(|pair| pair[1].value - pair[0].value)
            .collect::<Vec<_>>();
        if deltas.is_empty() {
            return (0.0, 0.0);
        }
        let spike = deltas.iter().cloned().fold(f64::MIN, f64::max);
        let throw = deltas.iter().cloned().fold(f64::MAX, f64::min);
        (spike, throw)
    }

    fn roam_score(&self) -> f64 {
        if self.positions.len() < 2 {
            return 0.0;
        }
        let jumps = self
            .positions
            .windows(2)
            .filter(|pair| pair[0].distance(&pair[1]) > ROAM_DISTANCE)
            .count();
        jumps as f64 / (self.positions.len() as f64 / 10.0)
    }
}

/// Kill locations and team objectives from the event stream.
#[derive(Debug, Default)]
struct EventWalk {
    kill_points: Vec<MapPoint>,
    objectives: ObjectiveCounts,
}

impl EventWalk {
    fn collect(timeline: &TimelineDto, participant_id: i64) -> Self {
        let team = team_of(participant_id);
        let mut walk = EventWalk::default();

        for event in timeline.info.frames.iter().flat_map(|f| f.events.iter()) {
            match event.kind.as_str() {
                "CHAMPION_KILL" => {
                    if event.killer_id == Some(participant_id) {
                        if let Some(position) = event.position {
                            walk.kill_points.push(MapPoint { x: position.x, y: position.y });
                        }
                    }
                }
                "ELITE_MONSTER_KILL" => {
                    let kind = event
                        .monster_type
                        .as_deref()
                        .and_then(ObjectiveKind::from_monster_type);
                    if let Some(kind) = kind {
                        if credited_team(event) == Some(team) {
                            walk.objectives.record(kind);
                        }
                    }
                }
                "BUILDING_KILL" => {
                    let kind = event
                        .building_type
                        .as_deref()
                        .and_then(ObjectiveKind::from_building_type);
                    if let Some(kind) = kind {
                        if credited_team(event) == Some(team) {
                            walk.objectives.record(kind);
                        }
                    }
                }
                _ => {}
            }
        }

        walk
    }
}

/// Team credited with an objective event.
///
/// Explicit `killerTeamId` wins, then the killer's side. Buildings lost to
/// minions (killer 0) go to the side opposite the building owner.
fn credited_team(event: &EventDto) -> Option<i64> {
    if let Some(team) = event.killer_team_id {
        return Some(team);
    }
    match event.killer_id {
        Some(id) if id > 0 => Some(team_of(id)),
        _ => event.team_id.map(opposing),
    }
}

/// Derive one player's insight metrics from a match timeline.
pub fn summarize_timeline(
    match_id: &str,
    puuid: &str,
    duration: i64,
    timeline: &TimelineDto,
) -> Result<TimelineSummary, DerivationError> {
    let participant_id = timeline
        .info
        .participants
        .iter()
        .find(|p| p.puuid == puuid)
        .map(|p| p.participant_id)
        .ok_or_else(|| DerivationError::ParticipantNotFound {
            match_id: match_id.to_string(),
            puuid: puuid.to_string(),
        })?;

    let frames = FrameWalk::collect(timeline, participant_id);
    let Some(last) = frames.differentials.last().map(|s| s.value) else {
        return Err(DerivationError::Unproducible {
            match_id: match_id.to_string(),
        });
    };
    let events = EventWalk::collect(timeline, participant_id);

    let early_dominance = frames.early_dominance();
    let (spike, throw) = frames.spike_and_throw();

    Ok(TimelineSummary {
        match_id: match_id.to_string(),
        puuid: puuid.to_string(),
        early_dominance: round_to(early_dominance, 2),
        midgame_swing: round_to(frames.midgame_swing(), 2),
        consistency: round_to(frames.consistency(), 2),
        spike_score: round_to(spike, 2),
        throw_score: round_to(throw, 2),
        roam_score: round_to(frames.roam_score(), 2),
        level6_at: frames.milestones[0],
        level11_at: frames.milestones[1],
        level16_at: frames.milestones[2],
        final_gold_diff: round_to(last, 2),
        kill_points: events.kill_points,
        objectives: events.objectives,
        comeback: ComebackPattern::classify(early_dominance, last),
        duration,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::entities::{
        FrameDto, ParticipantFrameDto, PositionDto, TimelineInfoDto, TimelineParticipantDto,
    };

    const ME: &str = "puuid-me";

    fn participant_frame(id: i64, level: i64, gold: i64, x: f64) -> ParticipantFrameDto {
        ParticipantFrameDto {
            participant_id: Some(id),
            level,
            total_gold: gold,
            position: Some(PositionDto { x, y: 0.0 }),
        }
    }

    /// Player is participant 1; enemies 6 and 7 report `enemy_gold`.
    fn frame(timestamp: i64, level: i64, gold: i64, enemy_gold: i64, x: f64) -> FrameDto {
        let mut participant_frames = HashMap::new();
        participant_frames.insert("1".to_string(), participant_frame(1, level, gold, x));
        participant_frames.insert("2".to_string(), participant_frame(2, level, 99_999, 0.0));
        participant_frames.insert("6".to_string(), participant_frame(6, level, enemy_gold, 0.0));
        participant_frames.insert("7".to_string(), participant_frame(7, level, enemy_gold, 0.0));
        FrameDto {
            timestamp,
            participant_frames,
            events: Vec::new(),
        }
    }

    fn timeline(frames: Vec<FrameDto>) -> TimelineDto {
        TimelineDto {
            info: TimelineInfoDto {
                frame_interval: 60_000,
                participants: (1..=10)
                    .map(|id| TimelineParticipantDto {
                        participant_id: id,
                        puuid: if id == 1 { ME.to_string() } else { format!("other-{id}") },
                    })
                    .collect(),
                frames,
            },
        }
    }

    fn event(kind: &str) -> EventDto {
        EventDto {
            kind: kind.to_string(),
            ..EventDto::default()
        }
    }

    #[test]
    fn gold_differential_metrics() {
        let dto = timeline(vec![
            frame(0, 1, 500, 500, 0.0),
            frame(300_000, 6, 2_000, 1_800, 0.0),
            frame(600_000, 9, 4_000, 3_600, 0.0),
            frame(900_000, 11, 6_000, 6_500, 0.0),
            frame(1_200_000, 13, 9_000, 8_000, 0.0),
            frame(1_500_000, 16, 12_000, 11_000, 0.0),
        ]);
        let summary = summarize_timeline("NA1_1", ME, 1_600, &dto).expect("summary");

        // Differentials: 0, 200, 400, -500, 1000, 1000.
        assert_eq!(summary.early_dominance, 200.0);
        assert_eq!(summary.midgame_swing, 1_500.0);
        assert_eq!(summary.spike_score, 1_500.0);
        assert_eq!(summary.throw_score, -900.0);
        assert_eq!(summary.final_gold_diff, 1_000.0);
        assert_eq!(summary.level6_at, Some(300_000));
        assert_eq!(summary.level11_at, Some(900_000));
        assert_eq!(summary.level16_at, Some(1_500_000));
        assert_eq!(summary.comeback, ComebackPattern::Dominated);
        assert_eq!(summary.duration, 1_600);
        assert!(summary.consistency >= 0.0 && summary.consistency <= 100.0);
    }

    #[test]
    fn frames_without_enemy_data_are_skipped() {
        let mut lonely = frame(60_000, 1, 800, 0, 0.0);
        lonely.participant_frames.retain(|key, _| key == "1" || key == "2");
        let dto = timeline(vec![frame(0, 1, 500, 400, 0.0), lonely, frame(120_000, 2, 900, 700, 0.0)]);
        let summary = summarize_timeline("NA1_1", ME, 600, &dto).expect("summary");
        // Differentials 100 and 200 only.
        assert_eq!(summary.early_dominance, 150.0);
        assert_eq!(summary.spike_score, 100.0);
        assert_eq!(summary.consistency, 75.0);
        assert_eq!(summary.level6_at, None);
    }

    #[test]
    fn consistency_floors_at_zero() {
        let dto = timeline(vec![frame(0, 1, 0, 20_000, 0.0), frame(60_000, 1, 20_000, 0, 0.0)]);
        let summary = summarize_timeline("NA1_1", ME, 600, &dto).expect("summary");
        assert_eq!(summary.consistency, 0.0);
    }

    #[test]
    fn roam_counts_long_jumps() {
        let xs = [0.0, 4_000.0, 4_500.0, 9_000.0, 9_100.0];
        let frames = xs
            .iter()
            .enumerate()
            .map(|(i, x)| frame(i as i64 * 60_000, 1, 500, 500, *x))
            .collect();
        let summary = summarize_timeline("NA1_1", ME, 600, &timeline(frames)).expect("summary");
        // Two jumps over five samples.
        assert_eq!(summary.roam_score, 4.0);
    }

    #[test]
    fn single_frame_has_no_deltas() {
        let dto = timeline(vec![frame(0, 1, 700, 500, 0.0)]);
        let summary = summarize_timeline("NA1_1", ME, 600, &dto).expect("summary");
        assert_eq!(summary.spike_score, 0.0);
        assert_eq!(summary.throw_score, 0.0);
        assert_eq!(summary.roam_score, 0.0);
        assert_eq!(summary.midgame_swing, 0.0);
    }

    #[test]
    fn events_credit_player_kills_and_team_objectives() {
        let mut kill = event("CHAMPION_KILL");
        kill.killer_id = Some(1);
        kill.position = Some(PositionDto { x: 100.0, y: 200.0 });
        let mut teammate_kill = event("CHAMPION_KILL");
        teammate_kill.killer_id = Some(2);
        teammate_kill.position = Some(PositionDto { x: 1.0, y: 1.0 });

        let mut dragon = event("ELITE_MONSTER_KILL");
        dragon.killer_id = Some(3);
        dragon.killer_team_id = Some(100);
        dragon.monster_type = Some("DRAGON".to_string());
        let mut enemy_baron = event("ELITE_MONSTER_KILL");
        enemy_baron.killer_id = Some(8);
        enemy_baron.monster_type = Some("BARON_NASHOR".to_string());

        let mut tower = event("BUILDING_KILL");
        tower.killer_id = Some(4);
        tower.team_id = Some(200);
        tower.building_type = Some("TOWER_BUILDING".to_string());
        let mut minion_inhib = event("BUILDING_KILL");
        minion_inhib.killer_id = Some(0);
        minion_inhib.team_id = Some(200);
        minion_inhib.building_type = Some("INHIBITOR_BUILDING".to_string());
        let mut lost_tower = event("BUILDING_KILL");
        lost_tower.killer_id = Some(0);
        lost_tower.team_id = Some(100);
        lost_tower.building_type = Some("TOWER_BUILDING".to_string());

        let mut first = frame(0, 1, 500, 500, 0.0);
        first.events = vec![kill, teammate_kill, dragon];
        let mut second = frame(60_000, 1, 600, 500, 0.0);
        second.events = vec![enemy_baron, tower, minion_inhib, lost_tower];

        let summary = summarize_timeline("NA1_1", ME, 600, &timeline(vec![first, second])).expect("summary");
        assert_eq!(summary.kill_points, vec![MapPoint { x: 100.0, y: 200.0 }]);
        assert_eq!(summary.objectives.dragon, 1);
        assert_eq!(summary.objectives.baron, 0);
        assert_eq!(summary.objectives.tower, 1);
        assert_eq!(summary.objectives.inhibitor, 1);
    }

    #[test]
    fn missing_participant_and_empty_series_are_rejected() {
        let dto = timeline(vec![frame(0, 1, 500, 500, 0.0)]);
        assert!(matches!(
            summarize_timeline("NA1_1", "stranger", 600, &dto),
            Err(DerivationError::ParticipantNotFound { .. })
        ));

        let mut lonely = frame(0, 1, 500, 0, 0.0);
        lonely.participant_frames.retain(|key, _| key == "1");
        assert!(matches!(
            summarize_timeline("NA1_1", ME, 600, &timeline(vec![lonely])),
            Err(DerivationError::Unproducible { .. })
        ));
    }
}
