// Narrative payload compilation and response recovery

use serde_json::Value;

use crate::entities::{
    NarrativeFailure, NarrativeInsights, NarrativeOutcome, NarrativePayload, NarrativeProfile,
    Player, SeasonStats, TimelineSeason,
};

const MAX_LIST_ITEMS: usize = 3;

pub fn build_narrative_payload(
    player: &Player,
    stats: &SeasonStats,
    timeline: Option<&TimelineSeason>,
) -> NarrativePayload {
    let role_distribution = stats
        .roles
        .iter()
        .map(|role| (role.role.clone(), role.games))
        .collect();

    let timeline = timeline
        .and_then(|season| serde_json::to_value(season).ok())
        .map(|mut value| {
            strip_key(&mut value, "kill_points");
            value
        });

    NarrativePayload {
        profile: NarrativeProfile {
            game_name: player.handle.game_name.clone(),
            tag_line: player.handle.tag_line.clone(),
            total_matches: stats.totals.matches,
            wins: stats.totals.wins,
            losses: stats.totals.losses,
            win_rate: stats.totals.win_rate,
        },
        core_averages: stats.averages.clone(),
        most_played_champion: stats.most_played_champion.clone(),
        role_distribution,
        timeline,
    }
}

fn strip_key(value: &mut Value, key: &str) {
    match value {
        Value::Object(map) => {
            map.remove(key);
            for child in map.values_mut() {
                strip_key(child, key);
            }
        }
        Value::Array(items) => {
            for child in items {
                strip_key(child, key);
            }
        }
        _ => {}
    }
}

pub fn build_prompt(payload: &NarrativePayload) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string_pretty(payload)?;
    Ok(format!(
        "You are a League of Legends coach writing a season recap.\n\
         Using only the player data below, reply with a single JSON object and nothing else.\n\
         The object must have exactly these keys:\n\
         \"personality_profile\" (string), \"strengths\" (array of 3 strings), \
         \"weaknesses\" (array of 3 strings), \"playstyle_summary\" (string), \
         \"actionable_tip\" (string), \"highlight\" (string).\n\n\
         Player data:\n{data}"
    ))
}

/// Parse a model reply, falling back to the first embedded object that decodes.
pub fn parse_narrative_response(raw: &str) -> NarrativeOutcome {
    let candidate = serde_json::from_str::<NarrativeInsights>(raw.trim())
        .ok()
        .or_else(|| embedded_insights(raw));

    let Some(mut insights) = candidate else {
        return NarrativeOutcome::Failed(NarrativeFailure {
            error: "narrative response was not valid JSON".to_string(),
            raw: Some(raw.to_string()),
        });
    };

    if let Err(reason) = validate(&insights) {
        return NarrativeOutcome::Failed(NarrativeFailure {
            error: reason,
            raw: Some(raw.to_string()),
        });
    }

    insights.strengths.truncate(MAX_LIST_ITEMS);
    insights.weaknesses.truncate(MAX_LIST_ITEMS);
    NarrativeOutcome::Insights(insights)
}

/// Tries every `{` in turn; trailing prose after the object is ignored.
fn embedded_insights(raw: &str) -> Option<NarrativeInsights> {
    raw.match_indices('{').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&raw[start..])
            .into_iter::<NarrativeInsights>()
            .next()
            .and_then(Result::ok)
    })
}

fn validate(insights: &NarrativeInsights) -> Result<(), String> {
    let fields = [
        ("personality_profile", &insights.personality_profile),
        ("playstyle_summary", &insights.playstyle_summary),
        ("actionable_tip", &insights.actionable_tip),
        ("highlight", &insights.highlight),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(format!("narrative field {} is empty", name));
        }
    }
    if insights.strengths.is_empty() || insights.weaknesses.is_empty() {
        return Err("narrative strengths and weaknesses must not be empty".to_string());
    }
    Ok(())
}
