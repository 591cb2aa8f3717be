use backend_domain::{Player, PlayerProfile, SeasonStats, StatsAggregator};
use tracing::Instrument;

use crate::commands::normalize_handle;
use crate::ingest::resolver::resolve_player;
use crate::ingest::IngestSession;
use crate::{AppError, AppState};

pub async fn season_stats(state: &AppState, player: &Player) -> Result<SeasonStats, AppError> {
    let records = state.match_repo.fetch_matches(player.puuid()).await?;
    Ok(StatsAggregator::aggregate(&records))
}

/// Profile over whatever is already stored; no listing or detail calls.
pub async fn player_profile(
    state: &AppState,
    game_name: &str,
    tag_line: &str,
) -> Result<PlayerProfile, AppError> {
    let handle = normalize_handle(game_name, tag_line)?;
    let session = IngestSession::open(state);
    let span = session.span("profile", &handle);

    async move {
        let player = resolve_player(&session, &handle).await?;
        let stats = season_stats(state, &player).await?;
        Ok(PlayerProfile {
            player,
            sync: None,
            stats,
        })
    }
    .instrument(span)
    .await
}
