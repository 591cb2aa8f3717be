use backend_domain::{Player, TimelineAggregator, TimelineSeason, TimelineSeasonReport};
use tracing::Instrument;

use crate::commands::normalize_handle;
use crate::ingest::resolver::resolve_player;
use crate::ingest::IngestSession;
use crate::{AppError, AppState};

pub async fn timeline_season(
    state: &AppState,
    player: &Player,
) -> Result<TimelineSeason, AppError> {
    let summaries = state.timeline_repo.fetch_summaries(player.puuid()).await?;
    Ok(TimelineAggregator::aggregate(&summaries))
}

pub async fn timeline_summary(
    state: &AppState,
    game_name: &str,
    tag_line: &str,
) -> Result<TimelineSeasonReport, AppError> {
    let handle = normalize_handle(game_name, tag_line)?;
    let session = IngestSession::open(state);
    let span = session.span("timeline-summary", &handle);

    async move {
        let player = resolve_player(&session, &handle).await?;
        let season = timeline_season(state, &player).await?;
        Ok(TimelineSeasonReport { player, season })
    }
    .instrument(span)
    .await
}
