use backend_domain::{
    build_narrative_payload, build_prompt, parse_narrative_response, NarrativeFailure,
    NarrativeOutcome, RecapReport,
};
use tracing::{warn, Instrument};

use crate::commands::normalize_handle;
use crate::ingest::resolver::resolve_player;
use crate::ingest::IngestSession;
use crate::queries::profile_queries::season_stats;
use crate::queries::timeline_queries::timeline_season;
use crate::{AppError, AppState};

/// Compiles stored stats into a narrative payload and asks the model for a recap.
/// A failed or malformed completion becomes an error envelope, not an error.
pub async fn generate_recap(
    state: &AppState,
    game_name: &str,
    tag_line: &str,
) -> Result<RecapReport, AppError> {
    let handle = normalize_handle(game_name, tag_line)?;
    let session = IngestSession::open(state);
    let span = session.span("recap", &handle);

    async move {
        let player = resolve_player(&session, &handle).await?;
        let stats = season_stats(state, &player).await?;
        let season = timeline_season(state, &player).await?;
        let timeline = (season.matches_analyzed > 0).then_some(&season);

        let payload = build_narrative_payload(&player, &stats, timeline);
        let prompt = build_prompt(&payload).map_err(|err| AppError::Internal(err.into()))?;

        let narrative = match state.narrative.complete(&prompt).await {
            Ok(raw) => parse_narrative_response(&raw),
            Err(err) => {
                warn!("narrative service failed: {:#}", err);
                NarrativeOutcome::Failed(NarrativeFailure {
                    error: format!("narrative service failed: {}", err),
                    raw: None,
                })
            }
        };
        if let NarrativeOutcome::Failed(failure) = &narrative {
            warn!("recap narrative unavailable: {}", failure.error);
        }

        Ok(RecapReport { payload, narrative })
    }
    .instrument(span)
    .await
}
