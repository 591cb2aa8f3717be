use std::collections::HashSet;

use backend_domain::TimelineProcessReport;
use tracing::{info, Instrument};

use crate::commands::normalize_handle;
use crate::ingest::fetcher::{fetch_timeline_summaries, TimelineJob};
use crate::ingest::resolver::resolve_player;
use crate::ingest::sync::persist_summaries;
use crate::ingest::IngestSession;
use crate::{AppError, AppState};

/// Summarizes the timeline of every stored match that has no summary yet.
pub async fn process_timelines(
    state: &AppState,
    game_name: &str,
    tag_line: &str,
) -> Result<TimelineProcessReport, AppError> {
    let handle = normalize_handle(game_name, tag_line)?;
    let session = IngestSession::open(state);
    let span = session.span("process-timelines", &handle);

    async move {
        let player = resolve_player(&session, &handle).await?;
        let puuid = player.puuid();
        let records = state.match_repo.fetch_matches(puuid).await?;
        let summarized = state.timeline_repo.summarized_match_ids(puuid).await?;

        let mut queued = HashSet::new();
        let jobs = records
            .iter()
            .filter(|record| !summarized.contains(&record.match_id))
            .filter(|record| queued.insert(record.match_id.clone()))
            .map(|record| TimelineJob {
                match_id: record.match_id.clone(),
                duration: record.duration,
            })
            .collect::<Vec<_>>();
        let pending = jobs.len();
        info!(
            "{} stored matches, {} already summarized, {} pending",
            records.len(),
            records.len() - pending,
            pending
        );

        let summaries = fetch_timeline_summaries(&session, &player, jobs).await;
        persist_summaries(&session, state.timeline_repo.as_ref(), &summaries).await?;
        state.metrics.record_timelines(summaries.len());

        Ok(TimelineProcessReport {
            total_matches: records.len(),
            skipped: records.len() - pending,
            pending,
            processed: summaries.len(),
            failed: pending - summaries.len(),
        })
    }
    .instrument(span)
    .await
}
