use backend_domain::ports::{MatchRepository, TimelineRepository};
use backend_domain::{MatchRecord, Player, SyncReport, TimelineSummary};
use chrono::DateTime;
use tracing::{error, info};

use crate::ingest::fetcher::fetch_match_records;
use crate::ingest::pager::discover_match_ids;
use crate::ingest::retry::classify_store;
use crate::ingest::IngestSession;
use crate::AppError;

/// `startTime` for the next listing: latest stored game start, else the default epoch.
pub async fn watermark_secs(
    repo: &dyn MatchRepository,
    puuid: &str,
    default_secs: i64,
) -> Result<i64, AppError> {
    let latest = repo.latest_game_start(puuid).await?;
    Ok(latest.map(|ms| ms / 1000).unwrap_or(default_secs))
}

/// Ids with no stored row for this exact player. Rows of other players do not count.
pub async fn new_match_ids(
    repo: &dyn MatchRepository,
    puuid: &str,
    match_ids: &[String],
) -> Result<Vec<String>, AppError> {
    if match_ids.is_empty() {
        return Ok(Vec::new());
    }
    let existing = repo.existing_match_ids(puuid, match_ids).await?;
    Ok(match_ids
        .iter()
        .filter(|id| !existing.contains(id.as_str()))
        .cloned()
        .collect())
}

/// Writes records in fixed-size batches. A batch that keeps failing aborts the
/// call; batches written before it stay committed.
pub async fn persist_matches(
    session: &IngestSession,
    repo: &dyn MatchRepository,
    records: &[MatchRecord],
) -> Result<usize, AppError> {
    let policy = session.persistence_policy();
    let batch_size = session.config.persist_batch_size.max(1);
    let batches = records.len().div_ceil(batch_size);
    let mut inserted = 0;

    for (index, batch) in records.chunks(batch_size).enumerate() {
        let written = policy
            .run(
                "match insert",
                None,
                move || async move { repo.insert_matches(batch).await },
                classify_store,
            )
            .await
            .map_err(|err| {
                session.metrics.record_persistence_failure();
                error!("match batch {}/{} failed: {}", index + 1, batches, err);
                AppError::PersistenceFatal(err.to_string())
            })?;
        inserted += written;
        info!("inserted match batch {}/{} ({} rows)", index + 1, batches, written);
    }

    Ok(inserted)
}

pub async fn persist_summaries(
    session: &IngestSession,
    repo: &dyn TimelineRepository,
    summaries: &[TimelineSummary],
) -> Result<usize, AppError> {
    let policy = session.persistence_policy();
    let batch_size = session.config.persist_batch_size.max(1);
    let mut inserted = 0;

    for batch in summaries.chunks(batch_size) {
        inserted += policy
            .run(
                "timeline insert",
                None,
                move || async move { repo.insert_summaries(batch).await },
                classify_store,
            )
            .await
            .map_err(|err| {
                session.metrics.record_persistence_failure();
                AppError::PersistenceFatal(err.to_string())
            })?;
    }

    Ok(inserted)
}

/// Discovers, diffs, fetches and stores everything new for one player.
pub async fn sync_player(
    session: &IngestSession,
    repo: &dyn MatchRepository,
    player: &Player,
) -> Result<SyncReport, AppError> {
    let puuid = player.puuid();
    let watermark = watermark_secs(repo, puuid, session.config.default_watermark_secs).await?;
    info!(
        "syncing {} since {}",
        player.handle,
        DateTime::from_timestamp(watermark, 0)
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| watermark.to_string())
    );

    let discovered = discover_match_ids(session, player, watermark).await?;
    let fresh = new_match_ids(repo, puuid, &discovered).await?;
    info!(
        "{} match ids listed, {} already stored, {} to fetch",
        discovered.len(),
        discovered.len() - fresh.len(),
        fresh.len()
    );

    let records = fetch_match_records(session, player, &fresh).await;
    let inserted = persist_matches(session, repo, &records).await?;
    session.metrics.record_ingested(inserted);

    let watermark_after = watermark_secs(repo, puuid, session.config.default_watermark_secs).await?;

    Ok(SyncReport {
        watermark,
        ids_discovered: discovered.len(),
        new_ids: fresh.len(),
        fetched: records.len(),
        skipped: fresh.len() - records.len(),
        inserted,
        watermark_after,
    })
}
