use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use backend_domain::{build_match_record, summarize_timeline, MatchRecord, Player, TimelineSummary};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::{debug, error, warn, Instrument, Span};

use crate::ingest::retry::classify_detail;
use crate::ingest::IngestSession;

/// A match whose timeline still needs summarizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineJob {
    pub match_id: String,
    pub duration: i64,
}

/// Runs `fetch` for every item with at most `limit` in flight.
///
/// Each worker holds its slot through the pacing delay. Items yielding `None`
/// are dropped; results keep input order.
async fn fan_out<I, T, F, Fut>(items: Vec<I>, limit: usize, pacing: Duration, fetch: F) -> Vec<T>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Option<T>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut tasks = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(err) => {
                error!("worker pool closed: {}", err);
                break;
            }
        };
        let work = fetch(item);
        tasks.spawn(
            async move {
                let outcome = work.await;
                sleep(pacing).await;
                drop(permit);
                (index, outcome)
            }
            .instrument(Span::current()),
        );
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Some(value))) => results.push((index, value)),
            Ok((_, None)) => {}
            Err(err) => warn!("fetch worker failed: {}", err),
        }
    }
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, value)| value).collect()
}

pub async fn fetch_match_records(
    session: &IngestSession,
    player: &Player,
    match_ids: &[String],
) -> Vec<MatchRecord> {
    fan_out(
        match_ids.to_vec(),
        session.config.match_concurrency,
        session.detail_pacing(),
        |match_id| {
            let session = session.clone();
            let player = player.clone();
            async move { fetch_match(&session, &player, &match_id).await }
        },
    )
    .await
}

async fn fetch_match(
    session: &IngestSession,
    player: &Player,
    match_id: &str,
) -> Option<MatchRecord> {
    let api = session.api.as_ref();
    let cluster = player.cluster;
    let detail = session
        .upstream_policy()
        .run(
            "match detail",
            Some(session.governor.as_ref()),
            move || async move { api.match_detail(cluster, match_id).await },
            classify_detail,
        )
        .await;

    let dto = match detail {
        Ok(dto) => dto,
        Err(err) => {
            warn!(match_id, "skipping match: {}", err);
            session.metrics.record_skipped();
            return None;
        }
    };

    match build_match_record(match_id, player.puuid(), &dto) {
        Ok(record) => {
            debug!(match_id, "match fetched");
            Some(record)
        }
        Err(err) => {
            warn!(match_id, "skipping match: {}", err);
            session.metrics.record_skipped();
            None
        }
    }
}

pub async fn fetch_timeline_summaries(
    session: &IngestSession,
    player: &Player,
    jobs: Vec<TimelineJob>,
) -> Vec<TimelineSummary> {
    fan_out(
        jobs,
        session.config.timeline_concurrency,
        session.detail_pacing(),
        |job| {
            let session = session.clone();
            let player = player.clone();
            async move { fetch_timeline(&session, &player, job).await }
        },
    )
    .await
}

async fn fetch_timeline(
    session: &IngestSession,
    player: &Player,
    job: TimelineJob,
) -> Option<TimelineSummary> {
    let api = session.api.as_ref();
    let cluster = player.cluster;
    let match_id = job.match_id.as_str();
    let timeline = session
        .upstream_policy()
        .run(
            "match timeline",
            Some(session.governor.as_ref()),
            move || async move { api.match_timeline(cluster, match_id).await },
            classify_detail,
        )
        .await;

    let dto = match timeline {
        Ok(dto) => dto,
        Err(err) => {
            warn!(match_id, "skipping timeline: {}", err);
            session.metrics.record_skipped();
            return None;
        }
    };

    match summarize_timeline(match_id, player.puuid(), job.duration, &dto) {
        Ok(summary) => Some(summary),
        Err(err) => {
            debug!(match_id, "no timeline summary: {}", err);
            None
        }
    }
}
