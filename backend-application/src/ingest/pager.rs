use std::collections::HashSet;

use backend_domain::{MatchIdQuery, Player};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::ingest::retry::classify_listing;
use crate::ingest::{IngestSession, RetryError};
use crate::AppError;

/// Lists every match id newer than `watermark_secs`, first-seen order, no duplicates.
///
/// Paging ends on an empty page, on a non-retryable status, or when the
/// attempt budget is spent purely on throttling. Exhausting it on server or
/// transport failures fails the call before anything is written.
pub async fn discover_match_ids(
    session: &IngestSession,
    player: &Player,
    watermark_secs: i64,
) -> Result<Vec<String>, AppError> {
    let policy = session.upstream_policy();
    let api = session.api.as_ref();
    let puuid = player.puuid();
    let cluster = player.cluster;
    let page_size = session.config.page_size.max(1);

    let mut seen = HashSet::new();
    let mut match_ids = Vec::new();
    let mut start = 0u32;

    loop {
        let query = MatchIdQuery {
            start_time: watermark_secs,
            start,
            count: page_size,
        };
        let outcome = policy
            .run(
                "match id page",
                Some(session.governor.as_ref()),
                move || async move { api.match_ids(cluster, puuid, query).await },
                classify_listing,
            )
            .await;

        let page = match outcome {
            Ok(page) => page,
            Err(RetryError::Stopped(err)) => {
                warn!("stopping pagination at offset {}: {}", start, err);
                break;
            }
            Err(RetryError::Exhausted {
                last,
                throttled_only: true,
                ..
            }) => {
                warn!("stopping pagination at offset {}, still throttled: {}", start, last);
                break;
            }
            Err(err) => {
                return Err(AppError::UpstreamUnavailable(format!(
                    "match id listing at offset {}: {}",
                    start, err
                )));
            }
        };

        if page.is_empty() {
            break;
        }

        let page_len = page.len();
        for match_id in page {
            if seen.insert(match_id.clone()) {
                match_ids.push(match_id);
            }
        }
        info!(
            "fetched {} match ids at offset {} ({} so far)",
            page_len,
            start,
            match_ids.len()
        );

        start = start.saturating_add(page_size);
        sleep(session.page_pacing()).await;
    }

    Ok(match_ids)
}
