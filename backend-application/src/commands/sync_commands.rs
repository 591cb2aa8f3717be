use backend_domain::PlayerProfile;
use tracing::{info, Instrument};

use crate::commands::normalize_handle;
use crate::ingest::resolver::resolve_player;
use crate::ingest::sync::sync_player;
use crate::ingest::IngestSession;
use crate::queries::profile_queries::season_stats;
use crate::{AppError, AppState};

/// Pulls everything new for a player, then summarizes the full stored history.
pub async fn sync_and_summarize(
    state: &AppState,
    game_name: &str,
    tag_line: &str,
) -> Result<PlayerProfile, AppError> {
    let handle = normalize_handle(game_name, tag_line)?;
    state.metrics.record_sync_request();
    let session = IngestSession::open(state);
    let span = session.span("sync", &handle);

    async move {
        let player = resolve_player(&session, &handle).await?;
        let report = sync_player(&session, state.match_repo.as_ref(), &player).await?;
        info!(
            "sync finished: {} new, {} inserted, {} skipped",
            report.new_ids, report.inserted, report.skipped
        );
        let stats = season_stats(state, &player).await?;
        Ok(PlayerProfile {
            player,
            sync: Some(report),
            stats,
        })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{match_dto, state_with, FakeNarrative, FakeRiotApi, MemoryStore};

    #[tokio::test(start_paused = true)]
    async fn sync_and_summarize_is_idempotent() {
        let ids = ["NA1_1", "NA1_2"];
        let mut api = FakeRiotApi::new()
            .with_account("Faker", "KR1", "p1", Some("kr"))
            .with_listing("p1", ids.iter().map(|id| id.to_string()).collect());
        for id in ids {
            api = api.with_match(id, match_dto(&["p1"], 1_741_000_000_000));
        }
        let store = Arc::new(MemoryStore::default());
        let state = state_with(api, store.clone(), Arc::new(FakeNarrative::failing("unused")));

        let first = sync_and_summarize(&state, "Faker", "KR1").await.expect("first");
        assert_eq!(first.sync.as_ref().map(|s| s.inserted), Some(2));
        assert_eq!(first.stats.totals.matches, 2);
        assert_eq!(first.stats.totals.win_rate, 100.0);
        assert_eq!(first.stats.most_played_champion.as_deref(), Some("Ahri"));

        let second = sync_and_summarize(&state, "Faker", "KR1").await.expect("second");
        assert_eq!(second.sync.as_ref().map(|s| s.inserted), Some(0));
        assert_eq!(second.stats.totals.matches, 2);
        assert_eq!(store.match_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_account_is_surfaced() {
        let state = state_with(
            FakeRiotApi::new(),
            Arc::new(MemoryStore::default()),
            Arc::new(FakeNarrative::failing("unused")),
        );
        let err = sync_and_summarize(&state, "Nobody", "NA1")
            .await
            .expect_err("missing account");
        assert!(matches!(err, AppError::AccountNotFound(_)));
    }
}
