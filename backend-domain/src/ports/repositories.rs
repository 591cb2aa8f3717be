use std::collections::HashSet;

use async_trait::async_trait;

use crate::entities::{MatchRecord, TimelineSummary};
use crate::errors::StoreError;

/// Upsert/query contract of the match store. Rows are unique per (match id, player id).
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Ids among `match_ids` already stored for this exact player.
    async fn existing_match_ids(
        &self,
        puuid: &str,
        match_ids: &[String],
    ) -> Result<HashSet<String>, StoreError>;
    /// Inserts rows whose key is not yet present; returns how many were written.
    async fn insert_matches(&self, records: &[MatchRecord]) -> Result<usize, StoreError>;
    /// All rows for a player ordered by game start, oldest first.
    async fn fetch_matches(&self, puuid: &str) -> Result<Vec<MatchRecord>, StoreError>;
    /// Latest game start (epoch ms) stored for the player.
    async fn latest_game_start(&self, puuid: &str) -> Result<Option<i64>, StoreError>;
}

#[async_trait]
pub trait TimelineRepository: Send + Sync {
    async fn summarized_match_ids(&self, puuid: &str) -> Result<HashSet<String>, StoreError>;
    async fn insert_summaries(&self, summaries: &[TimelineSummary]) -> Result<usize, StoreError>;
    async fn fetch_summaries(&self, puuid: &str) -> Result<Vec<TimelineSummary>, StoreError>;
}
