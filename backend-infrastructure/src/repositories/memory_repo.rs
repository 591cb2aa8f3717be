use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use backend_domain::ports::{MatchRepository, TimelineRepository};
use backend_domain::{MatchKey, MatchRecord, StoreError, TimelineSummary};

/// Process-local store with the same keying as the ClickHouse tables. Lost on exit.
#[derive(Default)]
pub struct InMemoryRepo {
    matches: RwLock<BTreeMap<MatchKey, MatchRecord>>,
    summaries: RwLock<BTreeMap<MatchKey, TimelineSummary>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchRepository for InMemoryRepo {
    async fn existing_match_ids(
        &self,
        puuid: &str,
        match_ids: &[String],
    ) -> Result<HashSet<String>, StoreError> {
        let matches = self.matches.read().await;
        Ok(match_ids
            .iter()
            .filter(|id| matches.contains_key(&MatchKey::new(id.as_str(), puuid)))
            .cloned()
            .collect())
    }

    async fn insert_matches(&self, records: &[MatchRecord]) -> Result<usize, StoreError> {
        let mut matches = self.matches.write().await;
        let mut inserted = 0;
        for record in records {
            let key = record.key();
            if !matches.contains_key(&key) {
                matches.insert(key, record.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn fetch_matches(&self, puuid: &str) -> Result<Vec<MatchRecord>, StoreError> {
        let matches = self.matches.read().await;
        let mut rows: Vec<MatchRecord> = matches
            .values()
            .filter(|record| record.puuid == puuid)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.game_start
                .cmp(&b.game_start)
                .then_with(|| a.match_id.cmp(&b.match_id))
        });
        Ok(rows)
    }

    async fn latest_game_start(&self, puuid: &str) -> Result<Option<i64>, StoreError> {
        let matches = self.matches.read().await;
        Ok(matches
            .values()
            .filter(|record| record.puuid == puuid)
            .map(|record| record.game_start)
            .max())
    }
}

#[async_trait]
impl TimelineRepository for InMemoryRepo {
    async fn summarized_match_ids(&self, puuid: &str) -> Result<HashSet<String>, StoreError> {
        let summaries = self.summaries.read().await;
        Ok(summaries
            .values()
            .filter(|summary| summary.puuid == puuid)
            .map(|summary| summary.match_id.clone())
            .collect())
    }

    async fn insert_summaries(&self, summaries: &[TimelineSummary]) -> Result<usize, StoreError> {
        let mut stored = self.summaries.write().await;
        let mut inserted = 0;
        for summary in summaries {
            let key = summary.key();
            if !stored.contains_key(&key) {
                stored.insert(key, summary.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn fetch_summaries(&self, puuid: &str) -> Result<Vec<TimelineSummary>, StoreError> {
        let summaries = self.summaries.read().await;
        Ok(summaries
            .values()
            .filter(|summary| summary.puuid == puuid)
            .cloned()
            .collect())
    }
}
