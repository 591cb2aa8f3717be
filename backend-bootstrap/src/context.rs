use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use backend_application::{AppState, Metrics};
use backend_domain::ports::{MatchRepository, TimelineRepository};
use backend_domain::StoreKind;
use backend_infrastructure::{
    AppConfig, ClickhouseRepo, HttpNarrativeService, InMemoryRepo, RiotHttpClient,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let riot_api = Arc::new(RiotHttpClient::new(config.to_riot_config())?);
        let narrative = Arc::new(HttpNarrativeService::new(config.to_narrative_config())?);

        let (match_repo, timeline_repo) = match config.store {
            StoreKind::Clickhouse => {
                let db_config = config.to_db_config();
                let repo = Arc::new(ClickhouseRepo::connect(&db_config));
                repo.ensure_schema()
                    .await
                    .with_context(|| format!("clickhouse at {} is not usable", db_config.clickhouse_url))?;
                let match_repo: Arc<dyn MatchRepository> = repo.clone();
                let timeline_repo: Arc<dyn TimelineRepository> = repo;
                (match_repo, timeline_repo)
            }
            StoreKind::Memory => {
                warn!("memory store selected, nothing persists past this run");
                let repo = Arc::new(InMemoryRepo::new());
                let match_repo: Arc<dyn MatchRepository> = repo.clone();
                let timeline_repo: Arc<dyn TimelineRepository> = repo;
                (match_repo, timeline_repo)
            }
        };
        info!(store = ?config.store, cluster = %config.account_cluster, "context ready");

        let state = AppState {
            config: config.to_pipeline_config(),
            riot_api,
            match_repo,
            timeline_repo,
            narrative,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_needs_no_database() {
        let config = AppConfig {
            riot_api_key: Some("RGAPI-test".to_string()),
            store: StoreKind::Memory,
            page_size: 25,
            ..AppConfig::default()
        };
        let context = AppContext::new(&config).await.expect("context");
        assert_eq!(context.state.config.page_size, 25);
        let stored = context.state.match_repo.fetch_matches("p1").await.expect("fetch");
        assert!(stored.is_empty());
    }
}
