use std::env;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{
    DbConfig, NarrativeConfig, PipelineConfig, RiotConfig, StoreKind, DEFAULT_WATERMARK_SECS,
};

use super::validation::{validate_api_key, validate_base_url};

pub const CONFIG_ENV: &str = "REWIND_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub riot_api_key: Option<String>,
    pub riot_base_url: String,
    pub account_cluster: String,
    pub request_timeout_seconds: u64,

    pub rate_budget: usize,
    pub rate_window_ms: u64,
    pub page_size: u32,
    pub max_attempts: u32,
    pub default_retry_after_secs: u64,
    pub backoff_base_ms: u64,
    pub backoff_cap_ms: u64,
    pub page_pacing_ms: u64,
    pub detail_pacing_ms: u64,
    pub match_concurrency: usize,
    pub timeline_concurrency: usize,
    pub persist_batch_size: usize,
    pub persist_attempts: u32,
    pub persist_retry_delay_ms: u64,
    pub default_watermark_secs: i64,

    pub store: StoreKind,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,

    pub narrative_url: Option<String>,
    pub narrative_api_key: Option<String>,
    pub narrative_model: String,
    pub narrative_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            riot_api_key: None,
            riot_base_url: "https://{cluster}.api.riotgames.com".to_string(),
            account_cluster: "americas".to_string(),
            request_timeout_seconds: 15,
            rate_budget: pipeline.rate_budget,
            rate_window_ms: pipeline.rate_window_ms,
            page_size: pipeline.page_size,
            max_attempts: pipeline.max_attempts,
            default_retry_after_secs: pipeline.default_retry_after_secs,
            backoff_base_ms: pipeline.backoff_base_ms,
            backoff_cap_ms: pipeline.backoff_cap_ms,
            page_pacing_ms: pipeline.page_pacing_ms,
            detail_pacing_ms: pipeline.detail_pacing_ms,
            match_concurrency: pipeline.match_concurrency,
            timeline_concurrency: pipeline.timeline_concurrency,
            persist_batch_size: pipeline.persist_batch_size,
            persist_attempts: pipeline.persist_attempts,
            persist_retry_delay_ms: pipeline.persist_retry_delay_ms,
            default_watermark_secs: DEFAULT_WATERMARK_SECS,
            store: StoreKind::Clickhouse,
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "rewind".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            narrative_url: None,
            narrative_api_key: None,
            narrative_model: "gpt-4o-mini".to_string(),
            narrative_timeout_seconds: 60,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path)
                .await
                .with_context(|| format!("failed to read {}", file_path.display()))?;
            Self::parse(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid config file")
    }

    pub fn normalize(&mut self) {
        blank_to_none(&mut self.riot_api_key);
        blank_to_none(&mut self.clickhouse_user);
        blank_to_none(&mut self.clickhouse_password);
        blank_to_none(&mut self.narrative_url);
        blank_to_none(&mut self.narrative_api_key);
        self.riot_base_url = self.riot_base_url.trim().trim_end_matches('/').to_string();
        self.account_cluster = self.account_cluster.trim().to_lowercase();
    }

    pub fn validate(&self) -> Result<()> {
        validate_api_key(self.riot_api_key.as_deref())?;
        validate_base_url(&self.riot_base_url)?;
        if self.account_cluster.is_empty() {
            return Err(anyhow!("account_cluster must not be empty"));
        }
        if self.rate_budget == 0 || self.rate_window_ms == 0 {
            return Err(anyhow!("rate_budget and rate_window_ms must be greater than 0"));
        }
        if self.page_size == 0 {
            return Err(anyhow!("page_size must be greater than 0"));
        }
        if self.max_attempts == 0 || self.persist_attempts == 0 {
            return Err(anyhow!("max_attempts and persist_attempts must be greater than 0"));
        }
        if self.match_concurrency == 0 || self.timeline_concurrency == 0 {
            return Err(anyhow!("match_concurrency and timeline_concurrency must be greater than 0"));
        }
        if self.persist_batch_size == 0 {
            return Err(anyhow!("persist_batch_size must be greater than 0"));
        }
        if self.store == StoreKind::Clickhouse && self.clickhouse_url.trim().is_empty() {
            return Err(anyhow!("clickhouse_url must not be empty"));
        }
        Ok(())
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            rate_budget: self.rate_budget,
            rate_window_ms: self.rate_window_ms,
            page_size: self.page_size,
            max_attempts: self.max_attempts,
            default_retry_after_secs: self.default_retry_after_secs,
            backoff_base_ms: self.backoff_base_ms,
            backoff_cap_ms: self.backoff_cap_ms,
            page_pacing_ms: self.page_pacing_ms,
            detail_pacing_ms: self.detail_pacing_ms,
            match_concurrency: self.match_concurrency,
            timeline_concurrency: self.timeline_concurrency,
            persist_batch_size: self.persist_batch_size,
            persist_attempts: self.persist_attempts,
            persist_retry_delay_ms: self.persist_retry_delay_ms,
            default_watermark_secs: self.default_watermark_secs,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    pub fn to_riot_config(&self) -> RiotConfig {
        RiotConfig {
            api_key: self.riot_api_key.clone().unwrap_or_default(),
            base_url: self.riot_base_url.clone(),
            account_cluster: self.account_cluster.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_narrative_config(&self) -> NarrativeConfig {
        NarrativeConfig {
            url: self.narrative_url.clone(),
            api_key: self.narrative_api_key.clone(),
            model: self.narrative_model.clone(),
            request_timeout_seconds: self.narrative_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("REWIND_RIOT_API_KEY") {
            self.riot_api_key = Some(value);
        }
        if let Some(value) = lookup("REWIND_RIOT_BASE_URL") {
            self.riot_base_url = value;
        }
        if let Some(value) = lookup("REWIND_ACCOUNT_CLUSTER") {
            self.account_cluster = value;
        }
        override_parsed(&lookup, "REWIND_REQUEST_TIMEOUT_SECONDS", &mut self.request_timeout_seconds);
        override_parsed(&lookup, "REWIND_RATE_BUDGET", &mut self.rate_budget);
        override_parsed(&lookup, "REWIND_RATE_WINDOW_MS", &mut self.rate_window_ms);
        override_parsed(&lookup, "REWIND_PAGE_SIZE", &mut self.page_size);
        override_parsed(&lookup, "REWIND_MAX_ATTEMPTS", &mut self.max_attempts);
        override_parsed(&lookup, "REWIND_DEFAULT_RETRY_AFTER_SECS", &mut self.default_retry_after_secs);
        override_parsed(&lookup, "REWIND_BACKOFF_BASE_MS", &mut self.backoff_base_ms);
        override_parsed(&lookup, "REWIND_BACKOFF_CAP_MS", &mut self.backoff_cap_ms);
        override_parsed(&lookup, "REWIND_PAGE_PACING_MS", &mut self.page_pacing_ms);
        override_parsed(&lookup, "REWIND_DETAIL_PACING_MS", &mut self.detail_pacing_ms);
        override_parsed(&lookup, "REWIND_MATCH_CONCURRENCY", &mut self.match_concurrency);
        override_parsed(&lookup, "REWIND_TIMELINE_CONCURRENCY", &mut self.timeline_concurrency);
        override_parsed(&lookup, "REWIND_PERSIST_BATCH_SIZE", &mut self.persist_batch_size);
        override_parsed(&lookup, "REWIND_PERSIST_ATTEMPTS", &mut self.persist_attempts);
        override_parsed(&lookup, "REWIND_PERSIST_RETRY_DELAY_MS", &mut self.persist_retry_delay_ms);
        override_parsed(&lookup, "REWIND_DEFAULT_WATERMARK_SECS", &mut self.default_watermark_secs);
        if let Some(value) = lookup("REWIND_STORE") {
            match value.trim().to_lowercase().as_str() {
                "memory" => self.store = StoreKind::Memory,
                "clickhouse" => self.store = StoreKind::Clickhouse,
                other => warn!("ignoring unknown REWIND_STORE value {:?}", other),
            }
        }
        if let Some(value) = lookup("REWIND_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Some(value) = lookup("REWIND_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Some(value) = lookup("REWIND_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Some(value) = lookup("REWIND_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Some(value) = lookup("REWIND_NARRATIVE_URL") {
            self.narrative_url = Some(value);
        }
        if let Some(value) = lookup("REWIND_NARRATIVE_API_KEY") {
            self.narrative_api_key = Some(value);
        }
        if let Some(value) = lookup("REWIND_NARRATIVE_MODEL") {
            self.narrative_model = value;
        }
        override_parsed(&lookup, "REWIND_NARRATIVE_TIMEOUT_SECONDS", &mut self.narrative_timeout_seconds);
    }
}

fn blank_to_none(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) {
    if let Some(value) = lookup(key) {
        match value.trim().parse() {
            Ok(parsed) => *slot = parsed,
            Err(_) => warn!("ignoring unparsable {}={:?}", key, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn with_key() -> AppConfig {
        AppConfig {
            riot_api_key: Some("RGAPI-test".to_string()),
            ..AppConfig::default()
        }
    }

    #[test]
    fn defaults_match_pipeline_defaults() {
        let config = with_key();
        let pipeline = config.to_pipeline_config();
        assert_eq!(pipeline.rate_budget, 20);
        assert_eq!(pipeline.page_size, 100);
        assert_eq!(pipeline.match_concurrency, 15);
        assert_eq!(pipeline.timeline_concurrency, 10);
        assert_eq!(pipeline.default_watermark_secs, 1_735_689_600);
        assert_eq!(config.account_cluster, "americas");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_file_overrides_selected_keys() {
        let config = AppConfig::parse(
            r#"
riot_api_key = "RGAPI-file"
page_size = 50
store = "memory"
"#,
        )
        .expect("parse");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.rate_budget, 20);
    }

    #[test]
    fn env_overrides_apply_and_ignore_garbage() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("REWIND_RIOT_API_KEY", "RGAPI-env"),
            ("REWIND_MATCH_CONCURRENCY", "4"),
            ("REWIND_PAGE_SIZE", "lots"),
            ("REWIND_STORE", "Memory"),
            ("REWIND_NARRATIVE_URL", "   "),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        config.normalize();
        assert_eq!(config.riot_api_key.as_deref(), Some("RGAPI-env"));
        assert_eq!(config.match_concurrency, 4);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.store, StoreKind::Memory);
        assert!(config.narrative_url.is_none());
    }

    #[test]
    fn validation_rejects_missing_key_and_zero_limits() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        config = with_key();
        config.timeline_concurrency = 0;
        assert!(config.validate().is_err());

        config = with_key();
        config.rate_budget = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn normalize_trims_urls_and_clusters() {
        let mut config = with_key();
        config.riot_base_url = " https://{cluster}.example.test/ ".to_string();
        config.account_cluster = " EUROPE ".to_string();
        config.clickhouse_user = Some(" ".to_string());
        config.normalize();
        assert_eq!(config.riot_base_url, "https://{cluster}.example.test");
        assert_eq!(config.account_cluster, "europe");
        assert!(config.clickhouse_user.is_none());
    }
}
