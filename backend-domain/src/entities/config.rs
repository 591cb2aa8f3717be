// Pipeline configuration consumed by the application layer

use serde::{Deserialize, Serialize};

/// 2025-01-01T00:00:00Z, the lower bound for players never synced before.
pub const DEFAULT_WATERMARK_SECS: i64 = 1_735_689_600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
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
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Clickhouse,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiotConfig {
    pub api_key: String,
    /// Host template; `{cluster}` is replaced by the routing cluster name.
    pub base_url: String,
    pub account_cluster: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout_seconds: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rate_budget: 20,
            rate_window_ms: 1_000,
            page_size: 100,
            max_attempts: 5,
            default_retry_after_secs: 120,
            backoff_base_ms: 1_000,
            backoff_cap_ms: 30_000,
            page_pacing_ms: 1_200,
            detail_pacing_ms: 1_300,
            match_concurrency: 15,
            timeline_concurrency: 10,
            persist_batch_size: 50,
            persist_attempts: 3,
            persist_retry_delay_ms: 2_000,
            default_watermark_secs: DEFAULT_WATERMARK_SECS,
        }
    }
}
