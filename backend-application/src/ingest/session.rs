use std::sync::Arc;
use std::time::Duration;

use backend_domain::ports::RiotApi;
use backend_domain::{PipelineConfig, RiotHandle};
use tracing::{info_span, Span};
use uuid::Uuid;

use crate::ingest::{RateGovernor, RetryPolicy};
use crate::{AppState, Metrics};

/// Everything one request needs to talk upstream. Governors are never shared
/// across sessions.
#[derive(Clone)]
pub struct IngestSession {
    pub id: Uuid,
    pub config: PipelineConfig,
    pub api: Arc<dyn RiotApi>,
    pub governor: Arc<RateGovernor>,
    pub metrics: Arc<Metrics>,
}

impl IngestSession {
    pub fn open(state: &AppState) -> Self {
        let governor =
            RateGovernor::from_config(&state.config).with_metrics(state.metrics.clone());
        Self {
            id: Uuid::new_v4(),
            config: state.config.clone(),
            api: state.riot_api.clone(),
            governor: Arc::new(governor),
            metrics: state.metrics.clone(),
        }
    }

    pub fn span(&self, operation: &str, handle: &RiotHandle) -> Span {
        info_span!("session", id = %self.id, operation, player = %handle)
    }

    pub fn upstream_policy(&self) -> RetryPolicy {
        RetryPolicy::upstream(&self.config)
    }

    pub fn persistence_policy(&self) -> RetryPolicy {
        RetryPolicy::persistence(&self.config)
    }

    pub fn page_pacing(&self) -> Duration {
        Duration::from_millis(self.config.page_pacing_ms)
    }

    pub fn detail_pacing(&self) -> Duration {
        Duration::from_millis(self.config.detail_pacing_ms)
    }
}
