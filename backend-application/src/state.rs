use std::sync::Arc;

use backend_domain::ports::{MatchRepository, NarrativeService, RiotApi, TimelineRepository};
use backend_domain::PipelineConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: PipelineConfig,
    pub riot_api: Arc<dyn RiotApi>,
    pub match_repo: Arc<dyn MatchRepository>,
    pub timeline_repo: Arc<dyn TimelineRepository>,
    pub narrative: Arc<dyn NarrativeService>,
    pub metrics: Arc<Metrics>,
}
