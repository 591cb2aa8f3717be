use async_trait::async_trait;

use crate::entities::{AccountDto, MatchDto, MatchIdQuery, RegionDto, RiotHandle, TimelineDto};
use crate::errors::UpstreamError;
use crate::value_objects::RoutingCluster;

/// One call per method, no retries and no pacing; callers own both.
#[async_trait]
pub trait RiotApi: Send + Sync {
    async fn account_by_riot_id(&self, handle: &RiotHandle) -> Result<AccountDto, UpstreamError>;
    async fn region_by_puuid(&self, puuid: &str) -> Result<RegionDto, UpstreamError>;
    async fn match_ids(
        &self,
        cluster: RoutingCluster,
        puuid: &str,
        query: MatchIdQuery,
    ) -> Result<Vec<String>, UpstreamError>;
    async fn match_detail(
        &self,
        cluster: RoutingCluster,
        match_id: &str,
    ) -> Result<MatchDto, UpstreamError>;
    async fn match_timeline(
        &self,
        cluster: RoutingCluster,
        match_id: &str,
    ) -> Result<TimelineDto, UpstreamError>;
}

/// Large-language-model completion; returns the raw response text.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}
