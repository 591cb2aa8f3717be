// In-crate fakes of the upstream, store and narrative ports

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use backend_domain::ports::{MatchRepository, NarrativeService, RiotApi, TimelineRepository};
use backend_domain::{
    AccountDto, EventDto, FrameDto, MatchDto, MatchIdQuery, MatchInfoDto, MatchKey, MatchRecord,
    ObjectiveDto, ObjectivesDto, ParticipantDto, ParticipantFrameDto, PipelineConfig, Player,
    PlayerId, PositionDto, RegionDto, RiotHandle, RoutingCluster, StoreError, TeamDto,
    TimelineDto, TimelineInfoDto, TimelineParticipantDto, TimelineSummary, UpstreamError,
};
use tokio::time::sleep;

use crate::ingest::IngestSession;
use crate::{AppState, Metrics};

#[derive(Default)]
struct CallLog {
    failures: Mutex<HashMap<String, VecDeque<UpstreamError>>>,
    calls: Mutex<HashMap<String, usize>>,
    last_query: Mutex<Option<(RoutingCluster, MatchIdQuery)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct FakeRiotApi {
    accounts: HashMap<String, String>,
    regions: HashMap<String, String>,
    listings: HashMap<String, Vec<String>>,
    matches: HashMap<String, MatchDto>,
    timelines: HashMap<String, TimelineDto>,
    latency: Duration,
    log: Arc<CallLog>,
}

impl FakeRiotApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, name: &str, tag: &str, puuid: &str, region: Option<&str>) -> Self {
        self.accounts
            .insert(RiotHandle::new(name, tag).to_string(), puuid.to_string());
        if let Some(region) = region {
            self.regions.insert(puuid.to_string(), region.to_string());
        }
        self
    }

    pub fn with_listing(mut self, puuid: &str, match_ids: Vec<String>) -> Self {
        self.listings.insert(puuid.to_string(), match_ids);
        self
    }

    pub fn with_match(mut self, match_id: &str, dto: MatchDto) -> Self {
        self.matches.insert(match_id.to_string(), dto);
        self
    }

    pub fn with_timeline(mut self, match_id: &str, dto: TimelineDto) -> Self {
        self.timelines.insert(match_id.to_string(), dto);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queues an error for the next call with this key (`account`, `region`,
    /// `ids:<start>`, `match:<id>`, `timeline:<id>`).
    pub fn fail_at(self, key: &str, err: UpstreamError) -> Self {
        self.log
            .failures
            .lock()
            .expect("failures lock")
            .entry(key.to_string())
            .or_default()
            .push_back(err);
        self
    }

    pub fn calls(&self, kind: &str) -> usize {
        self.log
            .calls
            .lock()
            .expect("calls lock")
            .get(kind)
            .copied()
            .unwrap_or(0)
    }

    pub fn max_in_flight(&self) -> usize {
        self.log.max_in_flight.load(Ordering::SeqCst)
    }

    /// Calls that ran past their simulated latency.
    pub fn completed_calls(&self) -> usize {
        self.log.completed.load(Ordering::SeqCst)
    }

    pub fn last_start_time(&self) -> Option<i64> {
        self.last_query().map(|(_, query)| query.start_time)
    }

    pub fn last_cluster(&self) -> Option<RoutingCluster> {
        self.last_query().map(|(cluster, _)| cluster)
    }

    fn last_query(&self) -> Option<(RoutingCluster, MatchIdQuery)> {
        *self.log.last_query.lock().expect("query lock")
    }

    async fn track(&self, kind: &str, key: String) -> Result<(), UpstreamError> {
        *self
            .log
            .calls
            .lock()
            .expect("calls lock")
            .entry(kind.to_string())
            .or_default() += 1;

        let now = self.log.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        self.log.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.log.completed.fetch_add(1, Ordering::SeqCst);

        let queued = self
            .log
            .failures
            .lock()
            .expect("failures lock")
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        match queued {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

const NOT_FOUND: UpstreamError = UpstreamError::Client { status: 404 };

#[async_trait]
impl RiotApi for FakeRiotApi {
    async fn account_by_riot_id(&self, handle: &RiotHandle) -> Result<AccountDto, UpstreamError> {
        self.track("account", "account".to_string()).await?;
        let puuid = self.accounts.get(&handle.to_string()).ok_or(NOT_FOUND)?;
        Ok(AccountDto {
            puuid: puuid.clone(),
            game_name: Some(handle.game_name.clone()),
            tag_line: Some(handle.tag_line.clone()),
        })
    }

    async fn region_by_puuid(&self, puuid: &str) -> Result<RegionDto, UpstreamError> {
        self.track("region", "region".to_string()).await?;
        let region = self.regions.get(puuid).ok_or(NOT_FOUND)?;
        Ok(RegionDto {
            puuid: Some(puuid.to_string()),
            game: Some("lol".to_string()),
            region: Some(region.clone()),
        })
    }

    async fn match_ids(
        &self,
        cluster: RoutingCluster,
        puuid: &str,
        query: MatchIdQuery,
    ) -> Result<Vec<String>, UpstreamError> {
        *self.log.last_query.lock().expect("query lock") = Some((cluster, query));
        self.track("ids", format!("ids:{}", query.start)).await?;
        let listing = self.listings.get(puuid).cloned().unwrap_or_default();
        Ok(listing
            .into_iter()
            .skip(query.start as usize)
            .take(query.count as usize)
            .collect())
    }

    async fn match_detail(
        &self,
        _cluster: RoutingCluster,
        match_id: &str,
    ) -> Result<MatchDto, UpstreamError> {
        self.track("match", format!("match:{}", match_id)).await?;
        self.matches.get(match_id).cloned().ok_or(NOT_FOUND)
    }

    async fn match_timeline(
        &self,
        _cluster: RoutingCluster,
        match_id: &str,
    ) -> Result<TimelineDto, UpstreamError> {
        self.track("timeline", format!("timeline:{}", match_id)).await?;
        self.timelines.get(match_id).cloned().ok_or(NOT_FOUND)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    matches: Mutex<BTreeMap<MatchKey, MatchRecord>>,
    summaries: Mutex<BTreeMap<MatchKey, TimelineSummary>>,
    insert_failures: Mutex<VecDeque<StoreError>>,
    successes_before_failure: Mutex<usize>,
}

impl MemoryStore {
    pub fn fail_inserts(&self, errors: Vec<StoreError>) {
        self.fail_inserts_after(0, errors);
    }

    pub fn fail_inserts_after(&self, successes: usize, errors: Vec<StoreError>) {
        *self.successes_before_failure.lock().expect("lock") = successes;
        self.insert_failures.lock().expect("lock").extend(errors);
    }

    pub fn match_count(&self) -> usize {
        self.matches.lock().expect("lock").len()
    }

    pub fn summary_count(&self) -> usize {
        self.summaries.lock().expect("lock").len()
    }

    fn next_insert(&self) -> Result<(), StoreError> {
        let mut successes = self.successes_before_failure.lock().expect("lock");
        if *successes > 0 {
            *successes -= 1;
            return Ok(());
        }
        match self.insert_failures.lock().expect("lock").pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MatchRepository for MemoryStore {
    async fn existing_match_ids(
        &self,
        puuid: &str,
        match_ids: &[String],
    ) -> Result<HashSet<String>, StoreError> {
        let matches = self.matches.lock().expect("lock");
        Ok(match_ids
            .iter()
            .filter(|id| matches.contains_key(&MatchKey::new(id.as_str(), puuid)))
            .cloned()
            .collect())
    }

    async fn insert_matches(&self, records: &[MatchRecord]) -> Result<usize, StoreError> {
        self.next_insert()?;
        let mut matches = self.matches.lock().expect("lock");
        let mut inserted = 0;
        for record in records {
            if !matches.contains_key(&record.key()) {
                matches.insert(record.key(), record.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn fetch_matches(&self, puuid: &str) -> Result<Vec<MatchRecord>, StoreError> {
        let mut rows = self
            .matches
            .lock()
            .expect("lock")
            .values()
            .filter(|r| r.puuid == puuid)
            .cloned()
            .collect::<Vec<_>>();
        rows.sort_by_key(|r| r.game_start);
        Ok(rows)
    }

    async fn latest_game_start(&self, puuid: &str) -> Result<Option<i64>, StoreError> {
        Ok(self
            .matches
            .lock()
            .expect("lock")
            .values()
            .filter(|r| r.puuid == puuid)
            .map(|r| r.game_start)
            .max())
    }
}

#[async_trait]
impl TimelineRepository for MemoryStore {
    async fn summarized_match_ids(&self, puuid: &str) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .summaries
            .lock()
            .expect("lock")
            .keys()
            .filter(|key| key.puuid == puuid)
            .map(|key| key.match_id.clone())
            .collect())
    }

    async fn insert_summaries(&self, summaries: &[TimelineSummary]) -> Result<usize, StoreError> {
        let mut stored = self.summaries.lock().expect("lock");
        let mut inserted = 0;
        for summary in summaries {
            if !stored.contains_key(&summary.key()) {
                stored.insert(summary.key(), summary.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn fetch_summaries(&self, puuid: &str) -> Result<Vec<TimelineSummary>, StoreError> {
        Ok(self
            .summaries
            .lock()
            .expect("lock")
            .values()
            .filter(|s| s.puuid == puuid)
            .cloned()
            .collect())
    }
}

pub struct FakeNarrative {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeNarrative {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("lock").clone()
    }
}

#[async_trait]
impl NarrativeService for FakeNarrative {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().expect("lock").push(prompt.to_string());
        self.reply.clone().map_err(|message| anyhow::anyhow!(message))
    }
}

pub fn state_with(
    api: FakeRiotApi,
    store: Arc<MemoryStore>,
    narrative: Arc<FakeNarrative>,
) -> AppState {
    AppState {
        config: PipelineConfig::default(),
        riot_api: Arc::new(api),
        match_repo: store.clone(),
        timeline_repo: store,
        narrative,
        metrics: Arc::new(Metrics::default()),
    }
}

pub fn session_for(api: FakeRiotApi) -> IngestSession {
    IngestSession::open(&state_with(
        api,
        Arc::new(MemoryStore::default()),
        Arc::new(FakeNarrative::failing("unused")),
    ))
}

pub fn player(puuid: &str) -> Player {
    Player {
        handle: RiotHandle::new("Tester", "NA1"),
        puuid: PlayerId(puuid.to_string()),
        cluster: RoutingCluster::Americas,
    }
}

/// Ten-player match. `puuids` take the first slots of team 100, which wins.
pub fn match_dto(puuids: &[&str], game_start: i64) -> MatchDto {
    let participants = (1..=10)
        .map(|slot: i64| {
            let puuid = puuids
                .get(slot as usize - 1)
                .map(|p| p.to_string())
                .unwrap_or_else(|| format!("filler-{}", slot));
            ParticipantDto {
                puuid,
                participant_id: slot,
                team_id: if slot <= 5 { 100 } else { 200 },
                champion_name: "Ahri".to_string(),
                team_position: "MIDDLE".to_string(),
                win: slot <= 5,
                kills: 5,
                deaths: 2,
                assists: 7,
                total_damage_dealt_to_champions: 20_000,
                gold_earned: 11_000,
                total_minions_killed: 180,
                vision_score: 25,
                ..ParticipantDto::default()
            }
        })
        .collect();

    MatchDto {
        info: MatchInfoDto {
            game_mode: "CLASSIC".to_string(),
            queue_id: 420,
            game_duration: 1_800,
            game_start_timestamp: game_start,
            game_end_timestamp: Some(game_start + 1_800_000),
            participants,
            teams: vec![
                TeamDto {
                    team_id: 100,
                    win: true,
                    objectives: ObjectivesDto {
                        dragon: Some(ObjectiveDto { first: true, kills: 3 }),
                        ..ObjectivesDto::default()
                    },
                },
                TeamDto {
                    team_id: 200,
                    win: false,
                    objectives: ObjectivesDto::default(),
                },
            ],
        },
    }
}

/// Twenty-minute timeline where `puuid` is participant 1 and steadily out-farms team 200.
pub fn timeline_dto(puuid: &str) -> TimelineDto {
    let frames = (0..=20)
        .map(|minute: i64| {
            let participant_frames = (1..=10)
                .map(|id: i64| {
                    let gold = if id == 1 { 500 + minute * 450 } else { 500 + minute * 400 };
                    (
                        id.to_string(),
                        ParticipantFrameDto {
                            participant_id: Some(id),
                            level: (1 + minute).min(18),
                            total_gold: gold,
                            position: Some(PositionDto {
                                x: (minute * 100) as f64,
                                y: 0.0,
                            }),
                        },
                    )
                })
                .collect();
            let events = if minute == 5 {
                vec![EventDto {
                    kind: "CHAMPION_KILL".to_string(),
                    timestamp: 300_500,
                    killer_id: Some(1),
                    position: Some(PositionDto { x: 7_000.0, y: 7_000.0 }),
                    ..EventDto::default()
                }]
            } else {
                Vec::new()
            };
            FrameDto {
                timestamp: minute * 60_000,
                participant_frames,
                events,
            }
        })
        .collect();

    TimelineDto {
        info: TimelineInfoDto {
            frame_interval: 60_000,
            participants: (1..=10)
                .map(|id| TimelineParticipantDto {
                    participant_id: id,
                    puuid: if id == 1 {
                        puuid.to_string()
                    } else {
                        format!("filler-{}", id)
                    },
                })
                .collect(),
            frames,
        },
    }
}
