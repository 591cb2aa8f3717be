use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    sync_requests: AtomicU64,
    matches_ingested: AtomicU64,
    items_skipped: AtomicU64,
    throttle_events: AtomicU64,
    timelines_processed: AtomicU64,
    persistence_failures: AtomicU64,
}

impl Metrics {
    pub fn record_sync_request(&self) {
        self.sync_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ingested(&self, count: usize) {
        self.matches_ingested
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.items_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_throttle(&self) {
        self.throttle_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timelines(&self, count: usize) {
        self.timelines_processed
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_persistence_failure(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn throttle_events(&self) -> u64 {
        self.throttle_events.load(Ordering::Relaxed)
    }

    pub fn items_skipped(&self) -> u64 {
        self.items_skipped.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let sync_requests = self.sync_requests.load(Ordering::Relaxed);
        let ingested = self.matches_ingested.load(Ordering::Relaxed);
        let skipped = self.items_skipped.load(Ordering::Relaxed);
        let throttles = self.throttle_events.load(Ordering::Relaxed);
        let timelines = self.timelines_processed.load(Ordering::Relaxed);
        let failures = self.persistence_failures.load(Ordering::Relaxed);

        format!(
            "# TYPE rewind_sync_requests_total counter\n\
rewind_sync_requests_total {}\n\
# TYPE rewind_matches_ingested_total counter\n\
rewind_matches_ingested_total {}\n\
# TYPE rewind_items_skipped_total counter\n\
rewind_items_skipped_total {}\n\
# TYPE rewind_throttle_events_total counter\n\
rewind_throttle_events_total {}\n\
# TYPE rewind_timelines_processed_total counter\n\
rewind_timelines_processed_total {}\n\
# TYPE rewind_persistence_failures_total counter\n\
rewind_persistence_failures_total {}\n",
            sync_requests, ingested, skipped, throttles, timelines, failures
        )
    }
}
