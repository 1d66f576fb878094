//! Observability counters for the Sync Worker (4.H) — the store-side
//! analogue of `central::metrics`. Grounded on
//! `examples/original_source/store_services/app/observability.py`'s
//! `sync_attempts_total`/`sync_success_total`/`sync_conflicts_total`/
//! `sync_failures_total` counters and `inventory_count`/
//! `pending_changes_gauge` gauges, refreshed the way
//! `app/services/sync_service.py`'s `process_pending_once` does.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct Metrics {
    pub sync_attempts_total: AtomicU64,
    pub sync_success_total: AtomicU64,
    pub sync_conflicts_total: AtomicU64,
    pub sync_failures_total: AtomicU64,
    pub inventory_count: AtomicI64,
    pub pending_changes_gauge: AtomicI64,
    last_sync_duration_ms: AtomicU64,
}

impl Metrics {
    pub fn incr_attempt(&self) {
        self.sync_attempts_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_success(&self) {
        self.sync_success_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_conflict(&self) {
        self.sync_conflicts_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_failure(&self) {
        self.sync_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_inventory_count(&self, count: i64) {
        self.inventory_count.store(count, Ordering::Relaxed);
    }

    pub fn set_pending_changes_gauge(&self, count: i64) {
        self.pending_changes_gauge.store(count, Ordering::Relaxed);
    }

    pub fn record_sync_duration(&self, duration: Duration) {
        self.last_sync_duration_ms
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sync_attempts_total: self.sync_attempts_total.load(Ordering::Relaxed),
            sync_success_total: self.sync_success_total.load(Ordering::Relaxed),
            sync_conflicts_total: self.sync_conflicts_total.load(Ordering::Relaxed),
            sync_failures_total: self.sync_failures_total.load(Ordering::Relaxed),
            inventory_count: self.inventory_count.load(Ordering::Relaxed),
            pending_changes_gauge: self.pending_changes_gauge.load(Ordering::Relaxed),
            sync_duration_seconds: self.last_sync_duration_ms.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}

#[derive(serde::Serialize)]
pub struct MetricsSnapshot {
    pub sync_attempts_total: u64,
    pub sync_success_total: u64,
    pub sync_conflicts_total: u64,
    pub sync_failures_total: u64,
    pub inventory_count: i64,
    pub pending_changes_gauge: i64,
    pub sync_duration_seconds: f64,
}
