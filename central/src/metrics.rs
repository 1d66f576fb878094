use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters for the Inventory Mutation Engine's four failure
/// paths plus successes, the Rust analogue of the source's
/// `prometheus_client` registry. Lock-free: plain atomics bumped on the
/// request path, read by an operator-facing `/metrics`-style accessor.
#[derive(Default)]
pub struct Metrics {
    pub inventory_updates_total: AtomicU64,
    pub inventory_not_found_total: AtomicU64,
    pub inventory_conflicts_total: AtomicU64,
    pub inventory_insufficient_quantity_total: AtomicU64,
    pub inventory_internal_failures_total: AtomicU64,
    pub bulk_sync_total: AtomicU64,
}

impl Metrics {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inventory_updates_total: self.inventory_updates_total.load(Ordering::Relaxed),
            inventory_not_found_total: self.inventory_not_found_total.load(Ordering::Relaxed),
            inventory_conflicts_total: self.inventory_conflicts_total.load(Ordering::Relaxed),
            inventory_insufficient_quantity_total: self
                .inventory_insufficient_quantity_total
                .load(Ordering::Relaxed),
            inventory_internal_failures_total: self
                .inventory_internal_failures_total
                .load(Ordering::Relaxed),
            bulk_sync_total: self.bulk_sync_total.load(Ordering::Relaxed),
        }
    }

    pub fn incr_updates(&self) {
        self.inventory_updates_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_not_found(&self) {
        self.inventory_not_found_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_conflict(&self) {
        self.inventory_conflicts_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_insufficient_quantity(&self) {
        self.inventory_insufficient_quantity_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_internal_failure(&self) {
        self.inventory_internal_failures_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_bulk_sync(&self) {
        self.bulk_sync_total.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(serde::Serialize)]
pub struct MetricsSnapshot {
    pub inventory_updates_total: u64,
    pub inventory_not_found_total: u64,
    pub inventory_conflicts_total: u64,
    pub inventory_insufficient_quantity_total: u64,
    pub inventory_internal_failures_total: u64,
    pub bulk_sync_total: u64,
}
