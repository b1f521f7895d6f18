//! Request counters reported by the health endpoint.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Server metrics.
pub struct Metrics {
    /// Rate lookups answered.
    pub lookups: AtomicU64,
    /// Rate lookups with no direct or inverse entry.
    pub lookups_not_found: AtomicU64,
    /// Amount conversions performed.
    pub conversions: AtomicU64,
    /// Successful add, update and delete operations.
    pub mutations: AtomicU64,
    /// Mutation requests refused by the auth gate.
    pub auth_rejected: AtomicU64,
}

impl Metrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            lookups: AtomicU64::new(0),
            lookups_not_found: AtomicU64::new(0),
            conversions: AtomicU64::new(0),
            mutations: AtomicU64::new(0),
            auth_rejected: AtomicU64::new(0),
        }
    }

    pub fn lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn lookup_not_found(&self) {
        self.lookups_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn conversion(&self) {
        self.conversions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mutation(&self) {
        self.mutations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn auth_rejection(&self) {
        self.auth_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            lookups_not_found: self.lookups_not_found.load(Ordering::Relaxed),
            conversions: self.conversions.load(Ordering::Relaxed),
            mutations: self.mutations.load(Ordering::Relaxed),
            auth_rejected: self.auth_rejected.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub lookups: u64,
    pub lookups_not_found: u64,
    pub conversions: u64,
    pub mutations: u64,
    pub auth_rejected: u64,
}

/// Shared metrics instance.
pub type SharedMetrics = Arc<Metrics>;
