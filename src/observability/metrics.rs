//! Request counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Relaxed atomics; exact ordering between counters is not needed

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the HTTP surface
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    requests: AtomicU64,
    client_errors: AtomicU64,
    server_errors: AtomicU64,
    employees_created: AtomicU64,
    employees_updated: AtomicU64,
    employees_deleted: AtomicU64,
}

/// Point-in-time copy of all counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub client_errors: u64,
    pub server_errors: u64,
    pub employees_created: u64,
    pub employees_updated: u64,
    pub employees_deleted: u64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a finished request by its status code
    pub fn record_response(&self, status: u16) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        match status {
            400..=499 => {
                self.client_errors.fetch_add(1, Ordering::Relaxed);
            }
            500..=599 => {
                self.server_errors.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    pub fn increment_created(&self) {
        self.employees_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_updated(&self) {
        self.employees_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deleted(&self) {
        self.employees_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
            employees_created: self.employees_created.load(Ordering::Relaxed),
            employees_updated: self.employees_updated.load(Ordering::Relaxed),
            employees_deleted: self.employees_deleted.load(Ordering::Relaxed),
        }
    }
}
