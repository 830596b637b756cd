use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Board-level operation behind a workflow API request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    /// Fetching one workflow or the filtered list
    Reload,
    StatusUpdate,
    AssigneeUpdate,
    WorkflowCreate,
}

/// Workflow API usage counters, one set per client
#[derive(Debug, Default)]
pub struct ApiMetrics {
    pub total_requests: AtomicU64,
    pub rate_limit_hits: AtomicU64,
    pub errors: AtomicU64,
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub reloads: AtomicU64,
    pub status_updates: AtomicU64,
    pub assignee_updates: AtomicU64,
    pub workflows_created: AtomicU64,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limit_hit(&self) {
        self.rate_limit_hits.fetch_add(1, Ordering::Relaxed);
        warn!("Workflow API rate limit hit");
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_call(&self, call: BoardCall) {
        let counter = match call {
            BoardCall::Reload => &self.reloads,
            BoardCall::StatusUpdate => &self.status_updates,
            BoardCall::AssigneeUpdate => &self.assignee_updates,
            BoardCall::WorkflowCreate => &self.workflows_created,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> ApiStats {
        ApiStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            rate_limit_hits: self.rate_limit_hits.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            reloads: self.reloads.load(Ordering::Relaxed),
            status_updates: self.status_updates.load(Ordering::Relaxed),
            assignee_updates: self.assignee_updates.load(Ordering::Relaxed),
            workflows_created: self.workflows_created.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            total_requests = stats.total_requests,
            rate_limit_hits = stats.rate_limit_hits,
            errors = stats.errors,
            cache_hits = stats.cache_hits,
            cache_misses = stats.cache_misses,
            reloads = stats.reloads,
            mutations = stats.mutations(),
            reloads_per_mutation = stats.reloads_per_mutation(),
            "Workflow API metrics"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiStats {
    pub total_requests: u64,
    pub rate_limit_hits: u64,
    pub errors: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub reloads: u64,
    pub status_updates: u64,
    pub assignee_updates: u64,
    pub workflows_created: u64,
}

impl ApiStats {
    /// Requests that change server state
    pub fn mutations(&self) -> u64 {
        self.status_updates + self.assignee_updates + self.workflows_created
    }

    /// Every mutation is followed by a reload, so this sits at or above 1.0
    /// unless mutations failed. None before the first mutation.
    pub fn reloads_per_mutation(&self) -> Option<f64> {
        match self.mutations() {
            0 => None,
            mutations => Some(self.reloads as f64 / mutations as f64),
        }
    }
}
