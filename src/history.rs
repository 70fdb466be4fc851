//! Request history tracking for debugging and diagnostics.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::runtime::Instant;

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// 2xx response with a valid JSON body.
    Success,
    /// Response with a status outside 200-299.
    HttpError,
    /// 2xx response whose body was not valid JSON.
    InvalidJson,
    /// No response before the client timeout.
    Timeout,
    /// The transport failed before a response arrived.
    TransportError,
}

/// A recorded request in the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub resource: Resource,
    pub url: String,
    /// Status code, when the device answered.
    pub status: Option<u16>,
    pub outcome: Outcome,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Tracks issued requests for debugging.
#[derive(Debug, Clone)]
pub struct RequestHistory {
    counts: HashMap<Outcome, usize>,
    last_error: Option<String>,
    start_time: Instant,
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for RequestHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            last_error: None,
            start_time: Instant::now(),
            entries: VecDeque::new(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    pub fn record(
        &mut self,
        resource: Resource,
        url: &str,
        status: Option<u16>,
        outcome: Outcome,
    ) {
        *self.counts.entry(outcome).or_default() += 1;

        self.entries.push_back(HistoryEntry {
            resource,
            url: url.to_string(),
            status,
            outcome,
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });

        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn record_error(&mut self, error: &str) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.entries.clear();
        self.last_error = None;
    }

    pub fn summary(&self) -> HistorySummary {
        let count = |o: Outcome| self.counts.get(&o).copied().unwrap_or(0);
        let success_count = count(Outcome::Success);
        let request_count: usize = self.counts.values().sum();
        HistorySummary {
            request_count,
            success_count,
            failure_count: request_count - success_count,
            timeout_count: count(Outcome::Timeout),
            total_entries: self.entries.len(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Summary of request history for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySummary {
    pub request_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub timeout_count: usize,
    pub total_entries: usize,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_request() {
        let mut history = RequestHistory::new();
        history.record(
            Resource::Info,
            "http://10.0.0.2/json/info",
            Some(200),
            Outcome::Success,
        );

        assert_eq!(history.len(), 1);
        let entry = history.entries().next().unwrap();
        assert_eq!(entry.resource, Resource::Info);
        assert_eq!(entry.status, Some(200));
    }

    #[test]
    fn test_record_error() {
        let mut history = RequestHistory::new();
        history.record_error("request timed out");
        assert_eq!(history.last_error(), Some("request timed out"));
    }

    #[test]
    fn test_max_entries() {
        let mut history = RequestHistory::with_max_entries(2);
        for status in [200, 500, 404, 200, 200] {
            history.record(Resource::State, "u", Some(status), Outcome::Success);
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.summary().request_count, 5);
    }

    #[test]
    fn test_summary() {
        let mut history = RequestHistory::new();
        history.record(Resource::Info, "u", Some(200), Outcome::Success);
        history.record(Resource::State, "u", Some(500), Outcome::HttpError);
        history.record(Resource::Presets, "u", None, Outcome::Timeout);
        history.record_error("boom");

        let summary = history.summary();
        assert_eq!(summary.request_count, 3);
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 2);
        assert_eq!(summary.timeout_count, 1);
        assert_eq!(summary.last_error.as_deref(), Some("boom"));

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.summary().request_count, 0);
    }
}
