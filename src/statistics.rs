use crate::scanner::ScanResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::VecDeque;

/// High-risk threshold used for the aggregate counters.
const HIGH_RISK_THRESHOLD: u32 = 70;

/// History is bounded; the oldest entry is evicted past this cap.
const HISTORY_CAP: usize = 100;

/// Compact record of one scan, kept in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scan_id: String,
    pub score: u32,
    pub band_label: String,
    pub category_label: String,
    pub url_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_scans: u64,
    pub high_risk_scans: u64,
    pub low_risk_scans: u64,
    pub category_counts: HashMap<String, u64>,
}

/// In-memory scan history plus running counters. Implements the persistence
/// collaborator the engine itself stays agnostic of; embedders call
/// `record` after each scan if they want history at all.
#[derive(Debug, Default)]
pub struct StatisticsCollector {
    history: VecDeque<ScanSummary>,
    stats: GlobalStats,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &ScanResult) {
        self.stats.total_scans += 1;
        if result.score >= HIGH_RISK_THRESHOLD {
            self.stats.high_risk_scans += 1;
        } else {
            self.stats.low_risk_scans += 1;
        }
        *self
            .stats
            .category_counts
            .entry(result.category.label.clone())
            .or_insert(0) += 1;

        if self.history.len() == HISTORY_CAP {
            self.history.pop_front();
        }
        self.history.push_back(ScanSummary {
            scan_id: result.scan_id.clone(),
            score: result.score,
            band_label: result.band_label.clone(),
            category_label: result.category.label.clone(),
            url_count: result.url_count,
            timestamp: result.timestamp,
        });
    }

    pub fn stats(&self) -> &GlobalStats {
        &self.stats
    }

    /// Newest-last history snapshot.
    pub fn history(&self) -> impl Iterator<Item = &ScanSummary> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
