//! # Score Drift Tracker
//! Append-only score history per company with week-over-week deltas.
//!
//! The log is capped at 50 snapshots (oldest dropped) and deduplicated:
//! re-scoring an unchanged company within an hour does not grow the log.
//! Drift compares the latest snapshot against the one closest to the 7-day
//! lookback point and names the dimensions that moved.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::score::ScoreResult;
use crate::store::LogStore;

const MAX_SNAPSHOTS: usize = 50;
const DEDUP_WINDOW_MINUTES: i64 = 60;
const LOOKBACK_DAYS: i64 = 7;
const DIMENSION_DELTA_MIN: f64 = 5.0;

/// One point in a company's score time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    #[serde(rename = "companyId")]
    pub company_id: String,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
    /// Dimension key to raw score, for per-dimension drift reasons.
    pub dimensions: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftDirection {
    Up,
    Down,
    Stable,
}

/// Week-over-week movement between the latest snapshot and the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDrift {
    #[serde(rename = "currentScore")]
    pub current_score: f64,
    #[serde(rename = "previousScore")]
    pub previous_score: f64,
    pub delta: f64,
    #[serde(rename = "deltaPercent")]
    pub delta_percent: f64,
    pub direction: DriftDirection,
    /// Human-readable per-dimension moves, e.g. "Traction Signals +12".
    pub reasons: Vec<String>,
    /// "today", "this week", or "Nd ago".
    pub period: String,
}

/// Tracks score snapshots in an injected log store.
#[derive(Debug)]
pub struct DriftTracker<S: LogStore> {
    store: S,
}

fn history_key(company_id: &str) -> String {
    format!("score_history_{company_id}")
}

/// "traction_signals" -> "Traction Signals".
fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl<S: LogStore> DriftTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a snapshot unless the score is unchanged and the previous
    /// snapshot is less than an hour old. Returns whether the log grew.
    pub fn record_at(
        &self,
        company_id: &str,
        score: f64,
        dimensions: BTreeMap<String, f64>,
        now: DateTime<Utc>,
    ) -> bool {
        let key = history_key(company_id);
        let mut snapshots: Vec<ScoreSnapshot> = self.store.get(&key);

        if let Some(last) = snapshots.last() {
            if last.score == score && now - last.timestamp < Duration::minutes(DEDUP_WINDOW_MINUTES) {
                debug!(target: "drift", company = company_id, "snapshot deduplicated");
                return false;
            }
        }

        snapshots.push(ScoreSnapshot {
            company_id: company_id.to_string(),
            score,
            timestamp: now,
            dimensions,
        });

        if snapshots.len() > MAX_SNAPSHOTS {
            let excess = snapshots.len() - MAX_SNAPSHOTS;
            snapshots.drain(0..excess);
        }

        self.store.set(&key, &snapshots);
        true
    }

    /// Record the totals and per-dimension raw scores of a fresh result.
    pub fn record_result_at(&self, company_id: &str, result: &ScoreResult, now: DateTime<Utc>) -> bool {
        let dimensions = result
            .dimensions
            .iter()
            .map(|d| (d.key.clone(), d.raw_score))
            .collect();
        self.record_at(company_id, result.total, dimensions, now)
    }

    /// Convenience form of [`DriftTracker::record_at`] stamped at `Utc::now()`.
    pub fn record(&self, company_id: &str, score: f64, dimensions: BTreeMap<String, f64>) -> bool {
        self.record_at(company_id, score, dimensions, Utc::now())
    }

    /// Week-over-week drift, or `None` with fewer than two snapshots.
    pub fn drift_at(&self, company_id: &str, now: DateTime<Utc>) -> Option<ScoreDrift> {
        let snapshots: Vec<ScoreSnapshot> = self.store.get(&history_key(company_id));
        if snapshots.len() < 2 {
            return None;
        }

        let current = snapshots.last()?;
        let lookback = now - Duration::days(LOOKBACK_DAYS);
        let previous = snapshots
            .iter()
            .min_by_key(|snap| (snap.timestamp - lookback).num_seconds().abs())?;

        let delta = ((current.score - previous.score) * 10.0).round() / 10.0;
        let delta_percent = if previous.score > 0.0 {
            (delta / previous.score * 100.0).round()
        } else {
            0.0
        };
        let direction = if delta > 1.0 {
            DriftDirection::Up
        } else if delta < -1.0 {
            DriftDirection::Down
        } else {
            DriftDirection::Stable
        };

        let mut reasons = Vec::new();
        for (key, current_val) in &current.dimensions {
            let previous_val = previous.dimensions.get(key).copied().unwrap_or(0.0);
            let dim_delta = current_val - previous_val;
            if dim_delta.abs() >= DIMENSION_DELTA_MIN {
                reasons.push(format!("{} {:+}", humanize_key(key), dim_delta.round()));
            }
        }

        let days_back = (now - previous.timestamp).num_days();
        let period = if days_back <= 1 {
            "today".to_string()
        } else if days_back <= 7 {
            "this week".to_string()
        } else {
            format!("{days_back}d ago")
        };

        Some(ScoreDrift {
            current_score: current.score,
            previous_score: previous.score,
            delta,
            delta_percent,
            direction,
            reasons,
            period,
        })
    }

    /// Convenience form of [`DriftTracker::drift_at`] evaluated at `Utc::now()`.
    pub fn drift(&self, company_id: &str) -> Option<ScoreDrift> {
        self.drift_at(company_id, Utc::now())
    }

    /// The most recent snapshots, oldest first, up to `limit`.
    pub fn timeline(&self, company_id: &str, limit: usize) -> Vec<ScoreSnapshot> {
        let snapshots: Vec<ScoreSnapshot> = self.store.get(&history_key(company_id));
        let start = snapshots.len().saturating_sub(limit);
        snapshots[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn dims(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn unchanged_score_within_an_hour_is_skipped() {
        let tracker = DriftTracker::new(MemoryStore::new());
        let now = fixed_now();
        assert!(tracker.record_at("c1", 60.0, dims(&[]), now));
        assert!(!tracker.record_at("c1", 60.0, dims(&[]), now + Duration::minutes(30)));
        assert_eq!(tracker.timeline("c1", 10).len(), 1);

        // Changed score records even inside the window.
        assert!(tracker.record_at("c1", 61.0, dims(&[]), now + Duration::minutes(40)));
        // Unchanged score past the window records too.
        assert!(tracker.record_at("c1", 61.0, dims(&[]), now + Duration::hours(2)));
        assert_eq!(tracker.timeline("c1", 10).len(), 3);
    }

    #[test]
    fn log_caps_at_fifty_keeping_newest() {
        let tracker = DriftTracker::new(MemoryStore::new());
        let now = fixed_now();
        for i in 0..60i64 {
            tracker.record_at("c1", i as f64, dims(&[]), now + Duration::hours(2 * i));
        }
        let timeline = tracker.timeline("c1", 100);
        assert_eq!(timeline.len(), 50);
        assert_eq!(timeline.first().unwrap().score, 10.0);
        assert_eq!(timeline.last().unwrap().score, 59.0);
    }

    #[test]
    fn drift_needs_two_snapshots() {
        let tracker = DriftTracker::new(MemoryStore::new());
        tracker.record_at("c1", 50.0, dims(&[]), fixed_now());
        assert!(tracker.drift_at("c1", fixed_now()).is_none());
    }

    #[test]
    fn drift_picks_snapshot_closest_to_week_ago() {
        let tracker = DriftTracker::new(MemoryStore::new());
        let now = fixed_now();
        tracker.record_at("c1", 40.0, dims(&[]), now - Duration::days(20));
        tracker.record_at("c1", 50.0, dims(&[]), now - Duration::days(8));
        tracker.record_at("c1", 55.0, dims(&[]), now - Duration::days(2));
        tracker.record_at("c1", 58.0, dims(&[]), now);

        let drift = tracker.drift_at("c1", now).expect("drift");
        // Baseline is the 8-day-old snapshot, not the 20-day-old one.
        assert_eq!(drift.previous_score, 50.0);
        assert_eq!(drift.current_score, 58.0);
        assert_eq!(drift.delta, 8.0);
        assert_eq!(drift.direction, DriftDirection::Up);
        assert_eq!(drift.period, "8d ago");
        assert_eq!(drift.delta_percent, 16.0);
    }

    #[test]
    fn dimension_moves_become_reasons() {
        let tracker = DriftTracker::new(MemoryStore::new());
        let now = fixed_now();
        tracker.record_at(
            "c1",
            50.0,
            dims(&[("traction_signals", 20.0), ("sector_fit", 60.0)]),
            now - Duration::days(7),
        );
        tracker.record_at(
            "c1",
            62.0,
            dims(&[("traction_signals", 45.0), ("sector_fit", 62.0)]),
            now,
        );

        let drift = tracker.drift_at("c1", now).expect("drift");
        assert_eq!(drift.reasons, vec!["Traction Signals +25".to_string()]);
    }

    #[test]
    fn small_delta_reads_stable() {
        let tracker = DriftTracker::new(MemoryStore::new());
        let now = fixed_now();
        tracker.record_at("c1", 50.0, dims(&[]), now - Duration::days(7));
        tracker.record_at("c1", 50.5, dims(&[]), now);
        let drift = tracker.drift_at("c1", now).expect("drift");
        assert_eq!(drift.direction, DriftDirection::Stable);
    }

    #[test]
    fn humanize_converts_snake_case() {
        assert_eq!(humanize_key("traction_signals"), "Traction Signals");
        assert_eq!(humanize_key("sector_fit"), "Sector Fit");
    }
}
