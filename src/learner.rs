//! # Adaptive Weight Learner
//! Learns from human advance/pass decisions: dimensions that scored high on
//! advancing companies get a small positive nudge, dimensions that scored
//! low on them a small negative one, and dimensions that scored low on
//! passed companies a smaller confirming nudge.
//!
//! Nudges accumulate in their own adjustment log, never touching the
//! thesis's declared base weights, and are clamped to a symmetric max-drift
//! band around zero. `apply_learned_weights` returns an adjusted copy of the
//! thesis with weights renormalized to exactly 100.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::score::DimensionScore;
use crate::store::LogStore;
use crate::thesis::ThesisConfig;

const EVENTS_KEY: &str = "learning_events";
const ADJUSTMENTS_KEY: &str = "weight_adjustments";
const MAX_EVENTS: usize = 100;
const RECENT_EVENTS: usize = 10;

// Defaults, overridable via env for calibration runs.
const DEFAULT_LEARNING_RATE: f64 = 0.5;
const DEFAULT_MAX_DRIFT: f64 = 10.0;
const PASSED_RATE_FACTOR: f64 = 0.3;

pub const ENV_LEARNING_RATE: &str = "THESIS_LEARNING_RATE";
pub const ENV_MAX_WEIGHT_DRIFT: &str = "THESIS_MAX_WEIGHT_DRIFT";

// Absolute band any adjusted weight is clamped into before renormalization.
const WEIGHT_FLOOR: f64 = 5.0;
const WEIGHT_CEIL: f64 = 50.0;

// Nudge thresholds on raw dimension scores.
const STRONG_SCORE_MIN: f64 = 70.0;
const IRRELEVANT_SCORE_MAX: f64 = 30.0;
const FILTER_SCORE_MAX: f64 = 40.0;

fn parse_env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse::<f64>().ok())
}

/// Per-event nudge size in weight percentage points.
pub fn learning_rate() -> f64 {
    parse_env_f64(ENV_LEARNING_RATE)
        .map(|v| v.clamp(0.05, 5.0))
        .unwrap_or(DEFAULT_LEARNING_RATE)
}

/// Maximum cumulative adjustment away from the declared weight.
pub fn max_drift() -> f64 {
    parse_env_f64(ENV_MAX_WEIGHT_DRIFT)
        .map(|v| v.clamp(1.0, 25.0))
        .unwrap_or(DEFAULT_MAX_DRIFT)
}

/// A human pipeline decision about a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    /// Advanced to investment committee.
    Ic,
    Invested,
    Passed,
}

impl DecisionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionAction::Ic => "ic",
            DecisionAction::Invested => "invested",
            DecisionAction::Passed => "passed",
        }
    }

    fn is_advance(&self) -> bool {
        matches!(self, DecisionAction::Ic | DecisionAction::Invested)
    }
}

/// Persisted record of one decision and the dimension scores behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningEvent {
    #[serde(rename = "companyId")]
    pub company_id: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    pub action: DecisionAction,
    /// Dimension key to raw score at decision time.
    pub dimensions: BTreeMap<String, f64>,
    pub timestamp: DateTime<Utc>,
}

/// One applied nudge, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightAdjustment {
    #[serde(rename = "dimensionKey")]
    pub dimension_key: String,
    #[serde(rename = "originalWeight")]
    pub original_weight: f64,
    #[serde(rename = "adjustedWeight")]
    pub adjusted_weight: f64,
    pub delta: f64,
    pub reason: String,
}

/// Adjustment log entry: cumulative nudge per dimension key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AdjustmentEntry {
    #[serde(rename = "dimensionKey")]
    dimension_key: String,
    value: f64,
}

/// Aggregate view over the learning log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningStats {
    #[serde(rename = "totalEvents")]
    pub total_events: usize,
    pub adjustments: BTreeMap<String, f64>,
    #[serde(rename = "recentEvents")]
    pub recent_events: Vec<LearningEvent>,
}

/// Weight learner over an injected log store.
#[derive(Debug)]
pub struct WeightLearner<S: LogStore> {
    store: S,
}

impl<S: LogStore> WeightLearner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn adjustments(&self) -> BTreeMap<String, f64> {
        self.store
            .get::<AdjustmentEntry>(ADJUSTMENTS_KEY)
            .into_iter()
            .map(|e| (e.dimension_key, e.value))
            .collect()
    }

    fn save_adjustments(&self, adjustments: &BTreeMap<String, f64>) {
        let entries: Vec<AdjustmentEntry> = adjustments
            .iter()
            .map(|(k, v)| AdjustmentEntry {
                dimension_key: k.clone(),
                value: *v,
            })
            .collect();
        self.store.set(ADJUSTMENTS_KEY, &entries);
    }

    /// Record a decision at an explicit time and learn from it.
    /// Returns the nudges applied by this event (possibly empty).
    pub fn record_decision_at(
        &self,
        company_id: &str,
        company_name: &str,
        action: DecisionAction,
        dimension_scores: &[DimensionScore],
        now: DateTime<Utc>,
    ) -> Vec<WeightAdjustment> {
        let dimensions: BTreeMap<String, f64> = dimension_scores
            .iter()
            .map(|d| (d.key.clone(), d.raw_score))
            .collect();

        let mut events: Vec<LearningEvent> = self.store.get(EVENTS_KEY);
        events.push(LearningEvent {
            company_id: company_id.to_string(),
            company_name: company_name.to_string(),
            action,
            dimensions,
            timestamp: now,
        });
        if events.len() > MAX_EVENTS {
            let excess = events.len() - MAX_EVENTS;
            events.drain(0..excess);
        }
        self.store.set(EVENTS_KEY, &events);

        let rate = learning_rate();
        let drift_cap = max_drift();
        let mut adjustments = self.adjustments();
        let mut results = Vec::new();

        for dim in dimension_scores {
            let current = adjustments.get(&dim.key).copied().unwrap_or(0.0);

            if action.is_advance() {
                // Strengthen what scored high on an advancing company.
                if dim.raw_score >= STRONG_SCORE_MIN {
                    let delta = rate.min(drift_cap - current);
                    if delta > 0.0 {
                        adjustments.insert(dim.key.clone(), current + delta);
                        results.push(WeightAdjustment {
                            dimension_key: dim.key.clone(),
                            original_weight: dim.weight,
                            adjusted_weight: dim.weight + current + delta,
                            delta,
                            reason: format!(
                                "High on {} company \"{company_name}\" (score: {})",
                                if action == DecisionAction::Invested { "invested" } else { "IC" },
                                dim.raw_score
                            ),
                        });
                    }
                }
                // Weaken what scored low yet the company still progressed.
                if dim.raw_score < IRRELEVANT_SCORE_MAX {
                    let delta = (-rate).max(-drift_cap - current);
                    if delta < 0.0 {
                        adjustments.insert(dim.key.clone(), current + delta);
                        results.push(WeightAdjustment {
                            dimension_key: dim.key.clone(),
                            original_weight: dim.weight,
                            adjusted_weight: dim.weight + current + delta,
                            delta,
                            reason: format!(
                                "Low on {} company but still progressed; dimension may be less critical",
                                action.as_str()
                            ),
                        });
                    }
                }
            } else if dim.raw_score < FILTER_SCORE_MAX {
                // A low score on a passed company confirms the filter worked.
                let delta = (rate * PASSED_RATE_FACTOR).min(drift_cap - current);
                if delta > 0.0 {
                    adjustments.insert(dim.key.clone(), current + delta);
                    results.push(WeightAdjustment {
                        dimension_key: dim.key.clone(),
                        original_weight: dim.weight,
                        adjusted_weight: dim.weight + current + delta,
                        delta,
                        reason: "Low on passed company; confirms dimension importance".to_string(),
                    });
                }
            }
        }

        self.save_adjustments(&adjustments);
        debug!(
            target: "learner",
            company = company_id,
            action = action.as_str(),
            nudges = results.len(),
            "decision recorded"
        );
        results
    }

    /// Convenience form of [`WeightLearner::record_decision_at`] stamped at
    /// `Utc::now()`.
    pub fn record_decision(
        &self,
        company_id: &str,
        company_name: &str,
        action: DecisionAction,
        dimension_scores: &[DimensionScore],
    ) -> Vec<WeightAdjustment> {
        self.record_decision_at(company_id, company_name, action, dimension_scores, Utc::now())
    }

    /// Apply accumulated adjustments to a thesis, clamping each weight to
    /// [5, 50] and renormalizing so the weights sum to exactly 100. The
    /// input thesis is never mutated.
    pub fn apply_learned_weights(&self, thesis: &ThesisConfig) -> ThesisConfig {
        let adjustments = self.adjustments();
        if adjustments.is_empty() || thesis.dimensions.is_empty() {
            return thesis.clone();
        }

        let mut adjusted = thesis.clone();
        for dim in &mut adjusted.dimensions {
            let nudge = adjustments.get(&dim.key).copied().unwrap_or(0.0);
            dim.weight = (dim.weight + nudge).clamp(WEIGHT_FLOOR, WEIGHT_CEIL);
        }

        let total: f64 = adjusted.dimensions.iter().map(|d| d.weight).sum();
        for dim in &mut adjusted.dimensions {
            dim.weight = (dim.weight / total * 100.0).round();
        }

        // Rounding can leave the sum a point or two off 100; settle the
        // residual on the heaviest dimension so the invariant always holds.
        let rounded_total: f64 = adjusted.dimensions.iter().map(|d| d.weight).sum();
        let residual = 100.0 - rounded_total;
        if residual != 0.0 {
            if let Some(heaviest) = adjusted
                .dimensions
                .iter_mut()
                .max_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(std::cmp::Ordering::Equal))
            {
                heaviest.weight += residual;
            }
        }

        adjusted
    }

    /// Aggregate stats: event count, adjustment map, last 10 events.
    pub fn stats(&self) -> LearningStats {
        let events: Vec<LearningEvent> = self.store.get(EVENTS_KEY);
        let start = events.len().saturating_sub(RECENT_EVENTS);
        LearningStats {
            total_events: events.len(),
            adjustments: self.adjustments(),
            recent_events: events[start..].to_vec(),
        }
    }
}
