//! # Momentum Engine
//! Signal-velocity index: how much verified activity a company is generating
//! right now. Each signal contributes `recency_decay x confidence x
//! type_weight x 10`; the trend compares the last 30 days against the prior
//! 31-90 day window normalized to a monthly rate.
//!
//! Confidence weights here (1.0/0.6/0.3) deliberately differ from the
//! traction scorer's multipliers; momentum punishes weak sourcing harder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{days_since, Company, SignalConfidence, SignalType};

const LEVEL_HIGH_MIN: f64 = 60.0;
const LEVEL_EMERGING_MIN: f64 = 30.0;
const ACCELERATION_RATIO: f64 = 1.3;
const DECELERATION_RATIO: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentumLevel {
    High,
    Emerging,
    Stale,
}

impl MomentumLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= LEVEL_HIGH_MIN {
            MomentumLevel::High
        } else if score >= LEVEL_EMERGING_MIN {
            MomentumLevel::Emerging
        } else {
            MomentumLevel::Stale
        }
    }

    /// ASCII display text for console/report output.
    pub fn label(&self) -> &'static str {
        match self {
            MomentumLevel::High => "High Momentum",
            MomentumLevel::Emerging => "Emerging",
            MomentumLevel::Stale => "Stale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentumTrend {
    Accelerating,
    Steady,
    Decelerating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumResult {
    pub score: f64,
    pub level: MomentumLevel,
    /// Signals in the last 30 days (per-month rate).
    #[serde(rename = "signalVelocity")]
    pub signal_velocity: f64,
    pub trend: MomentumTrend,
}

/// Five-step recency decay, much steeper than the traction scorer's: a
/// 6-month-old signal is nearly worthless for momentum.
fn recency_decay(days: i64) -> f64 {
    if days <= 7 {
        1.0
    } else if days <= 30 {
        0.8
    } else if days <= 90 {
        0.5
    } else if days <= 180 {
        0.25
    } else {
        0.1
    }
}

fn confidence_weight(confidence: SignalConfidence) -> f64 {
    match confidence {
        SignalConfidence::High => 1.0,
        SignalConfidence::Medium => 0.6,
        SignalConfidence::Low => 0.3,
    }
}

fn type_weight(signal_type: SignalType) -> f64 {
    match signal_type {
        SignalType::Funding => 3.0,
        SignalType::Partnership => 2.5,
        SignalType::Product => 2.0,
        SignalType::Hiring => 1.8,
        SignalType::Press => 1.5,
        SignalType::Github => 1.2,
        SignalType::Leadership => 1.0,
        SignalType::Other => 0.5,
    }
}

/// Compute momentum at an explicit evaluation time.
pub fn calculate_momentum_at(company: &Company, now: DateTime<Utc>) -> MomentumResult {
    if company.signals.is_empty() {
        return MomentumResult {
            score: 0.0,
            level: MomentumLevel::Stale,
            signal_velocity: 0.0,
            trend: MomentumTrend::Decelerating,
        };
    }

    let mut score = 0.0;
    for signal in &company.signals {
        let days = days_since(now, signal.timestamp);
        score += recency_decay(days)
            * confidence_weight(signal.confidence)
            * type_weight(signal.signal_type)
            * 10.0;
    }
    let score = score.round().min(100.0);

    let recent = company
        .signals
        .iter()
        .filter(|s| days_since(now, s.timestamp) <= 30)
        .count();
    let older = company
        .signals
        .iter()
        .filter(|s| {
            let days = days_since(now, s.timestamp);
            days > 30 && days <= 90
        })
        .count();

    let signal_velocity = recent as f64;
    // The prior window spans two months, so halve it for a monthly rate.
    let prior_velocity = older as f64 / 2.0;

    let trend = if signal_velocity > prior_velocity * ACCELERATION_RATIO {
        MomentumTrend::Accelerating
    } else if signal_velocity < prior_velocity * DECELERATION_RATIO {
        MomentumTrend::Decelerating
    } else {
        MomentumTrend::Steady
    };

    MomentumResult {
        score,
        level: MomentumLevel::from_score(score),
        signal_velocity,
        trend,
    }
}

/// Convenience form of [`calculate_momentum_at`] evaluated at `Utc::now()`.
pub fn calculate_momentum(company: &Company) -> MomentumResult {
    calculate_momentum_at(company, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FundingStage, Sector, Signal};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn mk_company(signals: Vec<Signal>) -> Company {
        Company {
            id: "c1".to_string(),
            name: "Acme".to_string(),
            tagline: String::new(),
            description: String::new(),
            sector: Sector::AiMl,
            stage: FundingStage::Seed,
            geography: "US".to_string(),
            founded_year: 2023,
            headcount: None,
            last_funding_amount: None,
            last_funding_date: None,
            total_raised: None,
            founder_names: Vec::new(),
            tags: Vec::new(),
            signals,
            enrichment: None,
        }
    }

    fn mk_signal(signal_type: SignalType, confidence: SignalConfidence, days_ago: i64) -> Signal {
        Signal {
            id: format!("s{days_ago}"),
            signal_type,
            title: "event".to_string(),
            description: String::new(),
            source: "feed".to_string(),
            timestamp: fixed_now() - chrono::Duration::days(days_ago),
            confidence,
            is_new: false,
        }
    }

    #[test]
    fn zero_signals_is_exactly_stale() {
        let result = calculate_momentum_at(&mk_company(Vec::new()), fixed_now());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.level, MomentumLevel::Stale);
        assert_eq!(result.signal_velocity, 0.0);
        assert_eq!(result.trend, MomentumTrend::Decelerating);
    }

    #[test]
    fn fresh_funding_dominates_the_score() {
        // 1.0 x 1.0 x 3.0 x 10 = 30 -> Emerging
        let result = calculate_momentum_at(
            &mk_company(vec![mk_signal(SignalType::Funding, SignalConfidence::High, 3)]),
            fixed_now(),
        );
        assert_eq!(result.score, 30.0);
        assert_eq!(result.level, MomentumLevel::Emerging);
        assert_eq!(result.trend, MomentumTrend::Accelerating);
    }

    #[test]
    fn burst_of_recent_signals_reads_high() {
        let signals = vec![
            mk_signal(SignalType::Funding, SignalConfidence::High, 2),
            mk_signal(SignalType::Partnership, SignalConfidence::High, 5),
            mk_signal(SignalType::Product, SignalConfidence::Medium, 10),
        ];
        let result = calculate_momentum_at(&mk_company(signals), fixed_now());
        // 30 + 25 + round contribution of 0.8*0.6*2.0*10 = 9.6 -> 64.6 -> 65
        assert_eq!(result.score, 65.0);
        assert_eq!(result.level, MomentumLevel::High);
    }

    #[test]
    fn old_activity_decelerates() {
        let signals = vec![
            mk_signal(SignalType::Press, SignalConfidence::High, 45),
            mk_signal(SignalType::Press, SignalConfidence::High, 60),
            mk_signal(SignalType::Press, SignalConfidence::High, 80),
        ];
        let result = calculate_momentum_at(&mk_company(signals), fixed_now());
        // velocity 0 vs prior 1.5/month
        assert_eq!(result.signal_velocity, 0.0);
        assert_eq!(result.trend, MomentumTrend::Decelerating);
    }

    #[test]
    fn balanced_windows_read_steady() {
        let signals = vec![
            mk_signal(SignalType::Press, SignalConfidence::High, 10),
            mk_signal(SignalType::Press, SignalConfidence::High, 45),
            mk_signal(SignalType::Press, SignalConfidence::High, 70),
        ];
        // velocity 1 vs prior 1.0/month: inside both ratio bands.
        let result = calculate_momentum_at(&mk_company(signals), fixed_now());
        assert_eq!(result.trend, MomentumTrend::Steady);
    }

    #[test]
    fn score_clamps_at_100() {
        let signals = (0..10)
            .map(|i| mk_signal(SignalType::Funding, SignalConfidence::High, i))
            .collect();
        let result = calculate_momentum_at(&mk_company(signals), fixed_now());
        assert_eq!(result.score, 100.0);
        assert_eq!(result.level, MomentumLevel::High);
    }

    #[test]
    fn level_labels_are_ascii() {
        assert_eq!(MomentumLevel::High.label(), "High Momentum");
        assert_eq!(MomentumLevel::Stale.label(), "Stale");
    }
}
