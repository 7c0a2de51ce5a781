//! # Risk Engine
//! Independent additive risk model, intentionally separate from the thesis
//! score: each factor is computed on its own and the contributions are
//! summed, capped at 100. Evaluation order never affects the total.
//!
//! Factors: signal sparsity, funding staleness, stage-traction mismatch,
//! unknown founders, missing enrichment, no hiring activity, small team at
//! late stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{days_since, Company, EnrichmentPayload, FundingStage, SignalConfidence, SignalType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    High,
    Medium,
    Low,
}

/// One fired risk rule with its 0-100 contribution and literal reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub key: String,
    pub label: String,
    pub severity: RiskSeverity,
    pub score: f64,
    pub reason: String,
}

impl RiskFactor {
    fn new(key: &str, label: &str, severity: RiskSeverity, score: f64, reason: String) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            severity,
            score,
            reason,
        }
    }
}

/// Risk grade bucketed at the 20/40/60 thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskGrade {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Very High Risk")]
    VeryHigh,
}

impl RiskGrade {
    pub fn from_total(total: f64) -> Self {
        if total >= 60.0 {
            RiskGrade::VeryHigh
        } else if total >= 40.0 {
            RiskGrade::High
        } else if total >= 20.0 {
            RiskGrade::Moderate
        } else {
            RiskGrade::Low
        }
    }
}

impl fmt::Display for RiskGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskGrade::Low => "Low Risk",
            RiskGrade::Moderate => "Moderate Risk",
            RiskGrade::High => "High Risk",
            RiskGrade::VeryHigh => "Very High Risk",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    #[serde(rename = "totalRisk")]
    pub total_risk: f64,
    pub grade: RiskGrade,
    pub factors: Vec<RiskFactor>,
    pub summary: String,
}

/// Evaluate all risk factors for a company at an explicit time.
pub fn calculate_risk_at(
    company: &Company,
    enrichment: Option<&EnrichmentPayload>,
    now: DateTime<Utc>,
) -> RiskResult {
    let mut factors = Vec::new();

    // 1. Signal sparsity (up to 25).
    let signal_count = company.signals.len();
    if signal_count == 0 {
        factors.push(RiskFactor::new(
            "signal_sparsity",
            "Signal Sparsity",
            RiskSeverity::High,
            25.0,
            "No signals detected; limited visibility into company activity".to_string(),
        ));
    } else if signal_count < 3 {
        factors.push(RiskFactor::new(
            "signal_sparsity",
            "Signal Sparsity",
            RiskSeverity::Medium,
            12.0,
            format!("Only {signal_count} signal(s); limited coverage"),
        ));
    }

    // 2. Funding staleness (up to 20), or unknown funding (15).
    match company.last_funding_date {
        Some(funded_at) => {
            let days = days_since(now, funded_at);
            let months = (days as f64 / 30.0).round() as i64;
            if days > 365 {
                factors.push(RiskFactor::new(
                    "funding_stale",
                    "Stale Funding",
                    RiskSeverity::High,
                    20.0,
                    format!("Last funding was {months} months ago; runway concerns"),
                ));
            } else if days > 180 {
                factors.push(RiskFactor::new(
                    "funding_stale",
                    "Aging Funding",
                    RiskSeverity::Medium,
                    10.0,
                    format!("Last funding was {months} months ago"),
                ));
            }
        }
        None => {
            factors.push(RiskFactor::new(
                "funding_unknown",
                "Unknown Funding",
                RiskSeverity::Medium,
                15.0,
                "No funding data available".to_string(),
            ));
        }
    }

    // 3. Stage-traction mismatch (15).
    let high_conf = company.signals_with_confidence(SignalConfidence::High);
    if matches!(company.stage, FundingStage::SeriesA | FundingStage::SeriesB) && high_conf < 2 {
        factors.push(RiskFactor::new(
            "stage_traction_mismatch",
            "Stage-Traction Gap",
            RiskSeverity::Medium,
            15.0,
            format!(
                "{} stage but only {high_conf} high-confidence signals",
                company.stage.as_str()
            ),
        ));
    }

    // 4. Unknown founders (15).
    let founders_unknown = company.founder_names.is_empty()
        || (company.founder_names.len() == 1 && company.founder_names[0] == "Unknown");
    if founders_unknown {
        factors.push(RiskFactor::new(
            "founder_unknown",
            "Unknown Founders",
            RiskSeverity::High,
            15.0,
            "No founder information available; no way to assess team quality".to_string(),
        ));
    }

    // 5. Absent or non-successful enrichment (10).
    if !enrichment.map(|e| e.is_success()).unwrap_or(false) {
        factors.push(RiskFactor::new(
            "no_enrichment",
            "Not Enriched",
            RiskSeverity::Low,
            10.0,
            "Company has not been enriched; limited derived intelligence".to_string(),
        ));
    }

    // 6. No hiring activity (8).
    if company.signals_of_type(SignalType::Hiring) == 0 {
        factors.push(RiskFactor::new(
            "no_hiring",
            "No Hiring Activity",
            RiskSeverity::Low,
            8.0,
            "No hiring signals detected; may indicate slow growth".to_string(),
        ));
    }

    // 7. Small team at late stage (10).
    let late_stage = matches!(
        company.stage,
        FundingStage::SeriesA | FundingStage::SeriesB | FundingStage::SeriesCPlus
    );
    if let Some(headcount) = company.headcount {
        if headcount.is_small() && late_stage {
            factors.push(RiskFactor::new(
                "small_team_late_stage",
                "Team Size Concern",
                RiskSeverity::Medium,
                10.0,
                format!(
                    "Headcount {} seems low for {}",
                    headcount.as_str(),
                    company.stage.as_str()
                ),
            ));
        }
    }

    let total_risk = factors.iter().map(|f| f.score).sum::<f64>().min(100.0);
    let grade = RiskGrade::from_total(total_risk);
    let summary = build_summary(&company.name, total_risk, grade, &factors);

    RiskResult {
        total_risk,
        grade,
        factors,
        summary,
    }
}

/// Convenience form of [`calculate_risk_at`] evaluated at `Utc::now()`.
pub fn calculate_risk(company: &Company, enrichment: Option<&EnrichmentPayload>) -> RiskResult {
    calculate_risk_at(company, enrichment, Utc::now())
}

fn build_summary(name: &str, total: f64, grade: RiskGrade, factors: &[RiskFactor]) -> String {
    if total < 20.0 {
        return format!("{name} shows minimal risk indicators. Data coverage is adequate.");
    }
    let high_labels: Vec<&str> = factors
        .iter()
        .filter(|f| f.severity == RiskSeverity::High)
        .map(|f| f.label.as_str())
        .collect();
    let mut summary = format!("{name} has risk score {total}/100 ({grade}). ");
    if !high_labels.is_empty() {
        summary.push_str(&format!("Key concerns: {}. ", high_labels.join(", ")));
    }
    summary.push_str(&format!("{} risk factor(s) identified.", factors.len()));
    summary
}
