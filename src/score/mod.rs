//! # Score Aggregator
//! Runs each thesis dimension's scorer in declared order, sums the weighted
//! contributions, and wraps the result with a grade, a confidence label, and
//! a deterministic explanation. Pure: no I/O, no ambient state; the `*_at`
//! variants take an explicit `now` for reproducible evaluation.
//!
//! Rounding is fixed for reproducibility: per-dimension weighted scores are
//! rounded to 2 decimals at construction and the total sums those rounded
//! values, rounded to 1 decimal. Weights are summed as declared; the
//! aggregator never assumes they total 100.

pub mod dimensions;
pub mod explain;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

use crate::model::{Company, EnrichmentPayload, SignalConfidence};
use crate::thesis::ThesisConfig;

pub use dimensions::{score_dimension, DimensionScore};
pub use explain::generate_explanation;

/// Round to 1 decimal place (totals).
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round to 2 decimal places (per-dimension weighted scores).
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Discrete grade derived from the total by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreGrade {
    #[serde(rename = "Strong Match")]
    StrongMatch,
    #[serde(rename = "Good Match")]
    GoodMatch,
    #[serde(rename = "Weak Match")]
    WeakMatch,
    #[serde(rename = "No Match")]
    NoMatch,
}

impl ScoreGrade {
    pub fn from_total(total: f64) -> Self {
        if total >= 75.0 {
            ScoreGrade::StrongMatch
        } else if total >= 55.0 {
            ScoreGrade::GoodMatch
        } else if total >= 35.0 {
            ScoreGrade::WeakMatch
        } else {
            ScoreGrade::NoMatch
        }
    }
}

impl fmt::Display for ScoreGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoreGrade::StrongMatch => "Strong Match",
            ScoreGrade::GoodMatch => "Good Match",
            ScoreGrade::WeakMatch => "Weak Match",
            ScoreGrade::NoMatch => "No Match",
        };
        f.write_str(s)
    }
}

/// Coarse evidence-density label, independent of the score's magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreConfidence {
    High,
    Medium,
    Low,
}

impl ScoreConfidence {
    /// High needs three high-confidence signals AND a successful enrichment.
    /// Medium needs either a successful enrichment or two signals of any
    /// confidence. Everything else is Low.
    pub fn from_evidence(company: &Company, enrichment: Option<&EnrichmentPayload>) -> Self {
        let high_signals = company.signals_with_confidence(SignalConfidence::High);
        let enriched = enrichment.map(|e| e.is_success()).unwrap_or(false);
        if high_signals >= 3 && enriched {
            ScoreConfidence::High
        } else if enriched || company.signals.len() >= 2 {
            ScoreConfidence::Medium
        } else {
            ScoreConfidence::Low
        }
    }
}

/// Complete scoring output for one company against one thesis.
/// Created fresh on every call and never mutated; safe to cache keyed by
/// `cache_key(company_id, thesis_version, enrichment)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total: f64,
    pub grade: ScoreGrade,
    pub confidence: ScoreConfidence,
    pub dimensions: Vec<DimensionScore>,
    pub explanation: String,
    #[serde(rename = "scoredAt")]
    pub scored_at: DateTime<Utc>,
    #[serde(rename = "thesisVersion")]
    pub thesis_version: String,
}

/// A company paired with its score, as returned by batch scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCompany {
    pub company: Company,
    pub score: ScoreResult,
}

/// Score one company against a thesis at an explicit evaluation time.
pub fn score_company_at(
    company: &Company,
    thesis: &ThesisConfig,
    enrichment: Option<&EnrichmentPayload>,
    now: DateTime<Utc>,
) -> ScoreResult {
    let dimension_scores: Vec<DimensionScore> = thesis
        .dimensions
        .iter()
        .map(|dimension| score_dimension(company, dimension, enrichment, now))
        .collect();

    let total = round1(dimension_scores.iter().map(|d| d.weighted_score).sum());
    let grade = ScoreGrade::from_total(total);
    let confidence = ScoreConfidence::from_evidence(company, enrichment);
    let explanation = generate_explanation(&company.name, &dimension_scores, total, grade);

    debug!(
        target: "scoring",
        company = %company.id,
        thesis = %thesis.version,
        total,
        grade = %grade,
        "scored company"
    );

    ScoreResult {
        total,
        grade,
        confidence,
        dimensions: dimension_scores,
        explanation,
        scored_at: now,
        thesis_version: thesis.version.clone(),
    }
}

/// Convenience form of [`score_company_at`] evaluated at `Utc::now()`.
pub fn score_company(
    company: &Company,
    thesis: &ThesisConfig,
    enrichment: Option<&EnrichmentPayload>,
) -> ScoreResult {
    score_company_at(company, thesis, enrichment, Utc::now())
}

/// Batch scoring: every company scored with its own attached enrichment,
/// returned sorted descending by total. The sort is stable, so equal totals
/// keep their input order.
pub fn score_all_companies_at(
    companies: &[Company],
    thesis: &ThesisConfig,
    now: DateTime<Utc>,
) -> Vec<ScoredCompany> {
    let mut scored: Vec<ScoredCompany> = companies
        .iter()
        .map(|company| ScoredCompany {
            score: score_company_at(company, thesis, company.enrichment.as_ref(), now),
            company: company.clone(),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total
            .partial_cmp(&a.score.total)
            .unwrap_or(Ordering::Equal)
    });
    scored
}

/// Convenience form of [`score_all_companies_at`] evaluated at `Utc::now()`.
pub fn score_all_companies(companies: &[Company], thesis: &ThesisConfig) -> Vec<ScoredCompany> {
    score_all_companies_at(companies, thesis, Utc::now())
}

/// Short deterministic digest over `(company_id, thesis_version, enrichment)`
/// for keying a result cache. Enrichment-sensitive: any change to the payload
/// changes the key.
pub fn cache_key(
    company_id: &str,
    thesis_version: &str,
    enrichment: Option<&EnrichmentPayload>,
) -> String {
    let enrichment_part = enrichment
        .and_then(|e| serde_json::to_string(e).ok())
        .unwrap_or_else(|| "none".to_string());

    let mut hasher = Sha256::new();
    hasher.update(company_id.as_bytes());
    hasher.update(b"|");
    hasher.update(thesis_version.as_bytes());
    hasher.update(b"|");
    hasher.update(enrichment_part.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
