//! # Dimension Scorers
//! Five pure scorer functions, one per dimension kind, each mapping
//! `(company, dimension[, enrichment], now)` to a bounded `DimensionScore`
//! with literal evidence. No scorer mutates its inputs or reads ambient
//! state; `now` arrives as an argument so results are reproducible.
//!
//! Evidence strings must quote the specific trigger (matched sector, exact
//! keywords, signal title and age). Downstream explanation generation and
//! any UI depend on them being literal, not summarized.

use chrono::{DateTime, Utc};

use crate::model::{days_since, Company, EnrichmentPayload, SignalConfidence, SignalType};
use crate::text::{contains_ci, keyword_hits};
use crate::thesis::{DimensionKind, ThesisDimension};

use super::round2;

// Matched thresholds per dimension kind.
const MATCH_THRESHOLD_DEFAULT: f64 = 50.0;
const MATCH_THRESHOLD_TRACTION: f64 = 40.0;

/// One dimension's contribution to a score: raw 0-100, weighted by the
/// dimension's declared weight, plus literal evidence both ways.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DimensionScore {
    pub key: String,
    pub label: String,
    pub weight: f64,
    #[serde(rename = "rawScore")]
    pub raw_score: f64,
    /// `raw_score * weight / 100`, rounded to 2 decimals at construction.
    #[serde(rename = "weightedScore")]
    pub weighted_score: f64,
    pub matched: bool,
    pub evidence: Vec<String>,
    pub missing: Vec<String>,
}

impl DimensionScore {
    fn new(
        dimension: &ThesisDimension,
        raw_score: f64,
        matched: bool,
        evidence: Vec<String>,
        missing: Vec<String>,
    ) -> Self {
        Self {
            key: dimension.key.clone(),
            label: dimension.label.clone(),
            weight: dimension.weight,
            raw_score,
            weighted_score: round2(raw_score * dimension.weight / 100.0),
            matched,
            evidence,
            missing,
        }
    }

    fn neutral(dimension: &ThesisDimension, evidence: &str) -> Self {
        Self::new(dimension, 50.0, true, vec![evidence.to_string()], Vec::new())
    }
}

/// Dispatch on the dimension's kind. Unrecognized keys score a neutral 50
/// instead of failing the evaluation.
pub fn score_dimension(
    company: &Company,
    dimension: &ThesisDimension,
    enrichment: Option<&EnrichmentPayload>,
    now: DateTime<Utc>,
) -> DimensionScore {
    match dimension.kind() {
        DimensionKind::SectorFit => score_sector_fit(company, dimension, enrichment),
        DimensionKind::StageFit => score_stage_fit(company, dimension),
        DimensionKind::GeographyFit => score_geography_fit(company, dimension),
        DimensionKind::TractionSignals => score_traction_signals(company, dimension, now),
        DimensionKind::TeamQuality => score_team_quality(company, dimension, enrichment),
        DimensionKind::Custom => {
            DimensionScore::neutral(dimension, "Custom dimension; scored at neutral 50")
        }
    }
}

/// Sector fit: 60 for sector membership, capped keyword bonuses from tags
/// (8 pts/hit, max 25), enrichment keywords (5 pts/hit, max 15), and
/// tagline/description (3 pts/hit, max 10). Clamped to 100.
pub fn score_sector_fit(
    company: &Company,
    dimension: &ThesisDimension,
    enrichment: Option<&EnrichmentPayload>,
) -> DimensionScore {
    let mut evidence = Vec::new();
    let mut missing = Vec::new();
    let mut raw: f64 = 0.0;

    let criteria = &dimension.criteria;
    let no_keywords = Vec::new();
    let keywords = criteria.keywords.as_ref().unwrap_or(&no_keywords);

    match &criteria.sectors {
        Some(sectors) if sectors.contains(&company.sector) => {
            raw += 60.0;
            evidence.push(format!(
                "Sector \"{}\" is in thesis target list",
                company.sector.as_str()
            ));
        }
        Some(sectors) => {
            let listed: Vec<&str> = sectors.iter().map(|s| s.as_str()).collect();
            missing.push(format!(
                "Sector \"{}\" not in target sectors: {}",
                company.sector.as_str(),
                listed.join(", ")
            ));
        }
        None => {
            missing.push(format!(
                "Sector \"{}\" not in target sectors: none configured",
                company.sector.as_str()
            ));
        }
    }

    let tag_targets: Vec<&str> = company.tags.iter().map(String::as_str).collect();
    let tag_hits = keyword_hits(keywords, &tag_targets);
    if !tag_hits.is_empty() {
        raw += (tag_hits.len() as f64 * 8.0).min(25.0);
        evidence.push(format!("Tag matches: {}", tag_hits.join(", ")));
    }

    if let Some(enrich) = enrichment {
        let enrich_targets: Vec<&str> = enrich.keywords.iter().map(String::as_str).collect();
        let enrich_hits = keyword_hits(keywords, &enrich_targets);
        if !enrich_hits.is_empty() {
            raw += (enrich_hits.len() as f64 * 5.0).min(15.0);
            evidence.push(format!("Enrichment keyword matches: {}", enrich_hits.join(", ")));
        }
    }

    let desc_hits = keyword_hits(
        keywords,
        &[company.tagline.as_str(), company.description.as_str()],
    );
    if !desc_hits.is_empty() {
        raw += (desc_hits.len() as f64 * 3.0).min(10.0);
        evidence.push(format!("Description keyword matches: {}", desc_hits.join(", ")));
    }

    let raw = raw.min(100.0);
    DimensionScore::new(dimension, raw, raw >= MATCH_THRESHOLD_DEFAULT, evidence, missing)
}

/// Stage fit: exact membership scores 100; exactly one ordinal step above the
/// maximum allowed stage scores 40 (borderline credit); anything else 0.
/// No stage criteria configured: neutral 50, an intentional non-opinionated
/// default.
pub fn score_stage_fit(company: &Company, dimension: &ThesisDimension) -> DimensionScore {
    let stages = match &dimension.criteria.stages {
        Some(stages) if !stages.is_empty() => stages,
        _ => return DimensionScore::neutral(dimension, "No stage criteria defined; neutral score"),
    };

    let mut evidence = Vec::new();
    let mut missing = Vec::new();
    let listed: Vec<&str> = stages.iter().map(|s| s.as_str()).collect();
    let max_target = stages.iter().map(|s| s.ordinal()).max().unwrap_or(0);

    let raw = if stages.contains(&company.stage) {
        evidence.push(format!(
            "Stage \"{}\" is an exact thesis match",
            company.stage.as_str()
        ));
        100.0
    } else if company.stage.ordinal() == max_target + 1 {
        evidence.push(format!(
            "Stage \"{}\" is one stage above thesis range; borderline",
            company.stage.as_str()
        ));
        missing.push(format!("Preferred stages: {}", listed.join(", ")));
        40.0
    } else {
        missing.push(format!(
            "Stage \"{}\" is outside thesis mandate. Preferred: {}",
            company.stage.as_str(),
            listed.join(", ")
        ));
        0.0
    };

    DimensionScore::new(dimension, raw, raw >= MATCH_THRESHOLD_DEFAULT, evidence, missing)
}

/// Geography fit: exact region substring match 100, "remote" anywhere in the
/// geography string 70, otherwise 0. No criteria: neutral 50.
pub fn score_geography_fit(company: &Company, dimension: &ThesisDimension) -> DimensionScore {
    let geographies = match &dimension.criteria.geographies {
        Some(list) if !list.is_empty() => list,
        _ => {
            return DimensionScore::neutral(dimension, "No geography criteria defined; neutral score")
        }
    };

    let mut evidence = Vec::new();
    let mut missing = Vec::new();

    let matched_region = geographies.iter().find(|g| contains_ci(&company.geography, g));
    let raw = if let Some(region) = matched_region {
        evidence.push(format!(
            "Geography \"{}\" matches thesis region \"{}\"",
            company.geography, region
        ));
        100.0
    } else if contains_ci(&company.geography, "remote") {
        evidence.push("Remote-first company; geography is flexible".to_string());
        70.0
    } else {
        missing.push(format!(
            "Geography \"{}\" is outside thesis regions: {}",
            company.geography,
            geographies.join(", ")
        ));
        0.0
    };

    DimensionScore::new(dimension, raw, raw >= MATCH_THRESHOLD_DEFAULT, evidence, missing)
}

/// Base importance of a signal type for traction scoring.
fn signal_base_value(signal_type: SignalType) -> f64 {
    match signal_type {
        SignalType::Funding => 25.0,
        SignalType::Partnership => 20.0,
        SignalType::Product => 18.0,
        SignalType::Hiring => 15.0,
        SignalType::Github => 14.0,
        SignalType::Press => 12.0,
        SignalType::Leadership => 10.0,
        SignalType::Other => 5.0,
    }
}

fn confidence_multiplier(confidence: SignalConfidence) -> f64 {
    match confidence {
        SignalConfidence::High => 1.0,
        SignalConfidence::Medium => 0.7,
        SignalConfidence::Low => 0.4,
    }
}

/// Four-step recency decay by age since the event.
fn recency_multiplier(days: i64) -> f64 {
    if days <= 60 {
        1.0
    } else if days <= 180 {
        0.75
    } else if days <= 365 {
        0.5
    } else {
        0.2
    }
}

/// Traction: sum of `base_value x confidence x recency` over all signals,
/// clamped to 100, then a flat +5 per is-new signal, clamped again.
/// Zero signals scores 0 with an explicit missing-evidence note.
pub fn score_traction_signals(
    company: &Company,
    dimension: &ThesisDimension,
    now: DateTime<Utc>,
) -> DimensionScore {
    if company.signals.is_empty() {
        return DimensionScore::new(
            dimension,
            0.0,
            false,
            Vec::new(),
            vec!["No signals detected for this company".to_string()],
        );
    }

    let mut evidence = Vec::new();
    let mut missing = Vec::new();

    let mut signal_sum = 0.0;
    for signal in &company.signals {
        let days = days_since(now, signal.timestamp);
        let points = signal_base_value(signal.signal_type)
            * confidence_multiplier(signal.confidence)
            * recency_multiplier(days);
        signal_sum += points;
        evidence.push(format!(
            "{} \"{}\" ({}d ago, {} confidence, +{:.1} pts)",
            signal.signal_type.as_str().to_uppercase(),
            signal.title,
            days,
            match signal.confidence {
                SignalConfidence::High => "high",
                SignalConfidence::Medium => "medium",
                SignalConfidence::Low => "low",
            },
            points
        ));
    }

    // New-signal bonus lands after the base sum is clamped, before the final
    // clamp, so a saturated history still surfaces fresh activity.
    let mut raw = signal_sum.min(100.0);
    let new_count = company.signals.iter().filter(|s| s.is_new).count();
    if new_count > 0 {
        raw = (raw + new_count as f64 * 5.0).min(100.0);
        evidence.push(format!("{new_count} new signal(s) detected since last check"));
    }

    if raw < 30.0 {
        missing.push("Signal activity is low; limited recent momentum detected".to_string());
    }

    let raw = round2(raw);
    DimensionScore::new(dimension, raw, raw >= MATCH_THRESHOLD_TRACTION, evidence, missing)
}

/// Team quality: 30 baseline, +30 keyword in founder names, +20 keyword in
/// enrichment summary, +10 for two or more founders, +10 for a doctoral
/// title. Without keyword criteria the scorer short-circuits at the baseline.
pub fn score_team_quality(
    company: &Company,
    dimension: &ThesisDimension,
    enrichment: Option<&EnrichmentPayload>,
) -> DimensionScore {
    const BASELINE: f64 = 30.0;

    let keywords = match &dimension.criteria.keywords {
        Some(list) => list,
        None => {
            return DimensionScore::new(
                dimension,
                BASELINE,
                false,
                vec!["No team keyword criteria defined".to_string()],
                Vec::new(),
            )
        }
    };

    let mut evidence = Vec::new();
    let mut missing = Vec::new();
    let mut raw = BASELINE;

    let founder_text = company.founder_names.join(" ");
    let founder_hits: Vec<&str> = keywords
        .iter()
        .filter(|kw| contains_ci(&founder_text, kw))
        .map(String::as_str)
        .collect();
    if !founder_hits.is_empty() {
        raw += 30.0;
        evidence.push(format!("Founder background signals: {}", founder_hits.join(", ")));
    }

    if let Some(summary) = enrichment.and_then(|e| e.summary.as_deref()) {
        let summary_hits: Vec<&str> = keywords
            .iter()
            .filter(|kw| contains_ci(summary, kw))
            .map(String::as_str)
            .collect();
        if !summary_hits.is_empty() {
            raw += 20.0;
            evidence.push(format!("Enrichment team signals: {}", summary_hits.join(", ")));
        }
    }

    if company.founder_names.len() >= 2 {
        raw += 10.0;
        evidence.push(format!("{} co-founders detected", company.founder_names.len()));
    }

    if company.founder_names.iter().any(|n| n.starts_with("Dr.")) {
        raw += 10.0;
        evidence.push("Research background detected (Dr. prefix)".to_string());
    }

    let raw = raw.min(100.0);
    if raw < 50.0 {
        missing.push("Limited founder background signals; consider manual research".to_string());
    }

    DimensionScore::new(dimension, raw, raw >= MATCH_THRESHOLD_DEFAULT, evidence, missing)
}
