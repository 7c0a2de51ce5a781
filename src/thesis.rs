//! # Thesis Configuration
//!
//! The fund's investment criteria: a named set of weighted dimensions, each
//! with matching criteria. User-edited and loaded from TOML; a built-in
//! `default_seed()` keeps the engine usable when no config file exists.
//!
//! Weights are expected to sum to 100 but the aggregator never assumes it;
//! it sums weighted contributions regardless. The engines never mutate a
//! thesis in place. The weight learner returns adjusted copies only.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::model::{FundingStage, Sector};

/// Which scorer implementation a dimension key selects.
/// Unrecognized keys degrade to `Custom`, a neutral scorer, so a single bad
/// dimension never blocks evaluation of the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    SectorFit,
    StageFit,
    GeographyFit,
    TractionSignals,
    TeamQuality,
    Custom,
}

impl DimensionKind {
    pub fn from_key(key: &str) -> Self {
        match key {
            "sector_fit" => DimensionKind::SectorFit,
            "stage_fit" => DimensionKind::StageFit,
            "geography_fit" => DimensionKind::GeographyFit,
            "traction_signals" => DimensionKind::TractionSignals,
            "team_quality" => DimensionKind::TeamQuality,
            _ => DimensionKind::Custom,
        }
    }
}

/// Matching criteria for one dimension. All lists optional; an unset list
/// means the dimension scores a documented neutral default instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<Sector>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<FundingStage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// One named axis of thesis fit with a declared weight (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThesisDimension {
    pub key: String,
    pub label: String,
    pub weight: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub criteria: DimensionCriteria,
}

impl ThesisDimension {
    pub fn kind(&self) -> DimensionKind {
        DimensionKind::from_key(&self.key)
    }
}

/// The full thesis: fund identity, version, and weighted dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThesisConfig {
    #[serde(rename = "fundId")]
    pub fund_id: String,
    #[serde(rename = "fundName")]
    pub fund_name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    /// Companies scoring below this are filtered out by list views.
    #[serde(rename = "minimumScore")]
    pub minimum_score: f64,
    pub dimensions: Vec<ThesisDimension>,
}

impl ThesisConfig {
    /// Load a thesis from a TOML file. Errors carry the path for diagnostics;
    /// callers that want a silent fallback use `default_seed()`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read thesis config {}", path.display()))?;
        let cfg: ThesisConfig = toml::from_str(&raw)
            .with_context(|| format!("parse thesis config {}", path.display()))?;
        Ok(cfg)
    }

    /// True when a total score clears the thesis's minimum bar.
    pub fn passes_minimum(&self, total: f64) -> bool {
        total >= self.minimum_score
    }

    /// Built-in demo thesis: seed-stage, AI-native B2B, US/EU focus.
    /// Weights 30/25/15/20/10, summing to 100.
    pub fn default_seed() -> Self {
        let dim = |key: &str, label: &str, weight: f64, description: &str, criteria| ThesisDimension {
            key: key.to_string(),
            label: label.to_string(),
            weight,
            description: description.to_string(),
            criteria,
        };
        let strings = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        ThesisConfig {
            fund_id: "fund_apex_001".to_string(),
            fund_name: "Apex Ventures".to_string(),
            version: "1.0.0".to_string(),
            description: "Seed-stage fund investing in AI-native B2B software companies \
                          in the US and EU, with evidence of early traction."
                .to_string(),
            minimum_score: 40.0,
            dimensions: vec![
                dim(
                    "sector_fit",
                    "Sector Fit",
                    30.0,
                    "Operates in AI/ML, DevTools, Security, SaaS, or Infrastructure.",
                    DimensionCriteria {
                        sectors: Some(vec![
                            Sector::AiMl,
                            Sector::DevTools,
                            Sector::Security,
                            Sector::SaaS,
                            Sector::Infrastructure,
                        ]),
                        keywords: Some(strings(&[
                            "ai",
                            "machine learning",
                            "llm",
                            "developer tools",
                            "security",
                            "saas",
                            "b2b",
                            "infrastructure",
                            "api",
                            "automation",
                            "workflow",
                            "agentic",
                            "ai-native",
                        ])),
                        ..Default::default()
                    },
                ),
                dim(
                    "stage_fit",
                    "Stage Fit",
                    25.0,
                    "Pre-Seed or Seed preferred; Series A acceptable. Series B+ outside mandate.",
                    DimensionCriteria {
                        stages: Some(vec![
                            FundingStage::PreSeed,
                            FundingStage::Seed,
                            FundingStage::SeriesA,
                        ]),
                        ..Default::default()
                    },
                ),
                dim(
                    "geography_fit",
                    "Geography Fit",
                    15.0,
                    "US or EU headquartered. Remote-first acceptable.",
                    DimensionCriteria {
                        geographies: Some(strings(&[
                            "US",
                            "UK",
                            "Germany",
                            "France",
                            "Netherlands",
                            "Sweden",
                            "Israel",
                            "Remote",
                            "Europe",
                        ])),
                        ..Default::default()
                    },
                ),
                dim(
                    "traction_signals",
                    "Traction Signals",
                    20.0,
                    "Evidence of momentum: funding, hiring, launches, press, GitHub. Recency matters.",
                    DimensionCriteria::default(),
                ),
                dim(
                    "team_quality",
                    "Team & Founder Signal",
                    10.0,
                    "Technical founders preferred; research or top-tier employer backgrounds.",
                    DimensionCriteria {
                        keywords: Some(strings(&[
                            "phd",
                            "research",
                            "mit",
                            "stanford",
                            "cmu",
                            "google",
                            "meta",
                            "openai",
                            "deepmind",
                            "ex-",
                        ])),
                        ..Default::default()
                    },
                ),
            ],
        }
    }
}
