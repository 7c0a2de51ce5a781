//! # Data Model
//! Core entities consumed by every engine: companies, signals, enrichment.
//!
//! All types here are immutable inputs from the scoring engines' point of
//! view. External collaborators (feeds, forms, enrichment providers) produce
//! them; the engines only read. Everything derives serde so the records can
//! round-trip through the snapshot store and any API layer unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sector taxonomy used by thesis criteria and the similarity ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "AI/ML")]
    AiMl,
    DevTools,
    FinTech,
    HealthTech,
    Climate,
    Security,
    Infrastructure,
    SaaS,
    Marketplace,
    Consumer,
    DeepTech,
    Other,
}

impl Sector {
    /// Display spelling, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::AiMl => "AI/ML",
            Sector::DevTools => "DevTools",
            Sector::FinTech => "FinTech",
            Sector::HealthTech => "HealthTech",
            Sector::Climate => "Climate",
            Sector::Security => "Security",
            Sector::Infrastructure => "Infrastructure",
            Sector::SaaS => "SaaS",
            Sector::Marketplace => "Marketplace",
            Sector::Consumer => "Consumer",
            Sector::DeepTech => "DeepTech",
            Sector::Other => "Other",
        }
    }
}

/// Funding stages in their fixed ordinal order.
/// Pre-Seed < Seed < Series A < Series B < Series C+.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FundingStage {
    #[serde(rename = "Pre-Seed")]
    PreSeed,
    Seed,
    #[serde(rename = "Series A")]
    SeriesA,
    #[serde(rename = "Series B")]
    SeriesB,
    #[serde(rename = "Series C+")]
    SeriesCPlus,
}

impl FundingStage {
    /// Position on the fixed stage ladder, starting at 0 for Pre-Seed.
    pub fn ordinal(&self) -> i32 {
        match self {
            FundingStage::PreSeed => 0,
            FundingStage::Seed => 1,
            FundingStage::SeriesA => 2,
            FundingStage::SeriesB => 3,
            FundingStage::SeriesCPlus => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FundingStage::PreSeed => "Pre-Seed",
            FundingStage::Seed => "Seed",
            FundingStage::SeriesA => "Series A",
            FundingStage::SeriesB => "Series B",
            FundingStage::SeriesCPlus => "Series C+",
        }
    }
}

/// Coarse headcount buckets as reported by data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadcountRange {
    #[serde(rename = "1-10")]
    OneToTen,
    #[serde(rename = "11-50")]
    ElevenToFifty,
    #[serde(rename = "51-200")]
    FiftyOneToTwoHundred,
    #[serde(rename = "201-500")]
    TwoHundredOneToFiveHundred,
    #[serde(rename = "500+")]
    FiveHundredPlus,
}

impl HeadcountRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadcountRange::OneToTen => "1-10",
            HeadcountRange::ElevenToFifty => "11-50",
            HeadcountRange::FiftyOneToTwoHundred => "51-200",
            HeadcountRange::TwoHundredOneToFiveHundred => "201-500",
            HeadcountRange::FiveHundredPlus => "500+",
        }
    }

    /// True for the two smallest buckets; used by the risk engine's
    /// small-team-at-late-stage factor.
    pub fn is_small(&self) -> bool {
        matches!(self, HeadcountRange::OneToTen | HeadcountRange::ElevenToFifty)
    }
}

/// Event categories a signal can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Funding,
    Hiring,
    Product,
    Press,
    Github,
    Partnership,
    Leadership,
    Other,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Funding => "funding",
            SignalType::Hiring => "hiring",
            SignalType::Product => "product",
            SignalType::Press => "press",
            SignalType::Github => "github",
            SignalType::Partnership => "partnership",
            SignalType::Leadership => "leadership",
            SignalType::Other => "other",
        }
    }
}

/// How much we trust the signal's source/extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalConfidence {
    High,
    Medium,
    Low,
}

/// A timestamped, typed, confidence-rated event about a company.
/// Signals are the sole evidence source for traction and momentum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub source: String,
    /// Parsed at the boundary; serde rejects unparseable timestamps so the
    /// engines never see a malformed one.
    pub timestamp: DateTime<Utc>,
    pub confidence: SignalConfidence,
    /// Surfaced since the last visit; earns a flat traction bonus.
    #[serde(default, rename = "isNew")]
    pub is_new: bool,
}

/// Outcome of an enrichment run as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentStatus {
    Pending,
    Success,
    Partial,
    Failed,
}

/// Optional payload from the external enrichment provider. The engines must
/// behave correctly when this is entirely absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentPayload {
    #[serde(rename = "companyId")]
    pub company_id: String,
    pub status: EnrichmentStatus,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl EnrichmentPayload {
    /// Only a fully successful run counts for confidence and risk purposes.
    pub fn is_success(&self) -> bool {
        self.status == EnrichmentStatus::Success
    }
}

/// A company under evaluation. Identity plus whatever the collectors know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub description: String,
    pub sector: Sector,
    pub stage: FundingStage,
    pub geography: String,
    #[serde(rename = "foundedYear")]
    pub founded_year: i32,
    #[serde(default)]
    pub headcount: Option<HeadcountRange>,
    #[serde(default, rename = "lastFundingAmount")]
    pub last_funding_amount: Option<u64>,
    #[serde(default, rename = "lastFundingDate")]
    pub last_funding_date: Option<DateTime<Utc>>,
    #[serde(default, rename = "totalRaised")]
    pub total_raised: Option<u64>,
    #[serde(default, rename = "founderNames")]
    pub founder_names: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub signals: Vec<Signal>,
    #[serde(default)]
    pub enrichment: Option<EnrichmentPayload>,
}

impl Company {
    /// Count of signals at a given confidence level.
    pub fn signals_with_confidence(&self, confidence: SignalConfidence) -> usize {
        self.signals.iter().filter(|s| s.confidence == confidence).count()
    }

    /// Count of signals of a given type.
    pub fn signals_of_type(&self, signal_type: SignalType) -> usize {
        self.signals.iter().filter(|s| s.signal_type == signal_type).count()
    }
}

/// Whole days between `now` and an event timestamp.
/// Events slightly in the future (clock skew between collectors) clamp to 0.
pub fn days_since(now: DateTime<Utc>, ts: DateTime<Utc>) -> i64 {
    (now - ts).num_days().max(0)
}
