// src/lib.rs
// Public library surface for the scoring and portfolio intelligence engine.
//
// Everything here is synchronous, pure-function style: engines take their
// full input as arguments and return fresh results. The only stateful parts
// (drift tracker, weight learner) write through an injected log store.

pub mod drift;
pub mod learner;
pub mod model;
pub mod momentum;
pub mod risk;
pub mod score;
pub mod similarity;
pub mod store;
pub mod text;
pub mod thesis;

// ---- Re-exports for a stable public API ----
pub use crate::drift::{DriftDirection, DriftTracker, ScoreDrift, ScoreSnapshot};
pub use crate::learner::{
    DecisionAction, LearningEvent, LearningStats, WeightAdjustment, WeightLearner,
};
pub use crate::model::{
    Company, EnrichmentPayload, EnrichmentStatus, FundingStage, HeadcountRange, Sector, Signal,
    SignalConfidence, SignalType,
};
pub use crate::momentum::{
    calculate_momentum, calculate_momentum_at, MomentumLevel, MomentumResult, MomentumTrend,
};
pub use crate::risk::{
    calculate_risk, calculate_risk_at, RiskFactor, RiskGrade, RiskResult, RiskSeverity,
};
pub use crate::score::{
    cache_key, score_all_companies, score_all_companies_at, score_company, score_company_at,
    DimensionScore, ScoreConfidence, ScoreGrade, ScoreResult, ScoredCompany,
};
pub use crate::similarity::{find_similar_companies, SimilarCompany};
pub use crate::store::{JsonFileStore, LogStore, MemoryStore};
pub use crate::thesis::{DimensionCriteria, DimensionKind, ThesisConfig, ThesisDimension};
