//! # Similarity Engine
//! Multi-factor ranking of a candidate pool against a target company.
//! Sector match contributes 40 points, tag-set Jaccard up to 30, stage
//! ordinal proximity up to 15, geography prefix match 15. Candidates scoring
//! 10 or below are dropped before the top-N cut; ties keep pool order.
//!
//! The target never appears in its own results.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::model::{Company, FundingStage};

const SECTOR_POINTS: f64 = 40.0;
const TAG_POINTS: f64 = 30.0;
const STAGE_POINTS: f64 = 15.0;
const GEO_POINTS: f64 = 15.0;
const MIN_SCORE: f64 = 10.0;
const MAX_REASON_TAGS: usize = 3;

/// A candidate paired with its 0-100 similarity score and the literal
/// reasons that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCompany {
    pub company: Company,
    #[serde(rename = "similarityScore")]
    pub similarity_score: f64,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<String>,
}

/// Jaccard similarity of two tag sets, case-insensitive.
fn jaccard_similarity(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<String> = a.iter().map(|s| s.to_lowercase()).collect();
    let set_b: HashSet<String> = b.iter().map(|s| s.to_lowercase()).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

/// Proximity on the stage ladder: 1.0 at distance 0, dropping 0.3 per step.
fn stage_proximity(a: FundingStage, b: FundingStage) -> f64 {
    let distance = (a.ordinal() - b.ordinal()).abs() as f64;
    (1.0 - distance * 0.3).max(0.0)
}

/// The target's primary region: everything before the first comma.
fn primary_region(geography: &str) -> String {
    geography
        .split(',')
        .next()
        .unwrap_or(geography)
        .trim()
        .to_lowercase()
}

/// Rank `pool` by similarity to `target`, returning at most `limit` results.
pub fn find_similar_companies(target: &Company, pool: &[Company], limit: usize) -> Vec<SimilarCompany> {
    let target_region = primary_region(&target.geography);

    let mut scored: Vec<SimilarCompany> = pool
        .iter()
        .filter(|c| c.id != target.id)
        .map(|candidate| {
            let mut reasons = Vec::new();
            let mut total = 0.0;

            if candidate.sector == target.sector {
                total += SECTOR_POINTS;
                reasons.push(format!("Same sector: {}", target.sector.as_str()));
            }

            let tag_sim = jaccard_similarity(&candidate.tags, &target.tags);
            if tag_sim > 0.0 {
                let target_lower: HashSet<String> =
                    target.tags.iter().map(|t| t.to_lowercase()).collect();
                let overlap: Vec<&str> = candidate
                    .tags
                    .iter()
                    .filter(|t| target_lower.contains(&t.to_lowercase()))
                    .map(String::as_str)
                    .take(MAX_REASON_TAGS)
                    .collect();
                if !overlap.is_empty() {
                    reasons.push(format!("Tags: {}", overlap.join(", ")));
                }
            }
            total += tag_sim * TAG_POINTS;

            let stage_sim = stage_proximity(candidate.stage, target.stage);
            if stage_sim >= 0.7 {
                reasons.push(format!("Similar stage: {}", candidate.stage.as_str()));
            }
            total += stage_sim * STAGE_POINTS;

            if !target_region.is_empty()
                && candidate.geography.to_lowercase().contains(&target_region)
            {
                total += GEO_POINTS;
                reasons.push("Same region".to_string());
            }

            SimilarCompany {
                company: candidate.clone(),
                similarity_score: total.round(),
                match_reasons: reasons,
            }
        })
        .filter(|s| s.similarity_score > MIN_SCORE)
        .collect();

    scored.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sector;

    fn mk_company(id: &str, sector: Sector, stage: FundingStage, geo: &str, tags: &[&str]) -> Company {
        Company {
            id: id.to_string(),
            name: id.to_string(),
            tagline: String::new(),
            description: String::new(),
            sector,
            stage,
            geography: geo.to_string(),
            founded_year: 2023,
            headcount: None,
            last_funding_amount: None,
            last_funding_date: None,
            total_raised: None,
            founder_names: Vec::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            signals: Vec::new(),
            enrichment: None,
        }
    }

    #[test]
    fn target_is_excluded_from_its_own_pool() {
        let target = mk_company("t", Sector::AiMl, FundingStage::Seed, "US", &["ai"]);
        let pool = vec![target.clone()];
        assert!(find_similar_companies(&target, &pool, 5).is_empty());
    }

    #[test]
    fn identical_profile_scores_all_factors() {
        let target = mk_company("t", Sector::AiMl, FundingStage::Seed, "San Francisco, US", &["ai", "llm"]);
        let twin = mk_company("c", Sector::AiMl, FundingStage::Seed, "San Francisco Bay Area", &["ai", "llm"]);
        let out = find_similar_companies(&target, &[twin], 5);
        assert_eq!(out.len(), 1);
        // 40 sector + 30 tags + 15 stage + 15 geography
        assert_eq!(out[0].similarity_score, 100.0);
        assert!(out[0].match_reasons.iter().any(|r| r == "Same region"));
    }

    #[test]
    fn weak_candidates_are_dropped() {
        let target = mk_company("t", Sector::AiMl, FundingStage::PreSeed, "US", &["ai"]);
        // Different sector, no tags, far stage, different region: stage
        // proximity is the only contribution and rounds to 2.
        let far = mk_company("c", Sector::Climate, FundingStage::SeriesB, "Brazil", &[]);
        assert!(find_similar_companies(&target, &[far], 5).is_empty());
    }

    #[test]
    fn stage_proximity_decays_by_distance() {
        assert_eq!(stage_proximity(FundingStage::Seed, FundingStage::Seed), 1.0);
        assert!((stage_proximity(FundingStage::Seed, FundingStage::SeriesA) - 0.7).abs() < 1e-9);
        assert_eq!(stage_proximity(FundingStage::PreSeed, FundingStage::SeriesCPlus), 0.0);
    }

    #[test]
    fn filter_happens_before_limit_cut() {
        let target = mk_company("t", Sector::AiMl, FundingStage::Seed, "US", &["ai"]);
        // Two strong matches and one weak one; limit 2 must return the two
        // strong ones even though the weak one sorts last.
        let strong_a = mk_company("a", Sector::AiMl, FundingStage::Seed, "US", &["ai"]);
        let strong_b = mk_company("b", Sector::AiMl, FundingStage::Seed, "US", &["ai"]);
        let weak = mk_company("w", Sector::Climate, FundingStage::SeriesCPlus, "Brazil", &[]);
        let out = find_similar_companies(&target, &[weak, strong_a, strong_b], 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].company.id, "a");
        assert_eq!(out[1].company.id, "b");
    }

    #[test]
    fn ties_keep_pool_order() {
        let target = mk_company("t", Sector::AiMl, FundingStage::Seed, "US", &[]);
        let first = mk_company("first", Sector::AiMl, FundingStage::Seed, "US", &[]);
        let second = mk_company("second", Sector::AiMl, FundingStage::Seed, "US", &[]);
        let out = find_similar_companies(&target, &[first, second], 5);
        assert_eq!(out[0].company.id, "first");
        assert_eq!(out[1].company.id, "second");
    }

    #[test]
    fn jaccard_is_case_insensitive() {
        let a = vec!["AI".to_string(), "SaaS".to_string()];
        let b = vec!["ai".to_string(), "fintech".to_string()];
        assert!((jaccard_similarity(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
    }
}
