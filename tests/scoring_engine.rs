// tests/scoring_engine.rs
//
// End-to-end scoring against the built-in default thesis: full-pipeline
// checks on grades, confidence, explanations, and batch ordering.

use chrono::{DateTime, Duration, TimeZone, Utc};

use thesis_scout::{
    cache_key, score_all_companies_at, score_company_at, Company, EnrichmentPayload,
    EnrichmentStatus, FundingStage, ScoreConfidence, ScoreGrade, Sector, Signal, SignalConfidence,
    SignalType, ThesisConfig,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn mk_company(id: &str) -> Company {
    Company {
        id: id.to_string(),
        name: format!("Company {id}"),
        tagline: String::new(),
        description: String::new(),
        sector: Sector::AiMl,
        stage: FundingStage::PreSeed,
        geography: "San Francisco, US".to_string(),
        founded_year: 2024,
        headcount: None,
        last_funding_amount: None,
        last_funding_date: None,
        total_raised: None,
        founder_names: vec!["Jane Roe".to_string()],
        tags: Vec::new(),
        signals: Vec::new(),
        enrichment: None,
    }
}

fn funding_signal(days_ago: i64, is_new: bool) -> Signal {
    Signal {
        id: format!("sig_{days_ago}"),
        signal_type: SignalType::Funding,
        title: "Raised seed round".to_string(),
        description: String::new(),
        source: "press".to_string(),
        timestamp: fixed_now() - Duration::days(days_ago),
        confidence: SignalConfidence::High,
        is_new,
    }
}

#[test]
fn preseed_ai_company_in_sf_scores_per_the_rulebook() {
    let thesis = ThesisConfig::default_seed();
    let mut company = mk_company("acme");
    company.tags = vec!["ai".to_string()];
    company.signals = vec![funding_signal(10, true)];

    let result = score_company_at(&company, &thesis, None, fixed_now());

    let by_key = |key: &str| {
        result
            .dimensions
            .iter()
            .find(|d| d.key == key)
            .unwrap_or_else(|| panic!("missing dimension {key}"))
    };

    // Sector: 60 base for AI/ML plus the "ai" tag hit.
    assert_eq!(by_key("sector_fit").raw_score, 68.0);
    // Pre-Seed is in the allow-list.
    assert_eq!(by_key("stage_fit").raw_score, 100.0);
    // "San Francisco, US" matches the "US" region.
    assert_eq!(by_key("geography_fit").raw_score, 100.0);
    // One fresh high-confidence funding signal: 25 x 1.0 x 1.0, +5 new bonus.
    assert_eq!(by_key("traction_signals").raw_score, 30.0);
    // Keyword criteria configured but nothing hit: baseline 30.
    assert_eq!(by_key("team_quality").raw_score, 30.0);

    // Weighted sum with seed weights 30/25/15/20/10.
    assert_eq!(result.total, 69.4);
    assert_eq!(result.grade, ScoreGrade::GoodMatch);
    assert!(thesis.passes_minimum(result.total));
}

#[test]
fn late_stage_company_outside_mandate_zeroes_stage_and_geography() {
    let thesis = ThesisConfig::default_seed();
    let mut company = mk_company("giant");
    company.stage = FundingStage::SeriesCPlus;
    company.geography = "Singapore".to_string();
    // Strong sector and traction must not rescue stage/geography.
    company.tags = vec!["ai".to_string(), "saas".to_string()];
    company.signals = (0..5).map(|i| funding_signal(i + 1, false)).collect();

    let result = score_company_at(&company, &thesis, None, fixed_now());
    let by_key = |key: &str| result.dimensions.iter().find(|d| d.key == key).unwrap();

    assert_eq!(by_key("stage_fit").raw_score, 0.0);
    assert_eq!(by_key("geography_fit").raw_score, 0.0);
    assert!(by_key("traction_signals").raw_score > 0.0);
}

#[test]
fn totals_stay_in_bounds_and_match_dimension_sum() {
    let thesis = ThesisConfig::default_seed();
    let mut maxed = mk_company("maxed");
    maxed.tags = vec![
        "ai".to_string(),
        "saas".to_string(),
        "b2b".to_string(),
        "api".to_string(),
    ];
    maxed.founder_names = vec!["Dr. Ada Example".to_string(), "Ex-Google Lee".to_string()];
    maxed.signals = (0..8).map(|i| funding_signal(i + 1, true)).collect();

    for company in [mk_company("bare"), maxed] {
        let result = score_company_at(&company, &thesis, None, fixed_now());
        assert!(result.total >= 0.0 && result.total <= 100.0);
        let sum: f64 = result.dimensions.iter().map(|d| d.weighted_score).sum();
        assert!((result.total - (sum * 10.0).round() / 10.0).abs() < 1e-9);
    }
}

#[test]
fn explanation_names_matched_and_missed_dimensions() {
    let thesis = ThesisConfig::default_seed();
    let mut company = mk_company("acme");
    company.tags = vec!["ai".to_string()];
    company.signals = vec![funding_signal(10, false)];

    let result = score_company_at(&company, &thesis, None, fixed_now());
    assert!(result.explanation.contains(&company.name));
    assert!(result.explanation.contains("Sector Fit") || result.explanation.contains("Weaker on"));
    // Evidence strings are quoted literally.
    assert!(result.explanation.contains("Sector \"AI/ML\" is in thesis target list"));
}

#[test]
fn confidence_follows_evidence_density() {
    let thesis = ThesisConfig::default_seed();
    let mut company = mk_company("acme");

    let result = score_company_at(&company, &thesis, None, fixed_now());
    assert_eq!(result.confidence, ScoreConfidence::Low);

    company.signals = vec![funding_signal(1, false), funding_signal(20, false)];
    let result = score_company_at(&company, &thesis, None, fixed_now());
    assert_eq!(result.confidence, ScoreConfidence::Medium);

    company.signals.push(funding_signal(30, false));
    let enrichment = EnrichmentPayload {
        company_id: company.id.clone(),
        status: EnrichmentStatus::Success,
        summary: Some("Technical founding team".to_string()),
        keywords: vec!["ai".to_string()],
    };
    let result = score_company_at(&company, &thesis, Some(&enrichment), fixed_now());
    assert_eq!(result.confidence, ScoreConfidence::High);
}

#[test]
fn batch_scoring_ranks_descending_with_stable_ties() {
    let thesis = ThesisConfig::default_seed();

    let mut strong = mk_company("strong");
    strong.tags = vec!["ai".to_string(), "b2b".to_string()];
    strong.signals = vec![funding_signal(5, true)];

    let twin_a = mk_company("twin_a");
    let twin_b = mk_company("twin_b");

    let mut weak = mk_company("weak");
    weak.sector = Sector::Consumer;
    weak.stage = FundingStage::SeriesCPlus;
    weak.geography = "Singapore".to_string();

    let ranked = score_all_companies_at(
        &[weak.clone(), twin_a.clone(), strong.clone(), twin_b.clone()],
        &thesis,
        fixed_now(),
    );

    assert_eq!(ranked.len(), 4);
    assert_eq!(ranked[0].company.id, "strong");
    assert_eq!(ranked[1].company.id, "twin_a");
    assert_eq!(ranked[2].company.id, "twin_b");
    assert_eq!(ranked[3].company.id, "weak");
    for pair in ranked.windows(2) {
        assert!(pair[0].score.total >= pair[1].score.total);
    }
}

#[test]
fn unknown_dimension_never_blocks_the_rest() {
    let mut thesis = ThesisConfig::default_seed();
    thesis.dimensions[0].key = "regulatory_fit".to_string(); // unmapped key

    let company = mk_company("acme");
    let result = score_company_at(&company, &thesis, None, fixed_now());

    let custom = result.dimensions.iter().find(|d| d.key == "regulatory_fit").unwrap();
    assert_eq!(custom.raw_score, 50.0);
    assert!(custom.matched);
    assert_eq!(result.dimensions.len(), thesis.dimensions.len());
}

#[test]
fn cache_key_distinguishes_enrichment_states() {
    let enrichment = EnrichmentPayload {
        company_id: "acme".to_string(),
        status: EnrichmentStatus::Success,
        summary: None,
        keywords: Vec::new(),
    };
    let bare = cache_key("acme", "1.0.0", None);
    let enriched = cache_key("acme", "1.0.0", Some(&enrichment));
    assert_ne!(bare, enriched);
    assert_eq!(bare, cache_key("acme", "1.0.0", None));
}
