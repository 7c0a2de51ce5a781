//! Deterministic explanation paragraph for a score result.
//!
//! Names which dimensions matched and missed and quotes up to three literal
//! evidence strings. Same inputs always produce the same paragraph; there is
//! no generation involved, analysts can trace every clause to a scorer.

use super::dimensions::DimensionScore;
use super::ScoreGrade;

const MAX_QUOTED_EVIDENCE: usize = 3;

pub fn generate_explanation(
    company_name: &str,
    dimensions: &[DimensionScore],
    total: f64,
    grade: ScoreGrade,
) -> String {
    let matched: Vec<&DimensionScore> = dimensions.iter().filter(|d| d.matched).collect();
    let missed: Vec<&DimensionScore> = dimensions.iter().filter(|d| !d.matched).collect();

    let top_evidence = dimensions
        .iter()
        .flat_map(|d| d.evidence.iter())
        .take(MAX_QUOTED_EVIDENCE)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ");

    let matched_labels = matched.iter().map(|d| d.label.as_str()).collect::<Vec<_>>().join(", ");
    let missed_labels = missed.iter().map(|d| d.label.as_str()).collect::<Vec<_>>().join(", ");

    let mut explanation = format!("{company_name} scores {total}/100 ({grade}). ");

    if missed.is_empty() && !matched.is_empty() {
        explanation.push_str(&format!(
            "All thesis dimensions matched. Key signals: {top_evidence}. \
             This company aligns strongly with the fund's mandate."
        ));
    } else if matched.len() > missed.len() {
        explanation.push_str(&format!(
            "Matched on {matched_labels}. Key evidence: {top_evidence}. \
             Weaker on: {missed_labels}."
        ));
    } else if !matched.is_empty() {
        explanation.push_str(&format!(
            "Partial match: strong on {matched_labels} but missed on {missed_labels}."
        ));
    } else {
        explanation.push_str(&format!(
            "No thesis dimensions matched. Missed on: {missed_labels}. \
             Outside current fund mandate."
        ));
    }

    explanation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(label: &str, matched: bool, evidence: &[&str]) -> DimensionScore {
        DimensionScore {
            key: label.to_lowercase().replace(' ', "_"),
            label: label.to_string(),
            weight: 20.0,
            raw_score: if matched { 80.0 } else { 10.0 },
            weighted_score: 0.0,
            matched,
            evidence: evidence.iter().map(|s| s.to_string()).collect(),
            missing: Vec::new(),
        }
    }

    #[test]
    fn all_matched_paragraph() {
        let dims = vec![
            dim("Sector Fit", true, &["Sector \"AI/ML\" is in thesis target list"]),
            dim("Stage Fit", true, &["Stage \"Seed\" is an exact thesis match"]),
        ];
        let text = generate_explanation("Acme", &dims, 88.0, ScoreGrade::StrongMatch);
        assert!(text.starts_with("Acme scores 88/100 (Strong Match)."));
        assert!(text.contains("All thesis dimensions matched"));
        assert!(text.contains("AI/ML"));
    }

    #[test]
    fn quotes_at_most_three_evidence_strings() {
        let dims = vec![
            dim("Sector Fit", true, &["e1", "e2"]),
            dim("Stage Fit", true, &["e3", "e4"]),
        ];
        let text = generate_explanation("Acme", &dims, 75.0, ScoreGrade::StrongMatch);
        assert!(text.contains("e1; e2; e3"));
        assert!(!text.contains("e4"));
    }

    #[test]
    fn nothing_matched_paragraph() {
        let dims = vec![dim("Stage Fit", false, &[]), dim("Geography Fit", false, &[])];
        let text = generate_explanation("Acme", &dims, 12.0, ScoreGrade::NoMatch);
        assert!(text.contains("No thesis dimensions matched"));
        assert!(text.contains("Stage Fit, Geography Fit"));
    }
}
