//! Skill trends: document frequency per skill and the trending-set decision.
//!
//! Counts are per document, not per mention: a skill listed five times in
//! one posting counts once.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Share of documents a skill must appear in to count as trending.
pub const DEFAULT_TRENDING_THRESHOLD: f64 = 0.30;

/// skill → number of documents mentioning it. Never holds zero counts.
pub type SkillFrequencyTable = BTreeMap<String, usize>;

#[derive(Debug, Error, PartialEq)]
pub enum TrendError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Frequency table and trending set for one corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub total_documents: usize,
    pub threshold: f64,
    pub min_count: usize,
    pub frequency: SkillFrequencyTable,
    pub trending: Vec<String>,
}

/// Tallies how many documents mention each skill.
pub fn calculate_frequency<D, S>(document_skill_sets: D) -> SkillFrequencyTable
where
    D: IntoIterator,
    D::Item: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut table = SkillFrequencyTable::new();
    for document in document_skill_sets {
        let unique: BTreeSet<String> = document
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        for skill in unique {
            *table.entry(skill).or_insert(0) += 1;
        }
    }
    table
}

/// Minimum document count for a skill to be trending.
pub fn min_count(total_documents: usize, threshold: f64) -> usize {
    ((total_documents as f64 * threshold).floor() as usize).max(1)
}

/// Returns the skills whose count reaches `max(1, floor(total × threshold))`,
/// sorted ascending.
pub fn select_trending(
    table: &SkillFrequencyTable,
    total_documents: usize,
    threshold: f64,
) -> Result<Vec<String>, TrendError> {
    validate_threshold(threshold)?;

    if let Some((skill, count)) = table.iter().find(|(_, c)| **c > total_documents) {
        return Err(TrendError::InvalidArgument(format!(
            "skill '{skill}' has count {count} but only {total_documents} documents were analysed"
        )));
    }

    let min_count = min_count(total_documents, threshold);

    // BTreeMap iteration is already key-ordered
    Ok(table
        .iter()
        .filter(|(_, count)| **count >= min_count)
        .map(|(skill, _)| skill.clone())
        .collect())
}

/// Runs `calculate_frequency` and `select_trending` over one corpus.
pub fn compute_trends<S: AsRef<str>>(
    document_skill_sets: &[Vec<S>],
    threshold: f64,
) -> Result<TrendReport, TrendError> {
    validate_threshold(threshold)?;

    let total_documents = document_skill_sets.len();
    let frequency = calculate_frequency(document_skill_sets.iter().map(|d| d.iter()));
    let trending = select_trending(&frequency, total_documents, threshold)?;

    Ok(TrendReport {
        total_documents,
        threshold,
        min_count: min_count(total_documents, threshold),
        frequency,
        trending,
    })
}

fn validate_threshold(threshold: f64) -> Result<(), TrendError> {
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        return Err(TrendError::InvalidArgument(format!(
            "threshold must be in (0, 1], got {threshold}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(sets: &[&[&str]]) -> Vec<Vec<String>> {
        sets.iter()
            .map(|d| d.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_frequency_counts_documents_not_mentions() {
        let corpus = docs(&[&["python", "sql"], &["python"], &["java"]]);
        let table = calculate_frequency(&corpus);

        assert_eq!(table.len(), 3);
        assert_eq!(table["python"], 2);
        assert_eq!(table["sql"], 1);
        assert_eq!(table["java"], 1);
    }

    #[test]
    fn test_repeated_mentions_in_one_document_count_once() {
        let corpus = docs(&[&["rust", "rust", "rust", "rust", "rust"], &["go"]]);
        let table = calculate_frequency(&corpus);
        assert_eq!(table["rust"], 1);
        assert_eq!(table["go"], 1);
    }

    #[test]
    fn test_frequency_has_no_zero_entries() {
        let corpus = docs(&[&[], &["docker"], &[]]);
        let table = calculate_frequency(&corpus);
        assert_eq!(table.len(), 1);
        assert!(table.values().all(|c| *c >= 1));
    }

    #[test]
    fn test_small_corpus_threshold_half_keeps_everything() {
        // floor(3 * 0.5) = 1 → every skill qualifies
        let corpus = docs(&[&["python", "sql"], &["python"], &["java"]]);
        let table = calculate_frequency(&corpus);
        let trending = select_trending(&table, 3, 0.5).unwrap();
        assert_eq!(trending, vec!["java", "python", "sql"]);
    }

    #[test]
    fn test_min_count_boundary_at_thirty_percent() {
        let mut table = SkillFrequencyTable::new();
        table.insert("kubernetes".to_string(), 3);
        table.insert("terraform".to_string(), 2);

        assert_eq!(min_count(10, 0.3), 3);
        let trending = select_trending(&table, 10, 0.3).unwrap();
        assert_eq!(trending, vec!["kubernetes"]);
    }

    #[test]
    fn test_threshold_one_selects_skills_in_every_document() {
        let corpus = docs(&[
            &["python", "sql", "git"],
            &["python", "git"],
            &["git", "python", "docker"],
        ]);
        let table = calculate_frequency(&corpus);
        let trending = select_trending(&table, corpus.len(), 1.0).unwrap();
        assert_eq!(trending, vec!["git", "python"]);
    }

    #[test]
    fn test_zero_documents_yields_empty_result() {
        let table = SkillFrequencyTable::new();
        assert_eq!(min_count(0, 0.3), 1);
        assert!(select_trending(&table, 0, 0.3).unwrap().is_empty());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let table = SkillFrequencyTable::new();
        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                select_trending(&table, 5, bad),
                Err(TrendError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_count_above_total_rejected() {
        let mut table = SkillFrequencyTable::new();
        table.insert("python".to_string(), 4);
        assert!(select_trending(&table, 3, 0.3).is_err());
    }

    #[test]
    fn test_compute_trends_report() {
        let corpus = docs(&[
            &["python", "pytorch"],
            &["python", "sql"],
            &["python"],
            &["java"],
        ]);
        let report = compute_trends(&corpus, DEFAULT_TRENDING_THRESHOLD).unwrap();

        assert_eq!(report.total_documents, 4);
        assert_eq!(report.min_count, 1);
        assert_eq!(report.frequency["python"], 3);
        assert_eq!(report.trending, vec!["java", "python", "pytorch", "sql"]);
    }

    #[test]
    fn test_compute_trends_rejects_bad_threshold_on_empty_corpus() {
        let corpus: Vec<Vec<String>> = vec![];
        assert!(compute_trends(&corpus, 0.0).is_err());
    }
}
