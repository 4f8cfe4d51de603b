//! Job records and the read-only dataset that owns them

use crate::error::{Result, SkillGapError};
use crate::processing::skill_set::SkillSet;
use crate::processing::text_normalizer::TextNormalizer;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strsim::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a role title suggestion
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// One row of the job skills dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_title: String,
    pub company: String,
    pub required_skills_raw: String,
    pub skills: SkillSet,
    pub base_compensation: f64,
    pub location: Option<String>,
    pub posting_date: Option<NaiveDate>,
    pub learning_resources: String,
}

impl JobRecord {
    pub fn new(
        job_title: impl Into<String>,
        required_skills_raw: impl Into<String>,
        base_compensation: f64,
        normalizer: &TextNormalizer,
    ) -> Self {
        let required_skills_raw = required_skills_raw.into();
        let skills = normalizer.normalize(&required_skills_raw);

        Self {
            job_title: job_title.into(),
            company: String::new(),
            required_skills_raw,
            skills,
            base_compensation,
            location: None,
            posting_date: None,
            learning_resources: String::new(),
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_posting_date(mut self, date: NaiveDate) -> Self {
        self.posting_date = Some(date);
        self
    }

    pub fn with_learning_resources(mut self, resources: impl Into<String>) -> Self {
        self.learning_resources = resources.into();
        self
    }
}

/// Blank cell count for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub roles: usize,
    pub companies: usize,
    pub columns: Vec<String>,
    pub missing_values: Vec<ColumnMissing>,
    pub compensation_min: Option<f64>,
    pub compensation_max: Option<f64>,
    pub compensation_mean: Option<f64>,
}

/// Immutable collection of job records shared by every component
#[derive(Debug, Clone, Default)]
pub struct JobDataset {
    records: Vec<JobRecord>,
    columns: Vec<String>,
    missing_values: Vec<ColumnMissing>,
}

impl JobDataset {
    pub fn from_records(records: Vec<JobRecord>) -> Self {
        Self {
            records,
            columns: Vec::new(),
            missing_values: Vec::new(),
        }
    }

    pub(crate) fn with_schema(mut self, columns: Vec<String>, missing_values: Vec<ColumnMissing>) -> Self {
        self.columns = columns;
        self.missing_values = missing_values;
        self
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unique job titles in first-seen order
    pub fn job_titles(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .map(|r| r.job_title.as_str())
            .filter(|title| seen.insert(*title))
            .collect()
    }

    /// Unique non-empty company names, sorted
    pub fn companies(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.company.as_str())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn records_for_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a JobRecord> + 'a {
        self.records.iter().filter(move |r| r.job_title == role)
    }

    /// The reference record for a role: its first row in dataset order.
    ///
    /// Fails with `UnknownJobRole` when no row carries the title, suggesting
    /// the closest known title when one is similar enough.
    pub fn find_role(&self, role: &str) -> Result<&JobRecord> {
        self.records
            .iter()
            .find(|r| r.job_title == role)
            .ok_or_else(|| SkillGapError::unknown_role(role, self.suggest_role(role)))
    }

    fn suggest_role(&self, role: &str) -> Option<String> {
        let role_lower = role.to_lowercase();
        self.job_titles()
            .into_iter()
            .map(|title| (title, jaro_winkler(&role_lower, &title.to_lowercase())))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(title, _)| title.to_string())
    }

    /// Sorted union of normalized skills for `role` at `company`.
    ///
    /// Company matching ignores case; an unmatched pair yields an empty set.
    pub fn company_skills(&self, company: &str, role: &str) -> SkillSet {
        let company = company.to_lowercase();
        let skills: BTreeSet<&str> = self
            .records_for_role(role)
            .filter(|r| r.company.to_lowercase() == company)
            .flat_map(|r| r.skills.iter())
            .collect();

        skills.into_iter().collect()
    }

    pub fn summary(&self) -> DatasetSummary {
        let compensations: Vec<f64> = self.records.iter().map(|r| r.base_compensation).collect();
        let (min, max, mean) = if compensations.is_empty() {
            (None, None, None)
        } else {
            let min = compensations.iter().copied().fold(f64::INFINITY, f64::min);
            let max = compensations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = compensations.iter().sum::<f64>() / compensations.len() as f64;
            (Some(min), Some(max), Some(mean))
        };

        DatasetSummary {
            rows: self.records.len(),
            roles: self.job_titles().len(),
            companies: self.companies().len(),
            columns: self.columns.clone(),
            missing_values: self.missing_values.clone(),
            compensation_min: min,
            compensation_max: max,
            compensation_mean: mean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> JobDataset {
        let normalizer = TextNormalizer::new();
        JobDataset::from_records(vec![
            JobRecord::new("Data Scientist", "Python, SQL, Statistics", 120_000.0, &normalizer)
                .with_company("Google"),
            JobRecord::new("Data Scientist", "Python, Machine Learning", 130_000.0, &normalizer)
                .with_company("google"),
            JobRecord::new("Data Scientist", "R, Tableau", 110_000.0, &normalizer).with_company("Meta"),
            JobRecord::new("Cloud Engineer", "AWS, Terraform", 140_000.0, &normalizer).with_company("Amazon"),
        ])
    }

    #[test]
    fn test_job_titles_first_seen_order() {
        assert_eq!(dataset().job_titles(), vec!["Data Scientist", "Cloud Engineer"]);
    }

    #[test]
    fn test_companies_sorted_unique() {
        assert_eq!(dataset().companies(), vec!["Amazon", "Google", "Meta", "google"]);
    }

    #[test]
    fn test_find_role_returns_first_row() {
        let data = dataset();
        let record = data.find_role("Data Scientist").unwrap();
        assert_eq!(record.base_compensation, 120_000.0);
    }

    #[test]
    fn test_unknown_role_suggests_closest_title() {
        let data = dataset();
        match data.find_role("Data Scientst").unwrap_err() {
            SkillGapError::UnknownJobRole { role, suggestion } => {
                assert_eq!(role, "Data Scientst");
                assert_eq!(suggestion.as_deref(), Some("Data Scientist"));
            }
            other => panic!("unexpected error: {}", other),
        }

        match data.find_role("Astronaut").unwrap_err() {
            SkillGapError::UnknownJobRole { suggestion, .. } => assert!(suggestion.is_none()),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_company_skills_case_insensitive_union() {
        let skills = dataset().company_skills("GOOGLE", "Data Scientist");
        assert_eq!(
            skills.iter().collect::<Vec<_>>(),
            vec!["machine learning", "python", "sql", "statistic"]
        );
    }

    #[test]
    fn test_company_skills_empty_when_unmatched() {
        assert!(dataset().company_skills("Netflix", "Data Scientist").is_empty());
        assert!(dataset().company_skills("Amazon", "Data Scientist").is_empty());
    }

    #[test]
    fn test_summary_statistics() {
        let summary = dataset().summary();
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.roles, 2);
        assert_eq!(summary.compensation_min, Some(110_000.0));
        assert_eq!(summary.compensation_max, Some(140_000.0));
        assert_eq!(summary.compensation_mean, Some(125_000.0));

        let empty = JobDataset::default().summary();
        assert_eq!(empty.rows, 0);
        assert!(empty.compensation_mean.is_none());
    }
}
