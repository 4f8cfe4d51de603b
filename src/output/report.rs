//! Report structures rendered by the output formatters

use crate::dataset::{DatasetSummary, JobDataset};
use crate::error::Result;
use crate::processing::analyzer::{MatchResult, SkillGapAnalyzer};
use crate::processing::experience::ExperienceLevel;
use crate::processing::progress::{ProgressStatus, ProgressTracker};
use crate::processing::salary::SalaryPredictor;
use crate::processing::skill_set::SkillSet;
use crate::processing::trends::{LocationDemand, MonthlyDemand, SalaryStats, SkillDemand};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything shown to the user after matching their skills against a role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub job_title: String,
    pub experience_level: ExperienceLevel,

    /// Experience adjusted match, 0-100
    pub match_percentage: f64,
    pub raw_similarity: f32,

    /// Sorted for display
    pub missing_skills: Vec<String>,
    pub acquired_skills: Vec<String>,

    pub base_compensation: f64,
    pub predicted_salary: f64,

    pub learning_resources: Option<String>,

    /// Set when a company was requested
    pub company: Option<CompanySkills>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySkills {
    pub company: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub embedding_model: String,
}

impl ReportMetadata {
    fn new(embedding_model: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            embedding_model: embedding_model.into(),
        }
    }
}

impl AnalysisReport {
    /// Run the full pipeline for one role: match, salary, resources and
    /// optionally the company's skill set
    pub fn generate(
        dataset: &JobDataset,
        analyzer: &mut SkillGapAnalyzer,
        user_skills: &SkillSet,
        role: &str,
        level: ExperienceLevel,
        company: Option<&str>,
    ) -> Result<Self> {
        let job = dataset.find_role(role)?;
        let result = analyzer.analyze(user_skills, job, level)?;
        let predicted_salary = SalaryPredictor::predict(job, result.match_score, level)?;

        let company = company.map(|name| CompanySkills {
            company: name.to_string(),
            skills: dataset.company_skills(name, role).sorted(),
        });

        let learning_resources = Some(job.learning_resources.clone()).filter(|r| !r.is_empty());

        Ok(Self::from_match(
            job.job_title.clone(),
            job.base_compensation,
            result,
            predicted_salary,
            learning_resources,
            company,
        ))
    }

    fn from_match(
        job_title: String,
        base_compensation: f64,
        result: MatchResult,
        predicted_salary: f64,
        learning_resources: Option<String>,
        company: Option<CompanySkills>,
    ) -> Self {
        Self {
            job_title,
            experience_level: result.experience_level,
            match_percentage: result.match_percentage(),
            raw_similarity: result.raw_similarity,
            missing_skills: result.missing_skills.sorted(),
            acquired_skills: result.acquired_skills.sorted(),
            base_compensation,
            predicted_salary,
            learning_resources,
            company,
            metadata: ReportMetadata::new(result.model_id),
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self.match_percentage {
            p if p >= 80.0 => "Strong match for this role",
            p if p >= 60.0 => "Good match with a few gaps",
            p if p >= 40.0 => "Partial match, focus on the missing skills",
            _ => "Significant skill gap for this role",
        }
    }
}

/// Completion of a role's required skills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub job_title: String,
    pub completed_skills: Vec<String>,
    pub remaining_skills: Vec<String>,
    pub percentage: f64,
    pub complete: bool,
}

impl ProgressReport {
    pub fn generate(dataset: &JobDataset, role: &str, completed: &SkillSet) -> Result<Self> {
        let job = dataset.find_role(role)?;
        let status = ProgressTracker::status(&job.skills, completed)?;
        Ok(Self::from_status(&job.job_title, &status))
    }

    pub fn from_status(job_title: &str, status: &ProgressStatus) -> Self {
        Self {
            job_title: job_title.to_string(),
            completed_skills: status.acquired.sorted(),
            remaining_skills: status.missing.sorted(),
            percentage: (status.percentage() * 100.0).round() / 100.0,
            complete: status.is_complete(),
        }
    }
}

/// One of the market trend views over the dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum TrendReport {
    Skills(Vec<SkillDemand>),
    Locations(Vec<LocationDemand>),
    Monthly(Vec<MonthlyDemand>),
    Salaries(Vec<SalaryStats>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleListing {
    pub roles: Vec<String>,
    pub companies: Vec<String>,
}

impl RoleListing {
    pub fn from_dataset(dataset: &JobDataset) -> Self {
        Self {
            roles: dataset.job_titles().into_iter().map(String::from).collect(),
            companies: dataset.companies().into_iter().map(String::from).collect(),
        }
    }
}

pub type SummaryReport = DatasetSummary;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::JobRecord;
    use crate::error::SkillGapError;
    use crate::processing::embeddings::{EmbeddingScorer, HashedEmbedder};
    use crate::processing::text_normalizer::TextNormalizer;

    fn dataset() -> JobDataset {
        let normalizer = TextNormalizer::new();
        JobDataset::from_records(vec![
            JobRecord::new("Data Engineer", "Python, SQL, AWS", 100_000.0, &normalizer)
                .with_company("Acme")
                .with_learning_resources("Cloud bootcamp"),
            JobRecord::new("Data Engineer", "Spark, Python", 110_000.0, &normalizer).with_company("acme"),
            JobRecord::new("Analyst", "Excel", 60_000.0, &normalizer),
        ])
    }

    fn analyzer() -> SkillGapAnalyzer {
        SkillGapAnalyzer::new(
            TextNormalizer::new(),
            EmbeddingScorer::new(Box::new(HashedEmbedder::new(256))),
        )
    }

    #[test]
    fn test_analysis_report_combines_pipeline() {
        let data = dataset();
        let mut analyzer = analyzer();
        let skills = analyzer.normalizer().normalize("sql, python");

        let report = AnalysisReport::generate(
            &data,
            &mut analyzer,
            &skills,
            "Data Engineer",
            ExperienceLevel::Intermediate,
            Some("ACME"),
        )
        .unwrap();

        assert_eq!(report.missing_skills, vec!["aws"]);
        assert_eq!(report.acquired_skills, vec!["python", "sql"]);
        assert_eq!(report.learning_resources.as_deref(), Some("Cloud bootcamp"));
        assert_eq!(
            report.company.as_ref().map(|c| c.skills.clone()),
            Some(vec!["aws".to_string(), "python".to_string(), "spark".to_string(), "sql".to_string()])
        );

        let expected_score = report.raw_similarity * 0.75;
        let expected_salary = ((100_000.0 * 1.5 * expected_score as f64) * 100.0).round() / 100.0;
        assert_eq!(report.predicted_salary, expected_salary);
        assert_eq!(report.metadata.embedding_model, "hashed-bow-256");
    }

    #[test]
    fn test_analysis_report_unknown_role() {
        let err = AnalysisReport::generate(
            &dataset(),
            &mut analyzer(),
            &SkillSet::new(),
            "Astronaut",
            ExperienceLevel::Beginner,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, SkillGapError::UnknownJobRole { .. }));
    }

    #[test]
    fn test_no_learning_resources_is_none() {
        let data = dataset();
        let report = AnalysisReport::generate(
            &data,
            &mut analyzer(),
            &SkillSet::new(),
            "Analyst",
            ExperienceLevel::Beginner,
            None,
        )
        .unwrap();

        assert!(report.learning_resources.is_none());
        assert!(report.company.is_none());
        assert_eq!(report.predicted_salary, 0.0);
    }

    #[test]
    fn test_progress_report() {
        let completed: SkillSet = vec!["aws", "python"].into_iter().collect();
        let report = ProgressReport::generate(&dataset(), "Data Engineer", &completed).unwrap();

        assert_eq!(report.completed_skills, vec!["aws", "python"]);
        assert_eq!(report.remaining_skills, vec!["sql"]);
        assert_eq!(report.percentage, 66.67);
        assert!(!report.complete);
    }

    #[test]
    fn test_progress_report_for_role_without_skills() {
        let normalizer = TextNormalizer::new();
        let data = JobDataset::from_records(vec![JobRecord::new("Intern", "", 1.0, &normalizer)]);

        let err = ProgressReport::generate(&data, "Intern", &SkillSet::new()).unwrap_err();
        assert!(matches!(err, SkillGapError::EmptyRequirement));
    }

    #[test]
    fn test_trend_report_json_shape() {
        let report = TrendReport::Skills(vec![SkillDemand { skill: "python".to_string(), count: 2 }]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["view"], "skills");
        assert_eq!(json["data"][0]["count"], 2);
    }
}
