//! Integration tests for the skill gap toolkit

use skill_gap::config::{Config, EmbeddingBackend};
use skill_gap::dataset::{DatasetLoader, JobDataset};
use skill_gap::output::{AnalysisReport, ProgressReport};
use skill_gap::processing::{
    ExperienceLevel, MarketTrendAggregator, SalaryPredictor, SkillGapAnalyzer, TextNormalizer,
};
use skill_gap::session::{SessionAction, SessionRegistry, SessionResponse};
use skill_gap::SkillGapError;
use std::path::Path;
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/job_skills.csv";

fn load_fixture() -> JobDataset {
    let normalizer = TextNormalizer::new();
    DatasetLoader::new(&normalizer).load_path(Path::new(FIXTURE)).unwrap()
}

fn hashed_analyzer() -> SkillGapAnalyzer {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let mut config = Config::load_from(&config_path).unwrap();
    config.embedding.backend = EmbeddingBackend::Hashed;
    SkillGapAnalyzer::from_config(&config).unwrap()
}

#[test]
fn test_fixture_loads_and_skips_incomplete_rows() {
    let dataset = load_fixture();

    assert_eq!(dataset.len(), 10);
    assert_eq!(
        dataset.job_titles(),
        vec![
            "Data Scientist",
            "Data Engineer",
            "Data Analyst",
            "Cloud Engineer",
            "Frontend Developer",
            "Backend Developer",
            "Machine Learning Engineer",
        ]
    );

    let summary = dataset.summary();
    let missing = |column: &str| {
        summary
            .missing_values
            .iter()
            .find(|m| m.column == column)
            .map(|m| m.missing)
    };
    assert_eq!(missing("Job_Title"), Some(1));
    assert_eq!(missing("Total_Compensation"), Some(1));
    assert_eq!(missing("Learning Resources"), Some(2));
    assert_eq!(missing("Posting_Date"), Some(2));
}

#[test]
fn test_end_to_end_analysis() {
    let dataset = load_fixture();
    let mut analyzer = hashed_analyzer();
    let skills = analyzer.normalizer().normalize("Python, SQL");

    let report = AnalysisReport::generate(
        &dataset,
        &mut analyzer,
        &skills,
        "Data Engineer",
        ExperienceLevel::Intermediate,
        Some("AMAZON"),
    )
    .unwrap();

    assert_eq!(report.missing_skills, vec!["aws", "spark"]);
    assert_eq!(report.acquired_skills, vec!["python", "sql"]);
    assert!(report.match_percentage > 0.0 && report.match_percentage < 100.0);
    assert_eq!(report.learning_resources.as_deref(), Some("AWS Data Analytics Learning Plan"));
    assert_eq!(
        report.company.unwrap().skills,
        vec!["airflow", "aws", "kafka", "python", "spark", "sql"]
    );

    let job = dataset.find_role("Data Engineer").unwrap();
    let score = report.raw_similarity * ExperienceLevel::Intermediate.match_damping();
    let salary = SalaryPredictor::predict(job, score, ExperienceLevel::Intermediate).unwrap();
    assert_eq!(report.predicted_salary, salary);
    assert_eq!(salary, ((140_000.0 * 1.5 * score as f64) * 100.0).round() / 100.0);
}

#[test]
fn test_unknown_role_suggestion() {
    let dataset = load_fixture();

    let err = SalaryPredictor::predict_for_role(&dataset, "Data Scienist", 0.5, ExperienceLevel::Beginner)
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown job role: Data Scienist (did you mean 'Data Scientist'?)");
}

#[test]
fn test_market_trends() {
    let dataset = load_fixture();
    let records = dataset.records();

    let top: Vec<(String, usize)> = MarketTrendAggregator::top(records, 3)
        .into_iter()
        .map(|d| (d.skill, d.count))
        .collect();
    assert_eq!(
        top,
        vec![
            ("Python".to_string(), 6),
            ("SQL".to_string(), 4),
            ("Docker".to_string(), 2),
        ]
    );

    let locations = MarketTrendAggregator::location_distribution(records);
    assert_eq!(locations[0].location, "Remote");
    assert_eq!(locations[0].count, 3);
    assert_eq!(locations[1].location, "Seattle");
    assert_eq!(locations.iter().map(|l| l.count).sum::<usize>(), 9);

    let monthly = MarketTrendAggregator::monthly_demand(records);
    let months: Vec<&str> = monthly.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
    assert!(monthly.iter().all(|m| m.postings.len() == 6));
    assert_eq!(monthly[2].postings["Cloud Engineer"], 1);
    assert_eq!(monthly[2].postings["Data Scientist"], 0);

    let salaries = MarketTrendAggregator::salary_distribution(records);
    let analyst = salaries.iter().find(|s| s.job_title == "Data Analyst").unwrap();
    assert_eq!(analyst.count, 2);
    assert_eq!(analyst.median, 100_000.0);
}

#[test]
fn test_progress_report() {
    let dataset = load_fixture();
    let completed = TextNormalizer::new().normalize("SQL, Excel");

    let report = ProgressReport::generate(&dataset, "Data Analyst", &completed).unwrap();
    assert_eq!(report.completed_skills, vec!["excel", "sql"]);
    assert_eq!(report.remaining_skills, vec!["statistic", "tableau"]);
    assert_eq!(report.percentage, 50.0);
}

#[test]
fn test_interactive_sessions_are_isolated() {
    let dataset = load_fixture();
    let mut analyzer = hashed_analyzer();
    let mut registry = SessionRegistry::new();

    for line in ["role Cloud Engineer", "level advanced", "skills docker, kubernetes"] {
        let action: SessionAction = line.parse().unwrap();
        registry
            .get_or_create("alice")
            .handle(action, &dataset, &mut analyzer)
            .unwrap();
    }

    let alice = registry.get_or_create("alice");
    match alice.handle(SessionAction::Analyze, &dataset, &mut analyzer).unwrap() {
        SessionResponse::Analysis(report) => {
            assert_eq!(report.experience_level, ExperienceLevel::Advanced);
            assert_eq!(report.missing_skills, vec!["azure", "terraform"]);
        }
        other => panic!("unexpected response: {:?}", other),
    }

    let bob = registry.get_or_create("bob");
    let err = bob.handle(SessionAction::Analyze, &dataset, &mut analyzer).unwrap_err();
    assert!(matches!(err, SkillGapError::InvalidInput(_)));
}

#[test]
fn test_missing_column_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("jobs.csv");
    std::fs::write(&path, "Job_Title,Total_Compensation\nDev,100\n").unwrap();

    let normalizer = TextNormalizer::new();
    let err = DatasetLoader::new(&normalizer).load_path(&path).unwrap_err();
    assert!(matches!(err, SkillGapError::MissingColumn(ref column) if column == "Required_Skills"));
}
