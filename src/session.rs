//! Per-user interactive session state and the discrete actions that drive it

use crate::dataset::JobDataset;
use crate::error::{Result, SkillGapError};
use crate::output::report::{AnalysisReport, ProgressReport, RoleListing, TrendReport};
use crate::processing::analyzer::SkillGapAnalyzer;
use crate::processing::experience::ExperienceLevel;
use crate::processing::progress::{ProgressState, ProgressTracker};
use crate::processing::skill_set::SkillSet;
use crate::processing::trends::MarketTrendAggregator;
use std::collections::HashMap;
use std::str::FromStr;

const DEFAULT_TOP_SKILLS: usize = 10;

pub const HELP_TEXT: &str = "\
Commands:
  skills <a, b, c>     set your skills (comma separated)
  role <job title>     select the target role
  company [name]       select a company, or clear it
  level <level>        Beginner, Intermediate or Advanced
  analyze              match your skills against the selected role
  complete [a, b]      replace the skills you have completed
  progress             show progress on the selected role
  trends [n]           show the n most demanded skills
  roles                list job roles and companies
  help                 show this message
  quit                 leave the session";

/// One user action
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SetSkills(String),
    SelectRole(String),
    SelectCompany(Option<String>),
    SetLevel(ExperienceLevel),
    Analyze,
    UpdateProgress(String),
    ShowProgress,
    Trends(Option<usize>),
    ListRoles,
    Help,
    Quit,
}

impl FromStr for SessionAction {
    type Err = SkillGapError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let require = |what: &str| {
            if argument.is_empty() {
                Err(SkillGapError::InvalidInput(format!("`{}` needs {}", command, what)))
            } else {
                Ok(argument.to_string())
            }
        };

        match command.to_lowercase().as_str() {
            "skills" => Ok(SessionAction::SetSkills(require("a skill list")?)),
            "role" => Ok(SessionAction::SelectRole(require("a job title")?)),
            "company" => Ok(SessionAction::SelectCompany(
                Some(argument.to_string()).filter(|c| !c.is_empty()),
            )),
            "level" => Ok(SessionAction::SetLevel(require("an experience level")?.parse()?)),
            "analyze" => Ok(SessionAction::Analyze),
            "complete" => Ok(SessionAction::UpdateProgress(argument.to_string())),
            "progress" => Ok(SessionAction::ShowProgress),
            "trends" => {
                let top = if argument.is_empty() {
                    None
                } else {
                    Some(argument.parse().map_err(|_| {
                        SkillGapError::InvalidInput(format!("`trends` expects a number, got '{}'", argument))
                    })?)
                };
                Ok(SessionAction::Trends(top))
            }
            "roles" => Ok(SessionAction::ListRoles),
            "help" | "?" => Ok(SessionAction::Help),
            "quit" | "exit" => Ok(SessionAction::Quit),
            other => Err(SkillGapError::InvalidInput(format!(
                "Unknown command '{}'; type `help` for a list",
                other
            ))),
        }
    }
}

/// Result of handling one action, ready for rendering
#[derive(Debug, Clone)]
pub enum SessionResponse {
    Message(String),
    Analysis(Box<AnalysisReport>),
    Progress(ProgressReport),
    Trends(TrendReport),
    Roles(RoleListing),
    Quit,
}

/// State owned by one user. Nothing here is shared between sessions.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    user_skills: SkillSet,
    selected_role: Option<String>,
    selected_company: Option<String>,
    level: ExperienceLevel,
    progress: ProgressState,
    top_skills: usize,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_skills: SkillSet::new(),
            selected_role: None,
            selected_company: None,
            level: ExperienceLevel::Intermediate,
            progress: ProgressState::new(),
            top_skills: DEFAULT_TOP_SKILLS,
        }
    }

    pub fn with_top_skills(mut self, top_skills: usize) -> Self {
        self.top_skills = top_skills;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_skills(&self) -> &SkillSet {
        &self.user_skills
    }

    pub fn selected_role(&self) -> Option<&str> {
        self.selected_role.as_deref()
    }

    pub fn level(&self) -> ExperienceLevel {
        self.level
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    fn require_role(&self) -> Result<&str> {
        self.selected_role
            .as_deref()
            .ok_or_else(|| SkillGapError::InvalidInput("No job role selected; use `role <title>` first".to_string()))
    }

    /// Apply one action and produce its response
    pub fn handle(
        &mut self,
        action: SessionAction,
        dataset: &JobDataset,
        analyzer: &mut SkillGapAnalyzer,
    ) -> Result<SessionResponse> {
        match action {
            SessionAction::SetSkills(text) => {
                self.user_skills = analyzer.normalizer().normalize(&text);
                Ok(SessionResponse::Message(format!("Skills set: {}", self.user_skills)))
            }
            SessionAction::SelectRole(title) => {
                let job = dataset.find_role(&title)?;
                self.selected_role = Some(job.job_title.clone());
                Ok(SessionResponse::Message(format!(
                    "Selected role: {} ({} required skills)",
                    job.job_title,
                    job.skills.len()
                )))
            }
            SessionAction::SelectCompany(company) => {
                let message = match &company {
                    Some(name) => format!("Selected company: {}", name),
                    None => "Company cleared".to_string(),
                };
                self.selected_company = company;
                Ok(SessionResponse::Message(message))
            }
            SessionAction::SetLevel(level) => {
                self.level = level;
                Ok(SessionResponse::Message(format!("Experience level: {}", level)))
            }
            SessionAction::Analyze => {
                let role = self.require_role()?;
                let report = AnalysisReport::generate(
                    dataset,
                    analyzer,
                    &self.user_skills,
                    role,
                    self.level,
                    self.selected_company.as_deref(),
                )?;
                Ok(SessionResponse::Analysis(Box::new(report)))
            }
            SessionAction::UpdateProgress(text) => {
                let completed = analyzer.normalizer().normalize(&text);
                ProgressTracker::update(&mut self.progress, completed);

                if self.selected_role.is_none() {
                    return Ok(SessionResponse::Message(format!(
                        "Completed skills: {}",
                        self.progress.completed()
                    )));
                }

                match self.progress_report(dataset) {
                    Ok(report) => Ok(SessionResponse::Progress(report)),
                    Err(SkillGapError::EmptyRequirement) => Ok(SessionResponse::Message(format!(
                        "Completed skills: {} (the selected role lists no required skills)",
                        self.progress.completed()
                    ))),
                    Err(e) => Err(e),
                }
            }
            SessionAction::ShowProgress => self.progress_report(dataset).map(SessionResponse::Progress),
            SessionAction::Trends(top) => {
                let top = top.unwrap_or(self.top_skills);
                Ok(SessionResponse::Trends(TrendReport::Skills(MarketTrendAggregator::top(
                    dataset.records(),
                    top,
                ))))
            }
            SessionAction::ListRoles => Ok(SessionResponse::Roles(RoleListing::from_dataset(dataset))),
            SessionAction::Help => Ok(SessionResponse::Message(HELP_TEXT.to_string())),
            SessionAction::Quit => Ok(SessionResponse::Quit),
        }
    }

    fn progress_report(&self, dataset: &JobDataset) -> Result<ProgressReport> {
        let job = dataset.find_role(self.require_role()?)?;
        let status = ProgressTracker::status_for(&self.progress, &job.skills)?;
        Ok(ProgressReport::from_status(&job.job_title, &status))
    }
}

/// Sessions keyed by id, each handed out exclusively
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, id: &str) -> &mut Session {
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id))
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::JobRecord;
    use crate::processing::embeddings::{EmbeddingScorer, HashedEmbedder};
    use crate::processing::text_normalizer::TextNormalizer;

    fn dataset() -> JobDataset {
        let normalizer = TextNormalizer::new();
        JobDataset::from_records(vec![
            JobRecord::new("Data Engineer", "Python, SQL, AWS", 100_000.0, &normalizer).with_company("Acme"),
            JobRecord::new("Analyst", "Excel, SQL", 60_000.0, &normalizer),
        ])
    }

    fn analyzer() -> SkillGapAnalyzer {
        SkillGapAnalyzer::new(
            TextNormalizer::new(),
            EmbeddingScorer::new(Box::new(HashedEmbedder::new(128))),
        )
    }

    fn run(session: &mut Session, line: &str, data: &JobDataset, analyzer: &mut SkillGapAnalyzer) -> Result<SessionResponse> {
        session.handle(line.parse()?, data, analyzer)
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!("skills python, sql".parse::<SessionAction>().unwrap(), SessionAction::SetSkills("python, sql".to_string()));
        assert_eq!("ROLE  Data Engineer ".parse::<SessionAction>().unwrap(), SessionAction::SelectRole("Data Engineer".to_string()));
        assert_eq!("company".parse::<SessionAction>().unwrap(), SessionAction::SelectCompany(None));
        assert_eq!("level advanced".parse::<SessionAction>().unwrap(), SessionAction::SetLevel(ExperienceLevel::Advanced));
        assert_eq!("complete".parse::<SessionAction>().unwrap(), SessionAction::UpdateProgress(String::new()));
        assert_eq!("trends 5".parse::<SessionAction>().unwrap(), SessionAction::Trends(Some(5)));
        assert_eq!("exit".parse::<SessionAction>().unwrap(), SessionAction::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("level expert".parse::<SessionAction>(), Err(SkillGapError::InvalidEnum(_))));
        assert!(matches!("role".parse::<SessionAction>(), Err(SkillGapError::InvalidInput(_))));
        assert!(matches!("trends many".parse::<SessionAction>(), Err(SkillGapError::InvalidInput(_))));
        assert!(matches!("dance".parse::<SessionAction>(), Err(SkillGapError::InvalidInput(_))));
    }

    #[test]
    fn test_progress_update_on_role_without_requirements() {
        let normalizer = TextNormalizer::new();
        let data = JobDataset::from_records(vec![JobRecord::new("Intern", "", 30_000.0, &normalizer)]);
        let mut analyzer = analyzer();
        let mut session = Session::new("s1");

        run(&mut session, "role Intern", &data, &mut analyzer).unwrap();
        match run(&mut session, "complete sql, excel", &data, &mut analyzer).unwrap() {
            SessionResponse::Message(message) => assert!(message.contains("sql, excel")),
            other => panic!("unexpected response: {:?}", other),
        }
        assert_eq!(session.progress().completed().len(), 2);

        let err = run(&mut session, "progress", &data, &mut analyzer).unwrap_err();
        assert!(matches!(err, SkillGapError::EmptyRequirement));
    }

    #[test]
    fn test_analyze_requires_role() {
        let data = dataset();
        let mut analyzer = analyzer();
        let mut session = Session::new("a");

        let err = run(&mut session, "analyze", &data, &mut analyzer).unwrap_err();
        assert!(matches!(err, SkillGapError::InvalidInput(_)));
    }

    #[test]
    fn test_full_session_flow() {
        let data = dataset();
        let mut analyzer = analyzer();
        let mut session = Session::new("a");

        run(&mut session, "skills Python, SQL", &data, &mut analyzer).unwrap();
        run(&mut session, "role Data Engineer", &data, &mut analyzer).unwrap();
        run(&mut session, "company Acme", &data, &mut analyzer).unwrap();

        match run(&mut session, "analyze", &data, &mut analyzer).unwrap() {
            SessionResponse::Analysis(report) => {
                assert_eq!(report.missing_skills, vec!["aws"]);
                assert_eq!(report.experience_level, ExperienceLevel::Intermediate);
                assert!(report.company.is_some());
            }
            other => panic!("unexpected response: {:?}", other),
        }

        match run(&mut session, "complete aws, python", &data, &mut analyzer).unwrap() {
            SessionResponse::Progress(report) => {
                assert_eq!(report.remaining_skills, vec!["sql"]);
                assert!(!report.complete);
            }
            other => panic!("unexpected response: {:?}", other),
        }

        // replaces the previous set
        match run(&mut session, "complete sql", &data, &mut analyzer).unwrap() {
            SessionResponse::Progress(report) => assert_eq!(report.completed_skills, vec!["sql"]),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_role_keeps_previous_selection() {
        let data = dataset();
        let mut analyzer = analyzer();
        let mut session = Session::new("a");

        run(&mut session, "role Analyst", &data, &mut analyzer).unwrap();
        let err = run(&mut session, "role Analist", &data, &mut analyzer).unwrap_err();

        assert!(matches!(err, SkillGapError::UnknownJobRole { .. }));
        assert_eq!(session.selected_role(), Some("Analyst"));
    }

    #[test]
    fn test_trends_default_top() {
        let data = dataset();
        let mut analyzer = analyzer();
        let mut session = Session::new("a").with_top_skills(1);

        match run(&mut session, "trends", &data, &mut analyzer).unwrap() {
            SessionResponse::Trends(TrendReport::Skills(skills)) => {
                assert_eq!(skills.len(), 1);
                assert_eq!(skills[0].skill, "SQL");
                assert_eq!(skills[0].count, 2);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_registry_isolates_sessions() {
        let data = dataset();
        let mut analyzer = analyzer();
        let mut registry = SessionRegistry::new();

        let first = registry.get_or_create("alice");
        first.handle(SessionAction::UpdateProgress("python".to_string()), &data, &mut analyzer).unwrap();

        let second = registry.get_or_create("bob");
        assert!(second.progress().completed().is_empty());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("alice").unwrap().progress().completed().len(), 1);
        assert!(registry.remove("alice").is_some());
        assert!(registry.get("alice").is_none());
    }
}
