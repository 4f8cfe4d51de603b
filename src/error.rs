//! Error handling for the skill gap toolkit

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillGapError {
    #[error("Invalid experience level: {0} (expected Beginner, Intermediate or Advanced)")]
    InvalidEnum(String),

    #[error("Unknown job role: {role}{}", did_you_mean(.suggestion))]
    UnknownJobRole {
        role: String,
        suggestion: Option<String>,
    },

    #[error("Dataset is missing required column: {0}")]
    MissingColumn(String),

    #[error("Progress ratio is undefined: the selected role has no required skills")]
    EmptyRequirement,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, SkillGapError>;

/// Convert anyhow errors raised by the embedding backend
impl From<anyhow::Error> for SkillGapError {
    fn from(err: anyhow::Error) -> Self {
        SkillGapError::Embedding(format!("{:#}", err))
    }
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

impl SkillGapError {
    pub fn unknown_role(role: impl Into<String>, suggestion: Option<String>) -> Self {
        SkillGapError::UnknownJobRole {
            role: role.into(),
            suggestion,
        }
    }
}
