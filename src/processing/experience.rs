//! Experience levels and the multipliers derived from them

use crate::error::{Result, SkillGapError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared experience level of the user.
///
/// Each level carries two unrelated scales: a damping factor applied to the
/// match score and a multiplier applied to salary. They must not be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    /// Factor applied to the raw similarity score
    pub fn match_damping(self) -> f32 {
        match self {
            ExperienceLevel::Beginner => 0.5,
            ExperienceLevel::Intermediate => 0.75,
            ExperienceLevel::Advanced => 1.0,
        }
    }

    /// Factor applied to base compensation
    pub fn salary_multiplier(self) -> f64 {
        match self {
            ExperienceLevel::Beginner => 1.0,
            ExperienceLevel::Intermediate => 1.5,
            ExperienceLevel::Advanced => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = SkillGapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            _ => Err(SkillGapError::InvalidEnum(s.to_string())),
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies experience multipliers to scores and salaries
pub struct ExperienceAdjuster;

impl ExperienceAdjuster {
    pub fn adjust_match(score: f32, level: ExperienceLevel) -> f32 {
        score * level.match_damping()
    }

    pub fn adjust_salary(base: f64, level: ExperienceLevel) -> f64 {
        base * level.salary_multiplier()
    }

    /// Parse a level name and adjust in one step
    pub fn adjust_match_named(score: f32, level: &str) -> Result<f32> {
        let level: ExperienceLevel = level.parse()?;
        Ok(Self::adjust_match(score, level))
    }
}
