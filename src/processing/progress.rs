//! Tracking which of a role's required skills the user has completed

use crate::error::{Result, SkillGapError};
use crate::processing::skill_set::SkillSet;
use serde::{Deserialize, Serialize};

/// Skills the user has marked complete within one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    completed: SkillSet,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&self) -> &SkillSet {
        &self.completed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressStatus {
    pub acquired: SkillSet,
    pub missing: SkillSet,
    /// `acquired / required`, in [0, 1]
    pub ratio: f64,
}

impl ProgressStatus {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn percentage(&self) -> f64 {
        self.ratio * 100.0
    }
}

pub struct ProgressTracker;

impl ProgressTracker {
    /// Replace the completed set. Nothing from the previous state is kept.
    pub fn update(state: &mut ProgressState, completed: SkillSet) {
        state.completed = completed;
    }

    /// Completion of `required` given `completed`.
    ///
    /// An empty requirement has no meaningful ratio and fails with
    /// `EmptyRequirement`.
    pub fn status(required: &SkillSet, completed: &SkillSet) -> Result<ProgressStatus> {
        if required.is_empty() {
            return Err(SkillGapError::EmptyRequirement);
        }

        let acquired = required.intersection(completed);
        let missing = required.difference(completed);
        let ratio = acquired.len() as f64 / required.len() as f64;

        Ok(ProgressStatus {
            acquired,
            missing,
            ratio,
        })
    }

    pub fn status_for(state: &ProgressState, required: &SkillSet) -> Result<ProgressStatus> {
        Self::status(required, &state.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn set(items: &[&str]) -> SkillSet {
        items.iter().copied().collect()
    }

    #[test]
    fn test_update_replaces_entire_state() {
        let mut state = ProgressState::new();
        ProgressTracker::update(&mut state, set(&["python", "sql"]));
        ProgressTracker::update(&mut state, set(&["aws"]));
        assert_eq!(state.completed(), &set(&["aws"]));

        ProgressTracker::update(&mut state, SkillSet::new());
        assert!(state.completed().is_empty());
    }

    #[test]
    fn test_status_ratio() {
        let status = ProgressTracker::status(&set(&["python", "sql", "aws"]), &set(&["sql", "docker"])).unwrap();

        assert_eq!(status.acquired, set(&["sql"]));
        assert_eq!(status.missing, set(&["python", "aws"]));
        assert_relative_eq!(status.ratio, 1.0 / 3.0);
        assert!(!status.is_complete());
    }

    #[test]
    fn test_complete_progress() {
        let mut state = ProgressState::new();
        ProgressTracker::update(&mut state, set(&["aws", "python"]));

        let status = ProgressTracker::status_for(&state, &set(&["python", "aws"])).unwrap();
        assert!(status.is_complete());
        assert_relative_eq!(status.percentage(), 100.0);
    }

    #[test]
    fn test_empty_requirement_is_error() {
        let err = ProgressTracker::status(&SkillSet::new(), &set(&["python"])).unwrap_err();
        assert!(matches!(err, SkillGapError::EmptyRequirement));
    }

    #[test]
    fn test_no_progress() {
        let status = ProgressTracker::status(&set(&["rust"]), &SkillSet::new()).unwrap();
        assert_eq!(status.ratio, 0.0);
        assert_eq!(status.missing, set(&["rust"]));
    }
}
