//! Salary estimation from base compensation, match score and experience

use crate::dataset::{JobDataset, JobRecord};
use crate::error::{Result, SkillGapError};
use crate::processing::experience::{ExperienceAdjuster, ExperienceLevel};

/// Round to cents, halves away from zero
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct SalaryPredictor;

impl SalaryPredictor {
    /// `base_compensation * salary_multiplier * match_score`, rounded to cents
    pub fn predict(job: &JobRecord, match_score: f32, level: ExperienceLevel) -> Result<f64> {
        if !match_score.is_finite() || match_score < 0.0 {
            return Err(SkillGapError::InvalidInput(format!(
                "Match score must be a non-negative number, got {}",
                match_score
            )));
        }

        let adjusted_base = ExperienceAdjuster::adjust_salary(job.base_compensation, level);
        Ok(round_currency(adjusted_base * match_score as f64))
    }

    /// Predict against the reference record for `role`
    pub fn predict_for_role(
        dataset: &JobDataset,
        role: &str,
        match_score: f32,
        level: ExperienceLevel,
    ) -> Result<f64> {
        let job = dataset.find_role(role)?;
        Self::predict(job, match_score, level)
    }
}
