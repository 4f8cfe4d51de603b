//! Skill gap analysis combining normalization, embeddings and experience

use crate::config::Config;
use crate::dataset::JobRecord;
use crate::error::Result;
use crate::processing::embeddings::EmbeddingScorer;
use crate::processing::experience::{ExperienceAdjuster, ExperienceLevel};
use crate::processing::skill_set::SkillSet;
use crate::processing::text_normalizer::TextNormalizer;
use serde::{Deserialize, Serialize};

/// Outcome of matching a user's skills against one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Cosine similarity before experience damping, in [0, 1]
    pub raw_similarity: f32,
    /// Experience adjusted score, in [0, max damping]
    pub match_score: f32,
    pub experience_level: ExperienceLevel,
    /// Job skills the user lacks, in job order
    pub missing_skills: SkillSet,
    /// Job skills the user already has, in job order
    pub acquired_skills: SkillSet,
    /// Identity of the embedding model that produced the score
    pub model_id: String,
}

impl MatchResult {
    /// Match score as a percentage rounded to two decimals
    pub fn match_percentage(&self) -> f64 {
        (self.match_score as f64 * 100.0 * 100.0).round() / 100.0
    }

    pub fn has_all_skills(&self) -> bool {
        self.missing_skills.is_empty()
    }
}

pub struct SkillGapAnalyzer {
    normalizer: TextNormalizer,
    scorer: EmbeddingScorer,
}

impl SkillGapAnalyzer {
    pub fn new(normalizer: TextNormalizer, scorer: EmbeddingScorer) -> Self {
        Self { normalizer, scorer }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(TextNormalizer::new(), EmbeddingScorer::from_config(config)?))
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn scorer(&self) -> &EmbeddingScorer {
        &self.scorer
    }

    /// Match a user skill set against a job.
    ///
    /// The user's set is run through the normalizer again so hand-built sets
    /// compare like parsed ones. Missing and acquired skills are exact set
    /// operations over `job.skills` as loaded, so together they always
    /// partition the job's skills.
    pub fn analyze(&mut self, user_skills: &SkillSet, job: &JobRecord, level: ExperienceLevel) -> Result<MatchResult> {
        let user = self.normalizer.renormalize(user_skills);
        let required = &job.skills;

        let raw_similarity = self.scorer.similarity(&user, required)?;
        let match_score = ExperienceAdjuster::adjust_match(raw_similarity, level);

        Ok(MatchResult {
            raw_similarity,
            match_score,
            experience_level: level,
            missing_skills: required.difference(&user),
            acquired_skills: required.intersection(&user),
            model_id: self.scorer.model_id().to_string(),
        })
    }

    /// Same as `analyze` for a raw comma separated skill list
    pub fn analyze_text(&mut self, user_input: &str, job: &JobRecord, level: ExperienceLevel) -> Result<MatchResult> {
        let user_skills = self.normalizer.normalize(user_input);
        self.analyze(&user_skills, job, level)
    }

    pub fn get_stats(&self) -> AnalyzerStats {
        let cache = self.scorer.cache_stats();
        AnalyzerStats {
            embedding_cache_size: cache.cache_size,
            model_id: cache.model_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerStats {
    pub embedding_cache_size: usize,
    pub model_id: String,
}
