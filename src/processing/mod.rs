//! Skill processing and analysis module

pub mod skill_set;
pub mod text_normalizer;
pub mod embeddings;
pub mod embedding_manager;
pub mod experience;
pub mod analyzer;
pub mod salary;
pub mod trends;
pub mod progress;

pub use analyzer::{MatchResult, SkillGapAnalyzer};
pub use embeddings::{Embedder, EmbeddingScorer, HashedEmbedder, Model2VecEmbedder};
pub use experience::{ExperienceAdjuster, ExperienceLevel};
pub use progress::{ProgressState, ProgressStatus, ProgressTracker};
pub use salary::SalaryPredictor;
pub use skill_set::SkillSet;
pub use text_normalizer::TextNormalizer;
pub use trends::MarketTrendAggregator;
