//! Semantic similarity between skill sets using dense embeddings

use crate::config::{Config, EmbeddingBackend};
use crate::error::{Result, SkillGapError};
use crate::processing::embedding_manager::EmbeddingModelManager;
use crate::processing::skill_set::SkillSet;
use anyhow::Context;
use log::info;
use model2vec_rs::model::StaticModel;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// Maps text to a fixed-length dense vector.
///
/// `model_id` must change whenever the vectors would change, since scores
/// produced by different models are not comparable.
pub trait Embedder {
    fn model_id(&self) -> &str;
    fn dimensions(&self) -> Option<usize>;
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Model2Vec static embeddings loaded from a local model directory
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_id: String,
}

impl Model2VecEmbedder {
    pub fn load(model_path: &Path, model_id: impl Into<String>) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .context("Failed to load model")?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_id: model_id.into(),
        })
    }
}

impl Embedder for Model2VecEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> Option<usize> {
        None
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }
}

/// Deterministic bag-of-words embedder based on feature hashing.
///
/// Every whitespace separated word increments one bucket chosen by FNV-1a.
/// It needs no model files, which makes it the offline and test backend;
/// it has no notion of synonyms.
pub struct HashedEmbedder {
    dimensions: usize,
    model_id: String,
}

impl HashedEmbedder {
    pub fn new(dimensions: usize) -> Self {
        let dimensions = dimensions.max(1);
        Self {
            dimensions,
            model_id: format!("hashed-bow-{}", dimensions),
        }
    }

    fn bucket(&self, word: &str) -> usize {
        (fnv1a(word.as_bytes()) % self.dimensions as u64) as usize
    }
}

impl Embedder for HashedEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        for word in text.split_whitespace() {
            vector[self.bucket(word)] += 1.0;
        }
        Ok(vector)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ byte as u64).wrapping_mul(PRIME)
    })
}

/// Anything that can be rendered to the single string that gets embedded
pub trait SkillText {
    fn skill_text(&self) -> String;
}

impl SkillText for SkillSet {
    fn skill_text(&self) -> String {
        self.to_embedding_text()
    }
}

impl SkillText for str {
    fn skill_text(&self) -> String {
        self.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl SkillText for String {
    fn skill_text(&self) -> String {
        self.as_str().skill_text()
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub cache_size: usize,
    pub model_id: String,
    pub enabled: bool,
}

/// Cosine similarity scorer with a per-text embedding cache
pub struct EmbeddingScorer {
    embedder: Box<dyn Embedder>,
    cache: HashMap<String, Vec<f32>>,
    enable_cache: bool,
}

impl EmbeddingScorer {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            embedder,
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Build the configured backend. The Model2Vec backend expects every
    /// required file of the pinned model in `embedding.model_dir()`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let embedding = &config.embedding;
        let embedder: Box<dyn Embedder> = match embedding.backend {
            EmbeddingBackend::Hashed => Box::new(HashedEmbedder::new(embedding.hashed_dimensions)),
            EmbeddingBackend::Model2Vec => {
                let model_dir = embedding.model_dir();
                if !EmbeddingModelManager::has_required_files(&model_dir) {
                    return Err(SkillGapError::ModelError(format!(
                        "Embedding model {} is not downloaded (expected at {}); run `skill-gap models download`",
                        embedding.model_id(),
                        model_dir.display()
                    )));
                }
                Box::new(Model2VecEmbedder::load(&model_dir, embedding.model_id())?)
            }
        };

        Ok(Self::new(embedder).with_cache(embedding.enable_cache))
    }

    pub fn model_id(&self) -> &str {
        self.embedder.model_id()
    }

    /// Similarity in [0, 1] between two skill sets or strings.
    ///
    /// Either side rendering to an empty string scores 0. Negative cosine
    /// values are clamped to 0.
    pub fn similarity<A, B>(&mut self, a: &A, b: &B) -> Result<f32>
    where
        A: SkillText + ?Sized,
        B: SkillText + ?Sized,
    {
        let text_a = a.skill_text();
        let text_b = b.skill_text();
        if text_a.is_empty() || text_b.is_empty() {
            return Ok(0.0);
        }

        let vec_a = self.embed_cached(&text_a)?;
        let vec_b = self.embed_cached(&text_b)?;
        let cosine = Self::cosine_similarity(&vec_a, &vec_b)?;

        Ok(cosine.clamp(0.0, 1.0))
    }

    fn embed_cached(&mut self, text: &str) -> Result<Vec<f32>> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(text) {
                return Ok(cached.clone());
            }
        }

        let embedding = self.embedder.embed(text)?;
        if self.enable_cache {
            self.cache.insert(text.to_string(), embedding.clone());
        }
        Ok(embedding)
    }

    /// Raw cosine similarity in [-1, 1]; zero vectors score 0
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(SkillGapError::Embedding(format!(
                "Embedding dimensions don't match: {} vs {}",
                a.len(),
                b.len()
            )));
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            Ok(0.0)
        } else {
            Ok(dot_product / (norm_a * norm_b))
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            cache_size: self.cache.len(),
            model_id: self.embedder.model_id().to_string(),
            enabled: self.enable_cache,
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
