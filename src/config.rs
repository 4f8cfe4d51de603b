//! Configuration management for the skill gap toolkit

use crate::error::{Result, SkillGapError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub dataset: DatasetConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// HuggingFace repository of the Model2Vec model
    pub repo_id: String,
    /// Pinned revision (commit sha or tag). Scores from different revisions
    /// are not comparable.
    pub revision: String,
    pub models_dir: PathBuf,
    pub hashed_dimensions: usize,
    pub enable_cache: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    Model2Vec,
    Hashed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub top_skills: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skill-gap")
            .join("models");

        Self {
            embedding: EmbeddingConfig {
                backend: EmbeddingBackend::Model2Vec,
                repo_id: "minishlab/potion-base-8M".to_string(),
                revision: "main".to_string(),
                models_dir,
                hashed_dimensions: 256,
                enable_cache: true,
            },
            dataset: DatasetConfig {
                path: PathBuf::from("job_skills_data.csv"),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                top_skills: 20,
            },
        }
    }
}

impl EmbeddingConfig {
    /// Identity recorded alongside every score
    pub fn model_id(&self) -> String {
        match self.backend {
            EmbeddingBackend::Model2Vec => format!("{}@{}", self.repo_id, self.revision),
            EmbeddingBackend::Hashed => format!("hashed-bow-{}", self.hashed_dimensions),
        }
    }

    /// Local directory holding the pinned model files
    pub fn model_dir(&self) -> PathBuf {
        self.models_dir
            .join(self.repo_id.replace('/', "--"))
            .join(&self.revision)
    }
}

impl Config {
    /// Load from `config_path`, writing defaults there on first use
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| SkillGapError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillGapError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-gap")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding.hashed_dimensions == 0 {
            return Err(SkillGapError::Configuration(
                "embedding.hashed_dimensions must be greater than zero".to_string(),
            ));
        }
        if self.embedding.revision.trim().is_empty() {
            return Err(SkillGapError::Configuration(
                "embedding.revision must name a model revision".to_string(),
            ));
        }
        Ok(())
    }

    /// Set a single value addressed as `section.key`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |e: String| SkillGapError::Configuration(format!("Invalid value for {}: {}", key, e));

        match key {
            "embedding.backend" => {
                self.embedding.backend = match value.to_lowercase().as_str() {
                    "model2vec" => EmbeddingBackend::Model2Vec,
                    "hashed" => EmbeddingBackend::Hashed,
                    other => return Err(invalid(format!("unknown backend '{}'", other))),
                }
            }
            "embedding.repo_id" => self.embedding.repo_id = value.to_string(),
            "embedding.revision" => self.embedding.revision = value.to_string(),
            "embedding.models_dir" => self.embedding.models_dir = PathBuf::from(value),
            "embedding.hashed_dimensions" => {
                self.embedding.hashed_dimensions = value.parse().map_err(|e| invalid(format!("{}", e)))?
            }
            "embedding.enable_cache" => {
                self.embedding.enable_cache = value.parse().map_err(|e| invalid(format!("{}", e)))?
            }
            "dataset.path" => self.dataset.path = PathBuf::from(value),
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value).map_err(invalid)?
            }
            "output.color_output" => {
                self.output.color_output = value.parse().map_err(|e| invalid(format!("{}", e)))?
            }
            "output.top_skills" => {
                self.output.top_skills = value.parse().map_err(|e| invalid(format!("{}", e)))?
            }
            _ => {
                return Err(SkillGapError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }

        self.validate()
    }
}
