//! Embedding model management for downloading pinned Model2Vec models

use crate::config::EmbeddingConfig;
use crate::error::{Result, SkillGapError};
use hf_hub::api::tokio::Api;
use hf_hub::{Repo, RepoType};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files every Model2Vec model directory must contain
const REQUIRED_FILES: [&str; 3] = ["tokenizer.json", "model.safetensors", "config.json"];
const OPTIONAL_FILES: [&str; 1] = ["README.md"];

/// Information about a known embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

/// Downloads and locates embedding models under `models_dir`.
///
/// Models are stored per repository and revision, so two pinned revisions of
/// the same repository never overwrite each other.
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                SkillGapError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: BTreeMap::new(),
        };
        manager.init_available_models();

        Ok(manager)
    }

    fn init_available_models(&mut self) {
        self.available_models.insert(
            "potion-base-8M".to_string(),
            EmbeddingModelInfo {
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 33,
                description: "Default Model2Vec embeddings with 8M parameters".to_string(),
                dimensions: 256,
            },
        );

        self.available_models.insert(
            "potion-base-32M".to_string(),
            EmbeddingModelInfo {
                name: "Potion Base 32M".to_string(),
                repo_id: "minishlab/potion-base-32M".to_string(),
                size_mb: 130,
                description: "Larger Model2Vec embeddings for higher accuracy".to_string(),
                dimensions: 512,
            },
        );

        self.available_models.insert(
            "m2v-base".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Base".to_string(),
                repo_id: "minishlab/M2V_base_output".to_string(),
                size_mb: 90,
                description: "Legacy Model2Vec base embeddings model".to_string(),
                dimensions: 256,
            },
        );
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Directory for `repo_id` at `revision`
    pub fn model_dir(&self, repo_id: &str, revision: &str) -> PathBuf {
        self.models_dir.join(repo_id.replace('/', "--")).join(revision)
    }

    /// Check that a directory holds every required model file
    pub async fn is_valid_model_directory(path: &Path) -> bool {
        for file in REQUIRED_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Blocking variant of `is_valid_model_directory` for synchronous loaders
    pub fn has_required_files(path: &Path) -> bool {
        REQUIRED_FILES.iter().all(|file| path.join(file).is_file())
    }

    /// Download the pinned model described by `config` unless present
    pub async fn ensure_model_available(&self, config: &EmbeddingConfig, force: bool) -> Result<PathBuf> {
        let model_dir = self.model_dir(&config.repo_id, &config.revision);

        if !force && Self::is_valid_model_directory(&model_dir).await {
            return Ok(model_dir);
        }

        self.download(&config.repo_id, &config.revision, &model_dir).await?;
        Ok(model_dir)
    }

    async fn download(&self, repo_id: &str, revision: &str, model_dir: &Path) -> Result<()> {
        info!("Downloading embedding model {}@{}", repo_id, revision);

        fs::create_dir_all(model_dir).await.map_err(|e| {
            SkillGapError::ModelError(format!("Failed to create model directory: {}", e))
        })?;

        let api = Api::new()
            .map_err(|e| SkillGapError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        for file in REQUIRED_FILES.iter().chain(OPTIONAL_FILES.iter()) {
            match repo.get(file).await {
                Ok(file_path) => {
                    fs::copy(&file_path, model_dir.join(file)).await.map_err(|e| {
                        SkillGapError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    info!("  downloaded {}", file);
                }
                Err(e) if OPTIONAL_FILES.contains(file) => {
                    warn!("Optional file {} not found: {}", file, e);
                }
                Err(e) => {
                    return Err(SkillGapError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        info!("Embedding model {}@{} ready at {}", repo_id, revision, model_dir.display());
        Ok(())
    }

    /// `repo@revision` identities of the models present on disk
    pub async fn list_downloaded_models(&self) -> Result<Vec<String>> {
        let mut downloaded = Vec::new();

        let mut repos = fs::read_dir(&self.models_dir).await?;
        while let Some(repo_entry) = repos.next_entry().await? {
            if !repo_entry.file_type().await?.is_dir() {
                continue;
            }
            let repo_id = repo_entry.file_name().to_string_lossy().replace("--", "/");

            let mut revisions = fs::read_dir(repo_entry.path()).await?;
            while let Some(revision_entry) = revisions.next_entry().await? {
                if Self::is_valid_model_directory(&revision_entry.path()).await {
                    downloaded.push(format!(
                        "{}@{}",
                        repo_id,
                        revision_entry.file_name().to_string_lossy()
                    ));
                }
            }
        }

        downloaded.sort();
        Ok(downloaded)
    }

    pub fn list_available_models(&self) -> Vec<&EmbeddingModelInfo> {
        self.available_models.values().collect()
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.resolve_model_id(model_id)
            .and_then(|id| self.available_models.get(&id))
    }

    /// Resolve a short name, repo id or display name to a catalog key
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        for (id, info) in &self.available_models {
            if info.repo_id == input {
                return Some(id.clone());
            }
        }

        let input_lower = input.to_lowercase();
        for (id, info) in &self.available_models {
            if info.name.to_lowercase() == input_lower {
                return Some(id.clone());
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write_model_files(dir: &Path) {
        fs::create_dir_all(dir).await.unwrap();
        for file in REQUIRED_FILES {
            fs::write(dir.join(file), b"{}").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_manager_creates_models_dir() {
        let temp_dir = TempDir::new().unwrap();
        let models_dir = temp_dir.path().join("models");

        let manager = EmbeddingModelManager::new(models_dir.clone()).await.unwrap();
        assert!(models_dir.exists());
        assert!(!manager.list_available_models().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert_eq!(manager.resolve_model_id("potion-base-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(
            manager.resolve_model_id("minishlab/potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(manager.resolve_model_id("Potion Base 8M"), Some("potion-base-8M".to_string()));
        assert_eq!(manager.resolve_model_id("bert-base"), None);
    }

    #[tokio::test]
    async fn test_valid_directory_requires_all_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("model");
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join("tokenizer.json"), b"{}").await.unwrap();
        assert!(!EmbeddingModelManager::is_valid_model_directory(&dir).await);

        assert!(!EmbeddingModelManager::has_required_files(&dir));

        write_model_files(&dir).await;
        assert!(EmbeddingModelManager::is_valid_model_directory(&dir).await);
        assert!(EmbeddingModelManager::has_required_files(&dir));
    }

    #[tokio::test]
    async fn test_existing_pinned_model_is_not_downloaded_again() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        let mut config = crate::config::Config::default().embedding;
        config.models_dir = temp_dir.path().to_path_buf();
        config.revision = "abc123".to_string();
        write_model_files(&config.model_dir()).await;

        let path = manager.ensure_model_available(&config, false).await.unwrap();
        assert_eq!(path, config.model_dir());

        let downloaded = manager.list_downloaded_models().await.unwrap();
        assert_eq!(downloaded, vec!["minishlab/potion-base-8M@abc123".to_string()]);
    }
}
