use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::types::{parse_optional_normalizer, Doc2VecParams, NaiveDoc2VecParams, OneHotParams};

/// Top-level configuration for the embedding loader.
///
/// Read from `embload.toml` by default. The `onehot`, `doc2vec` and
/// `naive_doc2vec` sections hold the parameters used when a caller does not
/// specify its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub onehot: OneHotConfig,
    #[serde(default)]
    pub doc2vec: Doc2VecConfig,
    #[serde(default)]
    pub naive_doc2vec: NaiveDoc2VecConfig,
}

impl LoaderConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LoaderConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Where artifacts live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding every artifact file, with no subdirectories.
    pub base_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("embeddings"),
        }
    }
}

/// One-hot defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OneHotConfig {
    /// "count" or "tfidf".
    pub scorer: String,
    pub normalize: bool,
}

impl Default for OneHotConfig {
    fn default() -> Self {
        Self {
            scorer: "count".to_string(),
            normalize: false,
        }
    }
}

impl OneHotConfig {
    pub fn to_params(&self) -> Result<OneHotParams> {
        Ok(OneHotParams {
            scorer: self.scorer.parse()?,
            normalize: self.normalize,
        })
    }
}

/// Doc2vec defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Doc2VecConfig {
    pub vec_size: u32,
    pub win_size: u32,
    pub min_count: u32,
    /// Distributed memory when true, distributed bag of words otherwise.
    pub dm: bool,
    pub epochs: u32,
}

impl Default for Doc2VecConfig {
    fn default() -> Self {
        let params = Doc2VecParams::default();
        Self {
            vec_size: params.vec_size,
            win_size: params.win_size,
            min_count: params.min_count,
            dm: params.dm,
            epochs: params.epochs,
        }
    }
}

impl Doc2VecConfig {
    pub fn to_params(&self) -> Doc2VecParams {
        Doc2VecParams {
            vec_size: self.vec_size,
            win_size: self.win_size,
            min_count: self.min_count,
            dm: self.dm,
            epochs: self.epochs,
        }
    }
}

/// Naive doc2vec defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveDoc2VecConfig {
    /// "l2", "mean" or "none".
    pub normalizer: String,
}

impl Default for NaiveDoc2VecConfig {
    fn default() -> Self {
        Self {
            normalizer: "none".to_string(),
        }
    }
}

impl NaiveDoc2VecConfig {
    pub fn to_params(&self) -> Result<NaiveDoc2VecParams> {
        Ok(NaiveDoc2VecParams {
            normalizer: parse_optional_normalizer(&self.normalizer)?,
        })
    }
}
