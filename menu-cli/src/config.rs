//! Optional TOML configuration. Every field has a default, so an empty file
//! (or no file at all) is a valid configuration.

use anyhow::{Context, Result};
use menu::DEFAULT_PROXIMITY_THRESHOLD;
use ocr::{DEFAULT_LANGUAGE, ModelConfig, OcrOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub models: ModelSettings,
    pub ocr: OcrOptions,
    pub extract: ExtractSettings,
    pub overlay: OverlaySettings,
}

/// Where the PP-OCRv5 models live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub dir: PathBuf,
    pub language: String,
    /// Explicit files win over the ones derived from `dir` and `language`.
    pub detection_model: Option<PathBuf>,
    pub recognition_model: Option<PathBuf>,
    pub keys_path: Option<PathBuf>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts/ocr"),
            language: DEFAULT_LANGUAGE.to_string(),
            detection_model: None,
            recognition_model: None,
            keys_path: None,
        }
    }
}

impl ModelSettings {
    /// Resolve and check the model files.
    pub fn model_config(&self) -> Result<ModelConfig> {
        let mut config = ModelConfig::resolve(&self.dir, &self.language)?;
        if let Some(path) = &self.detection_model {
            config = config.with_detection_model(path);
        }
        if let Some(path) = &self.recognition_model {
            config = config.with_recognition_model(path);
        }
        if let Some(path) = &self.keys_path {
            config = config.with_keys_path(path);
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    pub proximity_threshold: f32,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Write `<stem>_overlay.png` next to every processed image.
    pub enabled: bool,
    /// Font for the labels; system fonts are tried when unset.
    pub font: Option<PathBuf>,
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}
