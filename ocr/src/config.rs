use crate::OcrResult;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Detection model shared by every recognizer language.
pub const DETECTION_MODEL_FILE: &str = "PP-OCRv5_mobile_det.mnn";

/// Language used when none is configured. Covers Spanish accents and `ñ`.
pub const DEFAULT_LANGUAGE: &str = "latin";

// (language, recognition model, charset)
const RECOGNIZERS: &[(&str, &str, &str)] = &[
    (
        "latin",
        "latin_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_latin.txt",
    ),
    (
        "english",
        "en_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_en.txt",
    ),
    ("chinese", "PP-OCRv5_mobile_rec.mnn", "ppocr_keys_v5.txt"),
];

/// Languages [`ModelConfig::resolve`] knows file names for.
pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    RECOGNIZERS.iter().map(|(language, _, _)| *language)
}

/// Required model paths for PaddleOCR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    detection_model: PathBuf,
    recognition_model: PathBuf,
    keys_path: PathBuf,
}

impl ModelConfig {
    /// Create a new model configuration.
    pub fn new(
        detection_model: impl AsRef<Path>,
        recognition_model: impl AsRef<Path>,
        keys_path: impl AsRef<Path>,
    ) -> Self {
        Self {
            detection_model: detection_model.as_ref().to_path_buf(),
            recognition_model: recognition_model.as_ref().to_path_buf(),
            keys_path: keys_path.as_ref().to_path_buf(),
        }
    }

    /// Map a language to the standard PP-OCRv5 file names inside `models_dir`.
    ///
    /// Only fails for unknown languages; use [`ModelConfig::validate`] to
    /// check the files are actually there.
    pub fn resolve(models_dir: impl AsRef<Path>, language: &str) -> OcrResult<Self> {
        let models_dir = models_dir.as_ref();
        let (_, rec_model, charset) = RECOGNIZERS
            .iter()
            .find(|(id, _, _)| id.eq_ignore_ascii_case(language))
            .with_context(|| {
                format!(
                    "unsupported OCR language {language:?} (expected one of: {})",
                    supported_languages().collect::<Vec<_>>().join(", ")
                )
            })?;

        Ok(Self::new(
            models_dir.join(DETECTION_MODEL_FILE),
            models_dir.join(rec_model),
            models_dir.join(charset),
        ))
    }

    /// [`ModelConfig::resolve`] followed by [`ModelConfig::validate`].
    pub fn for_language(models_dir: impl AsRef<Path>, language: &str) -> OcrResult<Self> {
        let config = Self::resolve(models_dir, language)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_detection_model(mut self, path: impl AsRef<Path>) -> Self {
        self.detection_model = path.as_ref().to_path_buf();
        self
    }

    pub fn with_recognition_model(mut self, path: impl AsRef<Path>) -> Self {
        self.recognition_model = path.as_ref().to_path_buf();
        self
    }

    pub fn with_keys_path(mut self, path: impl AsRef<Path>) -> Self {
        self.keys_path = path.as_ref().to_path_buf();
        self
    }

    /// Fail if any of the three files is missing.
    pub fn validate(&self) -> OcrResult<()> {
        for (what, path) in [
            ("detection model", &self.detection_model),
            ("recognition model", &self.recognition_model),
            ("charset file", &self.keys_path),
        ] {
            anyhow::ensure!(path.is_file(), "{what} not found: {}", path.display());
        }
        Ok(())
    }

    /// Path to the detection model (`PP-OCRv5_mobile_det.mnn` or similar).
    pub fn detection_model(&self) -> &Path {
        &self.detection_model
    }

    /// Path to the recognition model (`latin_PP-OCRv5_mobile_rec_infer.mnn` or similar).
    pub fn recognition_model(&self) -> &Path {
        &self.recognition_model
    }

    /// Path to the keys/charset file (`ppocr_keys_latin.txt` or language specific).
    pub fn keys_path(&self) -> &Path {
        &self.keys_path
    }
}

/// Tunable parameters when running OCR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrOptions {
    /// Whether to merge nearby detected boxes (recommended for PP-OCRv5).
    pub merge_boxes: bool,
    /// Merge threshold passed to the detector.
    pub merge_threshold: i32,
    /// Use the faster cropping path from `rust-paddle-ocr`.
    pub efficient_cropping: bool,
    /// Minimum confidence for recognition.
    pub min_score: f32,
    /// Minimum confidence for punctuation recognition.
    pub punct_min_score: f32,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            merge_boxes: true,
            merge_threshold: 1,
            efficient_cropping: true,
            min_score: 0.6,
            punct_min_score: 0.1,
        }
    }
}
