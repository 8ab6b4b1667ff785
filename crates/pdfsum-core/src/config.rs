use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::chunker::DEFAULT_MAX_CHUNK_CHARS;
use crate::summarizer::{ProviderConfig, SummaryOptions, DEFAULT_MODEL_INPUT_CHARS};

/// Pages and chunks shorter than this (in chars, after trimming) are skipped.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 200;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root config directory (~/.config/pdfsum)
    pub config_dir: PathBuf,
    /// Persisted settings file
    pub settings_file: PathBuf,
    /// Default directory for saved summaries
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration or use defaults
    pub fn load_or_default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pdfsum");

        let output_dir = dirs::document_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pdfsum");

        Self {
            settings_file: config_dir.join("settings.json"),
            config_dir,
            output_dir,
        }
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Default location for the summary of `pdf_path`
    pub fn default_output_path(&self, pdf_path: &Path) -> PathBuf {
        let stem = pdf_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        self.output_dir.join(format!("{}_summary.txt", stem))
    }
}

/// Chunking and skip thresholds, all in chars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub max_chunk_chars: usize,
    pub min_content_chars: usize,
    pub model_input_chars: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            model_input_chars: DEFAULT_MODEL_INPUT_CHARS,
        }
    }
}

/// User settings persisted as JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub provider: Option<ProviderConfig>,
    pub chunking: ChunkingSettings,
    pub summary: SummaryOptions,
}

impl Settings {
    /// Load settings, falling back to defaults if missing or unreadable
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read settings");
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Invalid settings, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json).context("Failed to write settings")?;
        Ok(())
    }
}
