use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod batch;
pub mod fonts;
pub mod metadata;
pub mod placement;
pub mod startup_checks;
pub mod watermark;

use batch::BatchOptions;
use fonts::{DEFAULT_FONT_CANDIDATES, FontResolver, default_search_directories};
use placement::select_anchor;
use watermark::{TextColor, WatermarkError};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub watermark: WatermarkConfig,
    pub fonts: FontConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// 0 sizes the text from the image width.
    pub font_size: u32,
    pub color: String,
    pub position: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FontConfig {
    pub candidates: Vec<String>,
    pub search_directories: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory_suffix: String,
    pub jpeg_quality: u8,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            font_size: 0,
            color: "white".to_string(),
            position: "bottom-right".to_string(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_FONT_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            search_directories: default_search_directories(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory_suffix: "_watermark".to_string(),
            jpeg_quality: 75,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::de::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml_edit::de::from_str::<Config>(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Options for a batch run. Fails only on an unparsable color; an
    /// unknown position falls back to bottom-right with a warning.
    pub fn batch_options(&self) -> Result<BatchOptions, WatermarkError> {
        let color = TextColor::parse(&self.watermark.color)?;
        let anchor = select_anchor(&self.watermark.position).anchor();

        Ok(BatchOptions {
            font_size: Some(self.watermark.font_size).filter(|size| *size > 0),
            color,
            anchor,
            output_suffix: self.output.directory_suffix.clone(),
            jpeg_quality: self.output.jpeg_quality.clamp(1, 100),
        })
    }

    pub fn font_resolver(&self) -> FontResolver {
        FontResolver::new(
            self.fonts.candidates.clone(),
            self.fonts.search_directories.clone(),
        )
    }
}
