use crate::exif_reader::EmbeddedExifReader;
use crate::exiftool::{ExifToolReader, DEFAULT_TIMESTAMP_FIELDS};
use crate::metadata::MetadataReader;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Extractor {
    #[default]
    Exiftool,
    Exif,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub extractor: Extractor,
    pub exiftool_path: PathBuf,
    pub timestamp_fields: Vec<String>,
    pub quicktime_utc: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let exiftool = ExifToolReader::default();
        Self {
            extractor: Extractor::default(),
            exiftool_path: exiftool.program,
            timestamp_fields: DEFAULT_TIMESTAMP_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
            quicktime_utc: exiftool.quicktime_utc,
        }
    }
}

impl AppConfig {
    pub fn metadata_reader(&self) -> Box<dyn MetadataReader> {
        match self.extractor {
            Extractor::Exiftool => Box::new(ExifToolReader {
                program: self.exiftool_path.clone(),
                fields: self.timestamp_fields.clone(),
                quicktime_utc: self.quicktime_utc,
            }),
            Extractor::Exif => Box::new(EmbeddedExifReader),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("io", "imgsort", "imgsort")
        .context("could not determine the OS configuration directory")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    if !paths.config_path.exists() {
        return Ok(AppConfig::default());
    }
    load_config_from(&paths.config_path)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config = toml::from_str::<AppConfig>(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(config)
}
