//! Pipeline configuration loading.
//!
//! Mirrors the preprocessing config document consumed by the wider data
//! pipeline; the normalizer only reads the `preprocessing.normalize`
//! subtree.

use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Top-level pipeline configuration.
///
/// ```yaml
/// preprocessing:
///   normalize:
///     mapping_file: config/severity_mapping.yaml
///     output_dir: processed
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub preprocessing: Preprocessing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Preprocessing {
    pub normalize: NormalizeSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeSettings {
    /// Severity mapping document consumed by `MappingTable::load`
    pub mapping_file: PathBuf,

    /// Directory normalized output is written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("processed")
}

impl PipelineConfig {
    /// Loads the pipeline configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}
