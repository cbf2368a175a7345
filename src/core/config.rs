//! Configuration management for chunkwise.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{ChunkwiseError, Result};
use crate::core::pipeline::{build_processors, DocumentWalker, ProcessorSpec};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Legacy config file looked up in the working directory
pub const LEGACY_CONFIG_FILE: &str = "chunkwise.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Processor pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Processors in application order
    #[serde(default = "ProcessorSpec::default_pipeline")]
    pub processors: Vec<ProcessorSpec>,
}

/// Encoder hints passed through to the encoder collaborator
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EncodingConfig {
    /// Required whenever a pipeline has an encoder
    #[serde(default)]
    pub batch_size: Option<usize>,

    /// Device hint, e.g. "cpu" or "cuda:0"
    #[serde(default)]
    pub device: Option<String>,
}

/// Input discovery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Document patterns to include (glob syntax)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// Path patterns to exclude (glob syntax)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Maximum document size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory processed documents are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Pretty-print output JSON
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

// Default value functions
fn default_include_patterns() -> Vec<String> {
    vec!["*.json".to_string()]
}

fn default_max_file_size() -> usize {
    50
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./chunks")
}

fn default_pretty() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            processors: ProcessorSpec::default_pipeline(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            include_patterns: default_include_patterns(),
            exclude_patterns: Vec::new(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            pretty: default_pretty(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ChunkwiseError::ConfigError(format!("Failed to read config file {path:?}: {e}"))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. `explicit` path (the CLI `--config` flag)
    /// 2. CHUNKWISE_CONFIG env var
    /// 3. XDG config file (~/.config/chunkwise/config.toml)
    /// 4. Legacy ./chunkwise.toml
    /// 5. Defaults
    ///
    /// Environment overrides are applied on top, then the result is
    /// validated.
    pub fn load_with_xdg(explicit: Option<&Path>, xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Some(path) = explicit {
            Self::from_file(path)?
        } else if let Ok(config_path) = env::var("CHUNKWISE_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new(LEGACY_CONFIG_FILE).exists() {
                Self::from_file(LEGACY_CONFIG_FILE)?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(batch_size) = env::var("CHUNKWISE_BATCH_SIZE") {
            if let Ok(size) = batch_size.parse() {
                self.encoding.batch_size = Some(size);
            }
        }
        if let Ok(device) = env::var("CHUNKWISE_DEVICE") {
            if !device.is_empty() {
                self.encoding.device = Some(device);
            }
        }

        if let Ok(max_size) = env::var("CHUNKWISE_MAX_FILE_SIZE_MB") {
            if let Ok(size) = max_size.parse() {
                self.input.max_file_size_mb = size;
            }
        }

        if let Ok(output_dir) = env::var("CHUNKWISE_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(output_dir);
        }
    }

    /// Validate configuration values
    ///
    /// Every processor spec is built once here, so bad patterns or
    /// strategy names fail before any document is read.
    pub fn validate(&self) -> Result<()> {
        if self.encoding.batch_size == Some(0) {
            return Err(ChunkwiseError::ConfigError(
                "Batch size must be non-zero".to_string(),
            ));
        }

        if self.input.max_file_size_mb == 0 {
            return Err(ChunkwiseError::ConfigError(
                "Max file size must be non-zero".to_string(),
            ));
        }

        DocumentWalker::new(
            &self.input.include_patterns,
            &self.input.exclude_patterns,
            self.input.max_file_size_mb,
        )?;

        build_processors(&self.pipeline.processors)?;

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Processors: {}", self.pipeline.processors.len());
        for (idx, spec) in self.pipeline.processors.iter().enumerate() {
            tracing::info!("    {}. {}", idx + 1, spec.kind());
        }
        match self.encoding.batch_size {
            Some(size) => tracing::info!("  Batch size: {}", size),
            None => tracing::info!("  Batch size: unset"),
        }
        tracing::info!(
            "  Device: {}",
            self.encoding.device.as_deref().unwrap_or("default")
        );
        tracing::info!(
            "  Include patterns: {}",
            self.input.include_patterns.join(", ")
        );
        tracing::info!(
            "  Exclude patterns: {} patterns",
            self.input.exclude_patterns.len()
        );
        tracing::info!("  Max file size: {} MB", self.input.max_file_size_mb);
        tracing::info!("  Output dir: {:?}", self.output.dir);
    }
}
