//! Shared configuration loader for the mdx toolchain.
//!
//! `defaults/mdx.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MdxConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use mdx_babel::paths::PathOptions;
use mdx_babel::translate::TranslateOptions;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/mdx.default.toml");

/// File picked up from the working directory when present.
pub const LOCAL_CONFIG: &str = "mdx.toml";

/// Top-level configuration consumed by mdx applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MdxConfig {
    pub output: OutputConfig,
    pub translate: TranslateConfig,
    pub build: BuildConfig,
}

/// Where and how outputs are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub suffix: String,
    pub assets_dir: String,
    pub format: String,
    pub manifest: String,
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeConfig {
    pub lowercase: bool,
    pub strip_prefix: String,
}

impl From<&OutputConfig> for PathOptions {
    fn from(config: &OutputConfig) -> Self {
        PathOptions {
            suffix: config.suffix.clone(),
            assets_dir: config.assets_dir.clone(),
            lowercase: config.normalize.lowercase,
            strip_prefix: config.normalize.strip_prefix.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateConfig {
    pub default_code_language: String,
    #[serde(default)]
    pub language_aliases: HashMap<String, String>,
}

impl From<TranslateConfig> for TranslateOptions {
    fn from(config: TranslateConfig) -> Self {
        TranslateOptions {
            default_code_language: config.default_code_language,
            language_aliases: config.language_aliases,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// `0` uses the available parallelism.
    pub jobs: usize,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub root_doc: Option<String>,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdxConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdxConfig, ConfigError> {
    Loader::new().build()
}
