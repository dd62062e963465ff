//! Run configuration.
//!
//! The process wiring layer builds a [`RecastConfig`] from a JSON file and
//! command-line flags and passes it down explicitly; nothing in the core
//! reads global state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, RewriteError};

/// Pass budget used when none is configured
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Target language version, `major.minor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageVersion {
    pub major: u8,
    pub minor: u8,
}

impl LanguageVersion {
    pub const PHP_70: LanguageVersion = LanguageVersion::new(7, 0);
    pub const PHP_71: LanguageVersion = LanguageVersion::new(7, 1);
    pub const PHP_74: LanguageVersion = LanguageVersion::new(7, 4);
    pub const PHP_80: LanguageVersion = LanguageVersion::new(8, 0);
    pub const PHP_81: LanguageVersion = LanguageVersion::new(8, 1);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        Self::PHP_80
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for LanguageVersion {
    type Err = RewriteError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RewriteError::Config(format!("invalid language version: {s:?}"));
        let (major, minor) = match s.trim().split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s.trim(), "0"),
        };
        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;
        Ok(Self::new(major, minor))
    }
}

impl TryFrom<String> for LanguageVersion {
    type Error = RewriteError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LanguageVersion> for String {
    fn from(version: LanguageVersion) -> Self {
        version.to_string()
    }
}

/// How rewritten units are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The tree document, as read
    #[default]
    Json,
    /// Printed PHP source
    Source,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Source => "php",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RewriteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "source" | "php" => Ok(OutputFormat::Source),
            other => Err(RewriteError::Config(format!(
                "unknown output format {other:?}, expected json or source"
            ))),
        }
    }
}

/// Core configuration for a rewriting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecastConfig {
    /// Pass budget per unit
    pub max_passes: usize,
    /// Rules whose minimum version is above this stay inactive
    pub target_version: LanguageVersion,
    /// Compute rewrites without writing anything
    pub dry_run: bool,
    /// Rewrite units on the rayon thread pool
    pub parallel: bool,
    pub output_format: OutputFormat,
    /// Mirror rewritten units here instead of rewriting in place
    pub output_dir: Option<PathBuf>,
    /// File extensions picked up when walking directories
    pub extensions: Vec<String>,
    /// Rule names to enable; empty enables the whole catalogue
    pub rules: Vec<String>,
}

impl Default for RecastConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            target_version: LanguageVersion::default(),
            dry_run: false,
            parallel: true,
            output_format: OutputFormat::Json,
            output_dir: None,
            extensions: vec!["json".to_string()],
            rules: Vec::new(),
        }
    }
}

impl RecastConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RecastConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            return Err(RewriteError::Config(
                "max_passes must be at least 1".to_string(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(RewriteError::Config(
                "at least one input extension is required".to_string(),
            ));
        }
        Ok(())
    }
}
