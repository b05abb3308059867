//! "Not specified" sentinel detection
//!
//! The analysis model fills fields it could not determine with a localized
//! phrase such as "не вказано". Such values must lose to any real value when
//! records are merged.
//!
//! ## Configuration Resolution
//!
//! Patterns are loaded with a two-layer resolution:
//! 1. Explicit path, or the override in the data dir
//!    (~/.local/share/tender/config/sentinels.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use regex::{RegexSet, RegexSetBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/sentinels.toml");

/// Where the active patterns came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentinelSource {
    /// Embedded defaults
    Default,
    /// Loaded from a config file
    File(PathBuf),
    /// Supplied programmatically
    Custom,
}

impl std::fmt::Display for SentinelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "built-in defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Case-insensitive matcher for sentinel phrases
#[derive(Debug, Clone)]
pub struct SentinelMatcher {
    patterns: Vec<String>,
    set: RegexSet,
    source: SentinelSource,
}

impl SentinelMatcher {
    /// Load patterns from the override location, falling back to defaults
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Self::builtin(),
        }
    }

    /// Load patterns from an explicit config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let patterns = parse_config(&content)?;
        debug!(path = %path.display(), count = patterns.len(), "Loaded sentinel patterns");
        Self::build(patterns, SentinelSource::File(path.to_path_buf()))
    }

    /// Embedded default patterns
    pub fn builtin() -> Result<Self> {
        Self::build(parse_config(DEFAULT_CONFIG)?, SentinelSource::Default)
    }

    /// Build from explicit regex patterns
    pub fn with_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns.into_iter().map(Into::into).collect();
        Self::build(patterns, SentinelSource::Custom)
    }

    fn build(patterns: Vec<String>, source: SentinelSource) -> Result<Self> {
        let set = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            patterns,
            set,
            source,
        })
    }

    /// Whether `value` contains a sentinel phrase
    pub fn is_sentinel(&self, value: &str) -> bool {
        self.set.is_match(value)
    }

    /// Whether `value` is a real answer: non-blank and not a sentinel
    pub fn is_informative(&self, value: &str) -> bool {
        !value.trim().is_empty() && !self.is_sentinel(value)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn source(&self) -> &SentinelSource {
        &self.source
    }
}

impl Default for SentinelMatcher {
    fn default() -> Self {
        // Embedded config is exercised by tests
        Self::builtin().unwrap_or_else(|_| Self {
            patterns: vec!["не вказано".to_string()],
            set: RegexSetBuilder::new(["не вказано"])
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|_| RegexSet::empty()),
            source: SentinelSource::Default,
        })
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tender").join("config").join("sentinels.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    sentinels: Option<RawSentinels>,
}

#[derive(Debug, Deserialize)]
struct RawSentinels {
    patterns: Option<Vec<String>>,
}

/// Parse pattern list from TOML content
fn parse_config(content: &str) -> Result<Vec<String>> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid sentinel TOML: {}", e)))?;

    Ok(raw
        .sentinels
        .and_then(|s| s.patterns)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect())
}
