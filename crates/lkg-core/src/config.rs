//! Toolkit configuration
//!
//! Every knob has a default; an optional TOML file overrides defaults and
//! command-line flags override the file.
//!
//! ```toml
//! [limits]
//! max_file_size = 1048576
//!
//! [reconcile]
//! sample_size = 10
//!
//! [inspect]
//! json_column = "ngram_wikipedia_link"
//!
//! [probe]
//! urls = ["https://en.wikipedia.org"]
//! connect_timeout_secs = 5
//! ```

use crate::error::ConfigError;
use crate::formats::ColumnSelector;
use crate::layer::DEFAULT_MAX_FILE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rows shown in the reconcile sample
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Keys listed by the cache census before truncating
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Column checked by the JSON-cell validator (the 7th)
pub const DEFAULT_JSON_COLUMN: usize = 6;

/// Endpoints checked by the connectivity probe
pub const DEFAULT_PROBE_URLS: [&str; 4] = [
    "https://en.wikipedia.org",
    "https://en.wikipedia.org/api/rest_v1/",
    "https://en.wikipedia.org/w/api.php",
    "https://en.wikipedia.org/api/rest_v1/page/summary/Linux",
];

/// User agent sent by the connectivity probe
pub const DEFAULT_USER_AGENT: &str =
    "LinuxKernelKG/1.0 (Educational research project; Linux kernel knowledge graph)";

/// Complete toolkit configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolkitConfig {
    /// Input size limits
    pub limits: LimitSettings,
    /// Mention reconciler
    pub reconcile: ReconcileSettings,
    /// Cache census
    pub census: CensusSettings,
    /// JSON-cell validator
    pub inspect: InspectSettings,
    /// Connectivity probe
    pub probe: ProbeSettings,
}

impl ToolkitConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// `ConfigError::Read` if the file cannot be read,
    /// `ConfigError::Invalid` if it is not valid TOML or fails validation
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(path, &content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text; `path` is used in errors only
    ///
    /// # Errors
    /// `ConfigError::Invalid` on bad TOML, unknown keys or invalid values
    pub fn from_toml_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the offending setting
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        if self.limits.max_file_size == 0 {
            return Err(invalid("limits.max_file_size must be positive"));
        }
        if self.probe.connect_timeout_secs == 0 || self.probe.timeout_secs == 0 {
            return Err(invalid("probe timeouts must be positive"));
        }
        if self.probe.urls.is_empty() {
            return Err(invalid("probe.urls must not be empty"));
        }
        Ok(())
    }

    /// With input size limit
    #[inline]
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.limits.max_file_size = bytes;
        self
    }

    /// With reconcile sample size
    #[inline]
    #[must_use]
    pub fn with_sample_size(mut self, rows: usize) -> Self {
        self.reconcile.sample_size = rows;
        self
    }

    /// With census list limit
    #[inline]
    #[must_use]
    pub fn with_list_limit(mut self, keys: usize) -> Self {
        self.census.list_limit = keys;
        self
    }

    /// With JSON-cell validator column
    #[inline]
    #[must_use]
    pub fn with_json_column(mut self, column: ColumnSelector) -> Self {
        self.inspect.json_column = column;
        self
    }
}

/// Input size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitSettings {
    /// Maximum input file size in bytes
    pub max_file_size: u64,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Mention reconciler settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileSettings {
    /// Rows shown in the post-join sample
    pub sample_size: usize,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// Cache census settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CensusSettings {
    /// Url-bearing keys listed before truncating
    pub list_limit: usize,
}

impl Default for CensusSettings {
    fn default() -> Self {
        Self {
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// JSON-cell validator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectSettings {
    /// Column holding JSON cells
    pub json_column: ColumnSelector,
}

impl Default for InspectSettings {
    fn default() -> Self {
        Self {
            json_column: ColumnSelector::Index(DEFAULT_JSON_COLUMN),
        }
    }
}

/// Connectivity probe settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    /// Endpoints to check, in order
    pub urls: Vec<String>,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Overall request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            urls: DEFAULT_PROBE_URLS.iter().map(|u| (*u).to_string()).collect(),
            connect_timeout_secs: 5,
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
