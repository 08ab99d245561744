//! Profiler settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Label used when a section is pushed without a name.
pub const DEFAULT_LABEL: &str = "unlabelled section";

/// Width of the name column in the text report.
pub const DEFAULT_NAME_WIDTH: usize = 50;

/// Ordering of sibling sections in a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Order in which sections were first entered.
    ExecutionOrder,
    /// Cumulative time (average x count), largest first.
    #[default]
    TotalTime,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::ExecutionOrder => f.write_str("execution order"),
            SortBy::TotalTime => f.write_str("total time"),
        }
    }
}

/// Profiler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerSettings {
    pub default_sort: SortBy,
    pub name_width: usize,
    pub default_label: String,
}

impl Default for ProfilerSettings {
    fn default() -> Self {
        Self {
            default_sort: SortBy::TotalTime,
            name_width: DEFAULT_NAME_WIDTH,
            default_label: DEFAULT_LABEL.to_string(),
        }
    }
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("name column width must be positive, got {0}")]
    InvalidNameWidth(usize),
}

impl ProfilerSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: ProfilerSettings = serde_json::from_str(json)?;
        settings.validate()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), ?settings, "loaded profiler settings");
        Ok(settings)
    }

    fn validate(mut self) -> Result<Self, SettingsError> {
        if self.name_width == 0 {
            return Err(SettingsError::InvalidNameWidth(self.name_width));
        }
        if self.default_label.is_empty() {
            self.default_label = DEFAULT_LABEL.to_string();
        }
        Ok(self)
    }
}
