//! Dashboard configuration: cleaning rules and display limits.
//!
//! Stored as a JSON object on disk; every field is optional:
//! ```json
//! {
//!   "cleaning": { "sentinel": "NaN", "time_taken_suffix_width": 2, "date_format": "%d-%m-%Y" },
//!   "limits": { "geocenter_groups": 5, "top_deliverers": 10 }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parsing rules tied to the source dataset's conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningRules {
    /// Marker the source uses for "no value". Compared against trimmed cells.
    pub sentinel: String,
    /// Number of trailing characters of the time-taken cell holding the minutes.
    pub time_taken_suffix_width: usize,
    /// `chrono` format of the order date column.
    pub date_format: String,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            sentinel: "NaN".to_string(),
            time_taken_suffix_width: 2,
            date_format: "%d-%m-%Y".to_string(),
        }
    }
}

/// Row limits applied to ranked or truncated metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub geocenter_groups: usize,
    pub top_deliverers: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            geocenter_groups: 5,
            top_deliverers: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub cleaning: CleaningRules,
    pub limits: Limits,
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
