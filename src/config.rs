use crate::core_modules::aggregator::{ScanBounds, ScanOptions};
use crate::core_modules::color::color::{DEFAULT_TOLERANCE, Tolerance};
use crate::core_modules::utils::claim_table::claim_table::{MalformedRowPolicy, TableOptions};
use crate::error::{Result, SizerError};
use crate::report::ReportFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings for one sizing run, loaded from YAML and overridable from the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizerConfig {
    /// Map image to measure.
    pub map_path: PathBuf,
    /// Claim table (`name, red, blue, green, class`).
    pub claims_path: PathBuf,
    /// Largest per-channel difference that still counts as a match.
    pub tolerance: Tolerance,
    pub scan_bounds: ScanBounds,
    pub malformed_rows: MalformedRowPolicy,
    pub has_header: bool,
    /// 0 scans on the calling thread; N splits the scan into N bands.
    pub workers: usize,
    /// How many of the most frequent exact colors to report.
    pub top_colors: usize,
    pub format: ReportFormat,
}

impl Default for SizerConfig {
    fn default() -> Self {
        Self {
            map_path: PathBuf::from("map.png"),
            claims_path: PathBuf::from("claims.csv"),
            tolerance: DEFAULT_TOLERANCE,
            scan_bounds: ScanBounds::Exclusive,
            malformed_rows: MalformedRowPolicy::Skip,
            has_header: true,
            workers: 0,
            top_colors: 0,
            format: ReportFormat::Text,
        }
    }
}

impl SizerConfig {
    /// Reads a YAML config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SizerError::ResourceOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text, path)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(text: &str, origin: &Path) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| SizerError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            tolerance: self.tolerance,
            bounds: self.scan_bounds,
        }
    }

    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            has_header: self.has_header,
            malformed_rows: self.malformed_rows,
        }
    }
}
