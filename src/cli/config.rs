//! TOML configuration file for recurring extraction settings.
//!
//! Values given on the command line win over the config file, which wins
//! over the built-in defaults:
//!
//! ```toml
//! # tims-targeted.toml
//! [extraction]
//! mz_tol = 0.02
//! ook0_tol = 0.03
//! parallel = true
//! sdk_lib = "/opt/bruker/lib/libtimsdata.so"
//! use_recalibrated_state = true
//!
//! [output]
//! outdir = "results"
//! outfile = "plate_01.csv"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[extraction]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// m/z tolerance applied when `--mz-tol` is not given.
    pub mz_tol: Option<f64>,

    /// 1/K0 tolerance applied when `--ook0-tol` is not given.
    pub ook0_tol: Option<f64>,

    /// Evaluate frames in parallel (requires the parallel feature).
    pub parallel: Option<bool>,

    /// Path to the timsdata shared library.
    pub sdk_lib: Option<PathBuf>,

    /// Open the acquisition with the recalibrated state.
    pub use_recalibrated_state: Option<bool>,
}

/// `[output]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving the output files.
    pub outdir: Option<PathBuf>,

    /// Name of the flat intensity table.
    pub outfile: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [extraction]
            mz_tol = 0.02
            ook0_tol = 0.03
            parallel = true
            sdk_lib = "/opt/bruker/libtimsdata.so"
            use_recalibrated_state = false

            [output]
            outdir = "results"
            outfile = "plate.csv"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.extraction.mz_tol, Some(0.02));
        assert_eq!(config.extraction.ook0_tol, Some(0.03));
        assert_eq!(config.extraction.parallel, Some(true));
        assert_eq!(
            config.extraction.sdk_lib,
            Some(PathBuf::from("/opt/bruker/libtimsdata.so"))
        );
        assert_eq!(config.extraction.use_recalibrated_state, Some(false));
        assert_eq!(config.output.outdir, Some(PathBuf::from("results")));
        assert_eq!(config.output.outfile.as_deref(), Some("plate.csv"));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [extraction]
            mz_tol = 0.01
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.extraction.mz_tol, Some(0.01));
        assert_eq!(config.extraction.ook0_tol, None);
        assert_eq!(config.output.outdir, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.extraction.mz_tol, None);
        assert_eq!(config.output.outfile, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let toml = r#"
            [extraction]
            mz_tolerance = 0.01
        "#;
        assert!(Config::from_str(toml).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tims-targeted.toml");
        std::fs::write(&path, "[output]\noutfile = \"x.csv\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.outfile.as_deref(), Some("x.csv"));

        assert!(Config::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
