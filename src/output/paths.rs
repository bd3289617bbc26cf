use std::path::{Path, PathBuf};

use serde::Serialize;

use super::OutputError;

/// Locations of the artifacts written by one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    /// Flat intensity table
    pub intensity: PathBuf,
    /// Per-spot ratio table
    pub ratios: PathBuf,
    /// Spot-grid heatmap
    pub heatmap: PathBuf,
    /// JSON run summary
    pub summary: PathBuf,
}

impl OutputPaths {
    /// Paths under `outdir`, the derived files named after the stem of `outfile`
    /// (`run.csv` → `run_ratios.csv`, `run_heatmap.csv`, `run_summary.json`).
    pub fn new(outdir: &Path, outfile: &str) -> Result<Self, OutputError> {
        let stem = Path::new(outfile)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| OutputError::InvalidPath(outfile.to_string()))?;
        Ok(Self {
            intensity: outdir.join(outfile),
            ratios: outdir.join(format!("{stem}_ratios.csv")),
            heatmap: outdir.join(format!("{stem}_heatmap.csv")),
            summary: outdir.join(format!("{stem}_summary.json")),
        })
    }

    /// Default output directory for an input: its parent (or `.`).
    pub fn default_outdir(input: &Path) -> PathBuf {
        match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Default flat-table name for an input: its stem plus `.csv`.
    pub fn default_outfile(input: &Path) -> Result<String, OutputError> {
        input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .map(|stem| format!("{stem}.csv"))
            .ok_or_else(|| OutputError::InvalidPath(input.display().to_string()))
    }

    /// Create the directory holding the outputs if needed.
    pub fn ensure_dirs(&self) -> Result<(), OutputError> {
        for path in [&self.intensity, &self.ratios, &self.heatmap, &self.summary] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
