//! Human-readable run report.
//!
//! Recoverable data-quality issues (malformed scans, malformed spot names,
//! undefined ratios, zero-intensity records) never stop a run; they are
//! counted and listed here once the run is over.

use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::Serialize;

use crate::aggregate::{AggregationMode, AggregationReport, HeatmapGrid};
use crate::extract::{ExtractionOutcome, ExtractionStats};

/// Outcome of one check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    /// Nothing to report
    Ok,
    /// Recoverable issue, results still written
    Warning(String),
    /// Results are incomplete
    Failed(String),
}

/// One line of the report
#[derive(Debug, Clone, PartialEq)]
pub struct RunCheck {
    /// What was checked
    pub name: String,
    /// Result
    pub status: CheckStatus,
}

impl RunCheck {
    fn counted(name: &str, count: usize, what: &str) -> Self {
        Self {
            name: name.to_string(),
            status: if count == 0 {
                CheckStatus::Ok
            } else {
                CheckStatus::Warning(format!("{} {}", count, what))
            },
        }
    }
}

/// Counts gathered over an extraction run and its aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Input acquisition (or a label for synthetic data)
    pub input: String,
    /// Aggregation mode used
    pub mode: AggregationMode,
    /// Extraction counters
    pub stats: ExtractionStats,
    /// Frames whose spot name did not parse
    pub malformed_spot_names: usize,
    /// Ratio rows with an undefined normalized ratio
    pub undefined_ratios: usize,
    /// Populated heatmap cells
    pub heatmap_cells: usize,
    /// Whether the run was cancelled before completion
    pub cancelled: bool,
}

impl RunReport {
    /// Collect the counts of a finished run.
    pub fn new(
        input: impl Into<String>,
        outcome: &ExtractionOutcome,
        aggregation: &AggregationReport,
        grid: &HeatmapGrid,
    ) -> Self {
        Self {
            input: input.into(),
            mode: aggregation.mode,
            stats: outcome.stats.clone(),
            malformed_spot_names: aggregation.malformed_spot_names,
            undefined_ratios: aggregation.undefined_ratios,
            heatmap_cells: grid.len(),
            cancelled: outcome.cancelled,
        }
    }

    /// Report lines, in display order.
    pub fn checks(&self) -> Vec<RunCheck> {
        let expected = self.stats.features * self.stats.frames;
        let mut checks = vec![RunCheck {
            name: "Extraction".to_string(),
            status: if self.cancelled {
                CheckStatus::Failed(format!(
                    "cancelled, {} of {} records written",
                    self.stats.records, expected
                ))
            } else {
                CheckStatus::Ok
            },
        }];
        checks.push(RunCheck::counted("Scans", self.stats.malformed_scans, "malformed scans skipped"));
        checks.push(RunCheck::counted(
            "Intensities",
            self.stats.zero_intensity_records,
            "records with zero intensity",
        ));
        checks.push(RunCheck::counted(
            "Spot names",
            self.malformed_spot_names,
            "frames excluded from the heatmap",
        ));
        if self.mode.is_enabled() {
            checks.push(RunCheck::counted("Ratios", self.undefined_ratios, "undefined ratios"));
        }
        checks
    }

    /// Whether anything was reported as a warning or failure.
    pub fn has_issues(&self) -> bool {
        self.checks().iter().any(|c| c.status != CheckStatus::Ok)
    }

    /// Format the report with colors (plain text without `colorized_output`).
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Targeted Extraction Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("==========================").cyan()));
            output.push_str(&format!("{}: {}\n", style("Input").bold(), self.input));
            output.push_str(&format!("{}: {}\n\n", style("Aggregation").bold(), self.mode));

            for check in self.checks() {
                match &check.status {
                    CheckStatus::Ok => {
                        output.push_str(&format!("[{}] {}\n", OK, style(&check.name).green()));
                    }
                    CheckStatus::Warning(msg) => {
                        output.push_str(&format!("[{}] {} - {}\n", WARN, style(&check.name).yellow(), msg));
                    }
                    CheckStatus::Failed(msg) => {
                        output.push_str(&format!(
                            "[{}] {} - {}: {}\n",
                            FAIL,
                            style(&check.name).red(),
                            style("FAILED").red().bold(),
                            msg
                        ));
                    }
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} records from {} features x {} frames, {} heatmap cells\n",
                style("Summary").bold(),
                style(self.stats.records).green(),
                self.stats.features,
                self.stats.frames,
                self.heatmap_cells
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Targeted Extraction Report")?;
        writeln!(f, "==========================")?;
        writeln!(f, "Input: {}", self.input)?;
        writeln!(f, "Aggregation: {}", self.mode)?;
        writeln!(f)?;

        for check in self.checks() {
            match &check.status {
                CheckStatus::Ok => writeln!(f, "[✓] {}", check.name)?,
                CheckStatus::Warning(msg) => writeln!(f, "[⚠] {} - {}", check.name, msg)?,
                CheckStatus::Failed(msg) => writeln!(f, "[✗] {} - FAILED: {}", check.name, msg)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} records from {} features x {} frames, {} heatmap cells",
            self.stats.records, self.stats.features, self.stats.frames, self.heatmap_cells
        )
    }
}
