//! # tims-targeted - Targeted feature extraction for MALDI-TIMS imaging runs
//!
//! `tims_targeted` sums the intensity of targeted (m/z, 1/K0) features at
//! every spot of a MALDI imaging acquisition recorded on a trapped ion
//! mobility time-of-flight instrument (Bruker `.d` directory), then derives
//! per-spot ratios and a spot-grid heatmap from those intensities.
//!
//! ## Quick Start
//!
//! ```rust
//! use tims_targeted::prelude::*;
//!
//! // Synthetic 2 x 3 plate; use `TimsSession::open` for a real `.d` directory
//! let source = InMemoryRawData::synthetic_plate(2, 3);
//!
//! let windows = resolve_windows(&[500.0, 600.0], &[0.05], &[0.90, 1.10], &[0.01])?;
//! let outcome = ExtractionDriver::new(&source).run_all(&windows)?;
//! assert_eq!(outcome.records.len(), 12);
//!
//! let mode = AggregationMode::from_selectors(Some(0.90), Some(1.10), None)?;
//! let report = aggregate(&outcome.records, mode);
//! let grid = pivot(&report.ratios);
//! assert_eq!(grid.get("B", "3"), Some(1.5));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! feature lists ──► resolve_windows ──► ExtractionDriver ──► IntensityRecord table
//!                                            │                       │
//!                                   FeatureExtractor            aggregate / pivot
//!                                            │                       │
//!                                     RawDataSource           RatioRecord, HeatmapGrid
//! ```
//!
//! ## Architecture
//!
//! - [`feature`]: feature windows, CLI list broadcasting and feature-list files
//! - [`tdf`]: raw-data access (vendor SDK + SQLite session, in-memory source)
//! - [`extract`]: per-frame extraction and the features × frames driver
//! - [`aggregate`]: per-spot ratios, spot-name parsing and the heatmap pivot
//! - [`output`]: CSV tables and the JSON run summary
//! - [`report`]: human-readable run report
//! - [`pipeline`]: extraction, aggregation and outputs in one call
//!
//! ## Output Tables
//!
//! | File | Columns |
//! |------|---------|
//! | `<outfile>` | Frame, Spot, mz, mz_tolerance, ook0, ook0_tol, intensity |
//! | `<stem>_ratios.csv` | Frame, Spot, row, column, numerator_intensity, denominator_intensity, internal_standard_intensity, ratio, normalized_ratio, flag |
//! | `<stem>_heatmap.csv` | row, then one column per spot column label |
//!
//! ## Features
//!
//! - `colorized_output` (default): colored run report in the terminal
//! - `parallel`: evaluate the frames of a feature in parallel with rayon

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

pub mod aggregate;
pub mod extract;
pub mod feature;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod tdf;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::aggregate::{
        aggregate, pivot, AggregationMode, AggregationReport, HeatmapGrid, RatioRecord, RatioValue,
        SpotCoordinate,
    };
    pub use crate::extract::{
        ExtractionDriver, ExtractionError, ExtractionOutcome, FeatureExtractor, IntensityRecord,
    };
    pub use crate::feature::{read_feature_list, resolve_windows, FeatureError, FeatureWindow};
    pub use crate::output::{OutputError, OutputPaths};
    pub use crate::pipeline::{run_pipeline, write_outputs, PipelineOptions};
    pub use crate::report::RunReport;
    pub use crate::tdf::{
        DataAccessError, Frame, InMemoryRawData, RawDataSource, SessionOptions, TimsSession,
    };
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
