//! Features × frames extraction loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{ExtractionError, ExtractionStats, FeatureExtractor, FrameIntensity, IntensityRecord};
use crate::feature::FeatureWindow;
use crate::tdf::{Frame, RawDataSource};

/// Result of an extraction run.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// Flat intensity table, ordered by feature then frame
    pub records: Vec<IntensityRecord>,
    /// Run counters
    pub stats: ExtractionStats,
    /// Whether the run stopped early on request; `records` then holds only
    /// the pairs completed before the stop
    pub cancelled: bool,
}

/// Evaluates every feature window against every frame.
///
/// # Example
///
/// ```
/// use tims_targeted::extract::ExtractionDriver;
/// use tims_targeted::feature::FeatureWindow;
/// use tims_targeted::tdf::InMemoryRawData;
///
/// let source = InMemoryRawData::synthetic_plate(2, 2);
/// let windows = vec![FeatureWindow::new(500.0, 0.05, 0.9, 0.01)?];
/// let outcome = ExtractionDriver::new(&source).run_all(&windows)?;
/// assert_eq!(outcome.records.len(), 4);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ExtractionDriver<'a, S> {
    source: &'a S,
    cancel: Option<Arc<AtomicBool>>,
    parallel: bool,
}

impl<'a, S: RawDataSource + Sync> ExtractionDriver<'a, S> {
    /// Driver over an open source.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            cancel: None,
            parallel: false,
        }
    }

    /// Stop between frames once `flag` is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Evaluate the frames of each feature in parallel (requires the
    /// `parallel` feature; ignored with a warning otherwise).
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Run over every frame of the source.
    pub fn run_all(&self, windows: &[FeatureWindow]) -> Result<ExtractionOutcome, ExtractionError> {
        let frames = self.source.frames()?;
        self.run(windows, &frames)
    }

    /// Run over the given frames.
    pub fn run(
        &self,
        windows: &[FeatureWindow],
        frames: &[Frame],
    ) -> Result<ExtractionOutcome, ExtractionError> {
        let extractor = FeatureExtractor::new(self.source);
        let mut stats = ExtractionStats {
            features: windows.len(),
            frames: frames.len(),
            ..Default::default()
        };
        let mut records = Vec::with_capacity(windows.len() * frames.len());
        let mut cancelled = false;

        if self.parallel && cfg!(not(feature = "parallel")) {
            warn!("Parallel extraction requested but the `parallel` feature is disabled; running sequentially");
        }

        'features: for (n, window) in windows.iter().enumerate() {
            info!("Feature {}/{}: {}", n + 1, windows.len(), window);

            for (frame, detail) in frames.iter().zip(self.evaluate(&extractor, window, frames)) {
                let Some(detail) = detail else {
                    cancelled = true;
                    break 'features;
                };
                let detail = detail.map_err(|source| ExtractionError::FrameFailed {
                    frame_id: frame.id,
                    spot: frame.spot_name.clone(),
                    feature: window.to_string(),
                    source,
                })?;
                debug!(
                    "Frame {} ({}): intensity {} from {} scans",
                    frame.id, frame.spot_name, detail.intensity, detail.scans_read
                );
                stats.record(&detail);
                records.push(IntensityRecord::new(frame, *window, detail.intensity));
            }
        }

        if cancelled {
            warn!(
                "Extraction cancelled after {} of {} records",
                records.len(),
                windows.len() * frames.len()
            );
        } else {
            info!("{}", stats);
        }

        Ok(ExtractionOutcome {
            records,
            stats,
            cancelled,
        })
    }

    /// Evaluate one window over all frames. `None` marks a frame skipped
    /// because of cancellation; everything after it is discarded by the caller.
    fn evaluate(
        &self,
        extractor: &FeatureExtractor<&S>,
        window: &FeatureWindow,
        frames: &[Frame],
    ) -> Vec<Option<Result<FrameIntensity, crate::tdf::DataAccessError>>> {
        let evaluate_frame = |frame: &Frame| {
            if self.is_cancelled() {
                return None;
            }
            Some(extractor.extract_detailed(frame, window))
        };

        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return frames.par_iter().map(&evaluate_frame).collect();
            }
        }

        // Sequential: stop at the first failure or cancellation.
        let mut results = Vec::with_capacity(frames.len());
        for frame in frames {
            let result = evaluate_frame(frame);
            let stop = !matches!(result, Some(Ok(_)));
            results.push(result);
            if stop {
                break;
            }
        }
        results
    }
}
