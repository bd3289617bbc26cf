use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::{OutputError, OutputPaths};
use crate::feature::FeatureWindow;
use crate::report::RunReport;

/// JSON summary written next to the tables.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary<'a> {
    /// Name and version of the tool that wrote the outputs
    pub generator: String,
    /// RFC 3339 timestamp of when the summary was written
    pub created: String,
    /// Feature windows that were extracted
    pub features: &'a [FeatureWindow],
    /// Counts of the run
    pub report: &'a RunReport,
    /// Artifacts written
    pub outputs: &'a OutputPaths,
}

impl<'a> RunSummary<'a> {
    /// Summary stamped with the current time.
    pub fn new(features: &'a [FeatureWindow], report: &'a RunReport, outputs: &'a OutputPaths) -> Self {
        Self {
            generator: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            created: chrono::Utc::now().to_rfc3339(),
            features,
            report,
            outputs,
        }
    }

    /// Write as pretty-printed JSON.
    pub fn write<W: Write>(&self, writer: W) -> Result<(), OutputError> {
        let mut writer = writer;
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Write as pretty-printed JSON to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), OutputError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
