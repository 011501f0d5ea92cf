use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::io::{self, Write};
use std::path::Path;

use csv::Writer;
use log::trace;
use serde::Serialize;

use crate::error::SeqiahrError;
use crate::node::{NodeSeries, StepRecord};

/// One CSV row per step, with compartments under the host's variable names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepReportRow {
    pub step: u32,
    #[serde(rename = "Exposed")]
    pub exposed: f64,
    #[serde(rename = "Infectious")]
    pub infectious: f64,
    #[serde(rename = "Asymptomatic")]
    pub asymptomatic: f64,
    #[serde(rename = "Hospitalized")]
    pub hospitalized: f64,
    #[serde(rename = "Susceptible")]
    pub susceptible: f64,
    pub incidence: f64,
    #[serde(rename = "migInf")]
    pub mig_inf: f64,
}

impl From<&StepRecord> for StepReportRow {
    fn from(record: &StepRecord) -> Self {
        StepReportRow {
            step: record.simstep,
            exposed: record.state.exposed,
            infectious: record.state.infectious,
            asymptomatic: record.state.asymptomatic,
            hospitalized: record.state.hospitalized,
            susceptible: record.state.susceptible,
            incidence: record.new_infections,
            mig_inf: record.migrating_infectious,
        }
    }
}

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist.
fn generate_validate_filepath(path: &Path, overwrite: bool) -> Result<File, SeqiahrError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            if path.exists() && !overwrite {
                return Err(format!(
                    "{} already exists; pass overwrite to replace it",
                    path.display()
                )
                .into());
            }
            Ok(File::create(path)?)
        }
        _ => Err("Report output files must be CSVs at this time".into()),
    }
}

/// Writes step rows to any `Write` sink.
pub struct StepReport<W: Write> {
    writer: Writer<W>,
}

impl StepReport<File> {
    /// Creates a CSV report at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a `.csv` path, already exists and `overwrite`
    /// is false, or cannot be created.
    pub fn create(path: &Path, overwrite: bool) -> Result<Self, SeqiahrError> {
        let file = generate_validate_filepath(path, overwrite)?;
        Ok(StepReport::from_writer(file))
    }
}

impl<W: Write> StepReport<W> {
    pub fn from_writer(writer: W) -> Self {
        StepReport {
            writer: Writer::from_writer(writer),
        }
    }

    /// Writes one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written.
    pub fn send(&mut self, record: &StepRecord) -> Result<(), SeqiahrError> {
        trace!("reporting step {}", record.simstep);
        self.writer.serialize(StepReportRow::from(record))?;
        Ok(())
    }

    /// Writes one row per step the node has taken, then flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be written or the sink cannot be flushed.
    pub fn write_series(&mut self, node: &NodeSeries) -> Result<(), SeqiahrError> {
        for record in node.history() {
            self.send(record)?;
        }
        self.flush()
    }

    /// # Errors
    ///
    /// Returns an error if the sink cannot be flushed.
    pub fn flush(&mut self) -> Result<(), SeqiahrError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and hands back the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be flushed.
    pub fn into_inner(self) -> Result<W, SeqiahrError> {
        self.writer
            .into_inner()
            .map_err(|e| {
                SeqiahrError::IoError(io::Error::new(e.error().kind(), e.error().to_string()))
            })
    }
}
