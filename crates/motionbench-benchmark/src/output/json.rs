//! JSON results document.
//!
//! The document is a single object keyed by benchmark name:
//!
//! ```text
//! {"reach-goal":{"name":"reach-goal","scene":"...","planner":"...",
//!   "options":{"runs":3,"metrics":["waypoints"]},
//!   "start":"...","finish":"...",
//!   "runs":[{"num":0,"time":0.0012,"success":true,"metrics":{"waypoints":4}}, ...]},
//!  "other": {...}}
//! ```

use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::BenchmarkOutputter;
use crate::error::BenchmarkError;
use crate::metric::MetricMap;
use crate::options::Options;
use crate::result::{Results, Run};

/// Serialized form of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub num: usize,
    pub time: f64,
    pub success: bool,
    pub metrics: MetricMap,
}

impl From<&Run> for RunRecord {
    fn from(run: &Run) -> Self {
        Self {
            num: run.num,
            time: run.time,
            success: run.success,
            metrics: run.metrics.clone(),
        }
    }
}

/// Serialized form of one benchmark's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub name: String,
    pub scene: String,
    pub planner: String,
    pub options: Options,
    pub start: DateTime<Utc>,
    pub finish: Option<DateTime<Utc>>,
    pub runs: Vec<RunRecord>,
}

impl From<&Results> for BenchmarkRecord {
    fn from(results: &Results) -> Self {
        Self {
            name: results.name().to_string(),
            scene: results.scene().name().to_string(),
            planner: results.planner().name().to_string(),
            options: *results.options(),
            start: results.start(),
            finish: results.finish(),
            runs: results.runs().iter().map(RunRecord::from).collect(),
        }
    }
}

/// Destination of the JSON document.
trait Sink: Write {
    /// Discards everything past the first `len` bytes; writing resumes there.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl Sink for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.seek(SeekFrom::Start(len))?;
        Ok(())
    }
}

/// Writes every benchmark of a session into one JSON document.
///
/// The file is truncated and opened on the first `dump_result`, stays open
/// across calls, and is closed with the trailing brace by [`close`] or on
/// drop. Each benchmark becomes one member of the top-level object.
///
/// An entry that fails to write is cut from the file again, so a later dump
/// continues a well-formed document. If the cut itself fails the outputter
/// closes and further dumps return [`BenchmarkError::Closed`].
///
/// [`close`]: JsonBenchmarkOutputter::close
pub struct JsonBenchmarkOutputter {
    path: PathBuf,
    sink: Option<Box<dyn Sink + Send>>,
    /// Length of the document up to the last complete entry.
    committed: u64,
    records: usize,
    closed: bool,
}

impl JsonBenchmarkOutputter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sink: None,
            committed: 0,
            records: 0,
            closed: false,
        }
    }

    #[cfg(test)]
    fn with_sink(path: impl Into<PathBuf>, sink: Box<dyn Sink + Send>) -> Self {
        let mut outputter = Self::new(path);
        outputter.sink = Some(sink);
        outputter
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of benchmarks written so far.
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Terminates the document and flushes it.
    ///
    /// Nothing is written if no benchmark was dumped. Further dumps fail
    /// with [`BenchmarkError::Closed`].
    pub fn close(&mut self) -> Result<(), BenchmarkError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if let Some(mut sink) = self.sink.take() {
            if self.records > 0 {
                sink.write_all(b"}\n")?;
                sink.flush()?;
            }
        }
        Ok(())
    }

    fn sink(&mut self) -> Result<&mut Box<dyn Sink + Send>, BenchmarkError> {
        if self.sink.is_none() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            self.sink = Some(Box::new(File::create(&self.path)?));
        }
        self.sink.as_mut().ok_or(BenchmarkError::Closed)
    }

    // Cuts a partially written entry back off the document.
    fn rollback(&mut self) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(err) = sink.truncate(self.committed) {
            error!(
                event = "output_failed",
                outputter = "json",
                path = %self.path.display(),
                error = %err,
                "Failed to discard partial JSON entry"
            );
            self.sink = None;
            self.closed = true;
        }
    }
}

impl BenchmarkOutputter for JsonBenchmarkOutputter {
    fn name(&self) -> &str {
        "json"
    }

    fn dump_result(&mut self, results: &Results) -> Result<(), BenchmarkError> {
        if self.closed {
            return Err(BenchmarkError::Closed);
        }

        // Encode fully before touching the file; the first entry opens the object.
        let mut entry = vec![if self.records == 0 { b'{' } else { b',' }];
        serde_json::to_writer(&mut entry, results.name())?;
        entry.push(b':');
        serde_json::to_writer(&mut entry, &BenchmarkRecord::from(results))?;

        let sink = self.sink()?;
        if let Err(err) = sink.write_all(&entry).and_then(|()| sink.flush()) {
            self.rollback();
            return Err(err.into());
        }
        self.committed += entry.len() as u64;
        self.records += 1;
        Ok(())
    }
}

impl Drop for JsonBenchmarkOutputter {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            error!(
                event = "output_failed",
                outputter = "json",
                path = %self.path.display(),
                error = %err,
                "Failed to finalize JSON results"
            );
        }
    }
}

/// Reads a finished JSON results document, keeping benchmark order.
pub fn read_json_dump(
    path: impl AsRef<Path>,
) -> Result<IndexMap<String, BenchmarkRecord>, BenchmarkError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
