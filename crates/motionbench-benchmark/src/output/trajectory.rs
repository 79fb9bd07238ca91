//! Trajectory archive.
//!
//! Archive format:
//! - Magic: `MBTRAJAR` (8 bytes)
//! - Version: u16 (little-endian)
//! - Codec length: u8
//! - Codec: "cbor-v1"
//! - Records, each a u32 (little-endian) length followed by a CBOR
//!   [`ArchiveRecord`]
//!
//! Records are grouped into topics named after the benchmark; the sequence
//! number is the run index.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use motionbench_core::RobotTrajectory;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::BenchmarkOutputter;
use crate::error::BenchmarkError;
use crate::result::Results;

/// Magic bytes at start of archive
pub const ARCHIVE_MAGIC: &[u8; 8] = b"MBTRAJAR";

/// Current archive format version
pub const ARCHIVE_VERSION: u16 = 1;

/// Codec identifier
pub const ARCHIVE_CODEC: &str = "cbor-v1";

/// One archived trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    /// Benchmark name.
    pub topic: String,
    /// Run index within the benchmark.
    pub sequence: u64,
    pub message: RobotTrajectory,
}

fn encode_header() -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + 2 + 1 + ARCHIVE_CODEC.len());
    buf.extend_from_slice(ARCHIVE_MAGIC);
    buf.extend_from_slice(&ARCHIVE_VERSION.to_le_bytes());
    let codec_bytes = ARCHIVE_CODEC.as_bytes();
    buf.push(codec_bytes.len() as u8);
    buf.extend_from_slice(codec_bytes);
    buf
}

fn encode_record(record: &ArchiveRecord, buf: &mut Vec<u8>) -> Result<(), BenchmarkError> {
    let mut payload = Vec::new();
    ciborium::into_writer(record, &mut payload)
        .map_err(|e| BenchmarkError::Archive(format!("Failed to encode record: {}", e)))?;
    let len = u32::try_from(payload.len())
        .map_err(|_| BenchmarkError::Archive("Record exceeds 4 GiB".to_string()))?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(&payload);
    Ok(())
}

/// Stores every planned trajectory of a session in one archive file.
///
/// The archive is created on the first `dump_result` and shared by every
/// later call. Runs without a stored path (failed runs, or runs benchmarked
/// without [`RunMetrics::PATH`](crate::RunMetrics::PATH)) are skipped.
pub struct TrajectoryBenchmarkOutputter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    written: usize,
    closed: bool,
}

impl TrajectoryBenchmarkOutputter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            written: 0,
            closed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of trajectories written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and closes the archive.
    pub fn close(&mut self) -> Result<(), BenchmarkError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>, BenchmarkError> {
        if self.writer.is_none() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut writer = BufWriter::new(File::create(&self.path)?);
            writer.write_all(&encode_header())?;
            self.writer = Some(writer);
        }
        self.writer.as_mut().ok_or(BenchmarkError::Closed)
    }
}

impl BenchmarkOutputter for TrajectoryBenchmarkOutputter {
    fn name(&self) -> &str {
        "trajectory"
    }

    fn dump_result(&mut self, results: &Results) -> Result<(), BenchmarkError> {
        if self.closed {
            return Err(BenchmarkError::Closed);
        }

        let mut buf = Vec::new();
        let mut count = 0;
        for run in results.runs() {
            let Some(path) = &run.path else {
                continue;
            };
            let record = ArchiveRecord {
                topic: results.name().to_string(),
                sequence: run.num as u64,
                message: path.clone(),
            };
            encode_record(&record, &mut buf)?;
            count += 1;
        }

        let writer = self.writer()?;
        writer.write_all(&buf)?;
        writer.flush()?;
        self.written += count;
        Ok(())
    }
}

impl Drop for TrajectoryBenchmarkOutputter {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            error!(
                event = "output_failed",
                outputter = "trajectory",
                path = %self.path.display(),
                error = %err,
                "Failed to finalize trajectory archive"
            );
        }
    }
}

/// A trajectory archive read back into memory.
///
/// # Example
///
/// ```no_run
/// use motionbench_benchmark::TrajectoryArchive;
///
/// let archive = TrajectoryArchive::open("trajectories.mbt").unwrap();
/// for topic in archive.topics() {
///     println!("{}: {} trajectories", topic, archive.messages(topic).count());
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryArchive {
    records: Vec<ArchiveRecord>,
}

impl TrajectoryArchive {
    /// Reads an archive file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BenchmarkError> {
        let data = fs::read(path)?;
        Self::decode(&data)
    }

    /// Decodes archive bytes.
    pub fn decode(data: &[u8]) -> Result<Self, BenchmarkError> {
        if data.len() < 8 + 2 + 1 {
            return Err(BenchmarkError::InvalidArchive("Archive too small".to_string()));
        }
        if &data[0..8] != ARCHIVE_MAGIC {
            return Err(BenchmarkError::InvalidArchive("Invalid magic bytes".to_string()));
        }

        let version = u16::from_le_bytes([data[8], data[9]]);
        if version != ARCHIVE_VERSION {
            return Err(BenchmarkError::InvalidArchive(format!(
                "Unsupported archive version: {}",
                version
            )));
        }

        let codec_len = data[10] as usize;
        if data.len() < 11 + codec_len {
            return Err(BenchmarkError::InvalidArchive(
                "Archive truncated at codec".to_string(),
            ));
        }
        let codec = std::str::from_utf8(&data[11..11 + codec_len])
            .map_err(|_| BenchmarkError::InvalidArchive("Invalid codec string".to_string()))?;
        if codec != ARCHIVE_CODEC {
            return Err(BenchmarkError::InvalidArchive(format!(
                "Unsupported codec: {}",
                codec
            )));
        }

        let mut records = Vec::new();
        let mut offset = 11 + codec_len;
        while offset < data.len() {
            if data.len() - offset < 4 {
                return Err(BenchmarkError::InvalidArchive(
                    "Archive truncated at record length".to_string(),
                ));
            }
            let len = u32::from_le_bytes([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ]) as usize;
            offset += 4;
            if data.len() - offset < len {
                return Err(BenchmarkError::InvalidArchive(
                    "Archive truncated in record".to_string(),
                ));
            }
            let record: ArchiveRecord = ciborium::from_reader(&data[offset..offset + len])
                .map_err(|e| BenchmarkError::Archive(format!("Failed to decode record: {}", e)))?;
            records.push(record);
            offset += len;
        }

        Ok(Self { records })
    }

    /// All records in write order.
    pub fn records(&self) -> &[ArchiveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct topics, in first-seen order.
    pub fn topics(&self) -> Vec<&str> {
        let mut topics: Vec<&str> = Vec::new();
        for record in &self.records {
            if !topics.contains(&record.topic.as_str()) {
                topics.push(&record.topic);
            }
        }
        topics
    }

    /// Trajectories stored under `topic`, in write order.
    pub fn messages<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a RobotTrajectory> + 'a {
        self.records
            .iter()
            .filter(move |r| r.topic == topic)
            .map(|r| &r.message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::options::{Options, RunMetrics};
    use crate::result::Run;
    use motionbench_core::PlanResponse;
    use motionbench_test::planner::interpolate;
    use motionbench_test::{corner_scene, reach_goal_request, LinearPlanner};

    fn unfinished(name: &str, waypoints: &[usize]) -> Results {
        let request = reach_goal_request();
        let mut results = Results::new(
            name,
            Arc::new(corner_scene()),
            Arc::new(LinearPlanner::new("linear", 3)),
            Arc::new(request.clone()),
            Options::new().with_runs(waypoints.len()).with_metrics(RunMetrics::ALL),
        );
        for (i, n) in waypoints.iter().enumerate() {
            results
                .record_run(i, 0.01, &PlanResponse::success(interpolate(&request, *n)))
                .unwrap();
        }
        results
    }

    fn results(name: &str, waypoints: &[usize]) -> Results {
        let mut results = unfinished(name, waypoints);
        results.mark_finished();
        results
    }

    #[test]
    fn test_archive_topics_per_benchmark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paths.mbt");

        let mut outputter = TrajectoryBenchmarkOutputter::new(&path);
        outputter.dump_result(&results("first", &[3, 4])).unwrap();
        outputter.dump_result(&results("second", &[5])).unwrap();
        assert_eq!(outputter.written(), 3);
        outputter.close().unwrap();

        let archive = TrajectoryArchive::open(&path).unwrap();
        assert_eq!(archive.len(), 3);
        assert_eq!(archive.topics(), vec!["first", "second"]);

        let counts: Vec<usize> = archive.messages("first").map(|t| t.waypoint_count()).collect();
        assert_eq!(counts, vec![3, 4]);
        assert_eq!(archive.messages("second").count(), 1);
        assert_eq!(archive.records()[1].sequence, 1);
    }

    #[test]
    fn test_runs_without_path_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paths.mbt");

        let mut results = unfinished("mixed", &[3]);
        results.add_run(Run::new(1, 0.2, false)).unwrap();
        results.mark_finished();

        let mut outputter = TrajectoryBenchmarkOutputter::new(&path);
        outputter.dump_result(&results).unwrap();
        drop(outputter);

        let archive = TrajectoryArchive::open(&path).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.records()[0].sequence, 0);
    }

    #[test]
    fn test_empty_archive_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paths.mbt");

        let mut outputter = TrajectoryBenchmarkOutputter::new(&path);
        outputter.dump_result(&results("none", &[])).unwrap();
        drop(outputter);

        let data = fs::read(&path).unwrap();
        assert_eq!(data, encode_header());
        assert!(TrajectoryArchive::decode(&data).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut data = encode_header();
        data[0] = b'X';
        assert!(matches!(
            TrajectoryArchive::decode(&data),
            Err(BenchmarkError::InvalidArchive(_))
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_record() {
        let mut data = encode_header();
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 10]);
        assert!(matches!(
            TrajectoryArchive::decode(&data),
            Err(BenchmarkError::InvalidArchive(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut data = encode_header();
        data[8] = 9;
        let err = TrajectoryArchive::decode(&data).unwrap_err();
        assert!(err.to_string().contains("version"));
    }
}
