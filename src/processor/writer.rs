//! Good/bad output streams
//!
//! Each classified record is written once, verbatim, to exactly one of the
//! two line-oriented outputs.

use crate::error::{CleanerError, Result};
use crate::models::{LocalityRecord, Verdict};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Buffered writers for the retained and excluded records
#[derive(Debug)]
pub struct OutputSink {
    good_path: PathBuf,
    bad_path: PathBuf,
    good: BufWriter<File>,
    bad: BufWriter<File>,
}

impl OutputSink {
    /// Create (or truncate) both output files
    pub async fn create(good_path: &Path, bad_path: &Path) -> Result<Self> {
        let good = File::create(good_path)
            .await
            .map_err(|e| CleanerError::file_access(good_path, e))?;
        let bad = File::create(bad_path)
            .await
            .map_err(|e| CleanerError::file_access(bad_path, e))?;

        Ok(Self {
            good_path: good_path.to_path_buf(),
            bad_path: bad_path.to_path_buf(),
            good: BufWriter::new(good),
            bad: BufWriter::new(bad),
        })
    }

    /// Route a record to the stream its verdict selects
    pub async fn write(&mut self, record: &LocalityRecord, verdict: &Verdict) -> Result<()> {
        let (writer, path) = if verdict.is_good() {
            (&mut self.good, &self.good_path)
        } else {
            (&mut self.bad, &self.bad_path)
        };

        writer
            .write_all(&record.line)
            .await
            .map_err(|e| CleanerError::file_access(path, e))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| CleanerError::file_access(path, e))?;
        Ok(())
    }

    /// Flush both streams
    pub async fn finish(mut self) -> Result<()> {
        self.good
            .flush()
            .await
            .map_err(|e| CleanerError::file_access(&self.good_path, e))?;
        self.bad
            .flush()
            .await
            .map_err(|e| CleanerError::file_access(&self.bad_path, e))?;
        Ok(())
    }
}
