//! Progress reporting while classifying locality records
//!
//! The locality file is streamed, so its record count is unknown up front;
//! progress is shown as a spinner updated every `interval` records.

use crate::constants::RUNTIME_PROJECTION_SAMPLE;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Spinner plus runtime projection for the classification loop
#[derive(Debug)]
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    interval: usize,
    started: Instant,
    projected: bool,
}

impl ProgressReporter {
    /// Create a reporter; no spinner is drawn when `enabled` is false
    pub fn new(interval: usize, enabled: bool) -> Self {
        let progress_bar = enabled.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Classifying records...");
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });

        Self {
            progress_bar,
            interval: interval.max(1),
            started: Instant::now(),
            projected: false,
        }
    }

    /// Note that `records` lines have been parsed so far
    pub fn tick(&mut self, records: usize) {
        if !self.projected && records == RUNTIME_PROJECTION_SAMPLE {
            self.projected = true;
            info!(
                "{} records parsed; projected runtime per 10,000 records: {:.2} minutes",
                records,
                projected_minutes_per_10k(self.started.elapsed(), records)
            );
        }

        if records % self.interval == 0 {
            debug!("{} records parsed...", records);
            if let Some(ref pb) = self.progress_bar {
                pb.set_message(format!("{} records parsed...", records));
            }
        }
    }

    /// Stop the spinner with a completion message
    pub fn finish(&self, records: usize) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(format!("Classified {} records", records));
        }
    }
}

/// Extrapolate elapsed time for `records` to 10,000 records, in minutes
pub fn projected_minutes_per_10k(elapsed: Duration, records: usize) -> f64 {
    if records == 0 {
        return 0.0;
    }
    elapsed.as_secs_f64() * (10_000.0 / records as f64) / 60.0
}
