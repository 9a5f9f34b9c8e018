use crate::extractor::Extraction;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Running tally of one invocation, printed at the end of a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub archives_found: usize,
    pub archives_processed: usize,
    pub thumbnails_written: usize,
    pub bytes_written: u64,
    pub montages: Vec<PathBuf>,
    pub creators: BTreeSet<String>,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl RunSummary {
    pub fn new(archives_found: usize) -> Self {
        Self {
            archives_found,
            archives_processed: 0,
            thumbnails_written: 0,
            bytes_written: 0,
            montages: Vec::new(),
            creators: BTreeSet::new(),
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn record_extraction(&mut self, extraction: &Extraction) {
        self.archives_processed += 1;
        self.thumbnails_written += extraction.thumbnails.len();
        self.bytes_written += extraction.bytes_written();
        self.current_file = extraction
            .archive
            .file_name()
            .map(|n| n.to_string_lossy().to_string());

        if let Some(ref creator) = extraction.creator {
            self.creators.insert(creator.clone());
        }
    }

    /// Counts an archive that was visited but could not be extracted.
    pub fn record_failure(&mut self, archive: &Path, message: &str) {
        self.archives_processed += 1;
        self.current_file = archive.file_name().map(|n| n.to_string_lossy().to_string());
        self.add_error(format!("{}: {}", archive.display(), message));
    }

    pub fn record_montage(&mut self, path: PathBuf) {
        self.montages.push(path);
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.archives_processed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.elapsed();
        let rate = self.archives_processed as f64 / elapsed.as_secs_f64();
        let remaining = self.archives_found.saturating_sub(self.archives_processed);

        if rate > 0.0 && rate.is_finite() {
            Duration::from_secs_f64(remaining as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}
