pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod montage;
pub mod scanner;
pub mod status;
pub mod ui;

#[cfg(test)]
mod test_utils;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ExtractConfig, GroupingConfig, MontageConfig, ScanConfig};
pub use error::{Result, UserFriendlyError, VarThumbError};
pub use status::{Severity, StatusEvent, StatusSink};

// Core functionality re-exports
pub use extractor::{
    ArchiveExtractor, CreatorKey, ExtractedThumbnail, Extraction, LeadingSegment, NamingPolicy,
    RunSummary,
};
pub use montage::{GridSize, MontageBuilder, MontageLayout};
pub use scanner::{ArchiveScanner, CreatorGroups, ScanOutcome, ThumbnailGrouper};
pub use ui::{FormatterSink, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// What the user pointed the tool at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    SingleFile(PathBuf),
    Directory(PathBuf),
}

impl Source {
    /// Classifies an existing path. Anything that is not a directory is
    /// treated as a single archive.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|_| VarThumbError::InvalidPath {
            path: path.display().to_string(),
        })?;

        if metadata.is_dir() {
            Ok(Source::Directory(path.to_path_buf()))
        } else {
            Ok(Source::SingleFile(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Source::SingleFile(path) | Source::Directory(path) => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Source::Directory(_))
    }
}

/// Main library interface: extraction followed by per-creator montages
pub struct VarThumb {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl VarThumb {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let show_progress = !quiet && output_mode == OutputMode::Human;
        let progress_manager = ProgressManager::new(show_progress);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create a VarThumb instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet))
    }

    fn archive_extractor(&self) -> ArchiveExtractor {
        ArchiveExtractor::new()
            .with_archive_suffix(self.config.scan.archive_suffix())
            .with_naming(self.config.extract.naming)
            .with_preserve_mtime(self.config.extract.preserve_mtime)
            .with_creator_key(LeadingSegment::new(self.config.grouping.separator_char()))
    }

    fn thumbnail_grouper(&self) -> ThumbnailGrouper {
        ThumbnailGrouper::with_creator_key(LeadingSegment::new(
            self.config.grouping.separator_char(),
        ))
    }

    /// The archives a run over `source` would hand to the extractor.
    pub fn plan(&self, source: &Source) -> Result<ScanOutcome> {
        match source {
            Source::SingleFile(path) => Ok(ScanOutcome {
                archives: vec![path.clone()],
                errors: Vec::new(),
            }),
            Source::Directory(root) => ArchiveScanner::new(&self.config.scan).scan_directory(root),
        }
    }

    /// Processes `source` into `output_dir`, reporting every outcome through
    /// `sink`. Per-archive and per-montage failures are reported and recorded
    /// in the summary; they never end the run early.
    pub fn run(
        &self,
        source: &Source,
        output_dir: &Path,
        grid: Option<GridSize>,
        sink: &mut dyn StatusSink,
    ) -> Result<RunSummary> {
        match source {
            Source::SingleFile(path) => Ok(self.extract_single(path, output_dir, sink)),
            Source::Directory(root) => {
                let mut summary = self.walk_and_extract(root, output_dir, sink)?;
                if self.config.montage.enabled {
                    self.build_montages(output_dir, grid, &mut summary, sink);
                }
                Ok(summary)
            }
        }
    }

    /// Runs against the formatter, with the progress bar in directory mode.
    pub fn run_with_output(
        &self,
        source: &Source,
        output_dir: &Path,
        grid: Option<GridSize>,
    ) -> Result<RunSummary> {
        self.output_formatter.start_operation(&format!(
            "Extracting thumbnails from {}",
            source.path().display()
        ));

        let mut sink = FormatterSink::new(&self.output_formatter, Some(&self.progress_manager));
        let summary = self.run(source, output_dir, grid, &mut sink)?;
        self.progress_manager.clear();

        self.output_formatter.print_run_summary(&summary);
        Ok(summary)
    }

    fn extract_single(
        &self,
        archive: &Path,
        output_dir: &Path,
        sink: &mut dyn StatusSink,
    ) -> RunSummary {
        let mut summary = RunSummary::new(1);
        self.extract_one(&self.archive_extractor(), archive, output_dir, &mut summary, sink);
        summary
    }

    fn walk_and_extract(
        &self,
        root: &Path,
        output_dir: &Path,
        sink: &mut dyn StatusSink,
    ) -> Result<RunSummary> {
        let outcome = ArchiveScanner::new(&self.config.scan).scan_directory(root)?;
        let mut summary = RunSummary::new(outcome.archives.len());
        for error in outcome.errors {
            summary.add_error(error);
        }

        log::info!(
            "Found {} archive(s) under {}",
            outcome.archives.len(),
            root.display()
        );

        let extractor = self.archive_extractor();
        let progress = self
            .progress_manager
            .create_archive_progress(outcome.archives.len() as u64);

        for archive in &outcome.archives {
            sink.emit(StatusEvent::ProcessingArchive {
                archive: archive.clone(),
            });
            self.extract_one(&extractor, archive, output_dir, &mut summary, sink);
            ui::progress::update_archive_progress(&progress, &summary);
        }

        ui::progress::finish_progress_with_summary(
            &progress,
            &format!("Processed {} archives", summary.archives_processed),
            summary.elapsed(),
        );

        Ok(summary)
    }

    fn extract_one(
        &self,
        extractor: &ArchiveExtractor,
        archive: &Path,
        output_dir: &Path,
        summary: &mut RunSummary,
        sink: &mut dyn StatusSink,
    ) {
        match extractor.extract(archive, output_dir, sink) {
            Ok(extraction) => summary.record_extraction(&extraction),
            Err(e) => {
                log::debug!("Extraction of {} failed: {:?}", archive.display(), e);
                let message = e.to_string();
                summary.record_failure(archive, &message);
                sink.emit(StatusEvent::ArchiveFailed {
                    archive: archive.to_path_buf(),
                    message,
                });
            }
        }
    }

    fn build_montages(
        &self,
        output_dir: &Path,
        grid: Option<GridSize>,
        summary: &mut RunSummary,
        sink: &mut dyn StatusSink,
    ) {
        if !output_dir.is_dir() {
            log::debug!(
                "Output directory {} was never created; no montages to build",
                output_dir.display()
            );
            return;
        }

        let groups = match self.thumbnail_grouper().group_by_creator(output_dir) {
            Ok(groups) => groups,
            Err(e) => {
                summary.add_error(format!("Grouping thumbnails failed: {}", e));
                return;
            }
        };

        let builder = match MontageBuilder::new(&self.config.montage) {
            Ok(builder) => builder,
            Err(e) => {
                summary.add_error(e.to_string());
                for creator in groups.keys() {
                    sink.emit(StatusEvent::MontageFailed {
                        creator: creator.clone(),
                        message: e.to_string(),
                    });
                }
                return;
            }
        };

        let spinner = self.progress_manager.create_spinner("Building montages");
        for (creator, files) in &groups {
            spinner.set_message(format!("Building montage for {}", creator));
            match builder.build(output_dir, files, creator, grid, sink) {
                Ok(Some(path)) => summary.record_montage(path),
                Ok(None) => {}
                Err(e) => {
                    summary.add_error(format!("Montage for {}: {}", creator, e));
                    sink.emit(StatusEvent::MontageFailed {
                        creator: creator.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        spinner.finish_and_clear();
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &VarThumbError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
