use crate::config::ScanConfig;
use crate::error::{Result, VarThumbError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Archives discovered under a root directory, plus the walk errors that
/// were skipped along the way.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub archives: Vec<PathBuf>,
    pub errors: Vec<String>,
}

pub struct ArchiveScanner {
    archive_suffix: String,
    follow_links: bool,
    max_depth: Option<usize>,
}

impl ArchiveScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            archive_suffix: config.archive_suffix(),
            follow_links: config.follow_links,
            max_depth: config.max_depth,
        }
    }

    pub fn is_archive_name(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.archive_suffix)
    }

    /// Recursively lists every regular file under `root` whose name ends in
    /// the archive suffix, in walk order.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<ScanOutcome> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(VarThumbError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(VarThumbError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut outcome = ScanOutcome::default();

        let mut walker = WalkDir::new(root_path).follow_links(self.follow_links);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // Unreadable subtrees are skipped, not fatal
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                    {
                        outcome.errors.push(format!("Permission denied: {}", err));
                    } else {
                        outcome.errors.push(format!("Scan error: {}", err));
                    }
                    log::warn!("Skipping entry during scan: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.is_archive_name(name));

            if matches {
                outcome.archives.push(entry.into_path());
            }
        }

        log::debug!(
            "Found {} archive(s) under {}",
            outcome.archives.len(),
            root_path.display()
        );

        Ok(outcome)
    }
}
