//! Status events emitted by the core.
//!
//! Extraction and montage code never prints. Every noteworthy outcome is
//! turned into a [`StatusEvent`] and handed to a [`StatusSink`], which the
//! presentation layer implements however it likes.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    ProcessingArchive { archive: PathBuf },
    NotAnArchive { path: PathBuf },
    NoSceneFiles { archive: PathBuf },
    NoThumbnailForScene { scene: String, archive: PathBuf },
    ThumbnailSaved { name: String, path: PathBuf },
    ArchiveFailed { archive: PathBuf, message: String },
    NoImagesForCreator { creator: String },
    MontageSaved { creator: String, path: PathBuf },
    MontageFailed { creator: String, message: String },
}

impl StatusEvent {
    pub fn severity(&self) -> Severity {
        match self {
            StatusEvent::ProcessingArchive { .. } => Severity::Info,
            StatusEvent::ThumbnailSaved { .. } | StatusEvent::MontageSaved { .. } => {
                Severity::Success
            }
            StatusEvent::NotAnArchive { .. }
            | StatusEvent::NoSceneFiles { .. }
            | StatusEvent::NoThumbnailForScene { .. }
            | StatusEvent::NoImagesForCreator { .. } => Severity::Warning,
            StatusEvent::ArchiveFailed { .. } | StatusEvent::MontageFailed { .. } => {
                Severity::Error
            }
        }
    }

    /// Short machine-friendly tag, used by the JSON output mode.
    pub fn kind(&self) -> &'static str {
        match self {
            StatusEvent::ProcessingArchive { .. } => "processing_archive",
            StatusEvent::NotAnArchive { .. } => "not_an_archive",
            StatusEvent::NoSceneFiles { .. } => "no_scene_files",
            StatusEvent::NoThumbnailForScene { .. } => "no_thumbnail_for_scene",
            StatusEvent::ThumbnailSaved { .. } => "thumbnail_saved",
            StatusEvent::ArchiveFailed { .. } => "archive_failed",
            StatusEvent::NoImagesForCreator { .. } => "no_images_for_creator",
            StatusEvent::MontageSaved { .. } => "montage_saved",
            StatusEvent::MontageFailed { .. } => "montage_failed",
        }
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::ProcessingArchive { archive } => {
                write!(f, "Processing file: {}", archive.display())
            }
            StatusEvent::NotAnArchive { path } => {
                write!(f, "{} is not a valid archive", path.display())
            }
            StatusEvent::NoSceneFiles { archive } => {
                write!(f, "No scene files found in {}", archive.display())
            }
            StatusEvent::NoThumbnailForScene { scene, archive } => write!(
                f,
                "No thumbnail found for scene {} in {}",
                scene,
                archive.display()
            ),
            StatusEvent::ThumbnailSaved { name, path } => write!(
                f,
                "Thumbnail for {} extracted and saved as: {}",
                name,
                path.display()
            ),
            StatusEvent::ArchiveFailed { archive, message } => {
                write!(f, "Failed to process {}: {}", archive.display(), message)
            }
            StatusEvent::NoImagesForCreator { creator } => {
                write!(f, "No images found for creator {}", creator)
            }
            StatusEvent::MontageSaved { creator, path } => write!(
                f,
                "Image grid for {} created and saved as: {}",
                creator,
                path.display()
            ),
            StatusEvent::MontageFailed { creator, message } => {
                write!(f, "Failed to build image grid for {}: {}", creator, message)
            }
        }
    }
}

/// Receiver of status events.
pub trait StatusSink {
    fn emit(&mut self, event: StatusEvent);
}

impl StatusSink for Vec<StatusEvent> {
    fn emit(&mut self, event: StatusEvent) {
        self.push(event);
    }
}

impl<F> StatusSink for F
where
    F: FnMut(StatusEvent),
{
    fn emit(&mut self, event: StatusEvent) {
        self(event)
    }
}
