pub mod archive_scanner;
pub mod thumbnail_grouper;

pub use archive_scanner::{ArchiveScanner, ScanOutcome};
pub use thumbnail_grouper::{CreatorGroups, ThumbnailGrouper};
