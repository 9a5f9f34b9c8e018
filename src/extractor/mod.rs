pub mod archive_extractor;
pub mod naming;
pub mod summary;

pub use archive_extractor::{ArchiveExtractor, ExtractedThumbnail, Extraction};
pub use naming::{CreatorKey, LeadingSegment, NamingPolicy};
pub use summary::RunSummary;
