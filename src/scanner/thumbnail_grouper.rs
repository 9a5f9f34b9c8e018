use crate::error::Result;
use crate::extractor::{CreatorKey, LeadingSegment};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Creator identifier to thumbnail file names, each list in directory order.
pub type CreatorGroups = BTreeMap<String, Vec<String>>;

/// Never grouped. Montages are written as `grid_<creator>.jpg`, so this only
/// guards against a file literally called `grid.jpg`.
pub const LEGACY_GRID_NAME: &str = "grid.jpg";

pub struct ThumbnailGrouper<K = LeadingSegment> {
    creator_key: K,
}

impl ThumbnailGrouper<LeadingSegment> {
    pub fn new() -> Self {
        Self {
            creator_key: LeadingSegment::default(),
        }
    }
}

impl Default for ThumbnailGrouper<LeadingSegment> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CreatorKey> ThumbnailGrouper<K> {
    pub fn with_creator_key(creator_key: K) -> Self {
        Self { creator_key }
    }

    pub fn is_thumbnail_name(file_name: &str) -> bool {
        file_name.to_lowercase().ends_with(".jpg") && file_name != LEGACY_GRID_NAME
    }

    /// Buckets the thumbnails directly inside `output_dir` by creator.
    pub fn group_by_creator(&self, output_dir: &Path) -> Result<CreatorGroups> {
        let mut groups = CreatorGroups::new();

        for entry in fs::read_dir(output_dir)? {
            let entry = entry?;

            if !entry.file_type()?.is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            if !Self::is_thumbnail_name(&file_name) {
                continue;
            }

            let creator = self.creator_key.creator_of(&file_name);
            groups.entry(creator).or_default().push(file_name);
        }

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"jpeg").unwrap();
        }
    }

    #[test]
    fn test_groups_by_leading_segment() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        touch(
            dir,
            &["alice.hub.jpg", "alice.look.JPG", "bob.hub.jpg", "grid.jpg", "notes.txt"],
        );
        fs::create_dir(dir.join("carol.jpg")).unwrap();

        let groups = ThumbnailGrouper::new().group_by_creator(dir).unwrap();

        assert_eq!(groups.len(), 2);
        let alice: BTreeSet<&str> = groups["alice"].iter().map(String::as_str).collect();
        assert_eq!(alice, BTreeSet::from(["alice.hub.jpg", "alice.look.JPG"]));
        assert_eq!(groups["bob"], vec!["bob.hub.jpg"]);
    }

    #[test]
    fn test_grouping_is_a_partition() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let names = ["a.1.jpg", "a.2.jpg", "b.jpg", "c.x.y.jpg", "grid_a.jpg", "solo"];
        touch(dir, &names);

        let groups = ThumbnailGrouper::new().group_by_creator(dir).unwrap();

        let mut all: Vec<&str> = groups.values().flatten().map(String::as_str).collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total, "a file landed in more than one group");

        let expected: Vec<&str> = {
            let mut v: Vec<&str> = names
                .iter()
                .copied()
                .filter(|n| ThumbnailGrouper::<LeadingSegment>::is_thumbnail_name(n))
                .collect();
            v.sort();
            v
        };
        assert_eq!(all, expected);
        assert!(groups.contains_key("grid_a"));
    }

    #[test]
    fn test_scene_named_files_degenerate_to_own_group() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), &["intro.jpg", "finale.jpg"]);

        let groups = ThumbnailGrouper::new().group_by_creator(temp_dir.path()).unwrap();

        assert_eq!(groups["intro"], vec!["intro.jpg"]);
        assert_eq!(groups["finale"], vec!["finale.jpg"]);
    }

    #[test]
    fn test_custom_creator_key() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), &["dave_pack1.jpg", "dave_pack2.jpg"]);

        let key = |name: &str| name.split('_').next().unwrap_or(name).to_string();
        let groups = ThumbnailGrouper::with_creator_key(key)
            .group_by_creator(temp_dir.path())
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups["dave"].len(), 2);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ThumbnailGrouper::new().group_by_creator(&temp_dir.path().join("nope"));
        assert!(result.is_err());
    }
}
