use crate::error::{Result, VarThumbError};
use crate::extractor::naming::{sanitize_filename, CreatorKey, LeadingSegment, NamingPolicy};
use crate::status::{StatusEvent, StatusSink};
use filetime::FileTime;
use std::collections::HashSet;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Directory inside an archive holding scene definitions and their previews.
pub const SCENE_DIR: &str = "Saves/scene/";
pub const SCENE_SUFFIX: &str = ".json";
pub const THUMBNAIL_SUFFIX: &str = ".jpg";

/// Largest thumbnail entry that will be read (64 MiB).
pub const MAX_THUMBNAIL_SIZE: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedThumbnail {
    pub scene: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Result of examining one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub archive: PathBuf,
    pub thumbnails: Vec<ExtractedThumbnail>,
    /// Only set under [`NamingPolicy::ArchiveName`] once a thumbnail was written.
    pub creator: Option<String>,
}

impl Extraction {
    fn empty(archive: &Path) -> Self {
        Self {
            archive: archive.to_path_buf(),
            thumbnails: Vec::new(),
            creator: None,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.thumbnails.iter().map(|t| t.bytes).sum()
    }
}

pub struct ArchiveExtractor<K = LeadingSegment> {
    archive_suffix: String,
    naming: NamingPolicy,
    creator_key: K,
    preserve_mtime: bool,
}

impl ArchiveExtractor<LeadingSegment> {
    pub fn new() -> Self {
        Self {
            archive_suffix: ".var".to_string(),
            naming: NamingPolicy::default(),
            creator_key: LeadingSegment::default(),
            preserve_mtime: false,
        }
    }
}

impl Default for ArchiveExtractor<LeadingSegment> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CreatorKey> ArchiveExtractor<K> {
    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_archive_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.archive_suffix = suffix.into();
        self
    }

    pub fn with_preserve_mtime(mut self, preserve: bool) -> Self {
        self.preserve_mtime = preserve;
        self
    }

    pub fn with_creator_key<K2: CreatorKey>(self, creator_key: K2) -> ArchiveExtractor<K2> {
        ArchiveExtractor {
            archive_suffix: self.archive_suffix,
            naming: self.naming,
            creator_key,
            preserve_mtime: self.preserve_mtime,
        }
    }

    pub fn is_archive(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(&self.archive_suffix))
    }

    /// Copies the preview image(s) of `archive_path` into `output_dir`.
    ///
    /// Soft failures (wrong extension, no scenes, missing thumbnail) are
    /// reported through `sink` and yield an `Ok` extraction with nothing
    /// written. Unreadable archives and write failures are returned as errors.
    pub fn extract(
        &self,
        archive_path: &Path,
        output_dir: &Path,
        sink: &mut dyn StatusSink,
    ) -> Result<Extraction> {
        let mut extraction = Extraction::empty(archive_path);

        if !self.is_archive(archive_path) {
            sink.emit(StatusEvent::NotAnArchive {
                path: archive_path.to_path_buf(),
            });
            return Ok(extraction);
        }

        let archive_name = archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let file = fs::File::open(archive_path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        let entry_names: Vec<String> = archive.file_names().map(String::from).collect();
        let available: HashSet<&str> = entry_names.iter().map(String::as_str).collect();
        let scenes = scene_entries(&entry_names);

        if scenes.is_empty() {
            sink.emit(StatusEvent::NoSceneFiles {
                archive: archive_path.to_path_buf(),
            });
            return Ok(extraction);
        }

        for scene_entry in scenes {
            let scene_name = entry_stem(scene_entry);
            let thumbnail_entry = thumbnail_entry_for(&scene_name);

            if !available.contains(thumbnail_entry.as_str()) {
                sink.emit(StatusEvent::NoThumbnailForScene {
                    scene: scene_name,
                    archive: archive_path.to_path_buf(),
                });
                continue;
            }

            let data = read_entry(&mut archive, &thumbnail_entry)?;

            fs::create_dir_all(output_dir)?;

            let label = self.naming.output_stem(&archive_name, &scene_name).to_string();
            let dest = output_dir.join(format!("{}{}", sanitize_filename(&label), THUMBNAIL_SUFFIX));
            fs::write(&dest, &data)?;

            if self.preserve_mtime {
                self.copy_mtime(archive_path, &dest);
            }

            sink.emit(StatusEvent::ThumbnailSaved {
                name: label,
                path: dest.clone(),
            });

            extraction.thumbnails.push(ExtractedThumbnail {
                scene: scene_name,
                path: dest,
                bytes: data.len() as u64,
            });

            if self.naming.stops_at_first_match() {
                extraction.creator = Some(self.creator_key.creator_of(&archive_name));
                return Ok(extraction);
            }
        }

        Ok(extraction)
    }

    fn copy_mtime(&self, source: &Path, dest: &Path) {
        if let Ok(metadata) = fs::metadata(source) {
            let mtime = FileTime::from_last_modification_time(&metadata);
            if let Err(e) = filetime::set_file_mtime(dest, mtime) {
                log::debug!("Could not set modification time on {}: {}", dest.display(), e);
            }
        }
    }
}

/// Entries under [`SCENE_DIR`] ending in [`SCENE_SUFFIX`], in archive order.
pub fn scene_entries(entry_names: &[String]) -> Vec<&str> {
    entry_names
        .iter()
        .map(String::as_str)
        .filter(|name| name.starts_with(SCENE_DIR) && name.ends_with(SCENE_SUFFIX))
        .collect()
}

/// Final path component of an archive entry without its extension.
fn entry_stem(entry: &str) -> String {
    Path::new(entry)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn thumbnail_entry_for(scene_name: &str) -> String {
    format!("{}{}{}", SCENE_DIR, scene_name, THUMBNAIL_SUFFIX)
}

fn read_entry<R: std::io::Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>> {
    let entry = archive.by_name(name)?;

    // Declared sizes come from the archive itself and may be bogus
    let declared = entry.size();
    if declared > MAX_THUMBNAIL_SIZE {
        return Err(VarThumbError::EntryTooLarge {
            entry: name.to_string(),
            size: declared,
            limit: MAX_THUMBNAIL_SIZE,
        });
    }

    let mut data = Vec::with_capacity(declared as usize);
    let read = entry.take(MAX_THUMBNAIL_SIZE + 1).read_to_end(&mut data)? as u64;
    if read > MAX_THUMBNAIL_SIZE {
        return Err(VarThumbError::EntryTooLarge {
            entry: name.to_string(),
            size: read,
            limit: MAX_THUMBNAIL_SIZE,
        });
    }

    Ok(data)
}
