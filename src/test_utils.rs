//! Fixture helpers shared by the unit tests.

use image::{Rgb, RgbImage};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes a ZIP archive at `path` holding the given `(entry name, bytes)` pairs.
pub fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap();
}

/// Encodes a solid-colour JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Jpeg).unwrap();
    buffer.into_inner()
}

/// An archive with one scene `name` and its thumbnail.
pub fn write_scene_archive(path: &Path, scene: &str, thumbnail: &[u8]) {
    let json = format!("Saves/scene/{}.json", scene);
    let jpg = format!("Saves/scene/{}.jpg", scene);
    write_archive(path, &[(json.as_str(), b"{}"), (jpg.as_str(), thumbnail)]);
}

/// Rewrites the uncompressed size recorded for `entry` in the archive's
/// central directory, leaving the stored data untouched.
pub fn declare_entry_size(path: &Path, entry: &str, size: u32) {
    let mut bytes = std::fs::read(path).unwrap();
    let signature = [0x50, 0x4b, 0x01, 0x02];
    let mut patched = false;

    let mut offset = 0;
    while offset + 46 <= bytes.len() {
        if bytes[offset..offset + 4] != signature {
            offset += 1;
            continue;
        }
        let name_len = u16::from_le_bytes([bytes[offset + 28], bytes[offset + 29]]) as usize;
        let name = &bytes[offset + 46..offset + 46 + name_len];
        if name == entry.as_bytes() {
            bytes[offset + 24..offset + 28].copy_from_slice(&size.to_le_bytes());
            patched = true;
        }
        offset += 46 + name_len;
    }

    assert!(patched, "no central directory record for {}", entry);
    std::fs::write(path, bytes).unwrap();
}
