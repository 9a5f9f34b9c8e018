//! Integration tests driving the `varthumb` binary.

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_varthumb"))
}

fn jpeg(color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(12, 12, Rgb(color));
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Jpeg).unwrap();
    buffer.into_inner()
}

fn write_var(path: &Path, scene: &str, thumbnail: Option<&[u8]>) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();

    zip.start_file(format!("Saves/scene/{}.json", scene), options).unwrap();
    zip.write_all(b"{}").unwrap();
    if let Some(data) = thumbnail {
        zip.start_file(format!("Saves/scene/{}.jpg", scene), options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

fn packages() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_var(&dir.path().join("alice.hub.var"), "intro", Some(&jpeg([220, 0, 0])));
    write_var(&dir.path().join("bob.hub.var"), "intro", Some(&jpeg([0, 0, 220])));
    dir
}

#[test]
fn test_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-montage"))
        .stdout(predicate::str::contains("--grid"));
}

#[test]
fn test_missing_source_is_a_startup_error() {
    let work = TempDir::new().unwrap();

    cli()
        .current_dir(work.path())
        .arg(work.path().join("nowhere"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid path"));
}

#[test]
fn test_generate_config() {
    let work = TempDir::new().unwrap();
    let config_path = work.path().join("custom.toml");

    cli()
        .arg("--generate-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration file"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[scan]"));
    assert!(content.contains("[montage]"));
}

#[test]
fn test_directory_run_without_montage() {
    let source = packages();
    let output = TempDir::new().unwrap();

    cli()
        .arg(source.path())
        .arg("--output")
        .arg(output.path())
        .arg("--no-montage")
        .arg("--output-format")
        .arg("plain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Thumbnails saved: 2"));

    assert_eq!(
        fs::read(output.path().join("alice.hub.jpg")).unwrap(),
        jpeg([220, 0, 0])
    );
    assert!(output.path().join("bob.hub.jpg").exists());
    assert!(!output.path().join("grid_alice.jpg").exists());
}

#[test]
fn test_directory_run_with_montage() {
    let source = packages();
    let output = TempDir::new().unwrap();

    cli()
        .arg(source.path())
        .arg("-o")
        .arg(output.path())
        .arg("--dpi")
        .arg("20")
        .arg("--output-format")
        .arg("plain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Montages created: 2"));

    assert!(output.path().join("grid_alice.jpg").exists());
    assert!(output.path().join("grid_bob.jpg").exists());
}

#[test]
fn test_single_file_run() {
    let source = packages();
    let output = TempDir::new().unwrap();

    cli()
        .arg(source.path().join("bob.hub.var"))
        .arg("-o")
        .arg(output.path())
        .arg("--output-format")
        .arg("plain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Thumbnail for bob.hub extracted"));

    let names: Vec<_> = fs::read_dir(output.path()).unwrap().collect();
    assert_eq!(names.len(), 1);
}

#[test]
fn test_missing_thumbnail_is_reported_not_fatal() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_var(&source.path().join("carol.empty.var"), "intro", None);

    cli()
        .arg(source.path())
        .arg("-o")
        .arg(output.path())
        .arg("--no-montage")
        .arg("--output-format")
        .arg("plain")
        .assert()
        .success()
        .stdout(predicate::str::contains("intro"));

    assert!(!output.path().join("carol.empty.jpg").exists());
}

#[test]
fn test_corrupt_archive_exits_with_issues() {
    let source = packages();
    let output = TempDir::new().unwrap();
    fs::write(source.path().join("broken.var"), b"not a zip").unwrap();

    cli()
        .arg(source.path())
        .arg("-o")
        .arg(output.path())
        .arg("--no-montage")
        .arg("--output-format")
        .arg("plain")
        .assert()
        .code(2);

    assert!(output.path().join("alice.hub.jpg").exists());
}

#[test]
fn test_json_output() {
    let source = packages();
    let output = TempDir::new().unwrap();

    cli()
        .arg(source.path())
        .arg("-o")
        .arg(output.path())
        .arg("--no-montage")
        .arg("--output-format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"event\":\"thumbnail_saved\""))
        .stdout(predicate::str::contains("\"thumbnails_written\": 2"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let source = packages();
    let output = TempDir::new().unwrap();
    let target = output.path().join("out");

    cli()
        .arg(source.path())
        .arg("-o")
        .arg(&target)
        .arg("--dry-run")
        .arg("--output-format")
        .arg("plain")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 archive(s) would be processed"));

    assert!(!target.exists());
}
