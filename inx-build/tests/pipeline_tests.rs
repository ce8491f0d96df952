//! End-to-end pipeline: configuration → files on disk → archive → install.

use assert_fs::prelude::*;
use inx_build::{build, install, ArchiveMode, BuildError, BuildOptions, InstallError, WriteResult};
use inx_core::config::{self, Format};
use inx_core::ExtensionConfig;
use predicates::prelude::*;
use std::path::Path;

const SPIRAL: &str = r#"
name: spiral_gen
type: render
parameters:
  - { name: turns, kind: integer, default: 5, min: 1, max: 50, label: Turns }
metadata:
  author: Jane Doe
  version: 1.0.0
  description: Draws a spiral
"#;

fn spiral() -> ExtensionConfig {
    config::from_str(SPIRAL, Format::Yaml, Path::new("spiral.yaml")).expect("valid")
}

fn options(dir: &Path) -> BuildOptions {
    BuildOptions {
        output_dir: dir.to_path_buf(),
        ..BuildOptions::default()
    }
}

#[test]
fn spiral_gen_is_written_to_disk() {
    let out = assert_fs::TempDir::new().unwrap();
    let report = build(&spiral(), &options(out.path())).unwrap();

    assert_eq!(report.writes.len(), 3);
    assert!(report
        .writes
        .iter()
        .all(|w| matches!(w, WriteResult::Written { .. })));

    out.child("spiral_gen.py").assert(predicate::path::is_file());
    out.child("README.md").assert(predicate::path::is_file());
    out.child("spiral_gen.inx")
        .assert(predicate::str::contains(r#"name="turns" type="int" min="1" max="50""#))
        .assert(predicate::str::contains(">5</param>"));
    out.child("extension.json").assert(predicate::path::missing());
}

#[test]
fn dry_run_reports_without_writing() {
    let out = assert_fs::TempDir::new().unwrap();
    let dest = out.child("nested");
    let opts = BuildOptions {
        dry_run: true,
        archive: ArchiveMode::Alongside,
        save_config: true,
        ..options(dest.path())
    };
    let report = build(&spiral(), &opts).unwrap();
    assert!(report
        .writes
        .iter()
        .all(|w| matches!(w, WriteResult::WouldWrite { .. })));
    assert!(matches!(report.archive, Some(WriteResult::WouldWrite { .. })));
    assert!(matches!(report.snapshot, Some(WriteResult::WouldWrite { .. })));
    dest.assert(predicate::path::missing());
}

#[test]
fn archives_are_reproducible() {
    let a = assert_fs::TempDir::new().unwrap();
    let b = assert_fs::TempDir::new().unwrap();
    for dir in [&a, &b] {
        let opts = BuildOptions {
            archive: ArchiveMode::Only,
            ..options(dir.path())
        };
        build(&spiral(), &opts).unwrap();
    }
    let name = "spiral_gen-1.0.0.zip";
    let first = std::fs::read(a.path().join(name)).unwrap();
    let second = std::fs::read(b.path().join(name)).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with(b"PK\x03\x04"), "not a zip archive");
}

#[test]
fn custom_category_without_directory_fails_before_writing() {
    let out = assert_fs::TempDir::new().unwrap();
    let cfg = config::from_str("name: fancy\ntype: custom\n", Format::Yaml, Path::new("f.yaml"))
        .unwrap();
    let err = build(&cfg, &options(out.path())).unwrap_err();
    assert!(matches!(err, BuildError::Template(_)), "got: {err}");
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn install_copies_into_named_directory() {
    let out = assert_fs::TempDir::new().unwrap();
    let ext = assert_fs::TempDir::new().unwrap();
    let report = install(&spiral(), &options(out.path()), Some(ext.path())).unwrap();

    let installed = report.install.expect("install succeeds");
    assert_eq!(installed.dir, ext.path().join("spiral_gen"));
    assert_eq!(installed.files.len(), 3);
    ext.child("spiral_gen/spiral_gen.inx")
        .assert(predicate::str::contains("<inkscape-extension"));
}

#[test]
fn failed_install_keeps_primary_output() {
    let out = assert_fs::TempDir::new().unwrap();
    let scratch = assert_fs::TempDir::new().unwrap();
    let blocker = scratch.child("extensions");
    blocker.write_str("a file, not a directory").unwrap();

    let report = install(&spiral(), &options(out.path()), Some(blocker.path())).unwrap();

    out.child("spiral_gen.py").assert(predicate::path::is_file());
    out.child("spiral_gen.inx").assert(predicate::path::is_file());
    out.child("README.md").assert(predicate::path::is_file());
    let err = report.install.unwrap_err();
    assert!(matches!(err, InstallError::NotADirectory { .. }), "got: {err}");
}
