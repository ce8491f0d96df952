//! Reproducible `.zip` packaging of a rendered extension.
//!
//! Entries live under a top-level `<name>/` directory, sorted by path, with a
//! fixed timestamp (1980-01-01) and mode, so the same files always produce
//! the same bytes. Unpacking the archive into the extensions directory gives
//! the same layout as `inx install`.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use inx_renderer::RenderedFile;

use crate::error::WriteError;
use crate::writer::{atomic_write, WriteResult};

/// Whether and how a build is packaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveMode {
    /// Loose files only.
    #[default]
    None,
    /// Loose files plus an archive next to them.
    Alongside,
    /// Only the archive; no loose files are written.
    Only,
}

impl ArchiveMode {
    pub fn writes_loose_files(&self) -> bool {
        !matches!(self, ArchiveMode::Only)
    }

    pub fn writes_archive(&self) -> bool {
        !matches!(self, ArchiveMode::None)
    }
}

/// `spiral_gen` + `1.0.0` → `spiral_gen-1.0.0.zip`.
///
/// Characters of `version` outside `[A-Za-z0-9._+-]` become `_`.
pub fn archive_file_name(name: &str, version: &str) -> String {
    let version: String = version
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{name}-{version}.zip")
}

/// Entry name inside the archive: `<root>/<path>` with `/` separators.
fn entry_name(root: &str, path: &Path) -> String {
    let mut name = root.to_owned();
    for part in path.iter() {
        name.push('/');
        name.push_str(&part.to_string_lossy());
    }
    name
}

/// Deflated zip of `files`, each stored as `<root>/<path>`.
pub fn archive_bytes(root: &str, files: &[RenderedFile]) -> ZipResult<Vec<u8>> {
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut entries: Vec<(String, &[u8])> = files
        .iter()
        .map(|f| (entry_name(root, &f.path), f.contents.as_slice()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer.start_file(name, options)?;
        writer.write_all(contents)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Write the archive of `files` to `path` through the atomic writer.
pub fn write_archive(
    path: &Path,
    root: &str,
    files: &[RenderedFile],
    dry_run: bool,
) -> Result<WriteResult, WriteError> {
    let bytes = archive_bytes(root, files).map_err(|source| WriteError::Archive {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, &bytes, dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::path::PathBuf;
    use zip::ZipArchive;

    fn files() -> Vec<RenderedFile> {
        vec![
            RenderedFile {
                path: PathBuf::from("demo.py"),
                contents: b"print('hi')\n".to_vec(),
            },
            RenderedFile {
                path: PathBuf::from("demo.inx"),
                contents: b"<inkscape-extension/>\n".to_vec(),
            },
            RenderedFile {
                path: PathBuf::from("lib").join("util.py"),
                contents: b"pass\n".to_vec(),
            },
        ]
    }

    #[test]
    fn archive_is_byte_identical_across_runs() {
        let a = archive_bytes("demo", &files()).unwrap();
        let b = archive_bytes("demo", &files()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn entries_are_sorted_under_the_extension_directory() {
        let bytes = archive_bytes("demo", &files()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut seen = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            assert_eq!(entry.unix_mode().unwrap() & 0o777, 0o644);
            assert_eq!(entry.last_modified().year(), 1980);
            let mut body = String::new();
            entry.read_to_string(&mut body).unwrap();
            seen.push((entry.name().to_owned(), body));
        }
        let names: Vec<&str> = seen.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["demo/demo.inx", "demo/demo.py", "demo/lib/util.py"]);
        assert_eq!(seen[1].1, "print('hi')\n");
    }

    #[test]
    fn file_name_includes_version() {
        assert_eq!(archive_file_name("spiral_gen", "2.1.0"), "spiral_gen-2.1.0.zip");
        assert_eq!(archive_file_name("x", "1.0/beta"), "x-1.0_beta.zip");
    }
}
