//! Atomic writer for rendered files.
//!
//! ## `atomic_write` protocol
//!
//! 1. Compare with the bytes already on disk → skip if identical.
//! 2. In dry-run mode, report and stop.
//! 3. Create parent directories.
//! 4. Write to `<path>.inx.tmp`.
//! 5. Rename to the final path (atomic on POSIX).

use std::path::{Path, PathBuf};

use inx_renderer::RenderedFile;

use crate::error::{io_err, WriteError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped: existing content is byte-identical.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Atomically write `contents` to `path`.
pub(crate) fn atomic_write(
    path: &Path,
    contents: &[u8],
    dry_run: bool,
) -> Result<WriteResult, WriteError> {
    // Unreadable or missing targets fall through to the write, which reports them.
    if let Ok(existing) = std::fs::read(path) {
        if existing == contents {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = PathBuf::from(format!("{}.inx.tmp", path.display()));
    std::fs::write(&tmp, contents).map_err(|e| io_err(&tmp, e))?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// write_all
// ---------------------------------------------------------------------------

/// Write every file under `dest`, in order.
///
/// Stops at the first failure; files written before it stay on disk.
pub fn write_all(
    dest: &Path,
    files: &[RenderedFile],
    dry_run: bool,
) -> Result<Vec<WriteResult>, WriteError> {
    files
        .iter()
        .map(|file| atomic_write(&dest.join(&file.path), &file.contents, dry_run))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
