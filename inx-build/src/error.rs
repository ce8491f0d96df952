//! Error types for inx-build.

use std::path::PathBuf;

use thiserror::Error;

use inx_core::ConfigError;
use inx_renderer::{RenderError, TemplateError};

/// A generated file could not be written.
#[derive(Debug, Error)]
pub enum WriteError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The zip archive could not be assembled.
    #[error("failed to build archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// The host extensions directory could not be used.
#[derive(Debug, Error)]
pub enum InstallError {
    /// No explicit directory, no `INX_EXTENSIONS_DIR`, and no platform config dir.
    #[error("cannot determine the Inkscape extensions directory; pass --install-dir or set INX_EXTENSIONS_DIR")]
    NotResolved,

    /// The target exists but is not a directory.
    #[error("extensions path {path} is not a directory")]
    NotADirectory { path: PathBuf },

    /// The target directory cannot be created or written.
    #[error("extensions directory {path} is not writable: {source}")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying one file failed.
    #[error("failed to install {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// All errors that end a build before its primary output is complete.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Convenience constructor for [`WriteError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> WriteError {
    WriteError::Io {
        path: path.into(),
        source,
    }
}
