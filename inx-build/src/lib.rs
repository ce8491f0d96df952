//! # inx-build
//!
//! Atomic writer, archiver, and installer for rendered extensions.
//!
//! Call [`pipeline::build`] to render a configuration and write it to an
//! output directory, or [`pipeline::install`] to additionally copy the result
//! into Inkscape's extensions directory.

pub mod archive;
pub mod error;
pub mod install;
pub mod pipeline;
pub mod writer;

pub use archive::ArchiveMode;
pub use error::{BuildError, InstallError, WriteError};
pub use install::InstalledFiles;
pub use pipeline::{build, install, BuildOptions, BuildReport, InstallReport};
pub use writer::{write_all, WriteResult};
