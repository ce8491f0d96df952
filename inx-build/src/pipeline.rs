//! Shared build pipeline used by every CLI command.
//!
//! One linear pass: resolve templates → render → write loose files →
//! archive → snapshot. `install` runs the same pass and then copies the
//! rendered files, reporting the copy separately.

use std::path::{Path, PathBuf};

use inx_core::{config, ExtensionConfig};
use inx_renderer::{Catalog, RenderedFile, Renderer};

use crate::archive::{archive_file_name, write_archive, ArchiveMode};
use crate::error::{BuildError, InstallError};
use crate::install::{install_files, resolve_extensions_dir, InstalledFiles};
use crate::writer::{atomic_write, write_all, WriteResult};

/// Knobs shared by `new`, `build`, and `install`.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub output_dir: PathBuf,
    pub archive: ArchiveMode,
    pub dry_run: bool,
    /// Also write the `extension.json` snapshot.
    pub save_config: bool,
    /// Overrides the configuration's `template_dir`.
    pub template_dir: Option<PathBuf>,
}

/// Outcome of a successful build.
#[derive(Debug)]
pub struct BuildReport {
    pub extension: String,
    pub output_dir: PathBuf,
    /// Rendered files, in template order.
    pub files: Vec<RenderedFile>,
    /// One entry per loose file; empty for [`ArchiveMode::Only`].
    pub writes: Vec<WriteResult>,
    pub archive: Option<WriteResult>,
    pub snapshot: Option<WriteResult>,
}

/// Outcome of `install`: the build always succeeded; the copy may not have.
#[derive(Debug)]
pub struct InstallReport {
    pub build: BuildReport,
    pub install: Result<InstalledFiles, InstallError>,
}

/// Render `config` and write it according to `options`.
pub fn build(config: &ExtensionConfig, options: &BuildOptions) -> Result<BuildReport, BuildError> {
    let template_dir = options
        .template_dir
        .as_deref()
        .or(config.template_dir.as_deref());
    let set = Catalog::resolve(config.category, template_dir)?;
    let files = Renderer::render(config, &set)?;
    let name = config.name.as_str();
    tracing::info!(
        "rendered {} file(s) for '{}' ({})",
        files.len(),
        name,
        config.category
    );

    let out = options.output_dir.as_path();
    let writes = if options.archive.writes_loose_files() {
        write_all(out, &files, options.dry_run)?
    } else {
        Vec::new()
    };

    let archive = if options.archive.writes_archive() {
        let path = out.join(archive_file_name(name, &config.metadata.version));
        Some(write_archive(&path, name, &files, options.dry_run)?)
    } else {
        None
    };

    let snapshot = if options.save_config {
        Some(write_snapshot(config, out, options.dry_run)?)
    } else {
        None
    };

    Ok(BuildReport {
        extension: name.to_owned(),
        output_dir: out.to_path_buf(),
        files,
        writes,
        archive,
        snapshot,
    })
}

fn write_snapshot(
    config: &ExtensionConfig,
    dir: &Path,
    dry_run: bool,
) -> Result<WriteResult, BuildError> {
    let json = config::snapshot_json(config)?;
    Ok(atomic_write(&dir.join(config::SNAPSHOT_FILE), json.as_bytes(), dry_run)?)
}

/// Build, then copy the rendered files into the extensions directory.
///
/// `target` is the explicit `--install-dir`, if any. In dry-run mode the
/// directory is resolved but nothing is copied.
pub fn install(
    config: &ExtensionConfig,
    options: &BuildOptions,
    target: Option<&Path>,
) -> Result<InstallReport, BuildError> {
    let build = build(config, options)?;

    let install = resolve_extensions_dir(target).and_then(|dir| {
        if options.dry_run {
            tracing::info!("[dry-run] would install into: {}", dir.display());
            Ok(InstalledFiles {
                files: build.files.iter().map(|f| dir.join(&build.extension).join(&f.path)).collect(),
                dir: dir.join(&build.extension),
            })
        } else {
            install_files(&dir, &build.extension, &build.files)
        }
    });
    if let Err(e) = &install {
        tracing::warn!("install failed: {e}");
    }

    Ok(InstallReport { build, install })
}
