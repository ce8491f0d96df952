//! Copy a rendered extension into Inkscape's user extensions directory.
//!
//! # Directory resolution
//!
//! 1. `--install-dir` passed by the caller.
//! 2. `INX_EXTENSIONS_DIR`.
//! 3. `<platform config dir>/inkscape/extensions`:
//!
//! | Platform | Path                                                  |
//! |----------|-------------------------------------------------------|
//! | Linux    | `~/.config/inkscape/extensions`                       |
//! | macOS    | `~/Library/Application Support/inkscape/extensions`   |
//! | Windows  | `%APPDATA%\inkscape\extensions`                       |

use std::path::{Path, PathBuf};

use inx_renderer::RenderedFile;

use crate::error::InstallError;

/// Environment variable overriding the platform extensions directory.
pub const EXTENSIONS_DIR_ENV: &str = "INX_EXTENSIONS_DIR";

/// Files placed by [`install_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledFiles {
    /// `<extensions_dir>/<name>`.
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Resolve the extensions directory from the process environment.
pub fn resolve_extensions_dir(explicit: Option<&Path>) -> Result<PathBuf, InstallError> {
    resolve_extensions_dir_at(
        explicit,
        std::env::var_os(EXTENSIONS_DIR_ENV).map(PathBuf::from),
        dirs::config_dir(),
    )
}

/// Resolution with every input supplied by the caller.
pub fn resolve_extensions_dir_at(
    explicit: Option<&Path>,
    env: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, InstallError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = env.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }
    config_dir
        .map(|c| c.join("inkscape").join("extensions"))
        .ok_or(InstallError::NotResolved)
}

/// Copy `files` into `<extensions_dir>/<name>/`, creating it as needed.
pub fn install_files(
    extensions_dir: &Path,
    name: &str,
    files: &[RenderedFile],
) -> Result<InstalledFiles, InstallError> {
    if extensions_dir.exists() && !extensions_dir.is_dir() {
        return Err(InstallError::NotADirectory {
            path: extensions_dir.to_path_buf(),
        });
    }

    let dir = extensions_dir.join(name);
    std::fs::create_dir_all(&dir).map_err(|source| InstallError::NotWritable {
        path: dir.clone(),
        source,
    })?;

    let mut installed = Vec::with_capacity(files.len());
    for file in files {
        let target = dir.join(&file.path);
        let copy_err = |source| InstallError::Copy {
            path: target.clone(),
            source,
        };
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(copy_err)?;
        }
        std::fs::write(&target, &file.contents).map_err(copy_err)?;
        tracing::info!("installed: {}", target.display());
        installed.push(target);
    }

    Ok(InstalledFiles {
        dir,
        files: installed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_dir_wins() {
        let dir = resolve_extensions_dir_at(
            Some(Path::new("/opt/ext")),
            Some(PathBuf::from("/env/ext")),
            Some(PathBuf::from("/home/u/.config")),
        )
        .unwrap();
        assert_eq!(dir, PathBuf::from("/opt/ext"));
    }

    #[test]
    fn env_beats_platform_default() {
        let dir = resolve_extensions_dir_at(
            None,
            Some(PathBuf::from("/env/ext")),
            Some(PathBuf::from("/home/u/.config")),
        )
        .unwrap();
        assert_eq!(dir, PathBuf::from("/env/ext"));
    }

    #[test]
    fn platform_default_and_empty_env() {
        let dir =
            resolve_extensions_dir_at(None, Some(PathBuf::new()), Some(PathBuf::from("/cfg")))
                .unwrap();
        assert_eq!(dir, PathBuf::from("/cfg/inkscape/extensions"));
    }

    #[test]
    fn nothing_to_resolve() {
        let err = resolve_extensions_dir_at(None, None, None).unwrap_err();
        assert!(matches!(err, InstallError::NotResolved));
    }

    #[test]
    fn installs_under_extension_name() {
        let tmp = TempDir::new().unwrap();
        let files = [RenderedFile {
            path: PathBuf::from("demo.inx"),
            contents: b"<x/>".to_vec(),
        }];
        let installed = install_files(tmp.path(), "demo", &files).unwrap();
        assert_eq!(installed.dir, tmp.path().join("demo"));
        assert_eq!(std::fs::read(tmp.path().join("demo/demo.inx")).unwrap(), b"<x/>");
    }

    #[test]
    fn file_in_place_of_dir_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("extensions");
        std::fs::write(&blocker, "").unwrap();
        let err = install_files(&blocker, "demo", &[]).unwrap_err();
        assert!(matches!(err, InstallError::NotADirectory { .. }), "got: {err}");
    }
}
