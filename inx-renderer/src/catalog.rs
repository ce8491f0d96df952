//! Template selection: maps a [`Category`] to the files it generates.
//!
//! | Category       | Output path(s)                                         |
//! |----------------|--------------------------------------------------------|
//! | basic_effect   | `{{ ext_name }}.py`, `{{ ext_name }}.inx`, `README.md` |
//! | input_output   | `{{ ext_name }}.py`, `{{ ext_name }}.inx`, `README.md` |
//! | render         | `{{ ext_name }}.py`, `{{ ext_name }}.inx`, `README.md` |
//! | custom         | one file per entry of the template directory           |

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use inx_core::Category;

use crate::error::TemplateError;

// ---------------------------------------------------------------------------
// Embedded templates: baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const README: &str = include_str!("templates/README.md.tera");

const BASIC_EFFECT: &[(&str, &str)] = &[
    ("{{ ext_name }}.py", include_str!("templates/basic_effect/script.py.tera")),
    ("{{ ext_name }}.inx", include_str!("templates/basic_effect/extension.inx.tera")),
    ("README.md", README),
];

const INPUT_OUTPUT: &[(&str, &str)] = &[
    ("{{ ext_name }}.py", include_str!("templates/input_output/script.py.tera")),
    ("{{ ext_name }}.inx", include_str!("templates/input_output/extension.inx.tera")),
    ("README.md", README),
];

const RENDER: &[(&str, &str)] = &[
    ("{{ ext_name }}.py", include_str!("templates/render/script.py.tera")),
    ("{{ ext_name }}.inx", include_str!("templates/render/extension.inx.tera")),
    ("README.md", README),
];

/// Suffix marking a file in a custom directory as a template.
const TEMPLATE_SUFFIX: &str = ".tera";

// ---------------------------------------------------------------------------
// TemplateSet
// ---------------------------------------------------------------------------

/// Body of one template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Tera text, rendered with the [`crate::TemplateContext`].
    Text(String),
    /// Copied to the output unchanged.
    Static(Vec<u8>),
}

/// One file of a [`TemplateSet`]. `path_pattern` is itself rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path_pattern: String,
    pub source: TemplateSource,
}

/// The ordered files a category generates. Read-only once resolved.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub category: Category,
    /// Directory the set was loaded from; `None` for bundled categories.
    pub origin: Option<PathBuf>,
    pub files: Vec<TemplateFile>,
}

/// A category as listed by `inx list-templates`.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Output path patterns; empty for `custom`.
    pub files: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Resolves categories to template sets.
pub struct Catalog;

impl Catalog {
    /// Template set for `category`. `custom_dir` is required for
    /// [`Category::Custom`] and ignored otherwise.
    pub fn resolve(
        category: Category,
        custom_dir: Option<&Path>,
    ) -> Result<TemplateSet, TemplateError> {
        let Some(table) = bundled(category) else {
            let dir = custom_dir.ok_or(TemplateError::CustomDirRequired)?;
            return load_dir(dir);
        };

        let files = table
            .iter()
            .map(|(pattern, text)| TemplateFile {
                path_pattern: (*pattern).to_owned(),
                source: TemplateSource::Text((*text).to_owned()),
            })
            .collect();
        debug!(category = %category, "resolved bundled template set");
        Ok(TemplateSet {
            category,
            origin: None,
            files,
        })
    }

    /// Every category with its description and bundled output paths.
    pub fn describe() -> Vec<CategoryInfo> {
        Category::all()
            .iter()
            .map(|c| CategoryInfo {
                name: c.as_str(),
                description: c.description(),
                files: bundled(*c)
                    .map(|t| t.iter().map(|(pattern, _)| *pattern).collect())
                    .unwrap_or_default(),
            })
            .collect()
    }
}

fn bundled(category: Category) -> Option<&'static [(&'static str, &'static str)]> {
    match category {
        Category::BasicEffect => Some(BASIC_EFFECT),
        Category::InputOutput => Some(INPUT_OUTPUT),
        Category::Render => Some(RENDER),
        Category::Custom => None,
    }
}

// ---------------------------------------------------------------------------
// Custom directories
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TemplateError {
    TemplateError::Io { path: path.into(), source }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), TemplateError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = std::fs::metadata(&path).map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Forward-slash relative path, the form template names and patterns use.
fn relative_name(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn load_dir(dir: &Path) -> Result<TemplateSet, TemplateError> {
    match std::fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(TemplateError::NotADirectory { path: dir.to_path_buf() })
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TemplateError::DirectoryNotFound { path: dir.to_path_buf() })
        }
        Err(e) => return Err(io_err(dir, e)),
    }

    let mut paths = Vec::new();
    collect_files(dir, &mut paths)?;
    if paths.is_empty() {
        return Err(TemplateError::EmptyDirectory { path: dir.to_path_buf() });
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let name = relative_name(dir, &path);
        let bytes = std::fs::read(&path).map_err(|e| io_err(&path, e))?;
        let file = match name.strip_suffix(TEMPLATE_SUFFIX) {
            Some(pattern) if !pattern.is_empty() => TemplateFile {
                path_pattern: pattern.to_owned(),
                source: TemplateSource::Text(
                    String::from_utf8(bytes)
                        .map_err(|_| TemplateError::NonUtf8 { path: path.clone() })?,
                ),
            },
            _ => TemplateFile {
                path_pattern: name,
                source: TemplateSource::Static(bytes),
            },
        };
        debug!(file = %file.path_pattern, "loaded custom template file");
        files.push(file);
    }

    Ok(TemplateSet {
        category: Category::Custom,
        origin: Some(dir.to_path_buf()),
        files,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
