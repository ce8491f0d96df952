//! Error types for inx-renderer.

use std::path::PathBuf;

use thiserror::Error;

use inx_core::DefaultMismatch;

/// Errors from resolving a template category to its file set.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// `custom` was selected but no template directory was supplied.
    #[error("the custom category needs a template directory (--template-dir or `template_dir`)")]
    CustomDirRequired,

    /// The template directory does not exist.
    #[error("template directory not found at {path}")]
    DirectoryNotFound { path: PathBuf },

    /// The template path exists but is not a directory.
    #[error("template path {path} is not a directory")]
    NotADirectory { path: PathBuf },

    /// The template directory holds no files.
    #[error("template directory {path} contains no files")]
    EmptyDirectory { path: PathBuf },

    /// A `.tera` template is not valid UTF-8.
    #[error("template {path} is not valid UTF-8")]
    NonUtf8 { path: PathBuf },

    /// Filesystem error while loading a template directory.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// All errors that can arise from rendering a template set.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A template uses a token outside the closed placeholder set.
    #[error("unknown placeholder `{token}` in template '{template}'")]
    UnknownPlaceholder { template: String, token: String },

    /// Any other Tera failure (syntax error, bad filter, …).
    #[error("template '{template}' failed to render: {source}")]
    Template {
        template: String,
        #[source]
        source: tera::Error,
    },

    /// A parameter default cannot be represented in its kind.
    #[error("parameter '{parameter}': {source}")]
    DefaultMismatch {
        parameter: String,
        #[source]
        source: DefaultMismatch,
    },

    /// A user-supplied string holds a character XML 1.0 cannot represent.
    #[error("{field} contains U+{code:04X}, which cannot appear in XML output")]
    InvalidXmlChar { field: String, code: u32 },

    /// A rendered output path is empty, absolute, or climbs out of the destination.
    #[error("template '{template}' renders to unsafe output path '{path}'")]
    UnsafePath { template: String, path: String },

    /// Two templates render to the same output path.
    #[error("more than one template renders to '{path}'")]
    DuplicateOutput { path: PathBuf },

    /// Serialization error building the tera context.
    #[error("context serialization error: {0}")]
    Context(#[source] tera::Error),
}
