//! Error types for inx-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ParamKind;

/// All errors that can arise while loading or validating an extension configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure reading a configuration file.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file (or snapshot inside a directory) does not exist.
    #[error("configuration not found at {path}")]
    NotFound { path: PathBuf },

    /// File extension is neither YAML nor JSON.
    #[error("unsupported configuration format for {path}; expected .yaml, .yml or .json")]
    UnsupportedFormat { path: PathBuf },

    /// YAML parse error: includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON parse error: includes file path and line/column from serde_json.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (snapshot write path).
    #[error("failed to serialize configuration snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A required field is absent or empty.
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    /// The extension name is not a usable module / file stem.
    #[error("invalid extension name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A parameter name is not a usable identifier.
    #[error("invalid parameter name '{name}': {reason}")]
    InvalidParameterName { name: String, reason: &'static str },

    /// Two parameters share a name.
    #[error("duplicate parameter name '{name}'")]
    DuplicateParameter { name: String },

    /// A parameter declares a kind outside the closed set.
    #[error(
        "parameter '{parameter}' has unknown kind '{kind}'; expected one of: int, float, string, bool, optiongroup, notebook"
    )]
    UnknownKind { parameter: String, kind: String },

    /// A parameter's default is not representable in its declared kind.
    #[error("parameter '{parameter}': {source}")]
    InvalidDefault {
        parameter: String,
        #[source]
        source: DefaultMismatch,
    },

    /// Bounds, choices, precision or appearance used incorrectly.
    #[error("parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    /// `type` names no known template category.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    /// Interactive prompt failed (terminal closed, not a TTY, …).
    #[error("interactive prompt failed: {message}")]
    Prompt { message: String },
}

/// Convenience constructor for [`ConfigError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}

/// A category name outside the fixed template set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown template category '{name}'; expected one of: basic_effect, input_output, render, custom"
)]
pub struct UnknownCategory {
    pub name: String,
}

/// A default value that cannot be represented in the parameter's kind.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("default '{value}' is not a valid {kind} value: {reason}")]
pub struct DefaultMismatch {
    pub kind: ParamKind,
    pub value: String,
    pub reason: String,
}
