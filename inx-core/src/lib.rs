//! inx core library: extension configuration types, loading, validation.
//!
//! - [`types`]: validated domain types ([`ExtensionConfig`], [`ParameterSpec`], …)
//! - [`config`]: YAML / JSON document, validation, `extension.json` snapshot
//! - [`prompt`]: interactive loading through the [`prompt::Prompter`] seam
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod prompt;
pub mod types;

pub use error::{ConfigError, DefaultMismatch, UnknownCategory};
pub use types::{
    Appearance, Category, Choice, ExtensionConfig, ExtensionName, IoDirection, IoSpec, Metadata,
    ParamKind, ParamValue, ParameterSpec,
};
