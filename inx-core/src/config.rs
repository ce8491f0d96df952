//! Configuration document: load (YAML / JSON), validate, snapshot.
//!
//! # Document shape
//!
//! ```yaml
//! name: spiral_gen
//! type: render            # basic_effect | input_output | render | custom (+ aliases)
//! parameters:
//!   - name: turns
//!     kind: integer
//!     default: 5
//!     min: 1
//!     max: 50
//!     label: Turns
//! metadata:
//!   author: Jane Doe
//!   version: 1.0.0
//!   description: Draws a spiral
//! ```
//!
//! [`RawConfig`] is the serde-facing mirror of that document. Everything is
//! kept as loosely typed as possible there so that [`RawConfig::validate`] can
//! report *which* field is wrong instead of surfacing a generic serde error.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use heck::ToTitleCase;
use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::{
    check_identifier, Appearance, Category, Choice, ExtensionConfig, ExtensionName, IoDirection,
    IoSpec, Metadata, ParamKind, ParamValue, ParameterSpec,
};

/// File names probed (in order) when [`load`] is handed a directory.
pub const SNAPSHOT_CANDIDATES: &[&str] = &["extension.yaml", "extension.yml", "extension.json"];

/// File name written by [`save_snapshot`].
pub const SNAPSHOT_FILE: &str = "extension.json";

const DEFAULT_AUTHOR: &str = "Anonymous";
const DEFAULT_VERSION: &str = "1.0.0";
const DEFAULT_DESCRIPTION: &str = "Inkscape extension";
const DEFAULT_LICENSE: &str = "GPL-2.0-or-later";

// ---------------------------------------------------------------------------
// Raw document
// ---------------------------------------------------------------------------

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Option<Format> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Some(Format::Yaml),
            Some("json") => Some(Format::Json),
            _ => None,
        }
    }
}

/// Serde mirror of the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<RawParameter>,
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io: Option<RawIo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
    #[serde(default, alias = "gui_text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, alias = "gui_description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(
        default,
        alias = "options",
        alias = "pages",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub choices: Vec<RawChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
}

/// A choice is either a bare string (value doubles as label) or a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawChoice {
    Plain(String),
    Labeled {
        #[serde(alias = "name")]
        value: String,
        #[serde(default, alias = "gui_text", skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawIo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filetype_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filetype_tooltip: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl RawConfig {
    /// Validate the document and apply defaults.
    ///
    /// This is the single validation path for file-based and interactive loading.
    pub fn validate(self) -> Result<ExtensionConfig, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "name".into() });
        }
        let name = ExtensionName::parse(&self.name).map_err(|reason| ConfigError::InvalidName {
            name: self.name.clone(),
            reason,
        })?;

        let type_str = self.category.as_deref().unwrap_or(Category::BasicEffect.as_str());
        let category: Category = type_str.parse()?;

        let mut seen = HashSet::new();
        let mut parameters = Vec::with_capacity(self.parameters.len());
        for (idx, raw) in self.parameters.into_iter().enumerate() {
            let param = validate_parameter(idx, raw)?;
            if !seen.insert(param.name.clone()) {
                return Err(ConfigError::DuplicateParameter { name: param.name });
            }
            parameters.push(param);
        }

        let metadata = resolve_metadata(self.metadata, &name, category);
        let io = resolve_io(self.io.unwrap_or_default(), type_str, &name, &metadata)?;

        tracing::debug!(
            "validated '{}' ({}, {} parameters)",
            name,
            category,
            parameters.len()
        );

        Ok(ExtensionConfig {
            name,
            category,
            parameters,
            metadata,
            io,
            template_dir: self.template_dir,
        })
    }
}

fn validate_parameter(idx: usize, raw: RawParameter) -> Result<ParameterSpec, ConfigError> {
    if raw.name.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: format!("parameters[{idx}].name"),
        });
    }
    check_identifier(&raw.name).map_err(|reason| ConfigError::InvalidParameterName {
        name: raw.name.clone(),
        reason,
    })?;
    if raw.kind.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: format!("parameters[{idx}].kind"),
        });
    }
    let kind: ParamKind = raw.kind.parse().map_err(|_| ConfigError::UnknownKind {
        parameter: raw.name.clone(),
        kind: raw.kind.clone(),
    })?;

    let invalid = |reason: &str| ConfigError::InvalidParameter {
        parameter: raw.name.clone(),
        reason: reason.to_owned(),
    };

    if !kind.is_numeric() && (raw.min.is_some() || raw.max.is_some()) {
        return Err(invalid("min/max only apply to int and float parameters"));
    }
    for bound in [raw.min, raw.max].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(invalid("min/max must be finite numbers"));
        }
        if kind == ParamKind::Int && bound.fract() != 0.0 {
            return Err(invalid("min/max of an int parameter must be whole numbers"));
        }
    }
    if let (Some(min), Some(max)) = (raw.min, raw.max) {
        if min > max {
            return Err(invalid(&format!("min ({min}) cannot be greater than max ({max})")));
        }
    }
    if raw.precision.is_some() && kind != ParamKind::Float {
        return Err(invalid("precision only applies to float parameters"));
    }
    if raw.appearance.is_some() && kind != ParamKind::OptionGroup {
        return Err(invalid("appearance only applies to optiongroup parameters"));
    }
    let appearance = match raw.appearance.as_deref() {
        Some(s) => s.parse::<Appearance>().map_err(|e| invalid(&e))?,
        None => Appearance::default(),
    };

    let choices: Vec<Choice> = raw.choices.into_iter().map(Choice::from).collect();
    if kind.has_choices() {
        if choices.is_empty() {
            return Err(invalid(&format!("{kind} parameters require at least one choice")));
        }
        let mut values = HashSet::new();
        for choice in &choices {
            if choice.value.is_empty() {
                return Err(invalid("choice values must not be empty"));
            }
            if !values.insert(choice.value.as_str()) {
                return Err(invalid(&format!("duplicate choice '{}'", choice.value)));
            }
        }
    } else if !choices.is_empty() {
        return Err(invalid("choices only apply to optiongroup and notebook parameters"));
    }

    let label = raw
        .label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| raw.name.to_title_case());

    let param = ParameterSpec {
        name: raw.name,
        kind,
        default: raw.default,
        label,
        description: raw.description.filter(|d| !d.trim().is_empty()),
        min: raw.min,
        max: raw.max,
        precision: raw.precision,
        choices,
        appearance,
    };
    param
        .resolved_default()
        .map_err(|source| ConfigError::InvalidDefault {
            parameter: param.name.clone(),
            source,
        })?;
    Ok(param)
}

fn resolve_metadata(raw: RawMetadata, name: &ExtensionName, category: Category) -> Metadata {
    let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
    Metadata {
        author: non_empty(raw.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_owned()),
        email: non_empty(raw.email),
        version: non_empty(raw.version).unwrap_or_else(|| DEFAULT_VERSION.to_owned()),
        description: non_empty(raw.description).unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
        license: non_empty(raw.license).unwrap_or_else(|| DEFAULT_LICENSE.to_owned()),
        display_name: non_empty(raw.display_name).unwrap_or_else(|| name.title()),
        submenu: non_empty(raw.submenu),
        id: non_empty(raw.id)
            .unwrap_or_else(|| format!("org.inkscape.{}.{}", category.id_segment(), name)),
    }
}

fn resolve_io(
    raw: RawIo,
    type_str: &str,
    name: &ExtensionName,
    metadata: &Metadata,
) -> Result<IoSpec, ConfigError> {
    let implied = type_str.trim().parse::<IoDirection>().ok();
    let direction = match raw.direction.as_deref() {
        Some(s) => s.parse::<IoDirection>().map_err(|reason| ConfigError::InvalidParameter {
            parameter: "io.direction".into(),
            reason,
        })?,
        None => implied.unwrap_or_default(),
    };

    let extension = match raw.extension.filter(|e| !e.trim().is_empty()) {
        Some(e) if e.starts_with('.') => e,
        Some(e) => format!(".{e}"),
        None => format!(".{name}"),
    };
    let bare = extension.trim_start_matches('.').to_owned();
    Ok(IoSpec {
        direction,
        mimetype: raw
            .mimetype
            .unwrap_or_else(|| format!("application/x-{bare}")),
        filetype_name: raw
            .filetype_name
            .unwrap_or_else(|| format!("{} (*{extension})", metadata.display_name)),
        filetype_tooltip: raw
            .filetype_tooltip
            .unwrap_or_else(|| metadata.description.clone()),
        extension,
    })
}

impl From<RawChoice> for Choice {
    fn from(raw: RawChoice) -> Self {
        match raw {
            RawChoice::Plain(value) => Choice {
                label: value.clone(),
                value,
            },
            RawChoice::Labeled { value, label } => Choice {
                label: label.unwrap_or_else(|| value.clone()),
                value,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot (validated → raw)
// ---------------------------------------------------------------------------

impl From<&ExtensionConfig> for RawConfig {
    fn from(config: &ExtensionConfig) -> Self {
        let parameters = config
            .parameters
            .iter()
            .map(|p| RawParameter {
                name: p.name.clone(),
                kind: p.kind.as_str().to_owned(),
                default: p.default.clone(),
                label: Some(p.label.clone()),
                description: p.description.clone(),
                min: p.min,
                max: p.max,
                precision: p.precision,
                choices: p
                    .choices
                    .iter()
                    .map(|c| RawChoice::Labeled {
                        value: c.value.clone(),
                        label: Some(c.label.clone()),
                    })
                    .collect(),
                appearance: (p.kind == ParamKind::OptionGroup)
                    .then(|| p.appearance.as_str().to_owned()),
            })
            .collect();

        let m = &config.metadata;
        let io = (config.category == Category::InputOutput).then(|| RawIo {
            direction: Some(config.io.direction.as_str().to_owned()),
            extension: Some(config.io.extension.clone()),
            mimetype: Some(config.io.mimetype.clone()),
            filetype_name: Some(config.io.filetype_name.clone()),
            filetype_tooltip: Some(config.io.filetype_tooltip.clone()),
        });

        RawConfig {
            name: config.name.to_string(),
            category: Some(config.category.as_str().to_owned()),
            parameters,
            metadata: RawMetadata {
                author: Some(m.author.clone()),
                email: m.email.clone(),
                version: Some(m.version.clone()),
                description: Some(m.description.clone()),
                license: Some(m.license.clone()),
                display_name: Some(m.display_name.clone()),
                submenu: m.submenu.clone(),
                id: Some(m.id.clone()),
            },
            io,
            template_dir: config.template_dir.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Parse a document held in memory without validating it.
pub fn parse(text: &str, format: Format, origin: &Path) -> Result<RawConfig, ConfigError> {
    match format {
        Format::Yaml => serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: origin.to_path_buf(),
            source,
        }),
        Format::Json => serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: origin.to_path_buf(),
            source,
        }),
    }
}

/// Parse and validate a document held in memory. `origin` is only used in
/// error messages; a relative `template_dir` is kept as written.
pub fn from_str(text: &str, format: Format, origin: &Path) -> Result<ExtensionConfig, ConfigError> {
    parse(text, format, origin)?.validate()
}

/// Load and validate a configuration file.
///
/// If `path` is a directory, the first of [`SNAPSHOT_CANDIDATES`] found inside
/// it is loaded instead. A relative `template_dir` is resolved against the
/// directory holding the file.
pub fn load(path: &Path) -> Result<ExtensionConfig, ConfigError> {
    load_as(path, None)
}

/// [`load`], with `category` replacing the document's `type` before
/// validation so the derived id and io direction follow it.
pub fn load_as(path: &Path, category: Option<Category>) -> Result<ExtensionConfig, ConfigError> {
    let file = resolve_config_path(path)?;
    let format = Format::from_path(&file)
        .ok_or_else(|| ConfigError::UnsupportedFormat { path: file.clone() })?;
    let text = std::fs::read_to_string(&file).map_err(|e| io_err(&file, e))?;
    tracing::debug!("loading configuration from {}", file.display());

    let mut raw = parse(&text, format, &file)?;
    if let Some(category) = category {
        raw.category = Some(category.as_str().to_owned());
    }
    if let Some(dir) = raw.template_dir.as_mut() {
        if dir.is_relative() {
            let resolved = base_dir(&file).join(&*dir);
            *dir = resolved;
        }
    }
    raw.validate()
}

/// Absolute directory of `file`, falling back to the path as given.
fn base_dir(file: &Path) -> PathBuf {
    let parent = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf())
}

fn resolve_config_path(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_dir() {
        return SNAPSHOT_CANDIDATES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ConfigError::NotFound {
                path: path.join(SNAPSHOT_FILE),
            });
    }
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(path.to_path_buf())
}

/// Render the `extension.json` snapshot for `config`.
pub fn snapshot_json(config: &ExtensionConfig) -> Result<String, ConfigError> {
    let mut json = serde_json::to_string_pretty(&RawConfig::from(config))?;
    json.push('\n');
    Ok(json)
}

/// Write `<dir>/extension.json` so the directory can be rebuilt with [`load`].
pub fn save_snapshot(config: &ExtensionConfig, dir: &Path) -> Result<PathBuf, ConfigError> {
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    let path = dir.join(SNAPSHOT_FILE);
    std::fs::write(&path, snapshot_json(config)?).map_err(|e| io_err(&path, e))?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
