//! Domain types for an extension configuration.
//!
//! Everything here is the *validated* shape: values of these types only come
//! out of [`crate::config::RawConfig::validate`] (or are built by hand in tests).
//! The serde-facing document lives in [`crate::config`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use heck::{ToTitleCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};

use crate::error::{DefaultMismatch, UnknownCategory};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A validated extension name: usable as a Python module name and a file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionName(String);

impl ExtensionName {
    /// Validate `s` and wrap it.
    pub fn parse(s: &str) -> Result<Self, &'static str> {
        check_identifier(s)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `spiral_gen` → `SpiralGen`. Prefixed with `Ext` when camel-casing
    /// leaves nothing or a leading digit (`_1x` → `Ext1x`, `_` → `Ext`).
    pub fn class_name(&self) -> String {
        let camel = self.0.to_upper_camel_case();
        match camel.chars().next() {
            Some(c) if !c.is_ascii_digit() => camel,
            _ => format!("Ext{camel}"),
        }
    }

    /// `spiral_gen` → `Spiral Gen`.
    pub fn title(&self) -> String {
        self.0.to_title_case()
    }
}

impl fmt::Display for ExtensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier rule shared by extension and parameter names:
/// ASCII letter or `_` first, then ASCII alphanumerics or `_`.
pub fn check_identifier(s: &str) -> Result<(), &'static str> {
    let mut chars = s.chars();
    match chars.next() {
        None => return Err("must not be empty"),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Err("must start with an ASCII letter or underscore"),
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err("may only contain ASCII letters, digits and underscores")
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The fixed set of template categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    BasicEffect,
    InputOutput,
    Render,
    Custom,
}

impl Category {
    /// All categories in a stable order.
    pub fn all() -> &'static [Category] {
        &[
            Category::BasicEffect,
            Category::InputOutput,
            Category::Render,
            Category::Custom,
        ]
    }

    /// Canonical name, as written in config files and shown by `list-templates`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::BasicEffect => "basic_effect",
            Category::InputOutput => "input_output",
            Category::Render => "render",
            Category::Custom => "custom",
        }
    }

    /// Segment used in the default extension id (`org.inkscape.<segment>.<name>`).
    pub fn id_segment(&self) -> &'static str {
        match self {
            Category::BasicEffect => "effect",
            Category::InputOutput => "io",
            Category::Render => "render",
            Category::Custom => "custom",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::BasicEffect => "Effect that transforms the current document or selection",
            Category::InputOutput => "File format import or export extension",
            Category::Render => "Generator that draws new content into the document",
            Category::Custom => "User-supplied template directory",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic_effect" | "effect" => Ok(Category::BasicEffect),
            "input_output" | "io" | "input" | "output" => Ok(Category::InputOutput),
            "render" => Ok(Category::Render),
            "custom" => Ok(Category::Custom),
            _ => Err(UnknownCategory { name: s.to_owned() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// The closed set of parameter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Int,
    Float,
    String,
    Bool,
    OptionGroup,
    Notebook,
}

impl ParamKind {
    pub fn all() -> &'static [ParamKind] {
        &[
            ParamKind::Int,
            ParamKind::Float,
            ParamKind::String,
            ParamKind::Bool,
            ParamKind::OptionGroup,
            ParamKind::Notebook,
        ]
    }

    /// Canonical name; also the `type` attribute of the generated `<param>`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::String => "string",
            ParamKind::Bool => "bool",
            ParamKind::OptionGroup => "optiongroup",
            ParamKind::Notebook => "notebook",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ParamKind::Int | ParamKind::Float)
    }

    pub fn has_choices(&self) -> bool {
        matches!(self, ParamKind::OptionGroup | ParamKind::Notebook)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(ParamKind::Int),
            "float" => Ok(ParamKind::Float),
            "string" | "str" => Ok(ParamKind::String),
            "bool" | "boolean" => Ok(ParamKind::Bool),
            "optiongroup" | "choice" | "enum" => Ok(ParamKind::OptionGroup),
            "notebook" => Ok(ParamKind::Notebook),
            other => Err(format!("unknown parameter kind '{other}'")),
        }
    }
}

/// A scalar value as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Parse free text (an interactive answer) as a value of `kind`.
    pub fn parse_for(kind: ParamKind, text: &str) -> Result<ParamValue, DefaultMismatch> {
        let text = text.trim();
        let mismatch = |reason: &str| DefaultMismatch {
            kind,
            value: text.to_owned(),
            reason: reason.to_owned(),
        };
        match kind {
            ParamKind::Int => text
                .parse::<i64>()
                .map(ParamValue::Int)
                .map_err(|_| mismatch("expected a whole number")),
            ParamKind::Float => text
                .parse::<f64>()
                .map(ParamValue::Float)
                .map_err(|_| mismatch("expected a number")),
            ParamKind::Bool => match text.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(ParamValue::Bool(true)),
                "false" | "no" | "n" | "0" => Ok(ParamValue::Bool(false)),
                _ => Err(mismatch("expected true or false")),
            },
            ParamKind::String | ParamKind::OptionGroup | ParamKind::Notebook => {
                Ok(ParamValue::Text(text.to_owned()))
            }
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => b.fmt(f),
            ParamValue::Int(i) => i.fmt(f),
            ParamValue::Float(x) => x.fmt(f),
            ParamValue::Text(s) => s.fmt(f),
        }
    }
}

/// One entry of an optiongroup (option) or notebook (page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// Presentation of an optiongroup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    #[default]
    Radio,
    Combo,
}

impl Appearance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Appearance::Radio => "radio",
            Appearance::Combo => "combo",
        }
    }
}

impl FromStr for Appearance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radio" | "full" => Ok(Appearance::Radio),
            "combo" | "minimal" => Ok(Appearance::Combo),
            other => Err(format!(
                "unknown appearance '{other}'; expected radio or combo"
            )),
        }
    }
}

/// A validated, user-adjustable extension parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<ParamValue>,
    pub label: String,
    pub description: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub precision: Option<u32>,
    pub choices: Vec<Choice>,
    pub appearance: Appearance,
}

impl ParameterSpec {
    /// Bare parameter of `kind` with a title-cased label; used by tests and the
    /// interactive loader before filling in the rest.
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        let name = name.into();
        let label = name.to_title_case();
        ParameterSpec {
            name,
            kind,
            default: None,
            label,
            description: None,
            min: None,
            max: None,
            precision: None,
            choices: vec![],
            appearance: Appearance::default(),
        }
    }

    /// The default normalised to `kind`, or the kind's fallback when none is declared.
    ///
    /// Never coerces across kinds, with one exception: an integer default is
    /// widened for a float parameter. Numeric defaults must lie within the bounds.
    pub fn resolved_default(&self) -> Result<ParamValue, DefaultMismatch> {
        let Some(value) = &self.default else {
            return Ok(self.fallback_default());
        };
        let mismatch = |reason: String| DefaultMismatch {
            kind: self.kind,
            value: value.to_string(),
            reason,
        };

        let resolved = match (self.kind, value) {
            (ParamKind::Int, ParamValue::Int(i)) => ParamValue::Int(*i),
            (ParamKind::Float, ParamValue::Int(i)) => ParamValue::Float(*i as f64),
            (ParamKind::Float, ParamValue::Float(x)) if x.is_finite() => ParamValue::Float(*x),
            (ParamKind::Float, ParamValue::Float(_)) => {
                return Err(mismatch("must be a finite number".into()))
            }
            (ParamKind::Bool, ParamValue::Bool(b)) => ParamValue::Bool(*b),
            (ParamKind::String, ParamValue::Text(s)) => ParamValue::Text(s.clone()),
            (ParamKind::OptionGroup | ParamKind::Notebook, ParamValue::Text(s)) => {
                if !self.choices.iter().any(|c| &c.value == s) {
                    return Err(mismatch("must name one of the declared choices".into()));
                }
                ParamValue::Text(s.clone())
            }
            (kind, _) => return Err(mismatch(format!("expected a {kind} literal"))),
        };

        let numeric = match resolved {
            ParamValue::Int(i) => Some(i as f64),
            ParamValue::Float(x) => Some(x),
            _ => None,
        };
        if let Some(n) = numeric {
            if self.min.is_some_and(|min| n < min) || self.max.is_some_and(|max| n > max) {
                return Err(mismatch("outside the declared min/max bounds".into()));
            }
        }
        Ok(resolved)
    }

    fn fallback_default(&self) -> ParamValue {
        let clamp = |x: f64| {
            let x = self.min.map_or(x, |min| x.max(min));
            self.max.map_or(x, |max| x.min(max))
        };
        match self.kind {
            ParamKind::Int => ParamValue::Int(clamp(0.0) as i64),
            ParamKind::Float => ParamValue::Float(clamp(0.0)),
            ParamKind::String => ParamValue::Text(String::new()),
            ParamKind::Bool => ParamValue::Bool(false),
            ParamKind::OptionGroup | ParamKind::Notebook => ParamValue::Text(
                self.choices
                    .first()
                    .map(|c| c.value.clone())
                    .unwrap_or_default(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata and I/O settings
// ---------------------------------------------------------------------------

/// Free-form descriptive metadata, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub author: String,
    pub email: Option<String>,
    pub version: String,
    pub description: String,
    pub license: String,
    /// Menu / dialog title shown by Inkscape.
    pub display_name: String,
    /// Effects-menu submenu; `None` places the entry at the top level.
    pub submenu: Option<String>,
    /// Unique extension id, e.g. `org.inkscape.render.spiral_gen`.
    pub id: String,
}

/// Whether an input/output extension imports or exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoDirection {
    Input,
    #[default]
    Output,
}

impl IoDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            IoDirection::Input => "input",
            IoDirection::Output => "output",
        }
    }
}

impl FromStr for IoDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "input" | "import" => Ok(IoDirection::Input),
            "output" | "export" => Ok(IoDirection::Output),
            other => Err(format!("unknown io direction '{other}'; expected input or output")),
        }
    }
}

/// File-type settings for the input/output category, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoSpec {
    pub direction: IoDirection,
    /// File extension including the leading dot.
    pub extension: String,
    pub mimetype: String,
    pub filetype_name: String,
    pub filetype_tooltip: String,
}

// ---------------------------------------------------------------------------
// ExtensionConfig
// ---------------------------------------------------------------------------

/// A fully validated extension configuration: the only input of rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionConfig {
    pub name: ExtensionName,
    pub category: Category,
    pub parameters: Vec<ParameterSpec>,
    pub metadata: Metadata,
    pub io: IoSpec,
    /// Template directory for [`Category::Custom`].
    pub template_dir: Option<PathBuf>,
}

impl ExtensionConfig {
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
