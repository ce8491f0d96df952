//! Interactive configuration: builds a [`RawConfig`] from a sequence of answers.
//!
//! The terminal is abstracted behind [`Prompter`] so the question flow can be
//! driven by `dialoguer` in the CLI and by a scripted queue in tests. Answers
//! go through the same [`RawConfig::validate`] path as configuration files.

use std::path::PathBuf;

use heck::ToTitleCase;

use crate::config::{RawChoice, RawConfig, RawMetadata, RawParameter};
use crate::error::ConfigError;
use crate::types::{Category, ExtensionConfig, ParamKind, ParamValue};

/// Source of interactive answers.
pub trait Prompter {
    /// Free-text answer. `default` is returned for an empty answer.
    fn text(&mut self, prompt: &str, default: Option<&str>) -> Result<String, ConfigError>;

    /// Index into `items`.
    fn select(&mut self, prompt: &str, items: &[&str], default: usize)
        -> Result<usize, ConfigError>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, ConfigError>;
}

/// Ask for every configuration field and validate the result.
///
/// `category` skips the category question when the caller already knows it
/// (e.g. `inx new --template render`).
pub fn from_answers<P: Prompter + ?Sized>(
    prompter: &mut P,
    category: Option<Category>,
) -> Result<ExtensionConfig, ConfigError> {
    let name = prompter.text("Extension name (Python module name)", None)?;

    let category = match category {
        Some(c) => c,
        None => {
            let names: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
            Category::all()[prompter.select("Template category", &names, 0)?]
        }
    };
    let template_dir = if category == Category::Custom {
        Some(PathBuf::from(prompter.text("Template directory", None)?))
    } else {
        None
    };

    let title = name.to_title_case();
    let metadata = RawMetadata {
        display_name: Some(prompter.text("Menu title", Some(&title))?),
        description: Some(prompter.text("Description", Some("Inkscape extension"))?),
        author: Some(prompter.text("Author", Some("Anonymous"))?),
        version: Some(prompter.text("Version", Some("1.0.0"))?),
        ..RawMetadata::default()
    };

    let mut parameters = Vec::new();
    loop {
        let question = if parameters.is_empty() {
            "Add a parameter?"
        } else {
            "Add another parameter?"
        };
        if !prompter.confirm(question, false)? {
            break;
        }
        parameters.push(ask_parameter(prompter)?);
    }

    RawConfig {
        name,
        category: Some(category.as_str().to_owned()),
        parameters,
        metadata,
        io: None,
        template_dir,
    }
    .validate()
}

fn ask_parameter<P: Prompter + ?Sized>(prompter: &mut P) -> Result<RawParameter, ConfigError> {
    let name = prompter.text("  Parameter name", None)?;
    let kinds: Vec<&str> = ParamKind::all().iter().map(|k| k.as_str()).collect();
    let kind = ParamKind::all()[prompter.select("  Kind", &kinds, 0)?];
    let label = prompter.text("  Label", Some(&name.to_title_case()))?;

    let mut param = RawParameter {
        kind: kind.as_str().to_owned(),
        label: Some(label),
        ..RawParameter::default()
    };

    if kind.is_numeric() {
        param.min = ask_bound(prompter, &name, "  Minimum (blank for none)")?;
        param.max = ask_bound(prompter, &name, "  Maximum (blank for none)")?;
    }
    if kind.has_choices() {
        let prompt = if kind == ParamKind::Notebook {
            "  Pages (comma-separated)"
        } else {
            "  Choices (comma-separated)"
        };
        param.choices = prompter
            .text(prompt, None)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| RawChoice::Plain(s.to_owned()))
            .collect();
    }

    let answer = prompter.text("  Default (blank for none)", Some(""))?;
    if !answer.trim().is_empty() {
        let value = ParamValue::parse_for(kind, &answer).map_err(|source| {
            ConfigError::InvalidDefault {
                parameter: name.clone(),
                source,
            }
        })?;
        param.default = Some(value);
    }

    param.name = name;
    Ok(param)
}

fn ask_bound<P: Prompter + ?Sized>(
    prompter: &mut P,
    parameter: &str,
    prompt: &str,
) -> Result<Option<f64>, ConfigError> {
    let answer = prompter.text(prompt, Some(""))?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    answer
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidParameter {
            parameter: parameter.to_owned(),
            reason: format!("'{answer}' is not a number"),
        })
}
