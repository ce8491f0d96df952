//! Template context: the closed set of values a template may reference.
//!
//! Every top-level field of [`TemplateContext`] is a placeholder token
//! (`{{ ext_name }}`, `{{ io.mimetype }}`, `{% for param in parameters %}`);
//! anything else is an unknown placeholder at render time.

use serde::Serialize;

use inx_core::{Category, ExtensionConfig, ParamValue, ParameterSpec};

use crate::error::RenderError;
use crate::markup;

/// Flat + structured rendering payload built from an [`ExtensionConfig`].
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    /// Validated extension name; also the Python module and file stem.
    pub ext_name: String,
    /// `spiral_gen` → `SpiralGen`.
    pub class_name: String,
    pub display_name: String,
    /// `display_name` as a Python string literal.
    pub display_name_py: String,
    pub id: String,
    /// Canonical category name (`render`, `basic_effect`, …).
    pub category: String,
    pub description: String,
    /// `description` as a Python string literal.
    pub description_py: String,
    pub author: String,
    pub email: Option<String>,
    pub version: String,
    pub license: String,
    pub submenu: Option<String>,
    pub io: IoCtx,
    pub parameters: Vec<ParamCtx>,
    pub meta: MetaCtx,
}

/// File-type settings, meaningful for the input/output category.
#[derive(Debug, Clone, Serialize)]
pub struct IoCtx {
    /// `input` or `output`.
    pub direction: String,
    pub extension: String,
    pub mimetype: String,
    pub filetype_name: String,
    pub filetype_tooltip: String,
}

/// One parameter, pre-formatted for every place a template needs it.
#[derive(Debug, Clone, Serialize)]
pub struct ParamCtx {
    pub name: String,
    pub kind: String,
    pub label: String,
    /// Empty when the parameter has no description.
    pub description: String,
    /// Resolved default as plain text (`5`, `2.5`, `true`, `mode_a`).
    pub default: String,
    /// `1..50`, `>= 1`, `<= 50`, or the comma-joined choice values; empty otherwise.
    pub bounds: String,
    pub choices: Vec<ChoiceCtx>,
    /// Complete `<param>` element, already escaped. Insert with `| safe`.
    pub xml: String,
    /// `argparse` `type=` expression.
    pub py_type: String,
    /// Default as a Python literal.
    pub py_default: String,
    /// Label as a Python string literal for `help=`, with `%` doubled.
    pub py_help: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoiceCtx {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaCtx {
    pub generator: String,
    pub generator_version: String,
}

impl TemplateContext {
    /// Build the context, resolving every parameter default and rejecting
    /// text that cannot be written to XML.
    pub fn from_config(config: &ExtensionConfig) -> Result<Self, RenderError> {
        check_xml_fields(config)?;

        let parameters = config
            .parameters
            .iter()
            .map(param_ctx)
            .collect::<Result<Vec<_>, _>>()?;

        let meta = &config.metadata;
        Ok(TemplateContext {
            ext_name: config.name.as_str().to_owned(),
            class_name: config.name.class_name(),
            display_name: meta.display_name.clone(),
            display_name_py: markup::python_string(&meta.display_name),
            id: meta.id.clone(),
            category: config.category.as_str().to_owned(),
            description: meta.description.clone(),
            description_py: markup::python_string(&meta.description),
            author: meta.author.clone(),
            email: meta.email.clone(),
            version: meta.version.clone(),
            license: meta.license.clone(),
            submenu: submenu(config),
            io: IoCtx {
                direction: config.io.direction.as_str().to_owned(),
                extension: config.io.extension.clone(),
                mimetype: config.io.mimetype.clone(),
                filetype_name: config.io.filetype_name.clone(),
                filetype_tooltip: config.io.filetype_tooltip.clone(),
            },
            parameters,
            meta: MetaCtx {
                generator: "inx-builder".to_owned(),
                generator_version: env!("CARGO_PKG_VERSION").to_owned(),
            },
        })
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::Context)
    }
}

/// Render extensions live under `Render` unless the config names another submenu.
fn submenu(config: &ExtensionConfig) -> Option<String> {
    match (&config.metadata.submenu, config.category) {
        (Some(s), _) => Some(s.clone()),
        (None, Category::Render) => Some("Render".to_owned()),
        (None, _) => None,
    }
}

fn param_ctx(param: &ParameterSpec) -> Result<ParamCtx, RenderError> {
    let default = param
        .resolved_default()
        .map_err(|source| RenderError::DefaultMismatch {
            parameter: param.name.clone(),
            source,
        })?;

    Ok(ParamCtx {
        name: param.name.clone(),
        kind: param.kind.as_str().to_owned(),
        label: param.label.clone(),
        description: param.description.clone().unwrap_or_default(),
        default: markup::display_value(&default),
        bounds: bounds(param),
        choices: param
            .choices
            .iter()
            .map(|c| ChoiceCtx {
                value: c.value.clone(),
                label: c.label.clone(),
            })
            .collect(),
        xml: markup::param_element(param, &default),
        py_type: markup::python_type(param.kind).to_owned(),
        py_default: markup::python_literal(&default),
        py_help: markup::python_help(&param.label),
    })
}

fn bounds(param: &ParameterSpec) -> String {
    if param.kind.has_choices() {
        return param
            .choices
            .iter()
            .map(|c| c.value.as_str())
            .collect::<Vec<_>>()
            .join(", ");
    }
    let fmt = |x: f64| markup::number(param.kind, x);
    match (param.min, param.max) {
        (Some(min), Some(max)) => format!("{}..{}", fmt(min), fmt(max)),
        (Some(min), None) => format!(">= {}", fmt(min)),
        (None, Some(max)) => format!("<= {}", fmt(max)),
        (None, None) => String::new(),
    }
}

fn check_xml_fields(config: &ExtensionConfig) -> Result<(), RenderError> {
    let meta = &config.metadata;
    let mut fields: Vec<(String, &str)> = vec![
        ("display_name".into(), meta.display_name.as_str()),
        ("description".into(), meta.description.as_str()),
        ("author".into(), meta.author.as_str()),
        ("version".into(), meta.version.as_str()),
        ("license".into(), meta.license.as_str()),
        ("id".into(), meta.id.as_str()),
        ("io.extension".into(), config.io.extension.as_str()),
        ("io.mimetype".into(), config.io.mimetype.as_str()),
        ("io.filetype_name".into(), config.io.filetype_name.as_str()),
        ("io.filetype_tooltip".into(), config.io.filetype_tooltip.as_str()),
    ];
    if let Some(email) = &meta.email {
        fields.push(("email".into(), email.as_str()));
    }
    if let Some(submenu) = &meta.submenu {
        fields.push(("submenu".into(), submenu.as_str()));
    }
    for p in &config.parameters {
        fields.push((format!("parameter '{}' label", p.name), p.label.as_str()));
        if let Some(d) = &p.description {
            fields.push((format!("parameter '{}' description", p.name), d.as_str()));
        }
        if let Some(ParamValue::Text(t)) = &p.default {
            fields.push((format!("parameter '{}' default", p.name), t.as_str()));
        }
        for c in &p.choices {
            fields.push((format!("parameter '{}' choice", p.name), c.value.as_str()));
            fields.push((format!("parameter '{}' choice label", p.name), c.label.as_str()));
        }
    }

    for (field, text) in fields {
        markup::check_xml_text(&field, text)?;
    }
    Ok(())
}
