//! Tera rendering engine: [`TemplateEngine`] and [`Renderer`].
//!
//! Output paths are rendered with the same context as file bodies, so
//! `{{ ext_name }}.inx` becomes `spiral_gen.inx`. Templates whose pattern
//! ends in `.inx` or `.xml` are autoescaped with [`markup::escape_xml`].

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use tera::Tera;
use tracing::debug;

use inx_core::ExtensionConfig;

use crate::catalog::{TemplateSet, TemplateSource};
use crate::context::TemplateContext;
use crate::error::RenderError;
use crate::markup;

/// Output patterns rendered with XML escaping.
const XML_SUFFIXES: [&str; 2] = [".inx", ".xml"];

/// One generated file, path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Name of the variable behind a Tera "not found in context" failure, if that
/// is what `err` is. Tera wraps the lookup error in a per-template message, so
/// the whole source chain is searched.
fn undefined_variable(err: &tera::Error) -> Option<String> {
    let mut current: Option<&dyn std::error::Error> = Some(err);
    while let Some(e) = current {
        let msg = e.to_string();
        if msg.contains("not found in context") {
            if let Some(rest) = msg.split_once("Variable `").map(|(_, r)| r) {
                if let Some((token, _)) = rest.split_once('`') {
                    return Some(token.to_owned());
                }
            }
        }
        current = e.source();
    }
    None
}

fn classify(template: &str, source: tera::Error) -> RenderError {
    match undefined_variable(&source) {
        Some(token) => RenderError::UnknownPlaceholder {
            template: template.to_owned(),
            token,
        },
        None => RenderError::Template {
            template: template.to_owned(),
            source,
        },
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Accept only non-empty relative paths made of plain components.
fn safe_relative(template: &str, rendered: &str) -> Result<PathBuf, RenderError> {
    let path = Path::new(rendered);
    let plain = path
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if rendered.trim().is_empty() || !plain || path.components().next().is_none() {
        return Err(RenderError::UnsafePath {
            template: template.to_owned(),
            path: rendered.to_owned(),
        });
    }
    Ok(path.to_path_buf())
}

fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n")
    } else {
        text
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera instance loaded with the text templates of one [`TemplateSet`].
///
/// Template names are the set's path patterns, so autoescaping follows the
/// output file's suffix.
pub struct TemplateEngine {
    tera: Tera,
    set: TemplateSet,
}

impl TemplateEngine {
    /// Parse every text template of `set`.
    pub fn new(set: &TemplateSet) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(XML_SUFFIXES.to_vec());
        tera.set_escape_fn(markup::escape_xml);

        let templates: Vec<(&str, &str)> = set
            .files
            .iter()
            .filter_map(|f| match &f.source {
                TemplateSource::Text(text) => Some((f.path_pattern.as_str(), text.as_str())),
                TemplateSource::Static(_) => None,
            })
            .collect();

        if let Err(source) = tera.add_raw_templates(templates.clone()) {
            return Err(RenderError::Template {
                template: culprit(&templates),
                source,
            });
        }
        Ok(TemplateEngine {
            tera,
            set: set.clone(),
        })
    }

    /// Render every file of the set, in set order.
    pub fn render(&self, ctx: &TemplateContext) -> Result<Vec<RenderedFile>, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let mut seen = BTreeSet::new();
        let mut results = Vec::with_capacity(self.set.files.len());

        for file in &self.set.files {
            let pattern = file.path_pattern.as_str();
            let rendered_path = Tera::one_off(pattern, &tera_ctx, false)
                .map_err(|e| classify(pattern, e))?;
            let path = safe_relative(pattern, &rendered_path)?;
            if !seen.insert(path.clone()) {
                return Err(RenderError::DuplicateOutput { path });
            }

            let contents = match &file.source {
                TemplateSource::Text(_) => {
                    let text = self
                        .tera
                        .render(pattern, &tera_ctx)
                        .map_err(|e| classify(pattern, e))?;
                    normalize_newlines(text).into_bytes()
                }
                TemplateSource::Static(bytes) => bytes.clone(),
            };
            debug!(template = pattern, path = %path.display(), bytes = contents.len(), "rendered");
            results.push(RenderedFile { path, contents });
        }
        Ok(results)
    }
}

/// The first template that fails to parse on its own, for error messages.
fn culprit(templates: &[(&str, &str)]) -> String {
    templates
        .iter()
        .find(|(name, text)| Tera::default().add_raw_template(name, text).is_err())
        .or(templates.first())
        .map(|(name, _)| (*name).to_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders an [`ExtensionConfig`] through a [`TemplateSet`].
pub struct Renderer;

impl Renderer {
    /// Build the context from `config` and render every file of `set`.
    pub fn render(
        config: &ExtensionConfig,
        set: &TemplateSet,
    ) -> Result<Vec<RenderedFile>, RenderError> {
        let ctx = TemplateContext::from_config(config)?;
        TemplateEngine::new(set)?.render(&ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, TemplateFile};
    use inx_core::config::{self, Format};
    use inx_core::Category;

    fn config(yaml: &str) -> ExtensionConfig {
        config::from_str(yaml, Format::Yaml, Path::new("test.yaml")).unwrap()
    }

    fn custom(files: &[(&str, &str)]) -> TemplateSet {
        TemplateSet {
            category: Category::Custom,
            origin: None,
            files: files
                .iter()
                .map(|(p, t)| TemplateFile {
                    path_pattern: (*p).to_owned(),
                    source: TemplateSource::Text((*t).to_owned()),
                })
                .collect(),
        }
    }

    #[test]
    fn all_bundled_categories_render() {
        for category in [Category::BasicEffect, Category::InputOutput, Category::Render] {
            let cfg = config(&format!("name: demo\ntype: {category}\n"));
            let set = Catalog::resolve(category, None).unwrap();
            let files = Renderer::render(&cfg, &set)
                .unwrap_or_else(|e| panic!("render failed for {category}: {e}"));
            let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
            assert_eq!(
                paths,
                [PathBuf::from("demo.py"), PathBuf::from("demo.inx"), PathBuf::from("README.md")]
            );
        }
    }

    #[test]
    fn unknown_placeholder_names_template_and_token() {
        let cfg = config("name: demo\n");
        let set = custom(&[("notes.txt", "Hello {{ ext_nme }}")]);
        let err = Renderer::render(&cfg, &set).unwrap_err();
        match err {
            RenderError::UnknownPlaceholder { template, token } => {
                assert_eq!(template, "notes.txt");
                assert_eq!(token, "ext_nme");
            }
            other => panic!("expected UnknownPlaceholder, got {other}"),
        }
    }

    #[test]
    fn unknown_placeholder_in_path_is_reported() {
        let cfg = config("name: demo\n");
        let set = custom(&[("{{ module }}.py", "pass")]);
        let err = Renderer::render(&cfg, &set).unwrap_err();
        assert!(
            matches!(err, RenderError::UnknownPlaceholder { ref token, .. } if token == "module"),
            "got: {err}"
        );
    }

    #[test]
    fn syntax_error_is_a_template_error() {
        let cfg = config("name: demo\n");
        let set = custom(&[("ok.txt", "fine"), ("broken.txt", "{% if %}")]);
        let err = Renderer::render(&cfg, &set).unwrap_err();
        assert!(
            matches!(err, RenderError::Template { ref template, .. } if template == "broken.txt"),
            "got: {err}"
        );
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let cfg = config("name: demo\n");
        for pattern in ["../{{ ext_name }}.py", "/etc/{{ ext_name }}"] {
            let set = custom(&[(pattern, "x")]);
            let err = Renderer::render(&cfg, &set).unwrap_err();
            assert!(matches!(err, RenderError::UnsafePath { .. }), "{pattern}: {err}");
        }
    }

    #[test]
    fn duplicate_outputs_are_rejected() {
        let cfg = config("name: demo\n");
        let set = custom(&[("{{ ext_name }}.txt", "a"), ("demo.txt", "b")]);
        let err = Renderer::render(&cfg, &set).unwrap_err();
        assert!(matches!(err, RenderError::DuplicateOutput { .. }), "got: {err}");
    }

    #[test]
    fn crlf_is_normalised() {
        let cfg = config("name: demo\n");
        let set = custom(&[("a.txt", "one\r\ntwo\r\n")]);
        let files = Renderer::render(&cfg, &set).unwrap();
        assert_eq!(files[0].contents, b"one\ntwo\n");
    }

    #[test]
    fn xml_suffix_enables_escaping() {
        let cfg = config("name: demo\nmetadata:\n  author: \"<Tom & Jerry>\"\n");
        let set = custom(&[("a.xml", "{{ author }}"), ("a.txt", "{{ author }}")]);
        let files = Renderer::render(&cfg, &set).unwrap();
        assert_eq!(files[0].contents, b"&lt;Tom &amp; Jerry&gt;");
        assert_eq!(files[1].contents, b"<Tom & Jerry>");
    }
}
