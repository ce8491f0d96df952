//! Text shapes derived from parameters: XML escaping, `<param>` elements,
//! and Python literals for the generated script.
//!
//! # `<param>` element per kind
//!
//! | kind        | shape                                                                                  |
//! |-------------|----------------------------------------------------------------------------------------|
//! | int         | `<param name type="int" [min] [max] gui-text [gui-description]>5</param>`               |
//! | float       | `<param name type="float" [min] [max] precision gui-text [gui-description]>1.5</param>` |
//! | string      | `<param name type="string" gui-text [gui-description]>text</param>`                     |
//! | bool        | `<param name type="bool" gui-text [gui-description]>true</param>`                       |
//! | optiongroup | `<param name type="optiongroup" appearance gui-text …>default` + one `<option>` per choice |
//! | notebook    | `<param name type="notebook">default` + one `<page>` per choice                        |
//!
//! Multi-line elements are laid out for a two-space indent inside
//! `<inkscape-extension>`.

use inx_core::{ParamKind, ParamValue, ParameterSpec};

use crate::error::RenderError;

// ---------------------------------------------------------------------------
// XML
// ---------------------------------------------------------------------------

/// Escape the five XML special characters. Installed as Tera's escape function.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// XML 1.0 `Char` production (Rust `char` already excludes surrogates).
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Reject strings that escaping cannot make XML-legal.
pub fn check_xml_text(field: &str, text: &str) -> Result<(), RenderError> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(RenderError::InvalidXmlChar {
            field: field.to_owned(),
            code: c as u32,
        }),
        None => Ok(()),
    }
}

fn attr(name: &str, value: &str) -> String {
    format!(" {name}=\"{}\"", escape_xml(value))
}

/// The `<param>` element for `param`, with `default` already resolved to its kind.
pub fn param_element(param: &ParameterSpec, default: &ParamValue) -> String {
    let mut open = format!(
        "<param{}{}",
        attr("name", &param.name),
        attr("type", param.kind.as_str())
    );

    match param.kind {
        ParamKind::Int | ParamKind::Float => {
            if let Some(min) = param.min {
                open.push_str(&attr("min", &number(param.kind, min)));
            }
            if let Some(max) = param.max {
                open.push_str(&attr("max", &number(param.kind, max)));
            }
            if param.kind == ParamKind::Float {
                let precision = param.precision.unwrap_or_else(|| inferred_precision(default));
                open.push_str(&attr("precision", &precision.to_string()));
            }
        }
        ParamKind::OptionGroup => open.push_str(&attr("appearance", param.appearance.as_str())),
        ParamKind::String | ParamKind::Bool | ParamKind::Notebook => {}
    }

    if param.kind != ParamKind::Notebook {
        open.push_str(&attr("gui-text", &param.label));
        if let Some(description) = &param.description {
            open.push_str(&attr("gui-description", description));
        }
    }

    match param.kind {
        ParamKind::OptionGroup => {
            let mut xml = format!("{open}>{}\n", escape_xml(&display_value(default)));
            for choice in &param.choices {
                xml.push_str(&format!(
                    "    <option{}>{}</option>\n",
                    attr("value", &choice.value),
                    escape_xml(&choice.label)
                ));
            }
            xml.push_str("  </param>");
            xml
        }
        ParamKind::Notebook => {
            let mut xml = format!("{open}>{}\n", escape_xml(&display_value(default)));
            for page in &param.choices {
                xml.push_str(&format!(
                    "    <page{}{}/>\n",
                    attr("name", &page.value),
                    attr("gui-text", &page.label)
                ));
            }
            xml.push_str("  </param>");
            xml
        }
        _ => format!("{open}>{}</param>", escape_xml(&display_value(default))),
    }
}

/// Decimal places of the default, at least 1. `2.25` → 2.
fn inferred_precision(default: &ParamValue) -> u32 {
    match default {
        ParamValue::Float(x) => {
            let text = x.to_string();
            text.split_once('.')
                .map_or(1, |(_, frac)| frac.len().max(1) as u32)
        }
        _ => 1,
    }
}

// ---------------------------------------------------------------------------
// Plain-text values
// ---------------------------------------------------------------------------

/// Bound formatted for its kind: ints without a fraction, floats via [`float_literal`].
pub fn number(kind: ParamKind, value: f64) -> String {
    if kind == ParamKind::Int {
        (value as i64).to_string()
    } else {
        float_literal(value)
    }
}

/// `5.0` → `"5.0"` (never `"5"`), `1.25` → `"1.25"`.
pub fn float_literal(value: f64) -> String {
    let text = value.to_string();
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        format!("{text}.0")
    }
}

/// Human/XML text of a resolved value.
pub fn display_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Bool(b) => b.to_string(),
        ParamValue::Int(i) => i.to_string(),
        ParamValue::Float(x) => float_literal(*x),
        ParamValue::Text(s) => s.clone(),
    }
}

// ---------------------------------------------------------------------------
// Python
// ---------------------------------------------------------------------------

/// `argparse` `type=` for a kind.
pub fn python_type(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::Int => "int",
        ParamKind::Float => "float",
        ParamKind::Bool => "inkex.Boolean",
        ParamKind::String | ParamKind::OptionGroup | ParamKind::Notebook => "str",
    }
}

/// Python source literal for a resolved value.
pub fn python_literal(value: &ParamValue) -> String {
    match value {
        ParamValue::Bool(true) => "True".to_owned(),
        ParamValue::Bool(false) => "False".to_owned(),
        ParamValue::Int(i) => i.to_string(),
        ParamValue::Float(x) => float_literal(*x),
        ParamValue::Text(s) => python_string(s),
    }
}

/// `help=` literal: argparse %-formats help text, so `%` is doubled.
pub fn python_help(text: &str) -> String {
    python_string(&text.replace('%', "%%"))
}

/// Double-quoted Python string literal.
pub fn python_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32))
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use inx_core::Choice;

    #[test]
    fn escapes_all_five_specials() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
    }

    #[test]
    fn control_characters_are_not_xml() {
        assert!(check_xml_text("label", "tab\tand\nnewline").is_ok());
        let err = check_xml_text("label", "bell\u{7}").unwrap_err();
        assert!(err.to_string().contains("U+0007"));
    }

    #[test]
    fn int_element_matches_inkscape_shape() {
        let mut p = ParameterSpec::new("turns", ParamKind::Int);
        p.min = Some(1.0);
        p.max = Some(50.0);
        assert_eq!(
            param_element(&p, &ParamValue::Int(5)),
            r#"<param name="turns" type="int" min="1" max="50" gui-text="Turns">5</param>"#
        );
    }

    #[test]
    fn float_precision_is_inferred_from_default() {
        let p = ParameterSpec::new("width", ParamKind::Float);
        let xml = param_element(&p, &ParamValue::Float(2.25));
        assert!(xml.contains(r#"precision="2""#), "{xml}");
        assert!(xml.ends_with(">2.25</param>"), "{xml}");
        let xml = param_element(&p, &ParamValue::Float(3.0));
        assert!(xml.contains(r#"precision="1""#), "{xml}");
        assert!(xml.ends_with(">3.0</param>"), "{xml}");
    }

    #[test]
    fn optiongroup_lists_options_in_order() {
        let mut p = ParameterSpec::new("mode", ParamKind::OptionGroup);
        p.choices = vec![
            Choice { value: "a".into(), label: "First & best".into() },
            Choice { value: "b".into(), label: "Second".into() },
        ];
        let xml = param_element(&p, &ParamValue::Text("a".into()));
        assert_eq!(
            xml,
            "<param name=\"mode\" type=\"optiongroup\" appearance=\"radio\" gui-text=\"Mode\">a\n    <option value=\"a\">First &amp; best</option>\n    <option value=\"b\">Second</option>\n  </param>"
        );
    }

    #[test]
    fn choice_defaults_lead_the_element() {
        let mut mode = ParameterSpec::new("mode", ParamKind::OptionGroup);
        mode.choices = vec![
            Choice { value: "fast".into(), label: "Fast".into() },
            Choice { value: "exact".into(), label: "Exact".into() },
        ];
        let xml = param_element(&mode, &ParamValue::Text("exact".into()));
        assert!(xml.contains(r#"gui-text="Mode">exact"#), "{xml}");
        assert!(xml.find(r#"value="fast""#) < xml.find(r#"value="exact""#), "{xml}");

        let mut tab = ParameterSpec::new("tab", ParamKind::Notebook);
        tab.choices = vec![
            Choice { value: "main".into(), label: "Main".into() },
            Choice { value: "help".into(), label: "Help".into() },
        ];
        let xml = param_element(&tab, &ParamValue::Text("help".into()));
        assert!(xml.starts_with("<param name=\"tab\" type=\"notebook\">help\n"), "{xml}");
    }

    #[test]
    fn help_text_escapes_percent_for_argparse() {
        assert_eq!(python_help("50% scale"), r#""50%% scale""#);
        assert_eq!(python_help("plain"), r#""plain""#);
    }

    #[test]
    fn python_literals() {
        assert_eq!(python_literal(&ParamValue::Bool(true)), "True");
        assert_eq!(python_literal(&ParamValue::Float(5.0)), "5.0");
        assert_eq!(
            python_literal(&ParamValue::Text("say \"hi\"\n".into())),
            r#""say \"hi\"\n""#
        );
        assert_eq!(python_string("a\\b"), r#""a\\b""#);
    }
}
