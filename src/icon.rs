//! Icon model and markup extraction from icon modules.
//!
//! Each icon in the registry is a small module whose body exports a single
//! template literal holding the SVG markup:
//!
//! ```text
//! export default `<svg ...>...</svg>`;
//! ```
//!
//! Only the first such literal is used. Modules exporting several literals
//! are not supported and yield the first one.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Markup shown for modules whose literal could not be found.
pub const PLACEHOLDER_MARKUP: &str = r#"<svg viewBox="0 0 24 24"><text x="50%" y="50%" text-anchor="middle" dominant-baseline="middle">?</text></svg>"#;

static EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)export default `(.*?)`").expect("valid regex"));

static VIEW_BOX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"viewBox\s*=\s*["']([^"']*)["']"#).expect("valid regex"));

static SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:path|circle|rect|line|polyline|polygon|ellipse|text)\b").expect("valid regex")
});

/// A named markup fragment representing a vector graphic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    /// Unique name, the source file name without its suffix.
    pub name: String,
    /// SVG markup, or [`PLACEHOLDER_MARKUP`] when extraction failed.
    pub content: String,
}

impl Icon {
    /// Creates an icon from a name and its markup.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Builds an icon from a module file name and the module's source text.
    #[must_use]
    pub fn from_module(file_name: &str, suffix: &str, module_text: &str) -> Self {
        Self::new(icon_name(file_name, suffix), extract_markup(module_text))
    }

    /// Returns true if the markup is the placeholder glyph.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.content == PLACEHOLDER_MARKUP
    }
}

/// Returns the inner text of the first `` export default `...` `` literal in
/// `module_text`, or [`PLACEHOLDER_MARKUP`] if there is none.
///
/// An empty literal is treated as missing.
#[must_use]
pub fn extract_markup(module_text: &str) -> String {
    EXPORT_RE
        .captures(module_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|inner| !inner.is_empty())
        .map_or_else(|| PLACEHOLDER_MARKUP.to_string(), str::to_string)
}

/// Derives an icon name by stripping `suffix` from the end of `file_name`.
#[must_use]
pub fn icon_name(file_name: &str, suffix: &str) -> String {
    file_name
        .strip_suffix(suffix)
        .unwrap_or(file_name)
        .to_string()
}

/// A compact description of a markup fragment for text-only previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSummary {
    /// The `viewBox` attribute of the root element, if present.
    pub view_box: Option<String>,
    /// Number of drawing elements.
    pub shapes: usize,
}

impl MarkupSummary {
    /// Summarizes `content`.
    #[must_use]
    pub fn of(content: &str) -> Self {
        Self {
            view_box: VIEW_BOX_RE
                .captures(content)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string()),
            shapes: SHAPE_RE.find_iter(content).count(),
        }
    }

    /// Width and height from the `viewBox`, e.g. `"24x24"`.
    #[must_use]
    pub fn dimensions(&self) -> Option<String> {
        let parts: Vec<&str> = self.view_box.as_deref()?.split_whitespace().collect();
        match parts.as_slice() {
            [_, _, w, h] => Some(format!("{w}x{h}")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extracts_inner_text() {
        let module = "export default `<svg>A</svg>`;";
        assert_eq!(extract_markup(module), "<svg>A</svg>");
    }

    #[test]
    fn extracts_multiline_literal() {
        let module = "// generated\nexport default `<svg viewBox=\"0 0 24 24\">\n  <path d=\"M0 0\"/>\n</svg>`;\n";
        assert_eq!(
            extract_markup(module),
            "<svg viewBox=\"0 0 24 24\">\n  <path d=\"M0 0\"/>\n</svg>"
        );
    }

    #[test]
    fn first_literal_wins() {
        let module = "export default `<svg>1</svg>`;\nexport default `<svg>2</svg>`;";
        assert_eq!(extract_markup(module), "<svg>1</svg>");
    }

    #[test]
    fn missing_literal_yields_placeholder() {
        assert_eq!(extract_markup("export const x = 1;"), PLACEHOLDER_MARKUP);
        assert_eq!(extract_markup(""), PLACEHOLDER_MARKUP);
        assert_eq!(extract_markup("export default `unterminated"), PLACEHOLDER_MARKUP);
    }

    #[test]
    fn empty_literal_yields_placeholder() {
        assert_eq!(extract_markup("export default ``;"), PLACEHOLDER_MARKUP);
    }

    #[test]
    fn icon_from_module() {
        let icon = Icon::from_module("alert.ts", ".ts", "export default `<svg>A</svg>`");
        assert_eq!(icon, Icon::new("alert", "<svg>A</svg>"));
        assert!(!icon.is_placeholder());

        let broken = Icon::from_module("broken.ts", ".ts", "nothing here");
        assert!(broken.is_placeholder());
        assert!(!broken.content.is_empty());
    }

    #[test]
    fn icon_name_strips_suffix_once() {
        assert_eq!(icon_name("icon-add.ts", ".ts"), "icon-add");
        assert_eq!(icon_name("a.ts.ts", ".ts"), "a.ts");
        assert_eq!(icon_name("readme.md", ".ts"), "readme.md");
    }

    #[test]
    fn markup_summary_reads_view_box_and_shapes() {
        let summary = MarkupSummary::of(
            r#"<svg viewBox="0 0 24 24"><path d="M1"/><circle r="2"/></svg>"#,
        );
        assert_eq!(summary.view_box.as_deref(), Some("0 0 24 24"));
        assert_eq!(summary.shapes, 2);
        assert_eq!(summary.dimensions().as_deref(), Some("24x24"));
    }

    #[test]
    fn markup_summary_without_view_box() {
        let summary = MarkupSummary::of("<svg></svg>");
        assert_eq!(summary.view_box, None);
        assert_eq!(summary.shapes, 0);
        assert_eq!(summary.dimensions(), None);
    }

    proptest! {
        #[test]
        fn extract_never_panics_and_never_empty(text in ".*") {
            let markup = extract_markup(&text);
            prop_assert!(!markup.is_empty());
        }

        #[test]
        fn extract_returns_wrapped_literal(inner in "[^`]{1,64}") {
            let module = format!("// icon\nexport default `{inner}`;\n");
            prop_assert_eq!(extract_markup(&module), inner);
        }
    }
}
