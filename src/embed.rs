//! Turning render outcomes into markup-safe fragments.
//!
//! Successful renders become a base64 `data:` URI image inside a `span`
//! (inline) or `div` (block) container; failures become a visibly marked,
//! fully escaped error fragment carrying the diagnostic in its `title`
//! attribute. Engine-produced error fragments pass through untouched.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use markdown_it::{Node, NodeValue, Renderer};

use crate::renderer::{FormulaImage, MathKind};
use crate::session::RenderOutcome;

const CLASS_INLINE: &str = "mathspan mathspan-inline";
const CLASS_BLOCK: &str = "mathspan mathspan-block";
const CLASS_ERROR: &str = "mathspan mathspan-error";

/// Final markup substituted for a math region, tagged with its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub html: String,
    pub kind: MathKind,
}

/// Node value carrying an already-embedded fragment; installed by the render
/// pass in place of the scanned math nodes.
#[derive(Debug)]
pub struct RenderedMath {
    pub fragment: Fragment,
}

impl NodeValue for RenderedMath {
    fn render(&self, _: &Node, fmt: &mut dyn Renderer) {
        if self.fragment.kind.is_block() {
            fmt.cr();
            fmt.text_raw(&self.fragment.html);
            fmt.cr();
        } else {
            fmt.text_raw(&self.fragment.html);
        }
    }
}

/// Wrap a dispatch outcome into its final fragment.
pub fn embed(outcome: RenderOutcome, kind: MathKind) -> Fragment {
    let html = match outcome {
        RenderOutcome::Rendered { image, source } => {
            wrap_container(&image_html(&image, &source), kind)
        }
        // already self-identifies as an error presentation; no double-wrap
        RenderOutcome::EngineFragment(fragment) => fragment,
        RenderOutcome::Failed { message, source } => error_html(&message, &source, kind),
    };
    Fragment { html, kind }
}

fn wrap_container(inner: &str, kind: MathKind) -> String {
    match kind {
        MathKind::Inline => format!(r#"<span class="{CLASS_INLINE}">{inner}</span>"#),
        MathKind::Block => format!(r#"<div class="{CLASS_BLOCK}">{inner}</div>"#),
    }
}

fn image_html(image: &FormulaImage, source: &str) -> String {
    let b64 = STANDARD.encode(&image.data);
    format!(
        r#"<img style="width: {width:.4}em; height: {height:.4}em; vertical-align: middle;" src="data:{mime};base64,{b64}" alt="{alt}"/>"#,
        width = image.width_em,
        height = image.height_em,
        mime = image.format.mime_type(),
        alt = escape_attribute(source),
    )
}

fn error_html(message: &str, source: &str, kind: MathKind) -> String {
    let tag = if kind.is_block() { "div" } else { "span" };
    format!(
        r#"<{tag} class="{CLASS_ERROR}" title="{title}">{body}</{tag}>"#,
        title = escape_attribute(message),
        body = escape_text(source),
    )
}

/// Escape text for element content. Formula text is untrusted document
/// content; the reserved characters must never reach the output raw.
pub(crate) fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape text for attribute values; line breaks and tabs collapse to spaces.
pub(crate) fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OutputFormat;

    fn image() -> FormulaImage {
        FormulaImage {
            data: b"<svg/>".to_vec(),
            format: OutputFormat::Svg,
            width_em: 2.5,
            height_em: 1.25,
        }
    }

    #[test]
    fn success_wraps_inline_in_span() {
        let fragment = embed(
            RenderOutcome::Rendered {
                image: image(),
                source: "a+b".into(),
            },
            MathKind::Inline,
        );
        assert!(fragment.html.starts_with(r#"<span class="mathspan mathspan-inline">"#));
        assert!(fragment.html.ends_with("</span>"));
        assert!(fragment.html.contains("data:image/svg+xml;base64,"));
        assert!(fragment.html.contains(r#"alt="a+b""#));
    }

    #[test]
    fn success_wraps_block_in_div() {
        let fragment = embed(
            RenderOutcome::Rendered {
                image: image(),
                source: "E = mc^2".into(),
            },
            MathKind::Block,
        );
        assert!(fragment.html.starts_with(r#"<div class="mathspan mathspan-block">"#));
        assert!(fragment.html.ends_with("</div>"));
    }

    #[test]
    fn image_payload_is_base64_encoded() {
        let html = image_html(&image(), "x");
        assert!(html.contains(&STANDARD.encode(b"<svg/>")));
        assert!(html.contains("width: 2.5000em"));
        assert!(html.contains("height: 1.2500em"));
    }

    #[test]
    fn engine_fragment_passes_through_unwrapped() {
        let fragment = embed(
            RenderOutcome::EngineFragment(r#"<span class="engine-error">bad</span>"#.into()),
            MathKind::Block,
        );
        assert_eq!(fragment.html, r#"<span class="engine-error">bad</span>"#);
    }

    #[test]
    fn failure_fragment_escapes_formula_and_message() {
        let fragment = embed(
            RenderOutcome::Failed {
                message: r#"engine said "<boom>""#.into(),
                source: r#"\text{"<i>"} > 1"#.into(),
            },
            MathKind::Inline,
        );
        assert!(fragment.html.contains(r#"class="mathspan mathspan-error""#));
        assert!(fragment.html.contains("title=\"engine said &quot;&lt;boom&gt;&quot;\""));
        assert!(!fragment.html.contains("<boom>"));
        assert!(!fragment.html.contains("<i>"));
        assert!(fragment.html.contains("&lt;i&gt;"));
    }

    #[test]
    fn failure_fragment_shape() {
        let fragment = embed(
            RenderOutcome::Failed {
                message: "engine not reachable".into(),
                source: "x^2".into(),
            },
            MathKind::Block,
        );
        insta::assert_snapshot!(
            fragment.html,
            @r#"<div class="mathspan mathspan-error" title="engine not reachable">x^2</div>"#
        );
    }

    #[test]
    fn escape_text_covers_reserved_characters() {
        assert_eq!(escape_text(r#"a<b>"c"&d"#), "a&lt;b&gt;&quot;c&quot;&amp;d");
    }

    #[test]
    fn escape_attribute_flattens_line_breaks() {
        assert_eq!(escape_attribute("a\nb\tc"), "a b c");
    }
}
