//! markdown-it plugin that recognizes TeX math spans and replaces them with
//! externally rendered, self-contained images.
//!
//! The plugin scans markdown for inline (`$...$`) and block (`$$...$$`) math
//! regions, hands each one to an external [`FormulaRenderer`], and embeds the
//! result as a base64 `data:` URI image wrapped in a styled container. A
//! formula the engine cannot render becomes a clearly marked, escaped error
//! fragment; the rest of the document is unaffected.
//!
//! ```no_run
//! use std::sync::Arc;
//! use markdown_it::MarkdownIt;
//! use markdown_it_mathspan::{MathSession, RawOptions};
//! # use markdown_it_mathspan::{FormulaRenderer, MathKind, RenderOptions,
//! #     RenderPayload, RendererError};
//! # struct MyEngine;
//! # impl FormulaRenderer for MyEngine {
//! #     fn render(&self, _: &str, _: MathKind, _: &RenderOptions)
//! #         -> Result<RenderPayload, RendererError> { unimplemented!() }
//! # }
//!
//! let mut md = MarkdownIt::new();
//! markdown_it::plugins::cmark::add(&mut md);
//!
//! let session = MathSession::new(Arc::new(MyEngine), &RawOptions::default())?;
//! markdown_it_mathspan::add(&mut md, Arc::new(session));
//!
//! let html = md.parse("Euler: $e^{i\\pi} + 1 = 0$").render();
//! # Ok::<(), markdown_it_mathspan::ConfigError>(())
//! ```

mod embed;
mod options;
mod renderer;
mod rewrite;
mod scanner;
mod session;

use std::sync::Arc;

use markdown_it::plugins::cmark::block::fence::FenceScanner;
use markdown_it::plugins::cmark::inline::escape::EscapeScanner;
use markdown_it::MarkdownIt;

pub use embed::{embed, Fragment, RenderedMath};
pub use options::{
    ConfigError, FontConfig, FontSource, OutputFormat, RawFontConfig, RawFontSlot, RawOptions,
    RenderOptions,
};
pub use renderer::{FormulaImage, FormulaRenderer, MathKind, RenderPayload, RendererError};
pub use rewrite::MathRenderRule;
pub use scanner::{BlockMath, BlockMathScanner, InlineMath, InlineMathScanner};
pub use session::{MathSession, RenderOutcome};

use rewrite::SessionHandle;

/// Install the plugin: delimiter scanners, render pass, and the session they
/// dispatch through.
pub fn add(md: &mut MarkdownIt, session: Arc<MathSession>) {
    md.ext.insert(SessionHandle(session));
    add_rules(md);
}

/// Install only the scanner rules and render pass, without a session. Math
/// regions are still recognized as nodes; without a session they render as
/// their escaped source text.
pub fn add_rules(md: &mut MarkdownIt) {
    md.block.add_rule::<BlockMathScanner>().before::<FenceScanner>();
    md.inline.add_rule::<InlineMathScanner>().after::<EscapeScanner>();
    md.add_rule::<MathRenderRule>();
}
