//! The external render capability boundary.
//!
//! The actual typesetting engine lives outside this crate and is reached
//! through [`FormulaRenderer`]. The result shape is an explicit tagged type:
//! an image payload, or a pre-formed error fragment the engine already
//! styled itself. Infrastructure failures (the call itself went wrong, not
//! the formula) surface as [`RendererError`] and are classified by the
//! dispatcher.

use thiserror::Error;

use crate::options::{FontConfig, OutputFormat, RenderOptions};

/// Delimiter kind of a recognized math region. Forwarded to the engine,
/// which may use it for layout decisions such as baseline alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathKind {
    Inline,
    Block,
}

impl MathKind {
    /// The literal delimiter that framed the region in the source document.
    pub fn delimiter(&self) -> &'static str {
        match self {
            MathKind::Inline => "$",
            MathKind::Block => "$$",
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, MathKind::Block)
    }
}

/// A successfully rasterized (or vectorized) formula.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaImage {
    /// Raw image bytes, SVG or PNG according to `format`.
    pub data: Vec<u8>,
    pub format: OutputFormat,
    /// Rendered width in `em` units, used for CSS sizing of the embedded image.
    pub width_em: f64,
    /// Rendered height in `em` units.
    pub height_em: f64,
}

/// What a render call produced when the call itself succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPayload {
    /// An image to embed.
    Image(FormulaImage),
    /// A markup fragment the engine already shaped as its own error
    /// presentation. Forwarded as-is, never wrapped again.
    ErrorFragment(String),
}

/// Infrastructure-level failures of the render capability: the call into the
/// engine went wrong, as opposed to the engine rejecting a formula.
#[derive(Debug, Clone, Error)]
pub enum RendererError {
    #[error("render engine unavailable: {message}")]
    Unavailable { message: String },
    #[error("render call failed: {message}")]
    Call { message: String },
    #[error("render call timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// The opaque formula-typesetting capability this crate delegates to.
///
/// Implementations must not mutate the shared options and may parallelize
/// internally; from the caller's perspective every call is blocking and
/// ordered.
pub trait FormulaRenderer: Send + Sync {
    /// Typeset `source` and produce an image (or a pre-formed error
    /// fragment). `source` is the literal region content, delimiters
    /// excluded.
    fn render(
        &self,
        source: &str,
        kind: MathKind,
        options: &RenderOptions,
    ) -> Result<RenderPayload, RendererError>;

    /// Session-scoped font push, invoked at most once per session before any
    /// render when fonts are configured. Engines without font support can
    /// keep the default no-op.
    fn set_fonts(&self, _fonts: &FontConfig) -> Result<(), RendererError> {
        Ok(())
    }
}
