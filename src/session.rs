//! Per-session dispatch into the external render capability.
//!
//! A [`MathSession`] holds the normalized options and the renderer for one
//! run over one document (or batch). Options are read-only once built; the
//! only session-scoped mutation is the one-time font push, which happens
//! before the first render and never after it.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::warn;

use crate::options::{ConfigError, RawOptions, RenderOptions};
use crate::renderer::{FormulaImage, FormulaRenderer, MathKind, RenderPayload, RendererError};

/// Classified result of dispatching one math region.
///
/// Produced per region, consumed immediately by the embedder, not retained.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The engine produced an image; passed through unchanged.
    Rendered { image: FormulaImage, source: String },
    /// The engine produced its own error presentation; forwarded as-is.
    EngineFragment(String),
    /// The call into the capability failed. Carries the original formula and
    /// a sanitized diagnostic; the raw error never reaches the host parser.
    Failed { message: String, source: String },
}

/// One processing session: normalized options plus the render capability.
///
/// Sessions are cheap to share (`Arc`) and safe to hold per document, so
/// concurrent documents with different font configurations do not cross-talk.
pub struct MathSession {
    renderer: Arc<dyn FormulaRenderer>,
    options: RenderOptions,
    fonts_pushed: OnceCell<()>,
}

impl fmt::Debug for MathSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MathSession")
            .field("options", &self.options)
            .field("fonts_pushed", &self.fonts_pushed.get().is_some())
            .finish_non_exhaustive()
    }
}

impl MathSession {
    /// Normalize `raw` and build a session. Fails only on configuration
    /// errors, which are fatal to session start.
    pub fn new(renderer: Arc<dyn FormulaRenderer>, raw: &RawOptions) -> Result<Self, ConfigError> {
        Ok(Self::with_options(renderer, raw.normalize()?))
    }

    /// Build a session from already-normalized options.
    pub fn with_options(renderer: Arc<dyn FormulaRenderer>, options: RenderOptions) -> Self {
        Self {
            renderer,
            options,
            fonts_pushed: OnceCell::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render one region and classify the outcome.
    ///
    /// Never panics or propagates renderer errors: a malformed formula must
    /// not abort processing of the rest of the document.
    pub fn dispatch(&self, source: &str, kind: MathKind) -> RenderOutcome {
        self.push_fonts_once();

        match self.renderer.render(source, kind, &self.options) {
            Ok(RenderPayload::Image(image)) => RenderOutcome::Rendered {
                image,
                source: source.to_string(),
            },
            Ok(RenderPayload::ErrorFragment(fragment)) => RenderOutcome::EngineFragment(fragment),
            Err(err) => {
                warn!(
                    target = "mathspan::session",
                    delimiter = kind.delimiter(),
                    formula_len = source.len(),
                    error = %err,
                    "formula render call failed"
                );
                RenderOutcome::Failed {
                    message: sanitize_message(&err),
                    source: source.to_string(),
                }
            }
        }
    }

    /// Push the configured fonts to the engine, once per session, before the
    /// first render. A failed push is logged and the session proceeds with
    /// whatever font state is active.
    fn push_fonts_once(&self) {
        if !self.options.fonts.is_configured() {
            return;
        }
        self.fonts_pushed.get_or_init(|| {
            if let Err(err) = self.renderer.set_fonts(&self.options.fonts) {
                warn!(
                    target = "mathspan::session",
                    error = %err,
                    "font configuration push failed; continuing with active fonts"
                );
            }
        });
    }
}

/// Collapse an infrastructure error into a single-line, bounded diagnostic
/// suitable for a `title` attribute.
fn sanitize_message(err: &RendererError) -> String {
    const MAX_LEN: usize = 240;

    let cleaned: String = err
        .to_string()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let mut message = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if message.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
        message.push_str("...");
    }

    if message.is_empty() {
        message.push_str("render call failed");
    }

    message
}
