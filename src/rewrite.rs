//! Render pass: walks the parsed tree, dispatches every recognized math
//! region through the session, and swaps the scanned nodes for their final
//! fragments. Runs as a core rule after inline parsing.

use std::sync::Arc;

use markdown_it::parser::core::CoreRule;
use markdown_it::parser::extset::MarkdownItExt;
use markdown_it::{MarkdownIt, Node};

use crate::embed::{embed, RenderedMath};
use crate::renderer::MathKind;
use crate::scanner::{BlockMath, InlineMath};
use crate::session::MathSession;

/// Parser extension slot carrying the session configured at registration.
#[derive(Debug, Clone)]
pub(crate) struct SessionHandle(pub Arc<MathSession>);

impl MarkdownItExt for SessionHandle {}

pub struct MathRenderRule;

impl CoreRule for MathRenderRule {
    fn run(root: &mut Node, md: &MarkdownIt) {
        let Some(handle) = md.ext.get::<SessionHandle>() else {
            // no session registered: leave the scanned nodes to their
            // source-preserving fallback rendering
            return;
        };
        let session = Arc::clone(&handle.0);

        root.walk_mut(|node, _| {
            let region = if let Some(math) = node.cast::<InlineMath>() {
                Some((math.content.clone(), MathKind::Inline))
            } else if let Some(math) = node.cast::<BlockMath>() {
                Some((math.content.clone(), MathKind::Block))
            } else {
                None
            };

            if let Some((content, kind)) = region {
                let outcome = session.dispatch(&content, kind);
                let fragment = embed(outcome, kind);
                node.replace(RenderedMath { fragment });
            }
        });
    }
}
