//! Delimiter scanner: recognizes `$...$` and `$$...$$` math regions.
//!
//! The scanning itself is pure — `scan_inline` and the block probe decide
//! match/no-match without touching parser state — and the `markdown_it` rule
//! implementations commit the result. A failed scan consumes nothing so the
//! host parser is free to try other rules at the same position.

mod block;
mod inline;

pub use block::BlockMathScanner;
pub use inline::InlineMathScanner;

use markdown_it::{Node, NodeValue, Renderer};

/// An inline math region. `content` is the literal text between the `$`
/// delimiters, trimmed, never empty.
#[derive(Debug)]
pub struct InlineMath {
    pub content: String,
}

impl NodeValue for InlineMath {
    // Fallback rendering when no render pass replaced the node: the literal
    // source, escaped, in the inline container.
    fn render(&self, _: &Node, fmt: &mut dyn Renderer) {
        fmt.open("span", &[("class", "mathspan mathspan-inline".to_string())]);
        fmt.text(&self.content);
        fmt.close("span");
    }
}

/// A block math region. `content` is the trimmed join of the lines between
/// the `$$` markers, never empty.
#[derive(Debug)]
pub struct BlockMath {
    pub content: String,
}

impl NodeValue for BlockMath {
    fn render(&self, _: &Node, fmt: &mut dyn Renderer) {
        fmt.cr();
        fmt.open("div", &[("class", "mathspan mathspan-block".to_string())]);
        fmt.text(&self.content);
        fmt.close("div");
        fmt.cr();
    }
}
