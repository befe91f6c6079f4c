//! Block `$$...$$` scanning.

use markdown_it::parser::block::{BlockRule, BlockState};
use markdown_it::Node;

use super::BlockMath;

const MARKER: &str = "$$";

/// Result of a successful block scan.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BlockMatch {
    content: String,
    line_count: usize,
}

/// Pure probe over the parser's line window. Reports match/no-match without
/// mutating anything; `run` commits the result.
fn scan(state: &BlockState) -> Option<BlockMatch> {
    let start = state.line;

    // four spaces of indentation means indented code, not math
    if state.line_indent(start) >= 4 {
        return None;
    }

    let first = state.get_line(start).trim_start();
    let rest = first.strip_prefix(MARKER)?;

    // fast path: the opening line also closes the block
    if let Some(inner) = rest.trim_end().strip_suffix(MARKER) {
        let content = inner.trim();
        if content.is_empty() {
            return None;
        }
        return Some(BlockMatch {
            content: content.to_string(),
            line_count: 1,
        });
    }

    // slow path: accumulate raw lines until a terminator
    let mut lines: Vec<&str> = vec![rest];
    let mut line = start + 1;
    while line < state.line_max {
        let text = state.get_line(line);
        let trimmed = text.trim();

        if !trimmed.is_empty() && state.line_indent(line) < 0 {
            // the enclosing block ended before the math did
            return None;
        }
        if trimmed == MARKER {
            return finish(lines, line - start + 1);
        }
        if let Some(head) = text.trim_end().strip_suffix(MARKER) {
            // terminator with content: strip the marker from the tail
            lines.push(head);
            return finish(lines, line - start + 1);
        }

        lines.push(text);
        line += 1;
    }

    // no terminator before the region ran out: the rule does not apply
    None
}

fn finish(lines: Vec<&str>, line_count: usize) -> Option<BlockMatch> {
    let content = lines.join("\n").trim().to_string();
    if content.is_empty() {
        return None;
    }
    Some(BlockMatch {
        content,
        line_count,
    })
}

/// Block rule: triggered on a line opening with `$$`, registered before the
/// generic fence rule.
pub struct BlockMathScanner;

impl BlockRule for BlockMathScanner {
    // silent probe: report feasibility without committing anything
    fn check(state: &mut BlockState) -> Option<()> {
        scan(state).map(|_| ())
    }

    fn run(state: &mut BlockState) -> Option<(Node, usize)> {
        let matched = scan(state)?;

        let mut node = Node::new(BlockMath {
            content: matched.content,
        });
        node.srcmap = state.get_map(state.line, state.line + matched.line_count - 1);
        Some((node, matched.line_count))
    }
}
