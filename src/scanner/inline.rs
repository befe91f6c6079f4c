//! Inline `$...$` scanning.

use markdown_it::parser::inline::{InlineRule, InlineState};
use markdown_it::Node;

use super::InlineMath;

/// Result of a successful inline scan: the trimmed content and the number of
/// bytes consumed, opening and closing delimiter included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InlineMatch {
    pub content: String,
    pub len: usize,
}

/// Pure probe: does an inline math region start at `pos`?
///
/// Scans forward within `src[..max]`. A backslash escapes the following
/// character; `$$` is never a valid close (it belongs to the block marker);
/// a line break aborts; empty trimmed content rejects the match. On `None`
/// nothing is consumed.
pub(crate) fn scan_inline(src: &str, pos: usize, max: usize) -> Option<InlineMatch> {
    let bytes = src.as_bytes();

    if pos >= max || bytes[pos] != b'$' {
        return None;
    }
    // an escaping backslash directly before the marker makes it literal text
    if pos > 0 && bytes[pos - 1] == b'\\' {
        return None;
    }
    // `$$` opens a block elsewhere, never inline math
    if pos + 1 < max && bytes[pos + 1] == b'$' {
        return None;
    }

    let mut i = pos + 1;
    while i < max {
        match bytes[i] {
            b'\\' => {
                // skip the escaped character as a pair
                i += 1;
                if i < max {
                    i += utf8_width(bytes[i]);
                }
            }
            b'\n' | b'\r' => return None,
            b'$' => {
                if i + 1 < max && bytes[i + 1] == b'$' {
                    // not a close; skip past both and keep looking
                    i += 2;
                    continue;
                }
                let content = src[pos + 1..i].trim();
                if content.is_empty() {
                    return None;
                }
                return Some(InlineMatch {
                    content: content.to_string(),
                    len: i + 1 - pos,
                });
            }
            _ => i += 1,
        }
    }

    None
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        b if b < 0x80 => 1,
        b if b >> 5 == 0b110 => 2,
        b if b >> 4 == 0b1110 => 3,
        _ => 4,
    }
}

/// Inline rule: triggered on a single `$`, registered after escape handling.
pub struct InlineMathScanner;

impl InlineRule for InlineMathScanner {
    const MARKER: char = '$';

    fn run(state: &mut InlineState) -> Option<(Node, usize)> {
        let matched = scan_inline(&state.src, state.pos, state.pos_max)?;

        let mut node = Node::new(InlineMath {
            content: matched.content,
        });
        node.srcmap = state.get_map(state.pos, state.pos + matched.len);
        Some((node, matched.len))
    }
}
