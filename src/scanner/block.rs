//! Brace-balance block extraction over line-oriented source text.
//!
//! This is the shared core of the tag checker and the pipeline inventory
//! scanners: given a line sequence and a start index, find the contiguous
//! run of lines forming one `{`-delimited block, without parsing a full
//! grammar. Malformed input never errors; it degrades to a block that runs
//! to end-of-input.

/// A contiguous sub-range of a line sequence, `[start, end)`.
///
/// The block's first line is the line the scan started on (declaration
/// headers that precede the opening brace are retained), and its last line
/// is the one on which the brace count returned to zero or below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
}

impl Block {
    /// Borrow the block's lines out of the full line sequence.
    pub fn lines<'a>(&self, lines: &'a [&'a str]) -> &'a [&'a str] {
        &lines[self.start..self.end]
    }

    /// The block's lines joined back into a single string.
    pub fn text(&self, lines: &[&str]) -> String {
        lines[self.start..self.end].join("\n")
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Scan state: either still looking for the opening brace, or inside a
/// block at some nesting depth. Depth is signed and accumulates from the
/// start line even while outside, so stray closers before the first `{`
/// (over-closed input) drive the block to terminate instead of wrapping.
#[derive(Debug, Clone, Copy)]
enum ScanState {
    Outside(i32),
    Inside(i32),
}

/// Extract one brace-delimited block starting at (or after) `start_index`.
///
/// Returns the block and the index one past its last line. The line at
/// `start_index` does not need to contain the opening brace; scanning
/// advances until one is found. If no opening brace appears before
/// end-of-input the block degenerates to all remaining lines and the
/// returned index is `lines.len()` — callers must not assume a block was
/// found.
pub fn extract_block(lines: &[&str], start_index: usize) -> (Block, usize) {
    let mut state = ScanState::Outside(0);
    let mut i = start_index;

    while i < lines.len() {
        let opens = lines[i].matches('{').count() as i32;
        let closes = lines[i].matches('}').count() as i32;

        state = match state {
            ScanState::Outside(depth) if opens > 0 => ScanState::Inside(depth + opens - closes),
            ScanState::Outside(depth) => ScanState::Outside(depth - closes),
            ScanState::Inside(depth) => ScanState::Inside(depth + opens - closes),
        };

        i += 1;

        // Balanced or over-closed: the block ends on this line.
        if let ScanState::Inside(depth) = state {
            if depth <= 0 {
                break;
            }
        }
    }

    (
        Block {
            start: start_index,
            end: i,
        },
        i,
    )
}
