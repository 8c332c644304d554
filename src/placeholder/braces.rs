//! `{}` and `{N}` marker scanner.
//!
//! Single forward pass, one bit of state: whether the previous character left
//! us inside an escape. `\` toggles it, anything else clears it, so `\{}` is
//! literal text and `\\{}` is a backslash followed by a real marker.

use super::{PlaceholderCount, TextRange};

const ESCAPE: u8 = b'\\';

/// Scan `text` for brace markers.
///
/// With `indexed`, `{N}` (one or more ASCII digits) also counts as a marker.
/// Brace scanning never fails: unmatched braces are plain text.
pub fn scan(text: &str, indexed: bool) -> PlaceholderCount {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut escaped = false;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];

        if c == ESCAPE {
            escaped = !escaped;
            i += 1;
            continue;
        }

        if c == b'{' && !escaped {
            if let Some(end) = marker_end(bytes, i, indexed) {
                log::trace!("brace marker at {}..{}", i, end);
                ranges.push(TextRange::new(i, end));
                i = end;
                continue;
            }
        }

        escaped = false;
        i += 1;
    }

    PlaceholderCount::exactly(ranges)
}

/// End offset of the marker opening at `open`, if one opens there.
fn marker_end(bytes: &[u8], open: usize, indexed: bool) -> Option<usize> {
    let mut j = open + 1;
    if indexed {
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
    }
    (bytes.get(j) == Some(&b'}')).then_some(j + 1)
}
