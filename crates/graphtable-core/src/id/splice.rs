//! Splicing of multi-part text ids.
//!
//! Parts are joined with [`SPLITOR`]; occurrences of the splitor or of
//! [`ESCAPE`] inside a part are escaped so `split(concat(parts)) == parts`.

/// Separator between id parts.
pub const SPLITOR: char = '>';

/// Escape marker for separators embedded inside a part.
pub const ESCAPE: char = '`';

/// Join parts into one spliced id string.
#[must_use]
pub fn concat<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::new();

    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(SPLITOR);
        }
        for ch in part.as_ref().chars() {
            if ch == SPLITOR || ch == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(ch);
        }
    }

    out
}

/// Split a spliced id string back into its parts.
#[must_use]
pub fn split(id: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for ch in id.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
        } else if ch == ESCAPE {
            escaped = true;
        } else if ch == SPLITOR {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    parts.push(current);

    parts
}

/// Prefix shared by every spliced id that starts with `parts`.
///
/// The trailing separator keeps `l1` from matching ids under `l10`.
#[must_use]
pub fn splice_prefix<S: AsRef<str>>(parts: &[S]) -> String {
    let mut prefix = concat(parts);
    prefix.push(SPLITOR);

    prefix
}

///
/// TESTS
///
