use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Width of `s` in terminal columns (wide CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Fit `s` into `max_width` columns, ending in "..." when cut.
///
/// Widths of 3 or less have no room for an ellipsis, so the text is simply
/// cut. Returns the input unchanged (borrowed) when it already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(take_columns(s, max_width).to_string());
    }
    let head = take_columns(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{head}{ELLIPSIS}"))
}

/// Longest prefix of `s` that fits in `columns`.
fn take_columns(s: &str, columns: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > columns {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Bookmark names, urls and descriptions are single-line values that end up
/// rendered in the terminal, so every C0 control (including tab and newline)
/// and DEL is dropped, as are whole CSI (`ESC [ ... final`) and OSC
/// (`ESC ] ... BEL|ESC \`) sequences.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_control(c) {
                out.push(c);
            }
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                // Parameter and intermediate bytes, then one final byte
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    Cow::Owned(out)
}

fn is_control(c: char) -> bool {
    c < '\x20' || c == '\x7f'
}
