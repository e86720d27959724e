//! Grapheme width helpers for plain (escape-free) text.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 3;

pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    if grapheme == "\t" {
        return TAB_WIDTH;
    }

    if emoji_get(grapheme).is_some() {
        return 2;
    }

    grapheme
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

pub fn visible_width(text: &str) -> usize {
    text.graphemes(true).map(grapheme_width).sum()
}

/// Cuts `text` to at most `max_width` columns, ending in `ellipsis` when
/// something was dropped.
pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str) -> String {
    if max_width == 0 {
        return String::new();
    }
    if visible_width(text) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = visible_width(ellipsis);
    if ellipsis_width >= max_width {
        return take_width(ellipsis, max_width);
    }

    let mut out = take_width(text, max_width - ellipsis_width);
    out.push_str(ellipsis);
    out
}

/// Hard-wraps one logical line into rows of at most `width` columns,
/// preferring to break after whitespace. A grapheme wider than `width` fits
/// no row and is dropped, as truncation does.
pub fn wrap_to_width(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    if line.is_empty() {
        return vec![String::new()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    // Byte index in `current` just past the last whitespace grapheme.
    let mut last_break: Option<usize> = None;

    for grapheme in line.graphemes(true) {
        let grapheme_cols = grapheme_width(grapheme);
        if grapheme_cols > width {
            continue;
        }

        if current_width + grapheme_cols > width {
            if let Some(split_at) = last_break.take() {
                let carry = current.split_off(split_at);
                let row = current.trim_end();
                if !row.is_empty() {
                    rows.push(row.to_string());
                }
                current_width = visible_width(&carry);
                current = carry;
            }
            // The carried word may still leave no room.
            if current_width + grapheme_cols > width {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
        }

        current.push_str(grapheme);
        current_width += grapheme_cols;
        if grapheme.chars().all(char::is_whitespace) {
            last_break = Some(current.len());
        }
    }

    rows.push(current);
    rows
}

fn take_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let cols = grapheme_width(grapheme);
        if used + cols > max_width {
            break;
        }
        out.push_str(grapheme);
        used += cols;
    }
    out
}
