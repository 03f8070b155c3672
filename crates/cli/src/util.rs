use unicode_width::UnicodeWidthStr;

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Left-align `s` in `width` display columns. Never truncates.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(sw)))
}

/// Right-align `s` in `width` display columns. Never truncates.
pub(crate) fn pad_left(s: &str, width: usize) -> String {
    let sw = display_width(s);
    format!("{}{}", " ".repeat(width.saturating_sub(sw)), s)
}

/// Center `s` in `width` display columns; odd slack goes to the right.
pub(crate) fn pad_center(s: &str, width: usize) -> String {
    let slack = width.saturating_sub(display_width(s));
    let left = slack / 2;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(slack - left))
}

/// `0.5` -> `50.0%`.
pub(crate) fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
