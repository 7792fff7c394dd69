use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Formats seconds as `mm:ss`; minutes grow past two digits when needed
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Rounds a `[0, 1]` fraction to a whole percentage
pub fn percent(fraction: f64) -> u16 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u16
}

/// Cuts `text` to at most `max_width` terminal columns, ending with `…`
/// when anything was dropped.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
