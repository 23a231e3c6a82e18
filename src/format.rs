use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Truncates to `width` columns and pads with spaces up to it. `format!`
/// pads by char count, which misaligns wide glyphs.
pub fn fit_unicode(s: &str, width: usize) -> String {
    let mut out = truncate_unicode(s, width);
    let used = out.width();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

pub fn format_percent(value: f32) -> String {
    format!("{value:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate_unicode("chromium-browser", 8), "chromiu\u{2026}");
        assert_eq!(truncate_unicode("bash", 8), "bash");
    }

    #[test]
    fn fit_pads_by_display_width() {
        assert_eq!(fit_unicode("sh", 4), "sh  ");
        // CJK glyphs are two columns wide
        assert_eq!(fit_unicode("\u{65e5}\u{672c}", 6), "\u{65e5}\u{672c}  ");
        assert_eq!(fit_unicode("abcdefgh", 4), "abc\u{2026}");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(85.0), "85.0");
        assert_eq!(format_percent(0.04), "0.0");
        assert_eq!(format_percent(312.46), "312.5");
    }
}
