//! ANSI SGR color codes → HTML spans.
//!
//! Deploy logs arrive from the node agent with terminal colors; this
//! renders them into `<span>`s carrying the dashboard's text color
//! classes. Unknown codes are ignored, `0` resets.

use regex::Regex;
use std::sync::OnceLock;

fn sgr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\x1b\[([0-9;]*)m").expect("valid regex"))
}

fn color_class(code: &str) -> Option<&'static str> {
    Some(match code {
        "30" => "text-black",
        "31" => "text-red-500",
        "32" => "text-green-500",
        "33" => "text-yellow-500",
        "34" => "text-blue-500",
        "35" => "text-purple-500",
        "36" => "text-cyan-500",
        "37" => "text-gray-300",
        "90" => "text-gray-500",
        "91" => "text-red-400",
        "92" => "text-green-400",
        "93" => "text-yellow-400",
        "94" => "text-blue-400",
        "95" => "text-purple-400",
        "96" => "text-cyan-400",
        "97" => "text-white",
        _ => return None,
    })
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}

/// Convert ANSI-colored text into escaped HTML.
pub fn ansi_to_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut current: Option<&'static str> = None;
    let mut cursor = 0;

    let mut emit = |out: &mut String, chunk: &str, color: Option<&'static str>| {
        if chunk.is_empty() {
            return;
        }
        match color {
            Some(class) => {
                out.push_str(&format!("<span class=\"{class}\">"));
                escape_into(out, chunk);
                out.push_str("</span>");
            }
            None => escape_into(out, chunk),
        }
    };

    for capture in sgr_pattern().captures_iter(text) {
        let whole = capture.get(0).expect("capture 0 always present");
        emit(&mut out, &text[cursor..whole.start()], current);
        cursor = whole.end();

        for code in capture[1].split(';') {
            if code == "0" {
                current = None;
            } else if let Some(class) = color_class(code) {
                current = Some(class);
            }
        }
    }
    emit(&mut out, &text[cursor..], current);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_escaped() {
        assert_eq!(ansi_to_html("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn colored_segment_becomes_span() {
        let html = ansi_to_html("\u{1b}[32mok\u{1b}[0m done");
        assert_eq!(html, "<span class=\"text-green-500\">ok</span> done");
    }

    #[test]
    fn color_persists_until_reset() {
        let html = ansi_to_html("\u{1b}[31merr: <boom>\u{1b}[0m");
        assert_eq!(html, "<span class=\"text-red-500\">err: &lt;boom&gt;</span>");
    }

    #[test]
    fn unknown_codes_are_ignored() {
        // Bold (1) is not in the color map; the text stays uncolored.
        assert_eq!(ansi_to_html("\u{1b}[1mplain"), "plain");
        // An unknown code does not clear an active color.
        let html = ansi_to_html("\u{1b}[32ma\u{1b}[1mb");
        assert_eq!(
            html,
            "<span class=\"text-green-500\">a</span><span class=\"text-green-500\">b</span>"
        );
    }

    #[test]
    fn multiple_codes_last_color_wins() {
        let html = ansi_to_html("\u{1b}[31;92mup");
        assert_eq!(html, "<span class=\"text-green-400\">up</span>");
    }

    #[test]
    fn bright_palette() {
        let html = ansi_to_html("\u{1b}[90mfaint\u{1b}[0m");
        assert_eq!(html, "<span class=\"text-gray-500\">faint</span>");
    }
}
