//! Label escaping and identifier sanitizing for generated Mermaid source
//!
//! Caller text is never interpolated raw. Text shown as a label goes through
//! [`escape_label`], text used as a node/class/participant id goes through
//! [`to_ident`].

/// Replace every character Mermaid treats as syntax with its entity code.
///
/// Line breaks and tabs collapse into a single space so a label can never
/// spill onto a new statement line.
pub fn escape_label(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            escaped.push(' ');
            pending_space = false;
        }
        match ch {
            '#' => escaped.push_str("#35;"),
            '"' => escaped.push_str("#quot;"),
            '[' => escaped.push_str("#91;"),
            ']' => escaped.push_str("#93;"),
            '{' => escaped.push_str("#123;"),
            '}' => escaped.push_str("#125;"),
            '(' => escaped.push_str("#40;"),
            ')' => escaped.push_str("#41;"),
            '<' => escaped.push_str("#lt;"),
            '>' => escaped.push_str("#gt;"),
            ';' => escaped.push_str("#59;"),
            '|' => escaped.push_str("#124;"),
            '`' => escaped.push_str("#96;"),
            c => escaped.push(c),
        }
    }

    escaped
}

/// Turn arbitrary text into a Mermaid-safe identifier (`[A-Za-z0-9_]+`).
///
/// Runs of other characters become one `_`. Empty results fall back to
/// `fallback`, and ids that start with a digit or collide with the `end`
/// keyword get prefixed.
pub fn to_ident(text: &str, fallback: &str) -> String {
    let mut ident = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            ident.push(ch);
        } else if !ident.ends_with('_') {
            ident.push('_');
        }
    }
    let ident = ident.trim_matches('_');

    if ident.is_empty() {
        return fallback.to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) || ident.eq_ignore_ascii_case("end") {
        return format!("{}_{}", fallback, ident);
    }
    ident.to_string()
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push('…');
    cut
}
