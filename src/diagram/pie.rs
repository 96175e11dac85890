//! Pie chart templates
//!
//! `label: number` (or `label = number`) pairs in the text become slices.

use super::escape::escape_label;
use super::mentions;
use regex::Regex;
use std::sync::OnceLock;

const HEADER: &str = "pie";

fn slice_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([A-Za-z][^:=,;\n]*?)\s*[:=]\s*(\d+(?:\.\d+)?)\s*%?")
            .expect("pie slice regex is valid")
    })
}

/// Generate a pie chart for free text
pub fn generate(text: &str) -> String {
    let slices = parse_slices(text);
    if !slices.is_empty() {
        let title = title_before_slices(text).unwrap_or("Distribution");
        return render(title, &slices);
    }

    let lower = text.to_lowercase();
    let slices: &[(&str, &str)] = if mentions(&lower, &["budget", "expense", "spending", "cost"]) {
        &[
            ("Housing", "35"),
            ("Food", "20"),
            ("Transport", "15"),
            ("Savings", "20"),
            ("Other", "10"),
        ]
    } else if mentions(&lower, &["market", "share", "competitor"]) {
        &[
            ("Company A", "40"),
            ("Company B", "30"),
            ("Company C", "20"),
            ("Others", "10"),
        ]
    } else {
        &[
            ("Category A", "40"),
            ("Category B", "30"),
            ("Category C", "20"),
            ("Category D", "10"),
        ]
    };

    let slices: Vec<(String, String)> = slices
        .iter()
        .map(|(label, value)| (label.to_string(), value.to_string()))
        .collect();
    render(text, &slices)
}

fn parse_slices(text: &str) -> Vec<(String, String)> {
    slice_pattern()
        .captures_iter(text)
        .map(|caps| (caps[1].trim().to_string(), caps[2].to_string()))
        .collect()
}

/// Text in front of the first slice, used as the chart title
fn title_before_slices(text: &str) -> Option<&str> {
    let first = slice_pattern().find(text)?;
    let prefix = text[..first.start()]
        .trim_matches(|c: char| c.is_whitespace() || ":-,;".contains(c));
    if prefix.is_empty() {
        None
    } else {
        Some(prefix)
    }
}

fn render(title: &str, slices: &[(String, String)]) -> String {
    let mut mermaid = format!("{} title {}\n", HEADER, escape_label(title));
    for (label, value) in slices {
        mermaid.push_str(&format!("    \"{}\" : {}\n", escape_label(label), value));
    }
    mermaid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_slices() {
        let result = generate("Dogs: 40, Cats: 35, Birds = 25");
        assert_eq!(
            result,
            "pie title Distribution\n    \"Dogs\" : 40\n    \"Cats\" : 35\n    \"Birds\" : 25\n"
        );
    }

    #[test]
    fn test_explicit_slices_with_title() {
        let result = generate("Browser usage -\nChrome: 65.5%\nFirefox: 20");
        assert!(result.starts_with("pie title Browser usage\n"));
        assert!(result.contains("\"Chrome\" : 65.5"));
        assert!(result.contains("\"Firefox\" : 20"));
    }

    #[test]
    fn test_budget_template() {
        let result = generate("Monthly budget");
        assert!(result.starts_with("pie title Monthly budget\n"));
        assert!(result.contains("\"Housing\" : 35"));
    }

    #[test]
    fn test_generic_template() {
        let result = generate("survey answers");
        assert!(result.contains("\"Category D\" : 10"));
    }
}
