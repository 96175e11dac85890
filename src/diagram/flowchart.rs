//! Flowchart templates
//!
//! Login, registration and payment text get a canned process; anything else
//! is split into steps and chained from a start node to an end node.

use super::escape::escape_label;
use super::mentions;
use regex::Regex;
use std::sync::OnceLock;

const HEADER: &str = "flowchart TD";

fn step_splitter() -> &'static Regex {
    static SPLITTER: OnceLock<Regex> = OnceLock::new();
    SPLITTER.get_or_init(|| {
        Regex::new(r"(?i)\s*(?:[\n.;,]|\bthen\b)\s*").expect("step splitter regex is valid")
    })
}

/// Generate a flowchart for free text
pub fn generate(text: &str) -> String {
    let lower = text.to_lowercase();

    if mentions(&lower, &["login", "log in", "sign in"]) {
        login(text)
    } else if mentions(&lower, &["register", "signup", "sign up"]) {
        registration(text)
    } else if mentions(&lower, &["payment", "checkout", "pay "]) {
        payment(text)
    } else {
        steps(text)
    }
}

/// Linear flowchart: one node per label, chained in order.
///
/// No labels produces the header line alone.
pub fn chain<S: AsRef<str>>(labels: &[S]) -> String {
    let mut mermaid = String::from(HEADER);
    mermaid.push('\n');

    for (i, label) in labels.iter().enumerate() {
        mermaid.push_str(&format!(
            "    node{}[\"{}\"]\n",
            i,
            escape_label(label.as_ref())
        ));
    }
    for i in 1..labels.len() {
        mermaid.push_str(&format!("    node{} --> node{}\n", i - 1, i));
    }

    mermaid
}

fn login(text: &str) -> String {
    format!(
        r#"{HEADER}
    start(["{title}"]) --> input[Enter username and password]
    input --> validate{{Credentials valid?}}
    validate -->|Yes| mfa{{MFA enabled?}}
    mfa -->|Yes| code[Verify one-time code]
    mfa -->|No| session[Create session]
    code --> session
    session --> done([Show dashboard])
    validate -->|No| error[Show error message]
    error --> input
"#,
        title = escape_label(text)
    )
}

fn registration(text: &str) -> String {
    format!(
        r#"{HEADER}
    start(["{title}"]) --> form[Fill registration form]
    form --> check{{Input valid?}}
    check -->|No| fix[Highlight invalid fields]
    fix --> form
    check -->|Yes| exists{{Account exists?}}
    exists -->|Yes| signin[Redirect to sign in]
    exists -->|No| create[Create account]
    create --> verify[Send verification email]
    verify --> done([Registration complete])
"#,
        title = escape_label(text)
    )
}

fn payment(text: &str) -> String {
    format!(
        r#"{HEADER}
    start(["{title}"]) --> cart[Review cart]
    cart --> details[Enter payment details]
    details --> authorize{{Payment authorized?}}
    authorize -->|Yes| capture[Capture payment]
    capture --> receipt[Send receipt]
    receipt --> done([Order confirmed])
    authorize -->|No| declined[Show declined message]
    declined --> details
"#,
        title = escape_label(text)
    )
}

fn steps(text: &str) -> String {
    let steps: Vec<&str> = step_splitter()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let steps = if steps.is_empty() { vec![text.trim()] } else { steps };

    let mut mermaid = String::from(HEADER);
    mermaid.push('\n');
    mermaid.push_str("    start([Start])\n");
    for (i, step) in steps.iter().enumerate() {
        mermaid.push_str(&format!("    step{}[\"{}\"]\n", i, escape_label(step)));
    }
    mermaid.push_str("    finish([End])\n");

    mermaid.push_str("    start --> step0\n");
    for i in 1..steps.len() {
        mermaid.push_str(&format!("    step{} --> step{}\n", i - 1, i));
    }
    mermaid.push_str(&format!("    step{} --> finish\n", steps.len() - 1));

    mermaid
}
