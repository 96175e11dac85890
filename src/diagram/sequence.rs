//! Sequence diagram templates
//!
//! Lines written as `A -> B: message` (or chains like `A -> B -> C`) are
//! rendered as messages between participants. Otherwise a canned login or
//! API exchange is used, falling back to a single request/response.

use super::escape::{escape_label, to_ident};
use super::{mentions, split_arrows, ARROW};

const HEADER: &str = "sequenceDiagram";

#[derive(Debug, PartialEq, Eq)]
struct Message {
    from: String,
    to: String,
    text: Option<String>,
}

/// Generate a sequence diagram for free text
pub fn generate(text: &str) -> String {
    let messages = parse_messages(text);
    if !messages.is_empty() {
        return render_messages(&messages);
    }

    let lower = text.to_lowercase();
    if mentions(&lower, &["login", "auth", "sign in"]) {
        login(text)
    } else if mentions(&lower, &["api", "request", "endpoint"]) {
        api(text)
    } else {
        generic(text)
    }
}

/// Extract `A -> B: text` style messages, one or more per line
fn parse_messages(text: &str) -> Vec<Message> {
    let mut messages = Vec::new();

    for line in text.lines().filter(|l| l.contains(ARROW)) {
        let (chain, label) = match line.split_once(':') {
            Some((chain, label)) if chain.contains(ARROW) => (chain, Some(label.trim())),
            _ => (line, None),
        };

        let parts = split_arrows(chain);
        if parts.len() < 2 {
            continue;
        }

        let hops = parts.len() - 1;
        for (i, pair) in parts.windows(2).enumerate() {
            let text = if i + 1 == hops {
                label.filter(|l| !l.is_empty()).map(str::to_string)
            } else {
                None
            };
            messages.push(Message {
                from: pair[0].to_string(),
                to: pair[1].to_string(),
                text,
            });
        }
    }

    messages
}

fn render_messages(messages: &[Message]) -> String {
    let mut mermaid = String::from(HEADER);
    mermaid.push('\n');

    let mut declared: Vec<String> = Vec::new();
    for message in messages {
        for name in [&message.from, &message.to] {
            let ident = to_ident(name, "Participant");
            if !declared.contains(&ident) {
                mermaid.push_str(&format!(
                    "    participant {} as {}\n",
                    ident,
                    escape_label(name)
                ));
                declared.push(ident);
            }
        }
    }

    for (i, message) in messages.iter().enumerate() {
        let text = match &message.text {
            Some(text) => escape_label(text),
            None => format!("Step {}", i + 1),
        };
        mermaid.push_str(&format!(
            "    {}->>{}: {}\n",
            to_ident(&message.from, "Participant"),
            to_ident(&message.to, "Participant"),
            text
        ));
    }

    mermaid
}

fn login(text: &str) -> String {
    format!(
        r#"{HEADER}
    participant User
    participant Client
    participant AuthService
    participant Database
    Note over User,Client: {title}
    User->>Client: Enter credentials
    Client->>AuthService: Submit login request
    AuthService->>Database: Look up user
    Database-->>AuthService: User record
    alt Valid credentials
        AuthService-->>Client: Session token
        Client-->>User: Show dashboard
    else Invalid credentials
        AuthService-->>Client: Unauthorized
        Client-->>User: Show error
    end
"#,
        title = escape_label(text)
    )
}

fn api(text: &str) -> String {
    format!(
        r#"{HEADER}
    participant Client
    participant Gateway
    participant Service
    participant Database
    Note over Client,Gateway: {title}
    Client->>Gateway: HTTP request
    Gateway->>Service: Forward request
    Service->>Database: Query
    Database-->>Service: Rows
    Service-->>Gateway: Result
    Gateway-->>Client: HTTP response
"#,
        title = escape_label(text)
    )
}

fn generic(text: &str) -> String {
    format!(
        r#"{HEADER}
    participant User
    participant System
    User->>System: {title}
    activate System
    System-->>User: Response
    deactivate System
"#,
        title = escape_label(text)
    )
}
