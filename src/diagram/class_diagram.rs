//! Class diagram templates
//!
//! `Name { member, member }` blocks become classes, `A extends B` becomes
//! inheritance. Text without blocks falls back to canned user/account or
//! shop models, or to the classes named after the word `class`.

use super::escape::{escape_label, to_ident};
use super::mentions;
use regex::Regex;
use std::sync::OnceLock;

const HEADER: &str = "classDiagram";

fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*\{([^{}]*)\}").expect("class block regex is valid")
    })
}

fn extends_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)\b([A-Za-z_][A-Za-z0-9_]*)",
            r"\s+(?:extends|inherits from|inherits|is an?)\s+",
            r"([A-Za-z_][A-Za-z0-9_]*)",
        ))
        .expect("extends regex is valid")
    })
}

fn class_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bclass\s+([A-Za-z_][A-Za-z0-9_]*)").expect("class name regex is valid")
    })
}

/// A class parsed out of free text
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClassBlock {
    name: String,
    members: Vec<String>,
}

/// Generate a class diagram for free text
pub fn generate(text: &str) -> String {
    let blocks = parse_blocks(text);
    if !blocks.is_empty() {
        return render_blocks(text, &blocks);
    }

    let lower = text.to_lowercase();
    if mentions(&lower, &["user", "account"]) {
        user_account(text)
    } else if mentions(&lower, &["order", "shop", "product"]) {
        shop(text)
    } else {
        generic(text)
    }
}

/// Render one class per key, each exposing the key as a public field
pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> String {
    let mut mermaid = String::from(HEADER);
    mermaid.push('\n');

    for key in keys {
        let ident = to_ident(key.as_ref(), "Field");
        mermaid.push_str(&format!("    class {} {{\n        +{}\n    }}\n", ident, ident));
    }

    mermaid
}

fn parse_blocks(text: &str) -> Vec<ClassBlock> {
    block_pattern()
        .captures_iter(text)
        .map(|caps| ClassBlock {
            name: caps[1].to_string(),
            members: caps[2]
                .split(|c| c == ',' || c == ';' || c == '\n')
                .map(sanitize_member)
                .filter(|m| !m.is_empty())
                .collect(),
        })
        .collect()
}

/// Keep only characters that are safe inside a class body
fn sanitize_member(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || " _+-#~():".contains(*c))
        .collect();
    let kept = kept.split_whitespace().collect::<Vec<_>>().join(" ");

    if kept.matches('(').count() != kept.matches(')').count() {
        kept.replace(['(', ')'], "")
    } else {
        kept
    }
}

fn render_blocks(text: &str, blocks: &[ClassBlock]) -> String {
    let mut mermaid = String::from(HEADER);
    mermaid.push('\n');

    let mut declared: Vec<String> = Vec::new();
    for block in blocks {
        let ident = to_ident(&block.name, "Class");
        if declared.contains(&ident) {
            continue;
        }
        mermaid.push_str(&format!("    class {} {{\n", ident));
        for member in &block.members {
            mermaid.push_str(&format!("        {}\n", member));
        }
        mermaid.push_str("    }\n");
        declared.push(ident);
    }

    for caps in extends_pattern().captures_iter(text) {
        let child = to_ident(&caps[1], "Class");
        let parent = to_ident(&caps[2], "Class");
        if declared.contains(&child) && declared.contains(&parent) {
            mermaid.push_str(&format!("    {} <|-- {}\n", parent, child));
        }
    }

    mermaid
}

fn user_account(text: &str) -> String {
    format!(
        r#"{HEADER}
    note "{title}"
    class User {{
        +String id
        +String email
        -String passwordHash
        +login() bool
        +logout()
    }}
    class Account {{
        +String id
        +Decimal balance
        +deposit(amount)
        +withdraw(amount)
    }}
    class Profile {{
        +String displayName
        +String avatarUrl
    }}
    User "1" --> "*" Account : owns
    User "1" *-- "1" Profile : has
"#,
        title = escape_label(text)
    )
}

fn shop(text: &str) -> String {
    format!(
        r#"{HEADER}
    note "{title}"
    class Customer {{
        +String id
        +String name
        +placeOrder() Order
    }}
    class Order {{
        +String id
        +String status
        +addItem(product)
        +total() Decimal
    }}
    class OrderItem {{
        +int quantity
        +subtotal() Decimal
    }}
    class Product {{
        +String sku
        +String name
        +Decimal price
    }}
    Customer "1" --> "*" Order : places
    Order "1" *-- "*" OrderItem : contains
    OrderItem "*" --> "1" Product : references
"#,
        title = escape_label(text)
    )
}

fn generic(text: &str) -> String {
    let mut names: Vec<String> = Vec::new();
    for caps in class_name_pattern().captures_iter(text) {
        let ident = to_ident(&caps[1], "Class");
        if !names.contains(&ident) {
            names.push(ident);
        }
    }

    let mut mermaid = String::from(HEADER);
    mermaid.push('\n');
    mermaid.push_str(&format!("    note \"{}\"\n", escape_label(text)));

    if names.is_empty() {
        mermaid.push_str(concat!(
            "    class Entity {\n",
            "        +String id\n",
            "        +String name\n",
            "        +describe() String\n",
            "    }\n",
        ));
    } else {
        for name in &names {
            mermaid.push_str(&format!("    class {}\n", name));
        }
    }

    mermaid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_blocks() {
        let result = generate("Animal { +name; +speak() } Dog { +breed } Dog extends Animal");
        assert!(result.starts_with("classDiagram"));
        assert!(result.contains("    class Animal {\n        +name\n        +speak()\n    }"));
        assert!(result.contains("    class Dog {\n        +breed\n    }"));
        assert!(result.contains("Animal <|-- Dog"));
    }

    #[test]
    fn test_extends_needs_declared_classes() {
        let result = generate("Cat { +lives } Cat extends Mammal");
        assert!(!result.contains("<|--"));
    }

    #[test]
    fn test_member_sanitizing() {
        assert_eq!(sanitize_member(r#" +String "name" "#), "+String name");
        assert_eq!(sanitize_member("+open(path"), "+openpath");
        assert_eq!(sanitize_member("  "), "");
    }

    #[test]
    fn test_user_template() {
        let result = generate("class model for user accounts");
        assert!(result.contains("note \"class model for user accounts\""));
        assert!(result.contains("User \"1\" --> \"*\" Account : owns"));
    }

    #[test]
    fn test_shop_template() {
        let result = generate("classes of an online shop");
        assert!(result.contains("Order \"1\" *-- \"*\" OrderItem : contains"));
    }

    #[test]
    fn test_generic_named_classes() {
        let result = generate("class Engine and class Wheel for a car");
        assert!(result.contains("    class Engine\n"));
        assert!(result.contains("    class Wheel\n"));
        assert!(!result.contains("class Entity"));
    }

    #[test]
    fn test_generic_fallback_entity() {
        let result = generate("something abstract");
        assert!(result.contains("class Entity {"));
    }

    #[test]
    fn test_from_keys() {
        let result = from_keys(&["name", "home address"]);
        assert_eq!(
            result,
            concat!(
                "classDiagram\n",
                "    class name {\n        +name\n    }\n",
                "    class home_address {\n        +home_address\n    }\n",
            )
        );
    }
}
