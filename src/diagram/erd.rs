//! Entity-relationship diagram templates

use super::escape::escape_label;
use super::mentions;

const HEADER: &str = "erDiagram";

/// Generate an ER diagram for free text
pub fn generate(text: &str) -> String {
    let lower = text.to_lowercase();

    if mentions(&lower, &["order", "customer", "shop", "product"]) {
        commerce(text)
    } else if mentions(&lower, &["blog", "post", "comment", "article"]) {
        blog(text)
    } else {
        generic(text)
    }
}

fn commerce(text: &str) -> String {
    format!(
        r#"{HEADER}
    CUSTOMER ||--o{{ ORDER : "places"
    ORDER ||--|{{ ORDER_ITEM : "contains"
    PRODUCT ||--o{{ ORDER_ITEM : "appears in"
    CUSTOMER {{
        string id PK
        string name
        string email
    }}
    ORDER {{
        string id PK
        string customer_id FK
        date created_at
        string status
    }}
    ORDER_ITEM {{
        string order_id FK
        string product_id FK
        int quantity
    }}
    PRODUCT {{
        string id PK
        string name
        decimal price
    }}
    %% {title}
"#,
        title = escape_label(text)
    )
}

fn blog(text: &str) -> String {
    format!(
        r#"{HEADER}
    USER ||--o{{ POST : "writes"
    POST ||--o{{ COMMENT : "has"
    USER ||--o{{ COMMENT : "authors"
    USER {{
        string id PK
        string username
    }}
    POST {{
        string id PK
        string author_id FK
        string title
        date published_at
    }}
    COMMENT {{
        string id PK
        string post_id FK
        string author_id FK
        string body
    }}
    %% {title}
"#,
        title = escape_label(text)
    )
}

fn generic(text: &str) -> String {
    format!(
        r#"{HEADER}
    ENTITY ||--o{{ RELATED_ENTITY : "{title}"
    ENTITY {{
        string id PK
        string name
    }}
    RELATED_ENTITY {{
        string id PK
        string entity_id FK
    }}
"#,
        title = escape_label(text)
    )
}
