//! Git graph templates

use super::escape::{escape_label, truncate_chars};
use super::mentions;

const HEADER: &str = "gitGraph";

/// Longest caller text used as a commit id
const MAX_COMMIT_LABEL: usize = 40;

/// Generate a git graph for free text
pub fn generate(text: &str) -> String {
    let lower = text.to_lowercase();
    let summary = escape_label(&truncate_chars(text.trim(), MAX_COMMIT_LABEL));

    if mentions(&lower, &["release", "hotfix"]) {
        release(&summary)
    } else if mentions(&lower, &["feature", "branch"]) {
        feature(&summary)
    } else {
        generic(&summary)
    }
}

fn feature(summary: &str) -> String {
    format!(
        r#"{HEADER}
    commit id: "Initial commit"
    branch develop
    checkout develop
    commit id: "Set up project"
    branch feature
    checkout feature
    commit id: "{summary}"
    commit id: "Add tests"
    checkout develop
    merge feature
    checkout main
    merge develop tag: "v1.0.0"
"#
    )
}

fn release(summary: &str) -> String {
    format!(
        r#"{HEADER}
    commit id: "Initial commit"
    branch develop
    checkout develop
    commit id: "New feature"
    branch release
    checkout release
    commit id: "Prepare release"
    checkout main
    merge release tag: "v1.0.0"
    branch hotfix
    checkout hotfix
    commit id: "{summary}"
    checkout main
    merge hotfix tag: "v1.0.1"
    checkout develop
    merge hotfix
"#
    )
}

fn generic(summary: &str) -> String {
    format!(
        r#"{HEADER}
    commit id: "Initial commit"
    commit id: "{summary}"
    branch develop
    checkout develop
    commit id: "Work in progress"
    checkout main
    merge develop
"#
    )
}
