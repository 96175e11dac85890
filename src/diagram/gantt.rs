//! Gantt chart templates
//!
//! Dates are fixed so output never depends on the clock.

use super::escape::escape_label;
use super::mentions;

const HEADER: &str = "gantt";

/// Generate a gantt chart for free text
pub fn generate(text: &str) -> String {
    let lower = text.to_lowercase();
    let title = escape_label(text);

    let body = if mentions(&lower, &["software", "development", "sprint", "release"]) {
        SOFTWARE
    } else if mentions(&lower, &["launch", "marketing", "campaign"]) {
        LAUNCH
    } else {
        GENERIC
    };

    format!("{HEADER}\n    title {title}\n    dateFormat YYYY-MM-DD\n{body}")
}

const SOFTWARE: &str = "    section Planning
    Requirements       :done, req, 2024-01-01, 5d
    Architecture       :done, arch, after req, 4d
    section Development
    Sprint 1           :active, s1, after arch, 10d
    Sprint 2           :s2, after s1, 10d
    section Release
    QA and bug fixes   :qa, after s2, 5d
    Release            :milestone, rel, after qa, 0d
";

const LAUNCH: &str = "    section Preparation
    Market research    :done, research, 2024-01-01, 7d
    Messaging          :msg, after research, 5d
    section Campaign
    Content production :content, after msg, 10d
    Launch             :milestone, launch, after content, 0d
    section Follow-up
    Measure results    :measure, after launch, 14d
";

const GENERIC: &str = "    section Phase 1
    Plan               :p1, 2024-01-01, 7d
    Prepare            :p2, after p1, 5d
    section Phase 2
    Execute            :p3, after p2, 10d
    Review             :p4, after p3, 3d
";
