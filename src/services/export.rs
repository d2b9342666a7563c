//! Markdown export of a project's scenarios.

use chrono::{DateTime, NaiveDate, Utc};

use crate::entity::{project, scenario, test_case};
use crate::models::{Category, Platform, Priority, ScenarioStatus};

/// Scenario with its ordered steps.
pub type ScenarioWithSteps = (scenario::Model, Vec<test_case::Model>);

#[derive(Debug, Default, PartialEq, Eq)]
struct StatusCounts {
    pass: usize,
    fail: usize,
    blocked: usize,
    skipped: usize,
    not_run: usize,
}

impl StatusCounts {
    fn tally(scenarios: &[ScenarioWithSteps]) -> Self {
        let mut counts = Self::default();
        for (s, _) in scenarios {
            match ScenarioStatus::parse(&s.status) {
                Some(ScenarioStatus::Pass) => counts.pass += 1,
                Some(ScenarioStatus::Fail) => counts.fail += 1,
                Some(ScenarioStatus::Blocked) => counts.blocked += 1,
                Some(ScenarioStatus::Skipped) => counts.skipped += 1,
                Some(ScenarioStatus::NotRun) | None => counts.not_run += 1,
            }
        }
        counts
    }

    fn executed(&self) -> usize {
        self.pass + self.fail + self.blocked + self.skipped
    }
}

fn percent(part: usize, whole: usize) -> usize {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as usize
    }
}

/// Render a project report. Scenarios must already be in display order.
pub fn render_markdown(
    project: &project::Model,
    scenarios: &[ScenarioWithSteps],
    generated_at: DateTime<Utc>,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}", project.title));
    lines.push(String::new());
    if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(description.to_string());
        lines.push(String::new());
    }

    let platform =
        Platform::parse(&project.platform).map_or(project.platform.as_str(), |p| p.label());
    lines.push("## Project info".to_string());
    lines.push(String::new());
    lines.push(format!("- **Platform**: {}", platform));
    if let Some(version) = project.app_version.as_deref().filter(|v| !v.is_empty()) {
        lines.push(format!("- **App version**: {}", version));
    }
    lines.push(format!("- **Total scenarios**: {}", scenarios.len()));
    lines.push(String::new());

    let counts = StatusCounts::tally(scenarios);
    lines.push("## Test status".to_string());
    lines.push(String::new());
    lines.push("| Status | Count |".to_string());
    lines.push("|--------|-------|".to_string());
    for (status, count) in [
        (ScenarioStatus::Pass, counts.pass),
        (ScenarioStatus::Fail, counts.fail),
        (ScenarioStatus::Blocked, counts.blocked),
        (ScenarioStatus::Skipped, counts.skipped),
        (ScenarioStatus::NotRun, counts.not_run),
    ] {
        lines.push(format!("| {} | {} |", status.label(), count));
    }
    lines.push(String::new());

    let executed = counts.executed();
    lines.push(format!(
        "**Progress**: {}/{} ({}%)",
        executed,
        scenarios.len(),
        percent(executed, scenarios.len())
    ));
    lines.push(String::new());
    lines.push(format!("**Pass rate**: {}%", percent(counts.pass, executed)));
    lines.push(String::new());

    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("## Test scenarios".to_string());
    lines.push(String::new());

    for (category, group) in group_by_category(scenarios) {
        let heading = Category::parse(category).map_or(category, |c| c.label());
        lines.push(format!("### {}", heading));
        lines.push(String::new());

        for (idx, (s, steps)) in group.into_iter().enumerate() {
            push_scenario(&mut lines, idx + 1, s, steps);
        }
    }

    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(format!(
        "*Generated by QA Scenario Server - {}*",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    lines.join("\n")
}

fn push_scenario(
    lines: &mut Vec<String>,
    number: usize,
    s: &scenario::Model,
    steps: &[test_case::Model],
) {
    let status = ScenarioStatus::parse(&s.status).map_or(s.status.as_str(), |st| st.label());
    let priority = Priority::parse(&s.priority).map_or(s.priority.as_str(), |p| p.label());

    lines.push(format!("#### {}. {}", number, s.title));
    lines.push(String::new());
    lines.push(format!("- **Status**: {}", status));
    lines.push(format!("- **Priority**: {}", priority));
    if s.device_type != "BOTH" {
        lines.push(format!("- **Device**: {}", s.device_type));
    }
    lines.push(String::new());

    if let Some(description) = s.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("> {}", description));
        lines.push(String::new());
    }

    if !steps.is_empty() {
        lines.push("**Steps:**".to_string());
        lines.push(String::new());
        lines.push("| # | Action | Expected result |".to_string());
        lines.push("|---|--------|-----------------|".to_string());
        for tc in steps {
            lines.push(format!("| {} | {} | {} |", tc.step, tc.action, tc.expected));
        }
        lines.push(String::new());
    }

    if s.status == ScenarioStatus::Fail.as_str() {
        if let Some(note) = s.failure_note.as_deref().filter(|n| !n.is_empty()) {
            lines.push(format!("**Failure note**: {}", note));
            lines.push(String::new());
        }
        if let Some(url) = s.bug_ticket_url.as_deref().filter(|u| !u.is_empty()) {
            lines.push(format!("**Bug ticket**: [link]({})", url));
            lines.push(String::new());
        }
    }
}

/// Group by category, keeping categories in first-seen order.
fn group_by_category(
    scenarios: &[ScenarioWithSteps],
) -> Vec<(&str, Vec<(&scenario::Model, &[test_case::Model])>)> {
    let mut groups: Vec<(&str, Vec<(&scenario::Model, &[test_case::Model])>)> = Vec::new();
    for (s, steps) in scenarios {
        let entry = (s, steps.as_slice());
        match groups.iter_mut().find(|(c, _)| *c == s.category) {
            Some((_, group)) => group.push(entry),
            None => groups.push((s.category.as_str(), vec![entry])),
        }
    }
    groups
}

/// Attachment filename: title reduced to letters, digits and whitespace,
/// whitespace runs collapsed to `-`, then the export date.
pub fn export_filename(title: &str, date: NaiveDate) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
    {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }
    format!("{}-{}.md", slug, date.format("%Y-%m-%d"))
}
