//! Plan output formatter

use super::common::{display_value, SENSITIVE_PLACEHOLDER};
use crate::provider::{Action, Plan, PlannedChange, ResourceData, ResourceSchema};

fn attribute_value(schema: &ResourceSchema, data: Option<&ResourceData>, name: &str) -> String {
    match data.and_then(|d| d.get(name)) {
        None => "(unset)".to_string(),
        Some(_) if schema.is_sensitive(name) => SENSITIVE_PLACEHOLDER.to_string(),
        Some(value) => display_value(value),
    }
}

fn describe(change: &PlannedChange) -> &'static str {
    match change.action {
        Action::Create => "will be created",
        Action::Update => "will be updated in-place",
        Action::Replace => "must be replaced",
        Action::Delete => "will be destroyed",
        Action::NoOp => "is up to date",
    }
}

fn change_lines(change: &PlannedChange) -> Vec<String> {
    let schema = change.kind.schema();
    let mut lines = vec![format!(
        "{:>3} {} {}",
        change.action.symbol(),
        change.address,
        describe(change)
    )];

    for name in &change.changed {
        let new = attribute_value(&schema, change.desired.as_ref(), name);
        match change.action {
            Action::Create => lines.push(format!("      + {} = {}", name, new)),
            Action::Update | Action::Replace => {
                let old = attribute_value(&schema, change.prior.as_ref(), name);
                let forces = if change.action == Action::Replace
                    && schema.requires_replace([name.as_str()])
                {
                    " # forces replacement"
                } else {
                    ""
                };
                lines.push(format!("      ~ {} = {} -> {}{}", name, old, new, forces));
            }
            Action::Delete | Action::NoOp => {}
        }
    }
    lines
}

/// Render a plan as text
pub fn format_plan(plan: &Plan) -> String {
    if !plan.has_changes() {
        return "No changes. Gitea resources match the manifest.\n".to_string();
    }

    let mut out = String::new();
    for change in plan.changes.iter().filter(|c| c.action != Action::NoOp) {
        for line in change_lines(change) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }

    let (add, change, destroy) = plan.counts();
    out.push_str(&format!(
        "Plan: {} to add, {} to change, {} to destroy.\n",
        add, change, destroy
    ));
    out
}

/// Print a plan to stdout
pub fn output_plan(plan: &Plan) {
    print!("{}", format_plan(plan));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ResourceKind;

    fn token_data(name: &str, secret: &str) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("username", "alice");
        data.set("name", name);
        data.set("token", secret);
        data
    }

    #[test]
    fn test_no_changes() {
        let plan = Plan::default();
        assert!(format_plan(&plan).starts_with("No changes."));
    }

    #[test]
    fn test_create_lists_attributes() {
        let plan = Plan {
            changes: vec![PlannedChange {
                address: "gitea_token.ci".to_string(),
                kind: ResourceKind::Token,
                action: Action::Create,
                changed: vec!["name".to_string(), "username".to_string()],
                desired: Some(token_data("ci", "")),
                prior: None,
            }],
        };
        let text = format_plan(&plan);
        assert!(text.contains("  + gitea_token.ci will be created"));
        assert!(text.contains("+ name = \"ci\""));
        assert!(text.contains("Plan: 1 to add, 0 to change, 0 to destroy."));
    }

    #[test]
    fn test_replace_marks_forcing_attribute() {
        let plan = Plan {
            changes: vec![PlannedChange {
                address: "gitea_token.ci".to_string(),
                kind: ResourceKind::Token,
                action: Action::Replace,
                changed: vec!["name".to_string()],
                desired: Some(token_data("deploy", "")),
                prior: Some(token_data("ci", "s3cr3t")),
            }],
        };
        let text = format_plan(&plan);
        assert!(text.contains("-/+ gitea_token.ci must be replaced"));
        assert!(text.contains("~ name = \"ci\" -> \"deploy\" # forces replacement"));
        assert!(text.contains("Plan: 1 to add, 0 to change, 1 to destroy."));
    }

    #[test]
    fn test_update_layout() {
        let mut prior = ResourceData::new();
        prior.set("interval", "8h0m0s");
        let mut desired = ResourceData::new();
        desired.set("interval", "1h0m0s");
        let plan = Plan {
            changes: vec![PlannedChange {
                address: "gitea_push_mirror.backup".to_string(),
                kind: ResourceKind::PushMirror,
                action: Action::Update,
                changed: vec!["interval".to_string()],
                desired: Some(desired),
                prior: Some(prior),
            }],
        };
        assert_eq!(
            format_plan(&plan),
            "  ~ gitea_push_mirror.backup will be updated in-place\n\
             \x20     ~ interval = \"8h0m0s\" -> \"1h0m0s\"\n\
             \n\
             Plan: 0 to add, 1 to change, 0 to destroy.\n"
        );
    }

    #[test]
    fn test_sensitive_values_masked() {
        let mut prior = ResourceData::new();
        prior.set("remote_password", "old-pw");
        let mut desired = ResourceData::new();
        desired.set("remote_password", "new-pw");
        let plan = Plan {
            changes: vec![PlannedChange {
                address: "gitea_push_mirror.backup".to_string(),
                kind: ResourceKind::PushMirror,
                action: Action::Update,
                changed: vec!["remote_password".to_string()],
                desired: Some(desired),
                prior: Some(prior),
            }],
        };
        let text = format_plan(&plan);
        assert!(text.contains("~ remote_password = (sensitive) -> (sensitive)"));
        assert!(!text.contains("pw"));
    }

    #[test]
    fn test_noop_entries_hidden() {
        let plan = Plan {
            changes: vec![
                PlannedChange {
                    address: "gitea_token.kept".to_string(),
                    kind: ResourceKind::Token,
                    action: Action::NoOp,
                    changed: Vec::new(),
                    desired: Some(token_data("kept", "")),
                    prior: Some(token_data("kept", "")),
                },
                PlannedChange {
                    address: "gitea_token.old".to_string(),
                    kind: ResourceKind::Token,
                    action: Action::Delete,
                    changed: Vec::new(),
                    desired: None,
                    prior: Some(token_data("old", "")),
                },
            ],
        };
        let text = format_plan(&plan);
        assert!(!text.contains("gitea_token.kept"));
        assert!(text.contains("  - gitea_token.old will be destroyed"));
    }
}
