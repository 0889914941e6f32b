//! Diff desired configuration against state

use std::fmt;

use crate::error::Result;
use crate::manifest::DesiredResource;
use crate::state::StateFile;

use super::{ResourceData, ResourceKind};

/// What apply will do to one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    /// Delete, then create
    Replace,
    Delete,
    NoOp,
}

impl Action {
    /// Terraform-style marker used in plan output
    pub fn symbol(&self) -> &'static str {
        match self {
            Action::Create => "+",
            Action::Update => "~",
            Action::Replace => "-/+",
            Action::Delete => "-",
            Action::NoOp => " ",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Update => write!(f, "update"),
            Action::Replace => write!(f, "replace"),
            Action::Delete => write!(f, "delete"),
            Action::NoOp => write!(f, "no-op"),
        }
    }
}

/// One planned step
#[derive(Debug, Clone)]
pub struct PlannedChange {
    pub address: String,
    pub kind: ResourceKind,
    pub action: Action,
    /// Configurable attributes whose value changes
    pub changed: Vec<String>,
    /// Validated configuration; `None` for deletes
    pub desired: Option<ResourceData>,
    /// Current state; `None` for creates
    pub prior: Option<ResourceData>,
}

/// Ordered list of steps: orphan deletes first, then manifest order
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub changes: Vec<PlannedChange>,
}

impl Plan {
    pub fn has_changes(&self) -> bool {
        self.changes.iter().any(|c| c.action != Action::NoOp)
    }

    /// (to add, to change, to destroy); a replace counts as add + destroy
    pub fn counts(&self) -> (usize, usize, usize) {
        self.changes
            .iter()
            .fold((0, 0, 0), |(add, change, destroy), c| match c.action {
                Action::Create => (add + 1, change, destroy),
                Action::Update => (add, change + 1, destroy),
                Action::Replace => (add + 1, change, destroy + 1),
                Action::Delete => (add, change, destroy + 1),
                Action::NoOp => (add, change, destroy),
            })
    }
}

/// Configurable attributes that differ between state and configuration
pub fn changed_attributes(
    kind: ResourceKind,
    prior: &ResourceData,
    desired: &ResourceData,
) -> Vec<String> {
    kind.schema()
        .configurable_names()
        .filter(|name| prior.get(name) != desired.get(name))
        .map(str::to_string)
        .collect()
}

fn action_for(kind: ResourceKind, changed: &[String]) -> Action {
    if changed.is_empty() {
        Action::NoOp
    } else if !kind.supports_update()
        || kind
            .schema()
            .requires_replace(changed.iter().map(String::as_str))
    {
        Action::Replace
    } else {
        Action::Update
    }
}

/// Build the plan for a manifest against the current state
pub fn build_plan(desired: &[DesiredResource], state: &StateFile) -> Result<Plan> {
    let mut changes = Vec::new();

    for (address, resource) in &state.resources {
        if desired.iter().any(|d| &d.address == address) {
            continue;
        }
        changes.push(PlannedChange {
            address: address.clone(),
            kind: resource.kind()?,
            action: Action::Delete,
            changed: Vec::new(),
            desired: None,
            prior: Some(resource.data.clone()),
        });
    }

    for entry in desired {
        let change = match state.get(&entry.address) {
            None => PlannedChange {
                address: entry.address.clone(),
                kind: entry.kind,
                action: Action::Create,
                changed: entry
                    .kind
                    .schema()
                    .configurable_names()
                    .filter(|name| entry.data.get(name).is_some())
                    .map(str::to_string)
                    .collect(),
                desired: Some(entry.data.clone()),
                prior: None,
            },
            Some(existing) if existing.kind()? != entry.kind => PlannedChange {
                address: entry.address.clone(),
                kind: entry.kind,
                action: Action::Replace,
                changed: Vec::new(),
                desired: Some(entry.data.clone()),
                prior: Some(existing.data.clone()),
            },
            Some(existing) => {
                let changed = changed_attributes(entry.kind, &existing.data, &entry.data);
                PlannedChange {
                    address: entry.address.clone(),
                    kind: entry.kind,
                    action: action_for(entry.kind, &changed),
                    changed,
                    desired: Some(entry.data.clone()),
                    prior: Some(existing.data.clone()),
                }
            }
        };
        changes.push(change);
    }

    Ok(Plan { changes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;

    const MANIFEST: &str = r#"
resources:
  - type: gitea_push_mirror
    name: backup
    config:
      owner: org
      repo: app
      remote_address: https://github.com/org/app.git
  - type: gitea_token
    name: ci
    config:
      username: alice
      name: ci
"#;

    fn desired() -> Vec<DesiredResource> {
        Manifest::parse(MANIFEST)
            .unwrap()
            .desired_resources()
            .unwrap()
    }

    /// State as it looks after a successful apply of `desired()`
    fn applied_state() -> StateFile {
        let mut state = StateFile::default();
        for entry in desired() {
            let mut data = entry.data.clone();
            data.set_id("existing");
            data.set("last_eight", "abcdefgh");
            state.upsert(&entry.address, entry.kind, data);
        }
        state
    }

    fn action_of(plan: &Plan, address: &str) -> Action {
        plan.changes
            .iter()
            .find(|c| c.address == address)
            .map(|c| c.action)
            .unwrap()
    }

    #[test]
    fn test_empty_state_plans_creates() {
        let plan = build_plan(&desired(), &StateFile::default()).unwrap();
        assert_eq!(plan.changes.len(), 2);
        assert!(plan.changes.iter().all(|c| c.action == Action::Create));
        assert_eq!(plan.counts(), (2, 0, 0));
        assert!(plan.changes[0].changed.contains(&"interval".to_string()));
    }

    #[test]
    fn test_unchanged_state_plans_nothing() {
        let plan = build_plan(&desired(), &applied_state()).unwrap();
        assert!(!plan.has_changes());
        assert_eq!(plan.counts(), (0, 0, 0));
    }

    #[test]
    fn test_updatable_change_plans_update() {
        let mut desired = desired();
        desired[0].data.set("interval", "1h0m0s");
        let plan = build_plan(&desired, &applied_state()).unwrap();
        assert_eq!(action_of(&plan, "gitea_push_mirror.backup"), Action::Update);
        let update = plan
            .changes
            .iter()
            .find(|c| c.action == Action::Update)
            .unwrap();
        assert_eq!(update.changed, vec!["interval".to_string()]);
    }

    #[test]
    fn test_force_new_change_plans_replace() {
        let mut desired = desired();
        desired[0].data.set("remote_address", "https://gitlab.com/org/app.git");
        desired[0].data.set("interval", "1h0m0s");
        let plan = build_plan(&desired, &applied_state()).unwrap();
        assert_eq!(action_of(&plan, "gitea_push_mirror.backup"), Action::Replace);
        assert_eq!(plan.counts(), (1, 0, 1));
    }

    #[test]
    fn test_token_change_always_replaces() {
        let mut desired = desired();
        desired[1].data.set("scopes", vec!["read:user".to_string()]);
        let plan = build_plan(&desired, &applied_state()).unwrap();
        assert_eq!(action_of(&plan, "gitea_token.ci"), Action::Replace);
    }

    #[test]
    fn test_orphan_plans_delete_first() {
        let mut desired = desired();
        desired.remove(1);
        let plan = build_plan(&desired, &applied_state()).unwrap();
        assert_eq!(plan.changes[0].address, "gitea_token.ci");
        assert_eq!(plan.changes[0].action, Action::Delete);
        assert!(plan.changes[0].desired.is_none());
        assert_eq!(plan.counts(), (0, 0, 1));
    }

    #[test]
    fn test_action_symbols() {
        assert_eq!(Action::Create.symbol(), "+");
        assert_eq!(Action::Replace.symbol(), "-/+");
        assert_eq!(Action::Replace.to_string(), "replace");
    }
}
