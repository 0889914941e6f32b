//! Drive resource operations against Gitea and record the outcome in state

use futures::future::join_all;
use log::{debug, info, warn};

use crate::error::{GiteaError, Result};
use crate::gitea::GiteaClient;
use crate::manifest::DesiredResource;
use crate::state::{StateFile, StateStore};

use super::plan::{build_plan, Action, Plan, PlannedChange};
use super::{ResourceData, ResourceKind};

/// What an apply run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub added: usize,
    pub changed: usize,
    pub destroyed: usize,
}

/// Re-read every resource in state, concurrently.
///
/// Resources that no longer exist remotely are dropped; their addresses are
/// returned. Nothing is written to disk.
pub async fn refresh_state(client: &GiteaClient, state: &mut StateFile) -> Result<Vec<String>> {
    let mut pending = Vec::with_capacity(state.resources.len());
    for (address, resource) in &state.resources {
        pending.push((address.clone(), resource.kind()?, resource.data.clone()));
    }

    let reads = pending.into_iter().map(|(address, kind, mut data)| async move {
        debug!("Refreshing {}", address);
        let result = kind.read(client, &mut data).await;
        (address, kind, data, result)
    });
    let results = join_all(reads).await;

    let mut removed = Vec::new();
    for (address, kind, data, result) in results {
        result.map_err(|e| with_address(&address, "refresh", e))?;
        if data.id().is_none() {
            warn!("{} no longer exists and was removed from state", address);
            removed.push(address.clone());
        }
        state.upsert(&address, kind, data);
    }

    Ok(removed)
}

/// Plan that deletes everything recorded in state
pub fn destroy_plan(state: &StateFile) -> Result<Plan> {
    build_plan(&[], state)
}

/// Execute a plan step by step. State is saved after every step, so a
/// failure leaves it describing exactly what was done.
pub async fn apply_plan(
    client: &GiteaClient,
    plan: &Plan,
    state: &mut StateFile,
    store: &StateStore,
) -> Result<ApplySummary> {
    let mut summary = ApplySummary::default();

    for change in &plan.changes {
        match change.action {
            Action::NoOp => continue,
            Action::Create => {
                create_step(client, change, state, store).await?;
                summary.added += 1;
            }
            Action::Update => {
                update_step(client, change, state, store).await?;
                summary.changed += 1;
            }
            Action::Replace => {
                delete_step(client, change, state, store).await?;
                summary.destroyed += 1;
                create_step(client, change, state, store).await?;
                summary.added += 1;
            }
            Action::Delete => {
                delete_step(client, change, state, store).await?;
                summary.destroyed += 1;
            }
        }
    }

    Ok(summary)
}

/// Bring an existing remote object under management at `desired.address`
pub async fn import_resource(
    client: &GiteaClient,
    desired: &DesiredResource,
    id: &str,
    state: &mut StateFile,
    store: &StateStore,
) -> Result<ResourceData> {
    if state.get(&desired.address).is_some() {
        return Err(GiteaError::State(format!(
            "{} is already managed; remove it from state before importing",
            desired.address
        )));
    }

    let mut data = desired.data.clone();
    desired.kind.import(id, &mut data)?;
    desired
        .kind
        .read(client, &mut data)
        .await
        .map_err(|e| with_address(&desired.address, "import", e))?;

    if data.id().is_none() {
        return Err(GiteaError::NotFound(format!(
            "Cannot import non-existent remote object '{}' for {}",
            id, desired.address
        )));
    }

    state.upsert(&desired.address, desired.kind, data.clone());
    store.save(state)?;
    info!("Imported {} with ID {}", desired.address, id);
    Ok(data)
}

async fn create_step(
    client: &GiteaClient,
    change: &PlannedChange,
    state: &mut StateFile,
    store: &StateStore,
) -> Result<()> {
    let mut data = desired_data(change)?.clone();
    info!("{}: creating", change.address);

    let result = change.kind.create(client, &mut data).await;
    if result.is_ok() {
        state.upsert(&change.address, change.kind, data);
        store.save(state)?;
    }
    result.map_err(|e| with_address(&change.address, "create", e))
}

async fn update_step(
    client: &GiteaClient,
    change: &PlannedChange,
    state: &mut StateFile,
    store: &StateStore,
) -> Result<()> {
    let desired = desired_data(change)?;
    let mut data = prior_data(change)?.clone();
    let schema = change.kind.schema();
    let configurable: Vec<&str> = schema.configurable_names().collect();
    data.merge_from(desired, &configurable);
    info!("{}: updating {}", change.address, change.changed.join(", "));

    match change.kind.update(client, &mut data).await {
        Ok(()) => {
            state.upsert(&change.address, change.kind, data);
            store.save(state)?;
            Ok(())
        }
        Err(e) => {
            // A recreate that failed after its delete leaves nothing behind
            if data.id().is_none() {
                state.upsert(&change.address, change.kind, data);
                store.save(state)?;
            }
            Err(with_address(&change.address, "update", e))
        }
    }
}

async fn delete_step(
    client: &GiteaClient,
    change: &PlannedChange,
    state: &mut StateFile,
    store: &StateStore,
) -> Result<()> {
    let Some(resource) = state.get(&change.address) else {
        debug!("{}: not in state, nothing to delete", change.address);
        return Ok(());
    };
    // The recorded type wins over the configured one
    let kind: ResourceKind = resource.kind()?;
    let mut data = resource.data.clone();
    info!("{}: destroying", change.address);

    kind.delete(client, &mut data)
        .await
        .map_err(|e| with_address(&change.address, "delete", e))?;
    state.remove(&change.address);
    store.save(state)
}

fn desired_data(change: &PlannedChange) -> Result<&ResourceData> {
    change.desired.as_ref().ok_or_else(|| {
        GiteaError::State(format!("{}: no configuration to apply", change.address))
    })
}

fn prior_data(change: &PlannedChange) -> Result<&ResourceData> {
    change
        .prior
        .as_ref()
        .ok_or_else(|| GiteaError::State(format!("{}: not found in state", change.address)))
}

/// Prefix an error with the resource address, keeping its variant
fn with_address(address: &str, operation: &str, err: GiteaError) -> GiteaError {
    let context = |msg: String| format!("{}: {} failed: {}", address, operation, msg);
    match err {
        GiteaError::Api { status, message } => GiteaError::Api {
            status,
            message: context(message),
        },
        GiteaError::NotFound(msg) => GiteaError::NotFound(context(msg)),
        GiteaError::Validation(msg) => GiteaError::Validation(context(msg)),
        GiteaError::State(msg) => GiteaError::State(context(msg)),
        other => other,
    }
}
