//! Command handlers for plan, apply, refresh, destroy, import, show and schema

use log::{debug, info, warn};

use crate::cli::{Cli, OutputFormat};
use crate::error::GiteaError;
use crate::gitea::{GiteaClient, ProviderResolver};
use crate::manifest::{DesiredResource, Manifest};
use crate::output::{output_plan, output_schemas, output_state};
use crate::state::{StateFile, StateStore};
use crate::ui::{clear_spinner, confirm_action, create_spinner, finish_spinner};

use super::lifecycle::{apply_plan, destroy_plan, import_resource, refresh_state};
use super::plan::build_plan;
use super::ResourceKind;

type CommandResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Manifest for commands that only need its provider block
fn load_manifest_if_present(cli: &Cli) -> Result<Manifest, GiteaError> {
    if cli.file.exists() {
        Manifest::load(&cli.file)
    } else {
        debug!(
            "No manifest at {}, using CLI and environment settings only",
            cli.file.display()
        );
        Ok(Manifest::default())
    }
}

/// Resolve provider settings and build a client
fn connect(cli: &Cli, manifest: &Manifest) -> Result<GiteaClient, GiteaError> {
    let config =
        ProviderResolver::new().resolve(&cli.provider_settings(), manifest.provider.as_ref())?;
    debug!(
        "Using Gitea at {} (insecure: {})",
        config.base_url, config.insecure
    );
    GiteaClient::new(&config)
}

fn warn_token_auth(client: &GiteaClient, desired: &[DesiredResource]) {
    let has_tokens = desired.iter().any(|d| d.kind == ResourceKind::Token);
    if has_tokens && client.auth_username().is_none() {
        warn!(
            "{} resources require username/password authentication; \
             Gitea usually rejects token authentication on these endpoints",
            ResourceKind::Token
        );
    }
}

/// Refresh state in memory, with a spinner
async fn refresh_with_spinner(
    client: &GiteaClient,
    state: &mut StateFile,
    batch: bool,
) -> Result<Vec<String>, GiteaError> {
    if state.is_empty() {
        return Ok(Vec::new());
    }
    let spinner = create_spinner(
        &format!("Refreshing {} resource(s)...", state.resources.len()),
        batch,
    );
    let result = refresh_state(client, state).await;
    clear_spinner(spinner);
    result
}

/// Run the plan command
pub async fn run_plan_command(cli: &Cli, no_refresh: bool) -> CommandResult {
    let manifest = Manifest::load(&cli.file)?;
    let desired = manifest.desired_resources()?;
    let store = StateStore::new(cli.state.clone());
    let mut state = store.load()?;

    if !no_refresh {
        let client = connect(cli, &manifest)?;
        warn_token_auth(&client, &desired);
        refresh_with_spinner(&client, &mut state, cli.batch).await?;
    }

    let plan = build_plan(&desired, &state)?;
    output_plan(&plan);
    Ok(())
}

/// Run the apply command
pub async fn run_apply_command(cli: &Cli, no_refresh: bool, yes: bool) -> CommandResult {
    let manifest = Manifest::load(&cli.file)?;
    let desired = manifest.desired_resources()?;
    let client = connect(cli, &manifest)?;
    warn_token_auth(&client, &desired);

    let store = StateStore::new(cli.state.clone());
    let mut state = store.load()?;

    if !no_refresh {
        let removed = refresh_with_spinner(&client, &mut state, cli.batch).await?;
        if !removed.is_empty() {
            store.save(&mut state)?;
        }
    }

    let plan = build_plan(&desired, &state)?;
    output_plan(&plan);
    if !plan.has_changes() {
        return Ok(());
    }

    if !confirm_action("Apply these changes?", yes, cli.batch)? {
        eprintln!("Apply cancelled.");
        return Ok(());
    }

    let spinner = create_spinner("Applying changes...", cli.batch);
    let result = apply_plan(&client, &plan, &mut state, &store).await;
    clear_spinner(spinner);
    let summary = result?;

    info!("Apply finished, state serial {}", state.serial);
    println!(
        "Apply complete! Resources: {} added, {} changed, {} destroyed.",
        summary.added, summary.changed, summary.destroyed
    );
    Ok(())
}

/// Run the refresh command
pub async fn run_refresh_command(cli: &Cli) -> CommandResult {
    let manifest = load_manifest_if_present(cli)?;
    let store = StateStore::new(cli.state.clone());
    let mut state = store.load()?;

    if state.is_empty() {
        eprintln!("No resources in state");
        return Ok(());
    }

    let client = connect(cli, &manifest)?;
    let total = state.resources.len();
    let spinner = create_spinner(&format!("Refreshing {} resource(s)...", total), cli.batch);
    let result = refresh_state(&client, &mut state).await;
    let removed = match result {
        Ok(removed) => {
            finish_spinner(spinner, "Refreshed");
            removed
        }
        Err(e) => {
            clear_spinner(spinner);
            return Err(e.into());
        }
    };
    store.save(&mut state)?;

    for address in &removed {
        println!("{} no longer exists and was removed from state", address);
    }
    println!(
        "Refresh complete! {} resource(s) refreshed, {} removed.",
        total - removed.len(),
        removed.len()
    );
    Ok(())
}

/// Run the destroy command
pub async fn run_destroy_command(cli: &Cli, yes: bool) -> CommandResult {
    let manifest = load_manifest_if_present(cli)?;
    let store = StateStore::new(cli.state.clone());
    let mut state = store.load()?;

    if state.is_empty() {
        eprintln!("No resources in state");
        return Ok(());
    }

    let plan = destroy_plan(&state)?;
    output_plan(&plan);

    if !confirm_action("Destroy all managed resources?", yes, cli.batch)? {
        eprintln!("Destroy cancelled.");
        return Ok(());
    }

    let client = connect(cli, &manifest)?;
    let spinner = create_spinner("Destroying resources...", cli.batch);
    let result = apply_plan(&client, &plan, &mut state, &store).await;
    clear_spinner(spinner);
    let summary = result?;

    println!(
        "Destroy complete! Resources: {} destroyed.",
        summary.destroyed
    );
    Ok(())
}

/// Run the import command
pub async fn run_import_command(cli: &Cli, address: &str, id: &str) -> CommandResult {
    let manifest = Manifest::load(&cli.file)?;
    let desired = manifest.find(address)?;
    let client = connect(cli, &manifest)?;
    warn_token_auth(&client, std::slice::from_ref(&desired));

    let store = StateStore::new(cli.state.clone());
    let mut state = store.load()?;

    let spinner = create_spinner(&format!("Importing {}...", address), cli.batch);
    let result = import_resource(&client, &desired, id, &mut state, &store).await;
    clear_spinner(spinner);
    let data = result?;

    println!(
        "Import successful: {} (ID {})",
        address,
        data.id().unwrap_or(id)
    );
    if desired.kind == ResourceKind::Token {
        eprintln!("Note: the secret of an imported access token cannot be recovered.");
    }
    Ok(())
}

/// Run the show command
pub fn run_show_command(cli: &Cli, output: OutputFormat, show_sensitive: bool) -> CommandResult {
    let store = StateStore::new(cli.state.clone());
    let state = store.load()?;
    output_state(&state, output, show_sensitive);
    Ok(())
}

/// Run the schema command
pub fn run_schema_command(resource_type: Option<&str>, output: OutputFormat) -> CommandResult {
    let kinds = match resource_type {
        Some(name) => vec![name.parse::<ResourceKind>()?],
        None => ResourceKind::ALL.to_vec(),
    };
    output_schemas(&kinds, output);
    Ok(())
}
