//! State output formatter

use comfy_table::{presets::NOTHING, Table};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::common::{escape_csv, print_json, print_yaml, SENSITIVE_PLACEHOLDER};
use crate::cli::OutputFormat;
use crate::state::{ResourceState, StateFile};

/// Serializable resource for structured output (JSON/YAML)
#[derive(Serialize, Debug)]
struct SerializableResource {
    address: String,
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    attributes: BTreeMap<String, Value>,
}

impl SerializableResource {
    fn new(address: &str, resource: &ResourceState, show_sensitive: bool) -> Self {
        let schema = resource.kind().ok().map(|kind| kind.schema());
        let attributes = resource
            .data
            .attributes()
            .iter()
            .map(|(name, value)| {
                let masked = !show_sensitive
                    && !value.is_null()
                    && schema.as_ref().is_some_and(|s| s.is_sensitive(name));
                let value = if masked {
                    Value::String(SENSITIVE_PLACEHOLDER.to_string())
                } else {
                    value.clone()
                };
                (name.clone(), value)
            })
            .collect();

        Self {
            address: address.to_string(),
            resource_type: resource.resource_type.clone(),
            id: resource.data.id().map(str::to_string),
            attributes,
        }
    }
}

fn serializable(state: &StateFile, show_sensitive: bool) -> Vec<SerializableResource> {
    state
        .resources
        .iter()
        .map(|(address, resource)| SerializableResource::new(address, resource, show_sensitive))
        .collect()
}

/// Output the resources recorded in state
pub fn output_state(state: &StateFile, format: OutputFormat, show_sensitive: bool) {
    if state.is_empty() && format == OutputFormat::Table {
        eprintln!("No resources in state");
        return;
    }

    match format {
        OutputFormat::Table => output_table(state),
        OutputFormat::Csv => output_csv(state),
        OutputFormat::Json => print_json(&serializable(state, show_sensitive)),
        OutputFormat::Yaml => print_yaml(&serializable(state, show_sensitive)),
    }
}

fn output_table(state: &StateFile) {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec!["ADDRESS", "TYPE", "ID"]);

    for (address, resource) in &state.resources {
        table.add_row(vec![
            address.as_str(),
            resource.resource_type.as_str(),
            resource.data.id().unwrap_or(""),
        ]);
    }

    println!("{table}");
}

fn output_csv(state: &StateFile) {
    println!("ADDRESS,TYPE,ID");
    for (address, resource) in &state.resources {
        println!(
            "{},{},{}",
            escape_csv(address),
            escape_csv(&resource.resource_type),
            escape_csv(resource.data.id().unwrap_or(""))
        );
    }
}
