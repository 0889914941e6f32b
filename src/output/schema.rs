//! Resource schema output formatter

use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use std::collections::BTreeMap;

use super::common::{display_value, escape_csv, print_json, print_yaml};
use crate::cli::OutputFormat;
use crate::provider::{Attribute, ResourceKind, ResourceSchema};

fn mode(attribute: &Attribute) -> &'static str {
    if attribute.required {
        "required"
    } else if attribute.optional {
        "optional"
    } else {
        "computed"
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        ""
    }
}

fn default_text(attribute: &Attribute) -> String {
    attribute
        .default
        .as_ref()
        .map(display_value)
        .unwrap_or_default()
}

/// Output the schemas of the given resource types
pub fn output_schemas(kinds: &[ResourceKind], format: OutputFormat) {
    let schemas: BTreeMap<&str, ResourceSchema> = kinds
        .iter()
        .map(|kind| (kind.type_name(), kind.schema()))
        .collect();

    match format {
        OutputFormat::Table => output_table(&schemas),
        OutputFormat::Csv => output_csv(&schemas),
        OutputFormat::Json => print_json(&schemas),
        OutputFormat::Yaml => print_yaml(&schemas),
    }
}

fn output_table(schemas: &BTreeMap<&str, ResourceSchema>) {
    for (type_name, schema) in schemas {
        println!("{}", type_name);
        println!("{}\n", schema.description);

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            "ATTRIBUTE",
            "TYPE",
            "MODE",
            "FORCE NEW",
            "SENSITIVE",
            "DEFAULT",
            "DESCRIPTION",
        ]);
        for (name, attribute) in &schema.attributes {
            table.add_row(vec![
                name.clone(),
                attribute.attr_type.to_string(),
                mode(attribute).to_string(),
                yes_no(attribute.force_new).to_string(),
                yes_no(attribute.sensitive).to_string(),
                default_text(attribute),
                attribute.description.clone(),
            ]);
        }
        println!("{table}\n");
    }
}

fn output_csv(schemas: &BTreeMap<&str, ResourceSchema>) {
    println!("RESOURCE,ATTRIBUTE,TYPE,MODE,FORCE_NEW,SENSITIVE,DEFAULT");
    for (type_name, schema) in schemas {
        for (name, attribute) in &schema.attributes {
            println!(
                "{},{},{},{},{},{},{}",
                type_name,
                escape_csv(name),
                attribute.attr_type,
                mode(attribute),
                attribute.force_new,
                attribute.sensitive,
                escape_csv(&default_text(attribute))
            );
        }
    }
}
