//! Output formatting module
//!
//! Plans are printed as text; state and schemas support table, CSV, JSON
//! and YAML.

mod common;
mod plan;
mod schema;
mod state;

pub use common::{escape_csv, print_json, print_yaml, SENSITIVE_PLACEHOLDER};
pub use plan::{format_plan, output_plan};
pub use schema::output_schemas;
pub use state::output_state;
