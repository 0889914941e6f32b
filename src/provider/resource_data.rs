//! Attribute bag passed through resource operations

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{GiteaError, Result};

/// Attributes of one resource instance plus its remote ID.
///
/// Getters return zero values for unset attributes; identity fields should be
/// read with [`ResourceData::require_str`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an already validated configuration map
    pub fn from_config(config: Map<String, Value>) -> Self {
        Self {
            id: None,
            attributes: config.into_iter().collect(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the resource as gone
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// ID, or a state error naming the operation that needed it
    pub fn require_id(&self, operation: &str) -> Result<&str> {
        self.id().ok_or_else(|| {
            GiteaError::State(format!("cannot {} a resource without an ID", operation))
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_str_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Non-empty string attribute
    pub fn require_str(&self, key: &str) -> Result<&str> {
        match self.get_str(key) {
            "" => Err(GiteaError::Validation(format!(
                "attribute '{}' must be set",
                key
            ))),
            value => Ok(value),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Copy the named attributes from `other`, dropping ones it does not set
    pub fn merge_from(&mut self, other: &ResourceData, keys: &[&str]) {
        for key in keys {
            match other.attributes.get(*key) {
                Some(value) => {
                    self.attributes.insert(key.to_string(), value.clone());
                }
                None => {
                    self.attributes.remove(*key);
                }
            }
        }
    }
}
