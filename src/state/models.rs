//! State file data models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::provider::{ResourceData, ResourceKind};

/// Current state file format version
pub const STATE_VERSION: u32 = 1;

/// Top-level state file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    /// Incremented on every save
    #[serde(default)]
    pub serial: u64,
    /// Map of address (`{type}.{name}`) to resource state
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceState>,
}

/// State of one managed resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(flatten)]
    pub data: ResourceData,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            serial: 0,
            resources: BTreeMap::new(),
        }
    }
}

impl ResourceState {
    pub fn kind(&self) -> Result<ResourceKind> {
        self.resource_type.parse()
    }
}

impl StateFile {
    pub fn get(&self, address: &str) -> Option<&ResourceState> {
        self.resources.get(address)
    }

    /// Record a resource; data without an ID is removed instead
    pub fn upsert(&mut self, address: &str, kind: ResourceKind, data: ResourceData) {
        if data.id().is_none() {
            self.resources.remove(address);
            return;
        }
        self.resources.insert(
            address.to_string(),
            ResourceState {
                resource_type: kind.type_name().to_string(),
                data,
            },
        );
    }

    pub fn remove(&mut self, address: &str) -> Option<ResourceState> {
        self.resources.remove(address)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_with_id(id: &str) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("name", "ci");
        data.set_id(id);
        data
    }

    #[test]
    fn test_default_state() {
        let state = StateFile::default();
        assert_eq!(state.version, STATE_VERSION);
        assert_eq!(state.serial, 0);
        assert!(state.is_empty());
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut state = StateFile::default();
        state.upsert("gitea_token.ci", ResourceKind::Token, data_with_id("7"));
        let stored = state.get("gitea_token.ci").unwrap();
        assert_eq!(stored.resource_type, "gitea_token");
        assert_eq!(stored.kind().unwrap(), ResourceKind::Token);

        assert!(state.remove("gitea_token.ci").is_some());
        assert!(state.is_empty());
    }

    #[test]
    fn test_upsert_without_id_removes() {
        let mut state = StateFile::default();
        state.upsert("gitea_token.ci", ResourceKind::Token, data_with_id("7"));
        state.upsert("gitea_token.ci", ResourceKind::Token, ResourceData::new());
        assert!(state.get("gitea_token.ci").is_none());
    }

    #[test]
    fn test_serialized_layout() {
        let mut state = StateFile::default();
        state.upsert("gitea_token.ci", ResourceKind::Token, data_with_id("7"));
        let json = serde_json::to_value(&state).unwrap();
        let resource = &json["resources"]["gitea_token.ci"];
        assert_eq!(resource["type"], "gitea_token");
        assert_eq!(resource["id"], "7");
        assert_eq!(resource["attributes"]["name"], "ci");

        let parsed: StateFile = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_deserialize_minimal() {
        let state: StateFile = serde_json::from_str(r#"{"version": 1}"#).unwrap();
        assert!(state.resources.is_empty());
        assert_eq!(state.serial, 0);
    }
}
