//! Desired configuration file (YAML, JSON accepted)

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{GiteaError, Result};
use crate::gitea::ProviderSettings;
use crate::provider::{ResourceData, ResourceKind};

/// Top-level manifest
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Optional provider settings, lowest precedence after the credentials file
    #[serde(default)]
    pub provider: Option<ProviderSettings>,
    #[serde(default)]
    pub resources: Vec<ResourceBlock>,
}

/// One `resources` entry
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ResourceBlock {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl ResourceBlock {
    /// `{type}.{name}`
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }
}

/// A manifest entry that passed schema validation
#[derive(Debug, Clone)]
pub struct DesiredResource {
    pub address: String,
    pub kind: ResourceKind,
    pub data: ResourceData,
}

impl Manifest {
    /// Load and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading manifest from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            GiteaError::Config(format!(
                "Failed to read manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content).map_err(|e| {
            GiteaError::Config(format!(
                "Failed to parse manifest {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse manifest text
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(content)?)
    }

    /// Validate every entry against its schema, in manifest order
    pub fn desired_resources(&self) -> Result<Vec<DesiredResource>> {
        let mut seen = HashSet::new();
        let mut desired = Vec::with_capacity(self.resources.len());

        for block in &self.resources {
            if block.name.is_empty() || block.name.contains('.') {
                return Err(GiteaError::Validation(format!(
                    "resource name '{}' must be non-empty and must not contain '.'",
                    block.name
                )));
            }
            let address = block.address();
            if !seen.insert(address.clone()) {
                return Err(GiteaError::Validation(format!(
                    "duplicate resource address '{}'",
                    address
                )));
            }

            let kind: ResourceKind = block.resource_type.parse()?;
            let config = kind
                .schema()
                .validate_config(&block.config)
                .map_err(|e| GiteaError::Validation(format!("{}: {}", address, e)))?;

            desired.push(DesiredResource {
                address,
                kind,
                data: ResourceData::from_config(config),
            });
        }

        Ok(desired)
    }

    /// Validated entry for one address
    pub fn find(&self, address: &str) -> Result<DesiredResource> {
        self.desired_resources()?
            .into_iter()
            .find(|d| d.address == address)
            .ok_or_else(|| {
                GiteaError::Config(format!(
                    "resource '{}' is not declared in the manifest",
                    address
                ))
            })
    }
}
