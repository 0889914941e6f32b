//! Resource lifecycle: schemas, attribute data, planning and applying changes

pub mod commands;
pub mod lifecycle;
pub mod plan;
mod resource_data;
pub mod schema;

use std::fmt;
use std::str::FromStr;

use crate::error::{GiteaError, Result};
use crate::gitea::push_mirrors::resource as push_mirror;
use crate::gitea::tokens::resource as token;
use crate::gitea::GiteaClient;

pub use plan::{Action, Plan, PlannedChange};
pub use resource_data::ResourceData;
pub use schema::{Attribute, AttributeType, ResourceSchema};

/// The resource types this tool manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    PushMirror,
    Token,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::PushMirror, ResourceKind::Token];

    pub fn type_name(&self) -> &'static str {
        match self {
            ResourceKind::PushMirror => push_mirror::TYPE_NAME,
            ResourceKind::Token => token::TYPE_NAME,
        }
    }

    pub fn schema(&self) -> ResourceSchema {
        match self {
            ResourceKind::PushMirror => push_mirror::schema(),
            ResourceKind::Token => token::schema(),
        }
    }

    /// Whether changes can be applied in place at all
    pub fn supports_update(&self) -> bool {
        matches!(self, ResourceKind::PushMirror)
    }

    pub async fn read(&self, client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
        match self {
            ResourceKind::PushMirror => push_mirror::read(client, data).await,
            ResourceKind::Token => token::read(client, data).await,
        }
    }

    pub async fn create(&self, client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
        match self {
            ResourceKind::PushMirror => push_mirror::create(client, data).await,
            ResourceKind::Token => token::create(client, data).await,
        }
    }

    pub async fn update(&self, client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
        match self {
            ResourceKind::PushMirror => push_mirror::update(client, data).await,
            ResourceKind::Token => Err(GiteaError::Validation(format!(
                "{} cannot be updated in place",
                self
            ))),
        }
    }

    pub async fn delete(&self, client: &GiteaClient, data: &mut ResourceData) -> Result<()> {
        match self {
            ResourceKind::PushMirror => push_mirror::delete(client, data).await,
            ResourceKind::Token => token::delete(client, data).await,
        }
    }

    /// Prepare data for reading an existing remote object by ID
    pub fn import(&self, id: &str, data: &mut ResourceData) -> Result<()> {
        match self {
            ResourceKind::PushMirror => push_mirror::import(id, data),
            ResourceKind::Token => token::import(id, data),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl FromStr for ResourceKind {
    type Err = GiteaError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.type_name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ResourceKind::ALL.iter().map(|k| k.type_name()).collect();
                GiteaError::Config(format!(
                    "unknown resource type '{}' (known: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}
