//! Gitea API client module
//!
//! This module talks to the Gitea REST API (`/api/v1`) and hosts the two
//! managed resources built on it.

mod client;
pub mod credentials;
pub mod push_mirrors;
pub mod tokens;

pub use client::GiteaClient;
pub use credentials::{Auth, ProviderConfig, ProviderResolver, ProviderSettings};
pub use push_mirrors::{CreatePushMirrorOption, PushMirror};
pub use tokens::{AccessToken, CreateAccessTokenOption};
