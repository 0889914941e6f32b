//! Push mirrors module - replicate a repository to an external remote

mod api;
mod models;
pub mod resource;

pub use models::{normalize_timestamp, CreatePushMirrorOption, PushMirror};
