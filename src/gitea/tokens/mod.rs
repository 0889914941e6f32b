//! Access tokens module - personal API tokens of a user

mod api;
mod models;
pub mod resource;

pub use models::{AccessToken, CreateAccessTokenOption};
