//! Local state of managed resources

mod models;
mod store;

pub use models::{ResourceState, StateFile, STATE_VERSION};
pub use store::StateStore;
