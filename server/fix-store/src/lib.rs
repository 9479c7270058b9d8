//! Fix history store — recorded infrastructure fixes as a flat document
//! collection (one JSON file, or in-memory for inline callers).
//!
//! Consumers treat the store as read-only during analysis; the capture
//! workflow that writes new fixes lives outside this workspace.

pub mod error;
pub mod model;
pub mod store;

pub use error::StoreError;
pub use model::Fix;
pub use store::FixStore;
