//! Trait boundaries between the core and its external collaborators.

pub mod object_store;

pub use object_store::{ObjectStore, StoredObject};
