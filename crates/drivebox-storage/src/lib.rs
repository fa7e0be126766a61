//! # drivebox-storage
//!
//! [`ObjectStore`](drivebox_core::traits::ObjectStore) implementations.
//! The metadata layer only ever talks to the trait; which backend is used
//! comes from configuration.

pub mod providers;

pub use providers::from_config;
pub use providers::local::LocalObjectStore;
pub use providers::memory::MemoryObjectStore;
