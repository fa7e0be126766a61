//! Shared types used across Drivebox crates.

pub mod scope;

pub use scope::ListScope;
