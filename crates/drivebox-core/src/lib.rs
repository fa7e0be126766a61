//! # drivebox-core
//!
//! Core crate for Drivebox. Contains the object-store trait boundary,
//! configuration schemas, shared types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Drivebox crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
