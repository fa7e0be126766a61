//! # drivebox-entity
//!
//! Domain entity models for Drivebox. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod content;
pub mod file;
pub mod folder;
pub mod listing;
