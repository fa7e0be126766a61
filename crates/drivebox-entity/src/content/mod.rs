//! Content domain entities.

pub mod model;

pub use model::{Content, CreateContent};
