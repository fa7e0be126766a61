//! File operations: upload, download, and lifecycle.

pub mod service;

pub use service::{FileService, UploadRequest};
