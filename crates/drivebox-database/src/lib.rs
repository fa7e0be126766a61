//! # drivebox-database
//!
//! PostgreSQL connection management, migrations, sentinel bootstrapping,
//! and repository implementations for Drivebox.
//!
//! Repositories expose two kinds of methods: read-only queries that run
//! against the pool directly, and mutations that take a `&mut PgConnection`
//! so the service layer can compose them inside a single transaction.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod sentinel;

pub use connection::DatabasePool;
