//! SQLite storage implementation for Moneta.
//!
//! This crate provides all database-related functionality using Diesel with
//! SQLite. It implements the repository traits defined in `moneta-core` and
//! contains:
//! - Connection pooling and embedded migrations
//! - A single-writer actor that serializes all writes, giving each job
//!   transactional read-modify-write semantics
//! - Repository implementations for every domain entity
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist; everything above it is database-agnostic and works with traits.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod charges;
pub mod goals;
pub mod jars;
pub mod recurring;
pub mod transactions;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from moneta-core for convenience
pub use moneta_core::errors::{DatabaseError, Error, Result};
