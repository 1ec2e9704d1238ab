//! Error types for the todo store.
//!
//! # Design
//! A missing row is not an error: store operations report it through
//! `Option` / `bool` return values. `StoreError` only carries backend
//! failures (connectivity, constraint violations, decode errors), which
//! callers are not expected to tell apart.

use thiserror::Error;

pub use sqlx::Error as DatabaseError;

/// Backend failure raised by a `TodoStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
