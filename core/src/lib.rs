//! Persistence core for the todo service.
//!
//! # Overview
//! Owns the single `TodoItem` entity and every read and write against it.
//! Callers talk to the `TodoStore` trait; two implementations are provided.
//!
//! # Design
//! - `SqlStore` is the durable backend (SQLite through `sqlx`). The schema is
//!   created on connect.
//! - `MemoryStore` has identical observable behavior and no I/O, for tests and
//!   throwaway runs.
//! - A missing id is an ordinary outcome (`None` / `false`), never a
//!   `StoreError`.
//! - The two update shapes are two methods, `set_completed` and `replace`,
//!   rather than one method with optional fields.

pub mod error;
pub mod memory;
pub mod sql;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sql::SqlStore;
pub use store::TodoStore;
pub use types::{NewTodo, TodoItem, TodoPatch};
