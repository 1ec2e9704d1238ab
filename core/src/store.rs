//! The `TodoStore` seam.
//!
//! Handlers receive an `Arc<dyn TodoStore>` instead of reaching for a global
//! database handle, so the same router runs against `SqlStore` in production
//! and `MemoryStore` in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NewTodo, TodoItem, TodoPatch};

/// Persistence operations over `TodoItem`.
///
/// "Not found" is a normal outcome: `fetch`, `set_completed` and `replace`
/// return `Ok(None)` and `delete` returns `Ok(false)` when no row has the
/// given id, and nothing is modified. `Err` is reserved for backend failures.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Insert a new incomplete item and return it with its assigned id.
    async fn create(&self, input: &NewTodo) -> Result<TodoItem>;

    async fn fetch(&self, id: i64) -> Result<Option<TodoItem>>;

    /// Completion-only update. Description and location are left untouched.
    async fn set_completed(&self, id: i64, completed: bool) -> Result<Option<TodoItem>>;

    /// Full-field update. Overwrites description, location and completed.
    async fn replace(&self, id: i64, patch: &TodoPatch) -> Result<Option<TodoItem>>;

    /// Physically remove the row. Returns `false` if it did not exist.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// All items whose `completed` flag equals `completed`, ordered by id.
    async fn list_by_completion(&self, completed: bool) -> Result<Vec<TodoItem>>;
}
