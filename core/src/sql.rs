//! `TodoStore` over a relational table.
//!
//! # Design
//! Each operation is exactly one SQL statement. Updates use `RETURNING` and
//! deletes check rows-affected, so "does the row exist" and "change it" are
//! never two separate round-trips. Concurrent deletes of the same id resolve
//! inside the database: one caller sees `true`, the others see `false`.
//!
//! The schema is created on connect and never dropped unless `reset` is
//! called explicitly.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::store::TodoStore;
use crate::types::{NewTodo, TodoItem, TodoPatch};

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS todo_item_models (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT    NOT NULL DEFAULT '',
    location    TEXT    NOT NULL DEFAULT '',
    completed   BOOLEAN NOT NULL DEFAULT 0
)";

const DROP_TABLE: &str = "DROP TABLE IF EXISTS todo_item_models";

const COLUMNS: &str = "id, description, location, completed";

/// `TodoStore` backed by a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Open a pool for `url` and make sure the table exists.
    ///
    /// An in-memory database lives only as long as its connection, so for
    /// `:memory:` URLs the pool is pinned to one connection that is never
    /// closed for idleness or age.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect_with(options)
                .await?
        };
        debug!(url, "database pool opened");

        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Wrap an existing pool. The caller is responsible for `migrate`.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the table if it is missing. Existing rows are kept.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!(table = "todo_item_models", "schema ready");
        Ok(())
    }

    /// Drop the table and create it again, discarding every row.
    pub async fn reset(&self) -> Result<()> {
        warn!(table = "todo_item_models", "dropping table");
        sqlx::query(DROP_TABLE).execute(&self.pool).await?;
        self.migrate().await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl TodoStore for SqlStore {
    async fn create(&self, input: &NewTodo) -> Result<TodoItem> {
        let sql = format!(
            "INSERT INTO todo_item_models (description, location, completed) \
             VALUES (?, ?, FALSE) RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, TodoItem>(&sql)
            .bind(&input.description)
            .bind(&input.location)
            .fetch_one(&self.pool)
            .await?;
        Ok(item)
    }

    async fn fetch(&self, id: i64) -> Result<Option<TodoItem>> {
        let sql = format!("SELECT {COLUMNS} FROM todo_item_models WHERE id = ?");
        let item = sqlx::query_as::<_, TodoItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn set_completed(&self, id: i64, completed: bool) -> Result<Option<TodoItem>> {
        let sql = format!(
            "UPDATE todo_item_models SET completed = ? WHERE id = ? RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, TodoItem>(&sql)
            .bind(completed)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn replace(&self, id: i64, patch: &TodoPatch) -> Result<Option<TodoItem>> {
        let sql = format!(
            "UPDATE todo_item_models SET description = ?, location = ?, completed = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, TodoItem>(&sql)
            .bind(&patch.description)
            .bind(&patch.location)
            .bind(patch.completed)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todo_item_models WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_completion(&self, completed: bool) -> Result<Vec<TodoItem>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM todo_item_models WHERE completed = ? ORDER BY id"
        );
        let items = sqlx::query_as::<_, TodoItem>(&sql)
            .bind(completed)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqlStore {
        SqlStore::connect("sqlite::memory:", 1).await.unwrap()
    }

    #[test]
    fn in_memory_urls_are_detected() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file.db?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://todolist.db"));
    }

    #[tokio::test]
    async fn migrate_is_idempotent_and_keeps_rows() {
        let store = store().await;
        let item = store.create(&NewTodo::new("keep", "me")).await.unwrap();
        store.migrate().await.unwrap();
        assert_eq!(store.fetch(item.id).await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn reset_discards_rows() {
        let store = store().await;
        store.create(&NewTodo::new("gone", "")).await.unwrap();
        store.reset().await.unwrap();
        assert!(store.list_by_completion(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn autoincrement_never_reuses_ids() {
        let store = store().await;
        let first = store.create(&NewTodo::new("a", "")).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());
        let second = store.create(&NewTodo::new("b", "")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn file_backed_database_is_created() {
        let path = std::env::temp_dir().join(format!("todo-core-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let url = format!("sqlite://{}", path.display());

        let store = SqlStore::connect(&url, 2).await.unwrap();
        let item = store.create(&NewTodo::new("on disk", "tmp")).await.unwrap();
        store.close().await;

        let reopened = SqlStore::connect(&url, 2).await.unwrap();
        assert_eq!(reopened.fetch(item.id).await.unwrap(), Some(item));
        reopened.close().await;
        let _ = std::fs::remove_file(&path);
    }
}
