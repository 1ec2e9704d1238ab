//! In-process `TodoStore`.
//!
//! # Design
//! A `BTreeMap` behind a tokio `RwLock`, plus the last id handed out. Ids
//! only ever grow, so a deleted id is never reassigned, same as the
//! `AUTOINCREMENT` column in `SqlStore`. Every operation takes the lock once,
//! which makes check-and-mutate atomic here as well.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::store::TodoStore;
use crate::types::{NewTodo, TodoItem, TodoPatch};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, TodoItem>,
}

/// `TodoStore` kept entirely in memory. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<RwLock<Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create(&self, input: &NewTodo) -> Result<TodoItem> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let item = TodoItem {
            id: table.last_id,
            description: input.description.clone(),
            location: input.location.clone(),
            completed: false,
        };
        table.rows.insert(item.id, item.clone());
        Ok(item)
    }

    async fn fetch(&self, id: i64) -> Result<Option<TodoItem>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn set_completed(&self, id: i64, completed: bool) -> Result<Option<TodoItem>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|item| {
            item.completed = completed;
            item.clone()
        }))
    }

    async fn replace(&self, id: i64, patch: &TodoPatch) -> Result<Option<TodoItem>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|item| {
            item.description = patch.description.clone();
            item.location = patch.location.clone();
            item.completed = patch.completed;
            item.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn list_by_completion(&self, completed: bool) -> Result<Vec<TodoItem>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|item| item.completed == completed)
            .cloned()
            .collect())
    }
}
