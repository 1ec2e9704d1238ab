//! Domain types for the todo store.
//!
//! # Design
//! `TodoItem` is the persisted row and the wire representation at once. Its
//! JSON keys are capitalized (`ID`, `Description`, ...) because existing
//! clients of the service read that shape. Input types accept both the
//! capitalized and the lowercase spelling of each key, and zero-fill anything
//! a caller leaves out.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single todo item as stored in the `todo_item_models` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct TodoItem {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Completed")]
    pub completed: bool,
}

/// Input for creating a todo item. The store assigns `id` and always starts
/// the item as incomplete.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    #[serde(rename = "Description", alias = "description", default)]
    pub description: String,
    #[serde(rename = "Location", alias = "location", default)]
    pub location: String,
}

impl NewTodo {
    pub fn new(description: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            location: location.into(),
        }
    }
}

/// Input for the full-field update: every field overwrites the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    #[serde(rename = "Description", alias = "description", default)]
    pub description: String,
    #[serde(rename = "Location", alias = "location", default)]
    pub location: String,
    #[serde(rename = "Completed", alias = "completed", default)]
    pub completed: bool,
}
