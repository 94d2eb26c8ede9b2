//! Task record owned by one list.

use crate::model::entity::{bool_to_value, Column, ColumnKind, Entity, EntityId, EntitySchema};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// One task on a `TodoList`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: Option<EntityId>,
    /// Id of the owning list. Overwritten by the store when the item is saved
    /// as part of its list.
    pub list_id: EntityId,
    pub name: String,
    pub is_completed: bool,
}

impl TodoItem {
    /// Creates a transient, not-yet-completed task for `list_id`.
    pub fn new(list_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: None,
            list_id,
            name: name.into(),
            is_completed: false,
        }
    }
}

impl Entity for TodoItem {
    const SCHEMA: EntitySchema = EntitySchema {
        table: "todo_items",
        columns: &[
            Column::foreign_key("list_id"),
            Column::new("name", ColumnKind::Text),
            Column::new("is_completed", ColumnKind::Boolean),
        ],
    };

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.list_id),
            Value::Text(self.name.clone()),
            bool_to_value(self.is_completed),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            list_id: row.get("list_id")?,
            name: row.get("name")?,
            is_completed: row.get("is_completed")?,
        })
    }
}
