//! Task list record and its item relation.

use crate::model::entity::{Column, ColumnKind, Entity, EntityId, EntitySchema};
use crate::model::todo_item::TodoItem;
use crate::store::relation::{OneToMany, Relation};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// Indicator color for lists saved without an explicit color.
pub const DEFAULT_LIST_COLOR: &str = "#8c7ae6";

/// A named list of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: Option<EntityId>,
    pub title: String,
    pub subtitle: String,
    /// Hex color (`#rrggbb`) shown next to the list.
    pub color: String,
    /// Tasks attached to the list, ordered by id.
    #[serde(default)]
    pub items: Vec<TodoItem>,
}

impl TodoList {
    /// Creates a transient list without items.
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            subtitle: subtitle.into(),
            color: color.into(),
            items: Vec::new(),
        }
    }

    /// Looks up an attached item by id.
    pub fn item(&self, item_id: EntityId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == Some(item_id))
    }

    /// Number of attached items marked completed.
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_completed).count()
    }
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new("", "", DEFAULT_LIST_COLOR)
    }
}

fn items(list: &TodoList) -> &[TodoItem] {
    &list.items
}

fn items_mut(list: &mut TodoList) -> &mut Vec<TodoItem> {
    &mut list.items
}

fn attach_item(item: &mut TodoItem, list_id: EntityId) {
    item.list_id = list_id;
}

static LIST_ITEMS: OneToMany<TodoList, TodoItem> = OneToMany {
    foreign_key: "list_id",
    children: items,
    children_mut: items_mut,
    attach: attach_item,
};

static LIST_RELATIONS: [&dyn Relation<TodoList>; 1] = [&LIST_ITEMS];

impl Entity for TodoList {
    const SCHEMA: EntitySchema = EntitySchema {
        table: "todo_lists",
        columns: &[
            Column::new("title", ColumnKind::Text),
            Column::new("subtitle", ColumnKind::Text),
            Column::new("color", ColumnKind::Text),
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
            Value::Text(self.title.clone()),
            Value::Text(self.subtitle.clone()),
            Value::Text(self.color.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            title: row.get("title")?,
            subtitle: row.get("subtitle")?,
            color: row.get("color")?,
            items: Vec::new(),
        })
    }

    fn relations() -> &'static [&'static dyn Relation<Self>] {
        &LIST_RELATIONS
    }
}

#[cfg(test)]
mod tests {
    use super::{TodoList, DEFAULT_LIST_COLOR};
    use crate::model::entity::Entity;
    use crate::model::todo_item::TodoItem;

    #[test]
    fn default_list_uses_indicator_color() {
        let list = TodoList::default();
        assert_eq!(list.color, DEFAULT_LIST_COLOR);
        assert!(list.items.is_empty());
        assert_eq!(list.id(), None);
    }

    #[test]
    fn declares_single_item_relation() {
        assert_eq!(TodoList::relations().len(), 1);
        assert_eq!(TodoList::relations()[0].foreign_key(), "list_id");
    }

    #[test]
    fn item_lookup_and_completed_count() {
        let mut list = TodoList::new("Groceries", "Weekly", "#112233");
        let mut milk = TodoItem::new(1, "Milk");
        milk.id = Some(5);
        milk.is_completed = true;
        let mut bread = TodoItem::new(1, "Bread");
        bread.id = Some(6);
        list.items = vec![milk, bread];

        assert_eq!(list.item(6).map(|item| item.name.as_str()), Some("Bread"));
        assert!(list.item(7).is_none());
        assert_eq!(list.completed_count(), 1);
    }
}
