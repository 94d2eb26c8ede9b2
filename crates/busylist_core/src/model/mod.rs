//! Entity model for task lists.
//!
//! # Responsibility
//! - Define the records persisted by the store (`TodoList`, `TodoItem`).
//! - Declare per-entity table shape and one-to-many relations.
//!
//! # Invariants
//! - An entity id is `None` until the first successful save, then immutable.
//! - Entity equality for deduplication is identity-by-id (`same_identity`),
//!   never structural.

pub mod entity;
pub mod palette;
pub mod todo_item;
pub mod todo_list;

use entity::{Entity, EntitySchema};
use todo_item::TodoItem;
use todo_list::TodoList;

/// Every table the application needs, in creation order.
pub const SCHEMAS: &[EntitySchema] = &[TodoList::SCHEMA, TodoItem::SCHEMA];
