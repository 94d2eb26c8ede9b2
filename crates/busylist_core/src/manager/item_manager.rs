//! Item manager.

use crate::model::entity::EntityId;
use crate::model::todo_item::TodoItem;
use crate::store::{EntityStore, StoreResult};
use log::debug;
use std::sync::Arc;

/// Facade for `TodoItem` use-cases. Pure pass-through to the store.
pub struct ItemManager<S: EntityStore> {
    store: Arc<S>,
}

impl<S: EntityStore> Clone for ItemManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EntityStore> ItemManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Loads one item by id. Non-positive ids return `Ok(None)` without
    /// reaching the store.
    pub fn get_item(&self, id: EntityId) -> StoreResult<Option<TodoItem>> {
        if id <= 0 {
            debug!("event=item_get module=manager status=skipped reason=invalid_id");
            return Ok(None);
        }
        self.store.get::<TodoItem>(id)
    }

    /// Inserts or overwrites `item`. Returns `true` when a row was written.
    pub fn save_item(&self, item: &mut TodoItem) -> StoreResult<bool> {
        let outcome = self.store.save(item)?;
        Ok(outcome.rows_written > 0)
    }

    /// Hard-deletes `item`. Returns `true` when a row was removed.
    pub fn delete_item(&self, item: &TodoItem) -> StoreResult<bool> {
        Ok(self.store.delete(item)? > 0)
    }
}
