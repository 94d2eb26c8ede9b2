//! List manager.

use crate::model::entity::{Entity, EntityId};
use crate::model::todo_list::TodoList;
use crate::store::{EntityStore, StoreResult};
use log::{debug, info};
use std::sync::Arc;

/// Facade for `TodoList` use-cases.
pub struct ListManager<S: EntityStore> {
    store: Arc<S>,
}

impl<S: EntityStore> Clone for ListManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EntityStore> ListManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Every list with its items attached.
    pub fn get_lists(&self) -> StoreResult<Vec<TodoList>> {
        self.store.get_all::<TodoList>()
    }

    /// Loads one list by id.
    ///
    /// `None` and non-positive ids mean "no selection" and return `Ok(None)`
    /// without reaching the store.
    pub fn get_list(&self, id: Option<EntityId>) -> StoreResult<Option<TodoList>> {
        match id {
            Some(id) if id > 0 => self.store.get::<TodoList>(id),
            _ => {
                debug!("event=list_get module=manager status=skipped reason=no_selection");
                Ok(None)
            }
        }
    }

    /// Inserts or fully overwrites `list` together with its items.
    ///
    /// Returns `true` when the store wrote the list row. Storage faults are
    /// returned as errors rather than folded into `false`.
    pub fn save_list(&self, list: &mut TodoList) -> StoreResult<bool> {
        let outcome = self.store.save(list)?;
        Ok(outcome.rows_written > 0)
    }

    /// Deletes `list` and its persisted items.
    ///
    /// Items are removed first, one store call each, so a list never
    /// disappears while leaving orphaned items behind. Returns `true` when
    /// the list row was removed.
    pub fn delete_list(&self, list: &TodoList) -> StoreResult<bool> {
        let Some(id) = list.id() else {
            return Ok(false);
        };
        let persisted_items = match self.store.get::<TodoList>(id)? {
            Some(persisted) => persisted.items,
            None => Vec::new(),
        };
        for item in &persisted_items {
            self.store.delete(item)?;
        }

        let removed = self.store.delete(list)?;
        info!(
            "event=list_delete module=manager status=ok id={id} items={} removed={removed}",
            persisted_items.len()
        );
        Ok(removed > 0)
    }
}
