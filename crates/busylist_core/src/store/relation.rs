//! One-to-many relation descriptors.
//!
//! An owner entity lists its relations in `Entity::relations()`; the store
//! walks them to attach children on read and to replace the persisted child
//! set on save.

use crate::model::entity::{Entity, EntityId};
use crate::store::{rows, StoreResult};
use rusqlite::Connection;

/// Child collection of owner type `O`, resolved by foreign key.
pub trait Relation<O>: Sync {
    /// Child column holding the owner id.
    fn foreign_key(&self) -> &'static str;

    /// Number of children currently held in memory by `owner`.
    fn child_count(&self, owner: &O) -> usize;

    /// Replaces the in-memory child collection with the persisted rows.
    fn load(&self, conn: &Connection, owner: &mut O, owner_id: EntityId) -> StoreResult<()>;

    /// Upserts every in-memory child under `owner_id` and deletes persisted
    /// children missing from the collection.
    ///
    /// Returns the number of stale child rows removed.
    fn replace(&self, conn: &Connection, owner: &mut O, owner_id: EntityId)
        -> StoreResult<usize>;
}

/// `Vec<C>` field on `O`, keyed by `C.<foreign_key> = O.id`.
pub struct OneToMany<O, C> {
    pub foreign_key: &'static str,
    pub children: fn(&O) -> &[C],
    pub children_mut: fn(&mut O) -> &mut Vec<C>,
    /// Writes the owner id into the child's foreign key field.
    pub attach: fn(&mut C, EntityId),
}

impl<O: Entity, C: Entity> Relation<O> for OneToMany<O, C> {
    fn foreign_key(&self) -> &'static str {
        self.foreign_key
    }

    fn child_count(&self, owner: &O) -> usize {
        (self.children)(owner).len()
    }

    fn load(&self, conn: &Connection, owner: &mut O, owner_id: EntityId) -> StoreResult<()> {
        let children = rows::load_by_owner::<C>(conn, self.foreign_key, owner_id)?;
        *(self.children_mut)(owner) = children;
        Ok(())
    }

    fn replace(
        &self,
        conn: &Connection,
        owner: &mut O,
        owner_id: EntityId,
    ) -> StoreResult<usize> {
        let children = (self.children_mut)(owner);
        let mut kept = Vec::with_capacity(children.len());
        for child in children.iter_mut() {
            (self.attach)(child, owner_id);
            let outcome = rows::upsert(conn, child)?;
            kept.push(outcome.id);
        }
        rows::delete_stale_children::<C>(conn, self.foreign_key, owner_id, &kept)
    }
}
