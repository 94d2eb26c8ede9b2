//! Entity contract shared by every persisted record type.

use crate::store::relation::Relation;
use rusqlite::types::Value;
use rusqlite::Row;

/// Integer identity assigned by the store on first save.
pub type EntityId = i64;

/// Storage class of one scalar column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    Boolean,
}

/// One scalar column of an entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Column holds the id of an owning entity and gets an index. The link is
    /// not enforced by SQLite, so deleting an owner leaves its children.
    pub foreign_key: bool,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            foreign_key: false,
        }
    }

    pub const fn foreign_key(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Integer,
            foreign_key: true,
        }
    }

    /// Column definition used in `CREATE TABLE`.
    pub fn definition(&self) -> String {
        let name = self.name;
        match self.kind {
            ColumnKind::Integer => format!("{name} INTEGER NOT NULL DEFAULT 0"),
            ColumnKind::Text => format!("{name} TEXT NOT NULL DEFAULT ''"),
            ColumnKind::Boolean => {
                format!("{name} INTEGER NOT NULL DEFAULT 0 CHECK ({name} IN (0, 1))")
            }
        }
    }
}

/// Table descriptor for one entity type.
///
/// The `id INTEGER PRIMARY KEY AUTOINCREMENT` column is implicit and must not
/// be listed in `columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub table: &'static str,
    pub columns: &'static [Column],
}

impl EntitySchema {
    /// Comma separated column names, in declaration order.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|column| column.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A record type persisted by the store.
///
/// Implementors describe their table through `SCHEMA`, convert to and from
/// SQLite rows, and declare child collections through `relations()`.
pub trait Entity: Clone + Default + Send + 'static {
    const SCHEMA: EntitySchema;

    fn id(&self) -> Option<EntityId>;

    /// Assigns the store-generated id. Called by the store only.
    fn set_id(&mut self, id: EntityId);

    /// Scalar values in `SCHEMA.columns` order.
    fn column_values(&self) -> Vec<Value>;

    /// Builds the scalar part of an entity from a row selected with `id` and
    /// every schema column. Child collections are left empty.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// One-to-many relations materialized on read and replaced on save.
    fn relations() -> &'static [&'static dyn Relation<Self>] {
        &[]
    }
}

/// Identity comparison: both records are persisted and carry the same id.
///
/// Two transient records are never the same entity, even when their fields
/// match.
pub fn same_identity<T: Entity>(left: &T, right: &T) -> bool {
    match (left.id(), right.id()) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

pub(crate) fn bool_to_value(value: bool) -> Value {
    Value::Integer(i64::from(value))
}
