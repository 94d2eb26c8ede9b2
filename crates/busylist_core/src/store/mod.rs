//! Generic local persistence store.
//!
//! # Responsibility
//! - Map any `Entity` onto its SQLite table through one CRUD contract.
//! - Materialize one-to-many children on read and replace them on save.
//! - Own the on-disk representation; nothing above this module touches SQL.
//!
//! # Invariants
//! - Schema creation runs at most once per store (`OnceCell` latch). A failed
//!   run leaves the latch unset so a later call may retry.
//! - CRUD calls before the schema is ready return `SchemaNotReady`.
//! - `save` is a full overwrite of scalar fields and of every declared child
//!   collection, executed in one transaction.
//! - `delete` never cascades to children.
//! - No retries. Faults surface as `StoreError` to the immediate caller.

use crate::db::{open_connection, DbError, StorePath};
use crate::model::entity::{Entity, EntityId, EntitySchema};
use log::{debug, error, info};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

pub mod relation;
pub(crate) mod rows;

pub type StoreResult<T> = Result<T, StoreError>;

/// Typed storage fault.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite failure (I/O, constraint, conversion).
    Db(DbError),
    /// A CRUD call arrived before `create_schema` completed.
    SchemaNotReady,
    /// Entity carries an id the store could never have assigned.
    InvalidId(EntityId),
    /// A previous holder of the connection lock panicked.
    Poisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::SchemaNotReady => write!(f, "store schema has not been created"),
            Self::InvalidId(id) => write!(f, "invalid entity id: {id}"),
            Self::Poisoned => write!(f, "store connection lock is poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::SchemaNotReady => None,
            Self::InvalidId(_) => None,
            Self::Poisoned => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of one `save` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Id of the saved entity (newly assigned or unchanged).
    pub id: EntityId,
    /// `true` when a new row was created.
    pub inserted: bool,
    /// Owner rows written by the upsert statement.
    pub rows_written: usize,
}

/// Uniform CRUD contract over entity types.
///
/// Domain managers depend on this trait rather than on `Store` so that the
/// store can be swapped for a caching/queuing layer or a test double.
pub trait EntityStore {
    /// Every persisted row of `T`, ordered by id, children attached.
    fn get_all<T: Entity>(&self) -> StoreResult<Vec<T>>;

    /// Row `id` of `T` with children attached, or `None` when absent.
    fn get<T: Entity>(&self, id: EntityId) -> StoreResult<Option<T>>;

    /// Upserts `entity` and its children; writes assigned ids back.
    fn save<T: Entity>(&self, entity: &mut T) -> StoreResult<SaveOutcome>;

    /// Removes the row identified by `entity.id`; returns rows removed.
    fn delete<T: Entity>(&self, entity: &T) -> StoreResult<usize>;
}

/// SQLite-backed store. Share it by `Arc<Store>`.
pub struct Store {
    conn: Mutex<Connection>,
    schema_ready: OnceCell<()>,
}

impl Store {
    /// Opens the database at `path` and creates tables for `schemas`.
    ///
    /// # Errors
    /// - Connection or schema failures; the store is not returned.
    pub fn open(path: &StorePath, schemas: &[EntitySchema]) -> StoreResult<Self> {
        let store = Self::from_connection(open_connection(path)?);
        store.create_schema(schemas)?;
        Ok(store)
    }

    /// Opens a private in-memory database with tables for `schemas`.
    pub fn open_in_memory(schemas: &[EntitySchema]) -> StoreResult<Self> {
        Self::open(&StorePath::Memory, schemas)
    }

    /// Wraps an already configured connection. The store refuses CRUD calls
    /// until `create_schema` succeeds.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            schema_ready: OnceCell::new(),
        }
    }

    /// Ensures a table exists for every schema.
    ///
    /// Only the first successful call does work; later calls return
    /// immediately, regardless of the schemas they pass. Concurrent first
    /// callers block until the winning run finishes.
    pub fn create_schema(&self, schemas: &[EntitySchema]) -> StoreResult<()> {
        self.schema_ready.get_or_try_init(|| {
            let started_at = Instant::now();
            let result = self.run_create_schema(schemas);
            match &result {
                Ok(()) => info!(
                    "event=store_schema module=store status=ok tables={} duration_ms={}",
                    schemas.len(),
                    started_at.elapsed().as_millis()
                ),
                Err(err) => error!(
                    "event=store_schema module=store status=error tables={} duration_ms={} error={err}",
                    schemas.len(),
                    started_at.elapsed().as_millis()
                ),
            }
            result
        })?;
        Ok(())
    }

    /// Whether `create_schema` has completed.
    pub fn is_schema_ready(&self) -> bool {
        self.schema_ready.get().is_some()
    }

    fn run_create_schema(&self, schemas: &[EntitySchema]) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for schema in schemas {
            tx.execute_batch(&rows::create_table_sql(schema))?;
        }
        tx.commit()?;
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn ready(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        if !self.is_schema_ready() {
            return Err(StoreError::SchemaNotReady);
        }
        self.lock()
    }
}

impl EntityStore for Store {
    fn get_all<T: Entity>(&self) -> StoreResult<Vec<T>> {
        let started_at = Instant::now();
        let conn = self.ready()?;
        let result = rows::load_all::<T>(&conn);
        match &result {
            Ok(entities) => debug!(
                "event=store_get_all module=store status=ok table={} rows={} duration_ms={}",
                T::SCHEMA.table,
                entities.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("store_get_all", T::SCHEMA.table, err),
        }
        result
    }

    fn get<T: Entity>(&self, id: EntityId) -> StoreResult<Option<T>> {
        let started_at = Instant::now();
        let conn = self.ready()?;
        let result = rows::load_by_id::<T>(&conn, id);
        match &result {
            Ok(found) => debug!(
                "event=store_get module=store status=ok table={} id={id} found={} duration_ms={}",
                T::SCHEMA.table,
                found.is_some(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("store_get", T::SCHEMA.table, err),
        }
        result
    }

    fn save<T: Entity>(&self, entity: &mut T) -> StoreResult<SaveOutcome> {
        let started_at = Instant::now();
        let mut conn = self.ready()?;
        let children: usize = T::relations()
            .iter()
            .map(|relation| relation.child_count(entity))
            .sum();

        // Work on a copy so a rolled-back save leaves the caller's ids untouched.
        let mut staged = entity.clone();
        let result = conn
            .transaction()
            .map_err(StoreError::from)
            .and_then(|tx| {
                let outcome = rows::upsert(&tx, &mut staged)?;
                tx.commit()?;
                Ok(outcome)
            });

        match &result {
            Ok(outcome) => {
                *entity = staged;
                info!(
                    "event=store_save module=store status=ok table={} id={} inserted={} children={children} duration_ms={}",
                    T::SCHEMA.table,
                    outcome.id,
                    outcome.inserted,
                    started_at.elapsed().as_millis()
                );
            }
            Err(err) => log_failure("store_save", T::SCHEMA.table, err),
        }
        result
    }

    fn delete<T: Entity>(&self, entity: &T) -> StoreResult<usize> {
        let Some(id) = entity.id() else {
            debug!(
                "event=store_delete module=store status=skipped table={} reason=transient",
                T::SCHEMA.table
            );
            return Ok(0);
        };

        let started_at = Instant::now();
        let conn = self.ready()?;
        let result = rows::delete_by_id::<T>(&conn, id);
        match &result {
            Ok(removed) => info!(
                "event=store_delete module=store status=ok table={} id={id} removed={removed} duration_ms={}",
                T::SCHEMA.table,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("store_delete", T::SCHEMA.table, err),
        }
        result
    }
}

fn log_failure(event: &str, table: &str, err: &StoreError) {
    error!("event={event} module=store status=error table={table} error={err}");
}
