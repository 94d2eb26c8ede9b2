//! SQL building blocks shared by the store and relation descriptors.
//!
//! Table and column names interpolated into SQL come from `EntitySchema`
//! constants only; values are always bound as parameters.

use crate::model::entity::{Entity, EntityId, EntitySchema};
use crate::store::{SaveOutcome, StoreError, StoreResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Rows};

pub(crate) fn create_table_sql(schema: &EntitySchema) -> String {
    let mut definitions = vec!["id INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
    definitions.extend(schema.columns.iter().map(|column| column.definition()));

    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
        schema.table,
        definitions.join(",\n    ")
    );
    for column in schema.columns.iter().filter(|column| column.foreign_key) {
        sql.push_str(&format!(
            "\nCREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table} ({column});",
            table = schema.table,
            column = column.name
        ));
    }
    sql
}

fn select_sql<T: Entity>() -> String {
    format!(
        "SELECT id, {} FROM {}",
        T::SCHEMA.column_list(),
        T::SCHEMA.table
    )
}

pub(crate) fn load_all<T: Entity>(conn: &Connection) -> StoreResult<Vec<T>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC;", select_sql::<T>()))?;
    let rows = stmt.query([])?;
    let mut entities = collect_rows::<T>(rows)?;
    for entity in &mut entities {
        materialize(conn, entity)?;
    }
    Ok(entities)
}

pub(crate) fn load_by_id<T: Entity>(conn: &Connection, id: EntityId) -> StoreResult<Option<T>> {
    let found = conn
        .query_row(
            &format!("{} WHERE id = ?1;", select_sql::<T>()),
            [id],
            |row| T::from_row(row),
        )
        .optional()?;

    match found {
        Some(mut entity) => {
            materialize(conn, &mut entity)?;
            Ok(Some(entity))
        }
        None => Ok(None),
    }
}

pub(crate) fn load_by_owner<C: Entity>(
    conn: &Connection,
    foreign_key: &str,
    owner_id: EntityId,
) -> StoreResult<Vec<C>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE {foreign_key} = ?1 ORDER BY id ASC;",
        select_sql::<C>()
    ))?;
    let rows = stmt.query([owner_id])?;
    let mut children = collect_rows::<C>(rows)?;
    for child in &mut children {
        materialize(conn, child)?;
    }
    Ok(children)
}

fn collect_rows<T: Entity>(mut rows: Rows<'_>) -> StoreResult<Vec<T>> {
    let mut entities = Vec::new();
    while let Some(row) = rows.next()? {
        entities.push(T::from_row(row)?);
    }
    Ok(entities)
}

fn materialize<T: Entity>(conn: &Connection, entity: &mut T) -> StoreResult<()> {
    let Some(id) = entity.id() else {
        return Ok(());
    };
    for relation in T::relations() {
        relation.load(conn, entity, id)?;
    }
    Ok(())
}

/// Inserts or fully overwrites `entity`, then replaces its children.
///
/// The assigned id is written back into `entity` (and into every child).
pub(crate) fn upsert<T: Entity>(conn: &Connection, entity: &mut T) -> StoreResult<SaveOutcome> {
    let schema = T::SCHEMA;
    let existing_id = match entity.id() {
        Some(id) if id <= 0 => return Err(StoreError::InvalidId(id)),
        other => other,
    };
    let inserted = match existing_id {
        Some(id) => !row_exists(conn, schema.table, id)?,
        None => true,
    };

    let mut values = Vec::with_capacity(schema.columns.len() + 1);
    values.push(existing_id.map_or(Value::Null, Value::Integer));
    values.extend(entity.column_values());

    let placeholders = (1..=values.len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    let conflict = if schema.columns.is_empty() {
        "DO NOTHING".to_string()
    } else {
        let assignments = schema
            .columns
            .iter()
            .map(|column| format!("{name} = excluded.{name}", name = column.name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("DO UPDATE SET {assignments}")
    };
    let sql = format!(
        "INSERT INTO {table} (id{separator}{columns}) VALUES ({placeholders})
         ON CONFLICT(id) {conflict};",
        table = schema.table,
        separator = if schema.columns.is_empty() { "" } else { ", " },
        columns = schema.column_list(),
    );

    let rows_written = conn.execute(&sql, params_from_iter(values))?;
    let id = existing_id.unwrap_or_else(|| conn.last_insert_rowid());
    entity.set_id(id);

    for relation in T::relations() {
        relation.replace(conn, entity, id)?;
    }

    Ok(SaveOutcome {
        id,
        inserted,
        rows_written,
    })
}

pub(crate) fn delete_by_id<T: Entity>(conn: &Connection, id: EntityId) -> StoreResult<usize> {
    let removed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1;", T::SCHEMA.table),
        [id],
    )?;
    Ok(removed)
}

pub(crate) fn delete_stale_children<C: Entity>(
    conn: &Connection,
    foreign_key: &str,
    owner_id: EntityId,
    kept: &[EntityId],
) -> StoreResult<usize> {
    let table = C::SCHEMA.table;
    let mut values = vec![Value::Integer(owner_id)];
    let sql = if kept.is_empty() {
        format!("DELETE FROM {table} WHERE {foreign_key} = ?1;")
    } else {
        let placeholders = (2..=kept.len() + 1)
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        values.extend(kept.iter().copied().map(Value::Integer));
        format!("DELETE FROM {table} WHERE {foreign_key} = ?1 AND id NOT IN ({placeholders});")
    };
    let removed = conn.execute(&sql, params_from_iter(values))?;
    Ok(removed)
}

fn row_exists(conn: &Connection, table: &str, id: EntityId) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::create_table_sql;
    use crate::model::entity::Entity;
    use crate::model::todo_item::TodoItem;

    #[test]
    fn create_table_sql_is_idempotent_and_indexes_foreign_keys() {
        let sql = create_table_sql(&TodoItem::SCHEMA);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS todo_items"));
        assert!(sql.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("list_id INTEGER NOT NULL DEFAULT 0"));
        assert!(!sql.contains("REFERENCES"));
        assert!(sql.contains(
            "CREATE INDEX IF NOT EXISTS idx_todo_items_list_id ON todo_items (list_id);"
        ));
    }
}
