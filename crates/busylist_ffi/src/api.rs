//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list/item use-cases to Dart via FRB.
//! - Flatten core errors into response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One store is shared per process; a failed open is retried on the next
//!   call.

use busylist_core::model::palette::{is_valid_color_hex, random_flat_color};
use busylist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_store,
    ping as ping_inner, EntityId, ItemManager, ListManager, Store, StorePath,
    TodoItem, TodoList, DATABASE_FILE_NAME,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

const DB_PATH_ENV: &str = "BUSYLIST_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE: Mutex<Option<Arc<Store>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One task as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: i64,
    pub list_id: i64,
    pub name: String,
    pub is_completed: bool,
}

/// One list with its tasks as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    /// Hex color (`#rrggbb`).
    pub color: String,
    pub items: Vec<ItemView>,
    pub completed_count: u32,
}

/// Read response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    /// Whether the read reached the store.
    pub ok: bool,
    pub lists: Vec<ListView>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

impl ListResponse {
    fn success(lists: Vec<ListView>) -> Self {
        let message = match lists.len() {
            0 => "No lists.".to_string(),
            count => format!("Found {count} list(s)."),
        };
        Self {
            ok: true,
            lists,
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            lists: Vec::new(),
            message: message.into(),
        }
    }
}

/// Write response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the saved or deleted record.
    pub id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: EntityId) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Every list with its tasks.
#[flutter_rust_bridge::frb(sync)]
pub fn lists_get_all() -> ListResponse {
    match with_store(|store| {
        ListManager::new(store)
            .get_lists()
            .map_err(|err| err.to_string())
    }) {
        Ok(lists) => ListResponse::success(lists.into_iter().map(to_list_view).collect()),
        Err(err) => ListResponse::failure(format!("lists_get_all failed: {err}")),
    }
}

/// One list by id; an empty `lists` means it does not exist.
#[flutter_rust_bridge::frb(sync)]
pub fn list_get(id: i64) -> ListResponse {
    match with_store(|store| {
        ListManager::new(store)
            .get_list(Some(id))
            .map_err(|err| err.to_string())
    }) {
        Ok(list) => ListResponse::success(list.into_iter().map(to_list_view).collect()),
        Err(err) => ListResponse::failure(format!("list_get failed: {err}")),
    }
}

/// Creates a list (`id=None`) or overwrites the fields of an existing one.
///
/// A blank `color` picks a random palette color. Items of an existing list
/// are kept.
#[flutter_rust_bridge::frb(sync)]
pub fn list_save(
    id: Option<i64>,
    title: String,
    subtitle: String,
    color: String,
) -> ActionResponse {
    let title = title.trim().to_string();
    if title.is_empty() {
        return ActionResponse::failure("list_save failed: title must not be blank");
    }
    let color = match color.trim() {
        "" => random_flat_color().to_string(),
        value if is_valid_color_hex(value) => value.to_string(),
        value => {
            return ActionResponse::failure(format!(
                "list_save failed: `{value}` is not a hex color"
            ))
        }
    };

    let result = with_store(|store| {
        let lists = ListManager::new(store);
        let mut list = match id {
            Some(id) => lists
                .get_list(Some(id))
                .map_err(|err| err.to_string())?
                .ok_or_else(|| format!("list {id} not found"))?,
            None => TodoList::default(),
        };
        list.title = title;
        list.subtitle = subtitle.trim().to_string();
        list.color = color;

        if !lists.save_list(&mut list).map_err(|err| err.to_string())? {
            return Err("list row was not written".to_string());
        }
        list.id.ok_or_else(|| "saved list has no id".to_string())
    });
    match result {
        Ok(id) => ActionResponse::success("List saved.", id),
        Err(err) => ActionResponse::failure(format!("list_save failed: {err}")),
    }
}

/// Deletes a list and its tasks.
#[flutter_rust_bridge::frb(sync)]
pub fn list_delete(id: i64) -> ActionResponse {
    let result = with_store(|store| {
        let lists = ListManager::new(store);
        let list = lists
            .get_list(Some(id))
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("list {id} not found"))?;
        lists.delete_list(&list).map_err(|err| err.to_string())
    });
    match result {
        Ok(true) => ActionResponse::success("List deleted.", id),
        Ok(false) => ActionResponse::failure(format!("list_delete failed: list {id} not removed")),
        Err(err) => ActionResponse::failure(format!("list_delete failed: {err}")),
    }
}

/// Appends a new, open task to list `list_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn item_add(list_id: i64, name: String) -> ActionResponse {
    let name = name.trim().to_string();
    if name.is_empty() {
        return ActionResponse::failure("item_add failed: name must not be blank");
    }

    let result = with_store(|store| {
        if ListManager::new(Arc::clone(&store))
            .get_list(Some(list_id))
            .map_err(|err| err.to_string())?
            .is_none()
        {
            return Err(format!("list {list_id} not found"));
        }
        let mut item = TodoItem::new(list_id, name);
        ItemManager::new(store)
            .save_item(&mut item)
            .map_err(|err| err.to_string())?;
        item.id.ok_or_else(|| "saved item has no id".to_string())
    });
    match result {
        Ok(id) => ActionResponse::success("Task added.", id),
        Err(err) => ActionResponse::failure(format!("item_add failed: {err}")),
    }
}

/// Marks task `id` completed or open.
#[flutter_rust_bridge::frb(sync)]
pub fn item_set_completed(id: i64, completed: bool) -> ActionResponse {
    let result = with_store(|store| {
        let items = ItemManager::new(store);
        let mut item = load_item(&items, id)?;
        item.is_completed = completed;
        items
            .save_item(&mut item)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(_) => ActionResponse::success("Task updated.", id),
        Err(err) => ActionResponse::failure(format!("item_set_completed failed: {err}")),
    }
}

/// Deletes task `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn item_delete(id: i64) -> ActionResponse {
    let result = with_store(|store| {
        let items = ItemManager::new(store);
        let item = load_item(&items, id)?;
        items
            .delete_item(&item)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(true) => ActionResponse::success("Task deleted.", id),
        Ok(false) => ActionResponse::failure(format!("item_delete failed: task {id} not removed")),
        Err(err) => ActionResponse::failure(format!("item_delete failed: {err}")),
    }
}

fn load_item(items: &ItemManager<Store>, id: EntityId) -> Result<TodoItem, String> {
    items
        .get_item(id)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("task {id} not found"))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DATABASE_FILE_NAME)
        })
        .clone()
}

fn shared_store() -> Result<Arc<Store>, String> {
    let mut slot = STORE
        .lock()
        .map_err(|_| "store slot lock is poisoned".to_string())?;
    if let Some(store) = slot.as_ref() {
        return Ok(Arc::clone(store));
    }

    let path = StorePath::File(resolve_db_path());
    let store = open_store(&path).map_err(|err| {
        warn!("event=ffi_store_open module=ffi status=error error={err}");
        format!("store open failed: {err}")
    })?;
    *slot = Some(Arc::clone(&store));
    Ok(store)
}

fn with_store<T>(f: impl FnOnce(Arc<Store>) -> Result<T, String>) -> Result<T, String> {
    f(shared_store()?)
}

fn to_list_view(list: TodoList) -> ListView {
    let completed_count = u32::try_from(list.completed_count()).unwrap_or(u32::MAX);
    ListView {
        id: list.id.unwrap_or_default(),
        title: list.title,
        subtitle: list.subtitle,
        color: list.color,
        items: list.items.into_iter().map(to_item_view).collect(),
        completed_count,
    }
}

fn to_item_view(item: TodoItem) -> ItemView {
    ItemView {
        id: item.id.unwrap_or_default(),
        list_id: item.list_id,
        name: item.name,
        is_completed: item.is_completed,
    }
}
