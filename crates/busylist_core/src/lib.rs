//! Core domain logic for BusyList.
//! This crate owns persistence, the list/item managers, and the observable
//! screen states the UI binds to.

pub mod db;
pub mod logging;
pub mod manager;
pub mod model;
pub mod screens;
pub mod store;
pub mod viewstate;

use std::sync::Arc;

pub use db::{StorePath, DATABASE_FILE_NAME};
pub use logging::{default_log_level, init_logging, logging_status};
pub use manager::item_manager::ItemManager;
pub use manager::list_manager::ListManager;
pub use model::entity::{same_identity, Entity, EntityId};
pub use model::todo_item::TodoItem;
pub use model::todo_list::TodoList;
pub use model::SCHEMAS;
pub use screens::{ListDetailState, ListEditorState, ListsOverviewState};
pub use store::{EntityStore, SaveOutcome, Store, StoreError, StoreResult};
pub use viewstate::{
    Navigator, Parameter, Screen, StateEvent, ViewModel, ViewState, ViewStateError,
    ViewStateResult,
};

/// Opens the BusyList store at `path` with every domain table created.
pub fn open_store(path: &StorePath) -> StoreResult<Arc<Store>> {
    Store::open(path, SCHEMAS).map(Arc::new)
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
