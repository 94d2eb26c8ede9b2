//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `busylist_core` linkage and store wiring without the Flutter UI.
//! - Print every list with its task counts.

use busylist_core::{open_store, ListManager, StorePath, DATABASE_FILE_NAME};
use std::path::PathBuf;
use std::process::ExitCode;

const DB_PATH_ENV: &str = "BUSYLIST_DB_PATH";

fn main() -> ExitCode {
    println!("busylist_core ping={}", busylist_core::ping());
    println!("busylist_core version={}", busylist_core::core_version());

    let path = db_path();
    println!("busylist_core db={}", path.display());
    let store = match open_store(&StorePath::File(path)) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("store open failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let lists = match ListManager::new(store).get_lists() {
        Ok(lists) => lists,
        Err(err) => {
            eprintln!("list load failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    if lists.is_empty() {
        println!("no lists");
    }
    for list in &lists {
        println!(
            "{:>4}  {}  {}  {}/{} done",
            list.id.unwrap_or_default(),
            list.color,
            list.title,
            list.completed_count(),
            list.items.len()
        );
    }
    ExitCode::SUCCESS
}

fn db_path() -> PathBuf {
    match std::env::var(DB_PATH_ENV) {
        Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => std::env::temp_dir().join(DATABASE_FILE_NAME),
    }
}
