//! Domain managers: per-entity-family facades over the store.
//!
//! # Responsibility
//! - Give screen states one entry point per entity family.
//! - Centralize call-site policy (e.g. "id must be positive to fetch").
//!
//! # Invariants
//! - Managers never touch SQL; every read/write goes through `EntityStore`.
//! - Storage faults are propagated unchanged; managers do not retry.

pub mod item_manager;
pub mod list_manager;
