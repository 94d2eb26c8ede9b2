//! Flutter-facing bindings for BusyList core.

pub mod api;
