//! Screen-level state objects built on the view-state container.
//!
//! # Responsibility
//! - Hold the observable state of the lists overview, list detail and list
//!   editor screens.
//! - Translate commands into manager calls and navigation requests.
//!
//! # Invariants
//! - Screens reach storage only through domain managers.
//! - Read-modify-write flows (delete then refresh) await each step in order.

pub mod list_detail;
pub mod list_editor;
pub mod lists_overview;
pub mod validation;

pub use list_detail::ListDetailState;
pub use list_editor::ListEditorState;
pub use lists_overview::ListsOverviewState;

use crate::viewstate::{Navigator, Parameter, Screen, ViewStateError, ViewStateResult};

fn navigate(
    navigator: &dyn Navigator,
    screen: Screen,
    parameter: Option<Parameter>,
) -> ViewStateResult<()> {
    navigator
        .navigate_to(screen, parameter)
        .map_err(ViewStateError::Navigation)
}
