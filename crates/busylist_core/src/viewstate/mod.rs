//! Reactive view-state container.
//!
//! # Responsibility
//! - Give screen states observable, name-keyed properties.
//! - Bind named commands (execute + enablement predicate) from an explicit
//!   registration table and keep their enablement in sync with property
//!   mutation.
//! - Drive the `Constructed -> Initializing -> Ready` lifecycle.
//!
//! # Invariants
//! - Equal-value writes never notify.
//! - Commands are registered once, at construction.
//! - Command failures are returned as `ViewStateError` and announced through
//!   `StateEvent::CommandFailed`; they never panic.

use crate::model::entity::EntityId;
use crate::store::StoreError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod command;
pub mod properties;
pub mod state;

pub use command::{CanExecuteFn, Command, CommandTable, ExecuteFn};
pub use properties::{Properties, PropertyKey};
pub use state::{Phase, StateEvent, ViewState};

pub type ViewStateResult<T> = Result<T, ViewStateError>;

/// Errors surfaced to the binding layer.
#[derive(Debug)]
pub enum ViewStateError {
    /// No command registered under this name.
    UnknownCommand(String),
    /// The command's enablement predicate currently fails.
    CommandDisabled(&'static str),
    /// Registration reused an existing command name.
    DuplicateCommand(&'static str),
    /// Registration used a blank or padded command name.
    InvalidCommandName(String),
    /// `enter` was called on a state that already left `Constructed`.
    AlreadyInitialized,
    /// Command payload is missing or has the wrong shape.
    InvalidParameter(&'static str),
    /// Screen state does not allow the operation right now.
    InvalidState(&'static str),
    /// Persistence failure propagated from a manager.
    Store(StoreError),
    /// Navigation collaborator refused the request.
    Navigation(String),
}

impl Display for ViewStateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "unknown command: `{name}`"),
            Self::CommandDisabled(name) => write!(f, "command is disabled: `{name}`"),
            Self::DuplicateCommand(name) => write!(f, "command already registered: `{name}`"),
            Self::InvalidCommandName(name) => write!(f, "invalid command name: `{name}`"),
            Self::AlreadyInitialized => write!(f, "view state already initialized"),
            Self::InvalidParameter(details) => write!(f, "invalid command parameter: {details}"),
            Self::InvalidState(details) => write!(f, "invalid view state: {details}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Navigation(message) => write!(f, "navigation failed: {message}"),
        }
    }
}

impl Error for ViewStateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ViewStateError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Payload passed by navigation or by the binding layer to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    Id(EntityId),
    Text(String),
}

impl Parameter {
    /// Positive id carried by `parameter`. Anything else means "no selection".
    pub fn positive_id(parameter: Option<&Parameter>) -> Option<EntityId> {
        match parameter {
            Some(Self::Id(id)) if *id > 0 => Some(*id),
            _ => None,
        }
    }

    /// Text carried by `parameter`, if any.
    pub fn text(parameter: Option<&Parameter>) -> Option<&str> {
        match parameter {
            Some(Self::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Screens the navigation collaborator can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    ListsOverview,
    ListDetail,
    ListEditor,
}

/// External navigation collaborator.
///
/// Implementations construct the target screen state, bind it, and call
/// `ViewModel::enter` with `parameter`.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, screen: Screen, parameter: Option<Parameter>) -> Result<(), String>;
}

/// A screen-level state object built on `ViewState`.
pub trait ViewModel: Sized {
    fn state(&self) -> &ViewState<Self>;

    fn state_mut(&mut self) -> &mut ViewState<Self>;

    /// Loads or seeds observable state for one navigation entry.
    ///
    /// Wrong-typed or non-positive parameters mean "use defaults".
    fn initialize(&mut self, parameter: Option<&Parameter>) -> ViewStateResult<()>;

    /// Runs `initialize` exactly once for this instance.
    ///
    /// On failure the state returns to `Constructed` so the navigator may
    /// retry the entry.
    fn enter(&mut self, parameter: Option<&Parameter>) -> ViewStateResult<()> {
        if self.state().phase() != Phase::Constructed {
            return Err(ViewStateError::AlreadyInitialized);
        }

        self.state_mut().set_phase(Phase::Initializing);
        match self.initialize(parameter) {
            Ok(()) => {
                self.state_mut().set_phase(Phase::Ready);
                Ok(())
            }
            Err(err) => {
                warn!("event=view_state_enter module=viewstate status=error error={err}");
                self.state_mut().set_phase(Phase::Constructed);
                Err(err)
            }
        }
    }

    /// Invokes the command registered as `name`.
    ///
    /// # Errors
    /// - `UnknownCommand` / `CommandDisabled` before the body runs.
    /// - Whatever the command body returns; it is also announced as
    ///   `StateEvent::CommandFailed`.
    fn execute(&mut self, name: &str, parameter: Option<&Parameter>) -> ViewStateResult<()> {
        let (command_name, run) = {
            let state = self.state();
            let command = state
                .command(name)
                .ok_or_else(|| ViewStateError::UnknownCommand(name.to_string()))?;
            if !command.can_execute(state.properties()) {
                return Err(ViewStateError::CommandDisabled(command.name()));
            }
            (command.name(), command.execute_fn())
        };

        let result = run(self, parameter);
        match &result {
            Ok(()) => info!("event=command_execute module=viewstate status=ok command={command_name}"),
            Err(err) => {
                error!(
                    "event=command_execute module=viewstate status=error command={command_name} error={err}"
                );
                self.state().emit(&StateEvent::CommandFailed {
                    command: command_name,
                    message: err.to_string(),
                });
            }
        }
        result
    }
}
