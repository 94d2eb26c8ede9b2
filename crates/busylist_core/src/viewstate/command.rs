//! Named commands and the per-screen registration table.

use crate::viewstate::properties::Properties;
use crate::viewstate::{Parameter, ViewStateError, ViewStateResult};
use std::collections::BTreeMap;

/// Body of a command. Receives the owning screen state and the optional
/// payload supplied by the binding layer.
pub type ExecuteFn<VM> = fn(&mut VM, Option<&Parameter>) -> ViewStateResult<()>;

/// Enablement predicate, evaluated against the current property values.
pub type CanExecuteFn = fn(&Properties) -> bool;

fn always_enabled(_: &Properties) -> bool {
    true
}

/// A named, invocable operation with an enablement predicate.
pub struct Command<VM> {
    name: &'static str,
    execute: ExecuteFn<VM>,
    can_execute: CanExecuteFn,
    enabled: bool,
}

impl<VM> Command<VM> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Enablement as of the last re-evaluation.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Evaluates the predicate now, without updating the cached flag.
    pub fn can_execute(&self, properties: &Properties) -> bool {
        (self.can_execute)(properties)
    }

    pub(crate) fn execute_fn(&self) -> ExecuteFn<VM> {
        self.execute
    }

    pub(crate) fn reevaluate(&mut self, properties: &Properties) -> bool {
        self.enabled = (self.can_execute)(properties);
        self.enabled
    }
}

/// Explicit command registration table, built once by a screen constructor.
pub struct CommandTable<VM> {
    commands: BTreeMap<&'static str, Command<VM>>,
}

impl<VM> Default for CommandTable<VM> {
    fn default() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }
}

impl<VM> CommandTable<VM> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command that is always enabled.
    pub fn register(&mut self, name: &'static str, execute: ExecuteFn<VM>) -> ViewStateResult<()> {
        self.register_guarded(name, execute, always_enabled)
    }

    /// Registers a command enabled only while `can_execute` holds.
    ///
    /// # Errors
    /// - `InvalidCommandName` when `name` is blank.
    /// - `DuplicateCommand` when `name` is already registered.
    pub fn register_guarded(
        &mut self,
        name: &'static str,
        execute: ExecuteFn<VM>,
        can_execute: CanExecuteFn,
    ) -> ViewStateResult<()> {
        if name.trim().is_empty() || name.trim() != name {
            return Err(ViewStateError::InvalidCommandName(name.to_string()));
        }
        if self.commands.contains_key(name) {
            return Err(ViewStateError::DuplicateCommand(name));
        }

        self.commands.insert(
            name,
            Command {
                name,
                execute,
                can_execute,
                enabled: true,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command<VM>> {
        self.commands.get(name)
    }

    /// Sorted command names.
    pub fn names(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Command<VM>> {
        self.commands.values_mut()
    }
}
