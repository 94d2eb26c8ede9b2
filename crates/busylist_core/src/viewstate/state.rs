//! Reactive state container embedded in every screen state.

use crate::viewstate::command::{Command, CommandTable};
use crate::viewstate::properties::{Properties, PropertyKey};
use log::debug;

/// Lifecycle of one screen state instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    Initializing,
    Ready,
}

/// Change notification delivered to subscribers (the binding layer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    PropertyChanged(&'static str),
    CanExecuteChanged {
        command: &'static str,
        enabled: bool,
    },
    CommandFailed {
        command: &'static str,
        message: String,
    },
    PhaseChanged(Phase),
}

type Listener = Box<dyn Fn(&StateEvent) + Send>;

/// Observable properties + command table + lifecycle for one screen.
///
/// # Invariants
/// - `set` with an equal value is a no-op: no notification, no command
///   re-evaluation.
/// - Every effective `set` re-evaluates every command of the container.
/// - The command table is fixed at construction.
pub struct ViewState<VM> {
    properties: Properties,
    commands: CommandTable<VM>,
    listeners: Vec<Listener>,
    phase: Phase,
}

impl<VM> ViewState<VM> {
    /// Wraps the registration table and evaluates initial enablement.
    pub fn new(commands: CommandTable<VM>) -> Self {
        let mut state = Self {
            properties: Properties::new(),
            commands,
            listeners: Vec::new(),
            phase: Phase::Constructed,
        };
        for command in state.commands.iter_mut() {
            command.reevaluate(&state.properties);
        }
        state
    }

    pub fn get<T: Clone + Default + 'static>(&self, key: &PropertyKey<T>) -> T {
        self.properties.get(key)
    }

    pub fn get_ref<T: 'static>(&self, key: &PropertyKey<T>) -> Option<&T> {
        self.properties.get_ref(key)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Writes a property. Returns whether the value changed.
    pub fn set<T>(&mut self, key: &PropertyKey<T>, value: T) -> bool
    where
        T: PartialEq + Default + Send + 'static,
    {
        if !self.properties.set(key, value) {
            return false;
        }
        debug!(
            "event=property_changed module=viewstate property={}",
            key.name()
        );
        self.emit(&StateEvent::PropertyChanged(key.name()));
        self.refresh_commands();
        true
    }

    /// Applies `mutate` to a copy of the current value and writes it back.
    pub fn update<T, F>(&mut self, key: &PropertyKey<T>, mutate: F) -> bool
    where
        T: Clone + PartialEq + Default + Send + 'static,
        F: FnOnce(&mut T),
    {
        let mut value = self.properties.get(key);
        mutate(&mut value);
        self.set(key, value)
    }

    /// Re-evaluates every command predicate and signals each command.
    pub fn refresh_commands(&mut self) {
        let Self {
            properties,
            commands,
            listeners,
            ..
        } = self;
        for command in commands.iter_mut() {
            let enabled = command.reevaluate(properties);
            let event = StateEvent::CanExecuteChanged {
                command: command.name(),
                enabled,
            };
            for listener in listeners.iter() {
                listener(&event);
            }
        }
    }

    /// Looks a command up by name.
    pub fn command(&self, name: &str) -> Option<&Command<VM>> {
        self.commands.get(name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.commands.names()
    }

    /// Registers a change observer.
    pub fn subscribe(&mut self, listener: impl Fn(&StateEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase == phase {
            return;
        }
        self.phase = phase;
        self.emit(&StateEvent::PhaseChanged(phase));
    }

    pub(crate) fn emit(&self, event: &StateEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Phase, StateEvent, ViewState};
    use crate::viewstate::command::CommandTable;
    use crate::viewstate::properties::{Properties, PropertyKey};
    use crate::viewstate::{Parameter, ViewStateResult};
    use std::sync::{Arc, Mutex};

    const NAME: PropertyKey<String> = PropertyKey::new("Name");

    struct Screen;

    fn noop(_: &mut Screen, _: Option<&Parameter>) -> ViewStateResult<()> {
        Ok(())
    }

    fn has_name(properties: &Properties) -> bool {
        !properties.get(&NAME).is_empty()
    }

    fn recorded_state() -> (ViewState<Screen>, Arc<Mutex<Vec<StateEvent>>>) {
        let mut commands = CommandTable::new();
        commands.register_guarded("Save", noop, has_name).unwrap();
        commands.register("Cancel", noop).unwrap();
        let mut state = ViewState::new(commands);

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        state.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        (state, events)
    }

    #[test]
    fn initial_enablement_is_evaluated_at_construction() {
        let (state, _) = recorded_state();
        assert!(!state.command("Save").unwrap().is_enabled());
        assert!(state.command("Cancel").unwrap().is_enabled());
        assert_eq!(state.phase(), Phase::Constructed);
    }

    #[test]
    fn effective_set_notifies_and_reevaluates_every_command() {
        let (mut state, events) = recorded_state();
        assert!(state.set(&NAME, "Groceries".to_string()));

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                StateEvent::PropertyChanged("Name"),
                StateEvent::CanExecuteChanged {
                    command: "Cancel",
                    enabled: true
                },
                StateEvent::CanExecuteChanged {
                    command: "Save",
                    enabled: true
                },
            ]
        );
        assert!(state.command("Save").unwrap().is_enabled());
    }

    #[test]
    fn setting_equal_value_is_silent() {
        let (mut state, events) = recorded_state();
        state.set(&NAME, "Groceries".to_string());
        events.lock().unwrap().clear();

        assert!(!state.set(&NAME, "Groceries".to_string()));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn update_mutates_copy_and_writes_back() {
        let (mut state, _) = recorded_state();
        state.set(&NAME, "Milk".to_string());
        assert!(state.update(&NAME, |name| name.push_str(" & Eggs")));
        assert_eq!(state.get(&NAME), "Milk & Eggs");
        assert!(!state.update(&NAME, |_| {}));
    }

    #[test]
    fn unknown_command_lookup_returns_none() {
        let (state, _) = recorded_state();
        assert!(state.command("Delete").is_none());
        assert_eq!(state.command_names(), vec!["Cancel", "Save"]);
    }
}
