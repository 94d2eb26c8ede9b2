//! Lists overview (main page) state.

use crate::manager::list_manager::ListManager;
use crate::model::entity::{same_identity, EntityId};
use crate::model::todo_list::TodoList;
use crate::screens::navigate;
use crate::store::EntityStore;
use crate::viewstate::{
    CommandTable, Navigator, Parameter, PropertyKey, Screen, ViewModel, ViewState,
    ViewStateError, ViewStateResult,
};
use std::sync::Arc;

pub const LISTS: PropertyKey<Vec<TodoList>> = PropertyKey::new("Lists");

/// State of the screen listing every task list.
///
/// Commands: `CreateList`, `OpenList(Id)`, `DeleteList(Id)`.
pub struct ListsOverviewState<S: EntityStore> {
    state: ViewState<Self>,
    lists: ListManager<S>,
    navigator: Arc<dyn Navigator>,
}

impl<S: EntityStore> ListsOverviewState<S> {
    pub fn new(lists: ListManager<S>, navigator: Arc<dyn Navigator>) -> ViewStateResult<Self> {
        let mut commands = CommandTable::new();
        commands.register("CreateList", Self::execute_create_list)?;
        commands.register("OpenList", Self::execute_open_list)?;
        commands.register("DeleteList", Self::execute_delete_list)?;

        Ok(Self {
            state: ViewState::new(commands),
            lists,
            navigator,
        })
    }

    pub fn lists(&self) -> &[TodoList] {
        self.state.get_ref(&LISTS).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reloads every list from storage.
    pub fn refresh(&mut self) -> ViewStateResult<()> {
        let lists = self.lists.get_lists()?;
        self.state.set(&LISTS, lists);
        Ok(())
    }

    /// Deletes one list; on success removes it from `Lists` by identity.
    pub fn delete_list(&mut self, list: &TodoList) -> ViewStateResult<bool> {
        let deleted = self.lists.delete_list(list)?;
        if deleted {
            self.state
                .update(&LISTS, |lists| lists.retain(|held| !same_identity(held, list)));
        }
        Ok(deleted)
    }

    /// Opens the detail screen for a persisted list. Non-positive ids are
    /// ignored.
    pub fn open_list(&self, list_id: EntityId) -> ViewStateResult<()> {
        if list_id <= 0 {
            return Ok(());
        }
        navigate(
            self.navigator.as_ref(),
            Screen::ListDetail,
            Some(Parameter::Id(list_id)),
        )
    }

    /// Opens the editor for an existing list, or for a new one when
    /// `list_id` is `None`.
    pub fn edit_list(&self, list_id: Option<EntityId>) -> ViewStateResult<()> {
        navigate(
            self.navigator.as_ref(),
            Screen::ListEditor,
            list_id.map(Parameter::Id),
        )
    }

    fn execute_create_list(&mut self, _: Option<&Parameter>) -> ViewStateResult<()> {
        self.edit_list(None)
    }

    fn execute_open_list(&mut self, parameter: Option<&Parameter>) -> ViewStateResult<()> {
        match Parameter::positive_id(parameter) {
            Some(list_id) => self.open_list(list_id),
            None => Ok(()),
        }
    }

    fn execute_delete_list(&mut self, parameter: Option<&Parameter>) -> ViewStateResult<()> {
        let list_id = Parameter::positive_id(parameter)
            .ok_or(ViewStateError::InvalidParameter("DeleteList expects a list id"))?;
        let Some(list) = self
            .lists()
            .iter()
            .find(|list| list.id == Some(list_id))
            .cloned()
        else {
            return Err(ViewStateError::InvalidState("list is not shown"));
        };
        self.delete_list(&list)?;
        Ok(())
    }
}

impl<S: EntityStore> ViewModel for ListsOverviewState<S> {
    fn state(&self) -> &ViewState<Self> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<Self> {
        &mut self.state
    }

    fn initialize(&mut self, _: Option<&Parameter>) -> ViewStateResult<()> {
        self.refresh()
    }
}
