//! List detail state: the tasks of one list.

use crate::manager::item_manager::ItemManager;
use crate::manager::list_manager::ListManager;
use crate::model::entity::{same_identity, EntityId};
use crate::model::todo_item::TodoItem;
use crate::screens::validation::required;
use crate::store::EntityStore;
use crate::viewstate::{
    CommandTable, Parameter, Properties, PropertyKey, ViewModel, ViewState, ViewStateError,
    ViewStateResult,
};
use log::warn;

pub const SELECTED_LIST_ID: PropertyKey<Option<EntityId>> = PropertyKey::new("SelectedListId");
pub const LIST_NAME: PropertyKey<String> = PropertyKey::new("ListName");
pub const ITEMS: PropertyKey<Vec<TodoItem>> = PropertyKey::new("Items");

/// State of the screen showing one list's tasks.
///
/// Commands: `CreateTask(Text)` (needs a selected list), `ToggleTask(Id)`,
/// `DeleteTask(Id)`.
pub struct ListDetailState<S: EntityStore> {
    state: ViewState<Self>,
    lists: ListManager<S>,
    items: ItemManager<S>,
}

impl<S: EntityStore> ListDetailState<S> {
    pub fn new(lists: ListManager<S>, items: ItemManager<S>) -> ViewStateResult<Self> {
        let mut commands = CommandTable::new();
        commands.register_guarded(
            "CreateTask",
            Self::execute_create_task,
            Self::can_execute_create_task,
        )?;
        commands.register("ToggleTask", Self::execute_toggle_task)?;
        commands.register("DeleteTask", Self::execute_delete_task)?;

        Ok(Self {
            state: ViewState::new(commands),
            lists,
            items,
        })
    }

    pub fn selected_list_id(&self) -> Option<EntityId> {
        self.state.get(&SELECTED_LIST_ID)
    }

    pub fn list_name(&self) -> String {
        self.state.get(&LIST_NAME)
    }

    pub fn items(&self) -> &[TodoItem] {
        self.state.get_ref(&ITEMS).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reloads the list and its items. A list that no longer exists clears
    /// the selection.
    pub fn refresh(&mut self, list_id: EntityId) -> ViewStateResult<()> {
        match self.lists.get_list(Some(list_id))? {
            Some(list) => {
                self.state.set(&SELECTED_LIST_ID, list.id);
                self.state.set(&LIST_NAME, list.title);
                self.state.set(&ITEMS, list.items);
            }
            None => {
                warn!("event=list_detail_refresh module=screens status=missing list_id={list_id}");
                self.state.set(&SELECTED_LIST_ID, None);
                self.state.set(&LIST_NAME, String::new());
                self.state.set(&ITEMS, Vec::new());
            }
        }
        Ok(())
    }

    /// Adds a task named `name` to the selected list, then reloads.
    pub fn create_task(&mut self, name: &str) -> ViewStateResult<()> {
        let list_id = self
            .selected_list_id()
            .ok_or(ViewStateError::InvalidState("no list selected"))?;
        if !required(name) {
            return Err(ViewStateError::InvalidParameter("task name must not be blank"));
        }

        let mut item = TodoItem::new(list_id, name.trim());
        self.items.save_item(&mut item)?;
        self.refresh(list_id)
    }

    /// Saves `item` and replaces the in-memory copy matched by identity.
    pub fn update_task(&mut self, mut item: TodoItem) -> ViewStateResult<()> {
        self.items.save_item(&mut item)?;
        self.state.update(&ITEMS, |items| {
            if let Some(held) = items.iter_mut().find(|held| same_identity(&**held, &item)) {
                *held = item;
            }
        });
        Ok(())
    }

    /// Flips completion of the task with `item_id`.
    pub fn toggle_task(&mut self, item_id: EntityId) -> ViewStateResult<()> {
        let mut item = self.find_item(item_id)?;
        item.is_completed = !item.is_completed;
        self.update_task(item)
    }

    /// Deletes the task with `item_id`, then reloads the list.
    pub fn delete_task(&mut self, item_id: EntityId) -> ViewStateResult<()> {
        let item = self.find_item(item_id)?;
        self.items.delete_item(&item)?;
        match self.selected_list_id() {
            Some(list_id) => self.refresh(list_id),
            None => Ok(()),
        }
    }

    fn find_item(&self, item_id: EntityId) -> ViewStateResult<TodoItem> {
        self.items()
            .iter()
            .find(|item| item.id == Some(item_id))
            .cloned()
            .ok_or(ViewStateError::InvalidState("task is not shown"))
    }

    fn can_execute_create_task(properties: &Properties) -> bool {
        properties.get(&SELECTED_LIST_ID).is_some()
    }

    fn execute_create_task(&mut self, parameter: Option<&Parameter>) -> ViewStateResult<()> {
        let name = Parameter::text(parameter)
            .ok_or(ViewStateError::InvalidParameter("CreateTask expects a task name"))?
            .to_string();
        self.create_task(&name)
    }

    fn execute_toggle_task(&mut self, parameter: Option<&Parameter>) -> ViewStateResult<()> {
        let item_id = Parameter::positive_id(parameter)
            .ok_or(ViewStateError::InvalidParameter("ToggleTask expects a task id"))?;
        self.toggle_task(item_id)
    }

    fn execute_delete_task(&mut self, parameter: Option<&Parameter>) -> ViewStateResult<()> {
        let item_id = Parameter::positive_id(parameter)
            .ok_or(ViewStateError::InvalidParameter("DeleteTask expects a task id"))?;
        self.delete_task(item_id)
    }
}

impl<S: EntityStore> ViewModel for ListDetailState<S> {
    fn state(&self) -> &ViewState<Self> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<Self> {
        &mut self.state
    }

    fn initialize(&mut self, parameter: Option<&Parameter>) -> ViewStateResult<()> {
        match Parameter::positive_id(parameter) {
            Some(list_id) => self.refresh(list_id),
            None => Ok(()),
        }
    }
}
