//! Create/edit list state.

use crate::manager::list_manager::ListManager;
use crate::model::palette::{is_valid_color_hex, random_flat_color, COLOR_HEX_PATTERN};
use crate::model::todo_list::TodoList;
use crate::screens::navigate;
use crate::screens::validation::{required, Format, Required, Validator};
use crate::store::EntityStore;
use crate::viewstate::{
    CommandTable, Navigator, Parameter, Properties, PropertyKey, Screen, ViewModel, ViewState,
    ViewStateError, ViewStateResult,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

pub const LIST_TITLE: PropertyKey<String> = PropertyKey::new("ListTitle");
pub const LIST_SUBTITLE: PropertyKey<String> = PropertyKey::new("ListSubtitle");
pub const LIST_COLOR_HEX: PropertyKey<String> = PropertyKey::new("ListColorHex");
pub const ORIGINAL_LIST: PropertyKey<Option<TodoList>> = PropertyKey::new("OriginalList");

static COLOR_FORMAT: Lazy<Format> = Lazy::new(|| {
    Format::with_message(
        Regex::new(COLOR_HEX_PATTERN).expect("valid color format regex"),
        "Color must be a hex value like #rrggbb",
    )
});

/// State of the screen that creates a new list or edits an existing one.
///
/// Commands: `Save` (needs non-blank title, subtitle and color).
pub struct ListEditorState<S: EntityStore> {
    state: ViewState<Self>,
    lists: ListManager<S>,
    navigator: Arc<dyn Navigator>,
}

impl<S: EntityStore> ListEditorState<S> {
    pub fn new(lists: ListManager<S>, navigator: Arc<dyn Navigator>) -> ViewStateResult<Self> {
        let mut commands = CommandTable::new();
        commands.register_guarded("Save", Self::execute_save, Self::can_execute_save)?;

        Ok(Self {
            state: ViewState::new(commands),
            lists,
            navigator,
        })
    }

    pub fn title(&self) -> String {
        self.state.get(&LIST_TITLE)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.state.set(&LIST_TITLE, title.into());
    }

    pub fn subtitle(&self) -> String {
        self.state.get(&LIST_SUBTITLE)
    }

    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) {
        self.state.set(&LIST_SUBTITLE, subtitle.into());
    }

    pub fn color_hex(&self) -> String {
        self.state.get(&LIST_COLOR_HEX)
    }

    pub fn set_color_hex(&mut self, color: impl Into<String>) {
        self.state.set(&LIST_COLOR_HEX, color.into());
    }

    /// List being edited; `None` while creating.
    pub fn original_list(&self) -> Option<&TodoList> {
        self.state.get_ref(&ORIGINAL_LIST).and_then(Option::as_ref)
    }

    /// Replaces the edited list and seeds the form from it.
    ///
    /// Blank fields on `list` leave the form untouched, except color which
    /// falls back to a random palette color.
    pub fn set_original_list(&mut self, list: Option<TodoList>) {
        let title = list.as_ref().map(|list| list.title.clone());
        let subtitle = list.as_ref().map(|list| list.subtitle.clone());
        let color = list.as_ref().map(|list| list.color.clone());
        self.state.set(&ORIGINAL_LIST, list);

        if let Some(title) = title.filter(|value| required(value)) {
            self.set_title(title);
        }
        if let Some(subtitle) = subtitle.filter(|value| required(value)) {
            self.set_subtitle(subtitle);
        }
        match color.filter(|value| required(value)) {
            Some(color) => self.set_color_hex(color),
            None => self.set_color_hex(random_flat_color()),
        }
    }

    /// Per-field validation messages for the current form values.
    pub fn field_errors(&self) -> Vec<(&'static str, String)> {
        let mut errors = Vec::new();
        for (key, value) in [
            (LIST_TITLE, self.title()),
            (LIST_SUBTITLE, self.subtitle()),
        ] {
            if !Required.check(&value) {
                errors.push((key.name(), Required.message().to_string()));
            }
        }

        let color = self.color_hex();
        if !COLOR_FORMAT.check(color.trim()) {
            errors.push((LIST_COLOR_HEX.name(), COLOR_FORMAT.message().to_string()));
        }
        errors
    }

    /// Writes the form into the edited (or a new) list and persists it.
    ///
    /// Returns the saved list with its id assigned.
    pub fn save(&mut self) -> ViewStateResult<TodoList> {
        let color = self.color_hex().trim().to_string();
        if !is_valid_color_hex(&color) {
            return Err(ViewStateError::InvalidParameter("list color is not a hex color"));
        }

        let mut list = self.original_list().cloned().unwrap_or_default();
        list.title = self.title();
        list.subtitle = self.subtitle();
        list.color = color;

        if !self.lists.save_list(&mut list)? {
            return Err(ViewStateError::InvalidState("list row was not written"));
        }
        self.state.set(&ORIGINAL_LIST, Some(list.clone()));
        Ok(list)
    }

    fn can_execute_save(properties: &Properties) -> bool {
        [LIST_TITLE, LIST_SUBTITLE, LIST_COLOR_HEX]
            .iter()
            .all(|key| required(&properties.get(key)))
    }

    fn execute_save(&mut self, _: Option<&Parameter>) -> ViewStateResult<()> {
        self.save()?;
        navigate(self.navigator.as_ref(), Screen::ListsOverview, None)
    }
}

impl<S: EntityStore> ViewModel for ListEditorState<S> {
    fn state(&self) -> &ViewState<Self> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<Self> {
        &mut self.state
    }

    fn initialize(&mut self, parameter: Option<&Parameter>) -> ViewStateResult<()> {
        match Parameter::positive_id(parameter) {
            Some(list_id) => {
                let original = self.lists.get_list(Some(list_id))?;
                self.set_original_list(original);
            }
            None => self.set_color_hex(random_flat_color()),
        }
        Ok(())
    }
}
