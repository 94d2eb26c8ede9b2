use busylist_core::screens::list_editor::LIST_COLOR_HEX;
use busylist_core::screens::lists_overview::LISTS;
use busylist_core::{
    EntityStore, ItemManager, ListDetailState, ListEditorState, ListManager, ListsOverviewState,
    Navigator, Parameter, Screen, StateEvent, Store, TodoItem, TodoList, ViewModel,
    ViewStateError, SCHEMAS,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<(Screen, Option<Parameter>)>>,
}

impl RecordingNavigator {
    fn visits(&self) -> Vec<(Screen, Option<Parameter>)> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, screen: Screen, parameter: Option<Parameter>) -> Result<(), String> {
        self.visits.lock().unwrap().push((screen, parameter));
        Ok(())
    }
}

struct Fixture {
    store: Arc<Store>,
    navigator: Arc<RecordingNavigator>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            store: Arc::new(Store::open_in_memory(SCHEMAS).unwrap()),
            navigator: Arc::new(RecordingNavigator::default()),
        }
    }

    fn lists(&self) -> ListManager<Store> {
        ListManager::new(Arc::clone(&self.store))
    }

    fn items(&self) -> ItemManager<Store> {
        ItemManager::new(Arc::clone(&self.store))
    }

    fn seed(&self, title: &str, items: &[&str]) -> TodoList {
        let mut list = TodoList::new(title, "seeded", "#40739e");
        list.items = items.iter().map(|name| TodoItem::new(0, *name)).collect();
        self.lists().save_list(&mut list).unwrap();
        list
    }

    fn overview(&self) -> ListsOverviewState<Store> {
        ListsOverviewState::new(self.lists(), self.navigator.clone()).unwrap()
    }

    fn detail(&self) -> ListDetailState<Store> {
        ListDetailState::new(self.lists(), self.items()).unwrap()
    }

    fn editor(&self) -> ListEditorState<Store> {
        ListEditorState::new(self.lists(), self.navigator.clone()).unwrap()
    }
}

fn record_events<VM: ViewModel>(vm: &mut VM) -> Arc<Mutex<Vec<StateEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    vm.state_mut()
        .subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    events
}

#[test]
fn overview_loads_lists_on_enter() {
    let fixture = Fixture::new();
    fixture.seed("Work", &[]);
    fixture.seed("Home", &["Vacuum"]);

    let mut overview = fixture.overview();
    assert!(overview.lists().is_empty());
    overview.enter(None).unwrap();

    let titles: Vec<&str> = overview.lists().iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Work", "Home"]);
    assert_eq!(overview.lists()[1].items.len(), 1);
}

#[test]
fn overview_commands_navigate() {
    let fixture = Fixture::new();
    let work = fixture.seed("Work", &[]);
    let mut overview = fixture.overview();
    overview.enter(None).unwrap();

    overview
        .execute("OpenList", Some(&Parameter::Id(work.id.unwrap())))
        .unwrap();
    overview.execute("OpenList", Some(&Parameter::Id(0))).unwrap();
    overview.execute("CreateList", None).unwrap();

    assert_eq!(
        fixture.navigator.visits(),
        vec![
            (Screen::ListDetail, Some(Parameter::Id(work.id.unwrap()))),
            (Screen::ListEditor, None),
        ]
    );
}

#[test]
fn overview_delete_removes_list_and_notifies() {
    let fixture = Fixture::new();
    let work = fixture.seed("Work", &["Report"]);
    fixture.seed("Home", &[]);
    let mut overview = fixture.overview();
    overview.enter(None).unwrap();
    let events = record_events(&mut overview);

    overview
        .execute("DeleteList", Some(&Parameter::Id(work.id.unwrap())))
        .unwrap();

    assert_eq!(overview.lists().len(), 1);
    assert_eq!(overview.lists()[0].title, "Home");
    assert!(events
        .lock()
        .unwrap()
        .contains(&StateEvent::PropertyChanged(LISTS.name())));
    assert!(fixture.store.get::<TodoList>(work.id.unwrap()).unwrap().is_none());
    assert!(fixture.store.get_all::<TodoItem>().unwrap().is_empty());
}

#[test]
fn overview_delete_requires_a_shown_list() {
    let fixture = Fixture::new();
    let mut overview = fixture.overview();
    overview.enter(None).unwrap();

    let err = overview
        .execute("DeleteList", Some(&Parameter::Id(12)))
        .unwrap_err();
    assert!(matches!(err, ViewStateError::InvalidState(_)));
    let err = overview.execute("DeleteList", None).unwrap_err();
    assert!(matches!(err, ViewStateError::InvalidParameter(_)));
}

#[test]
fn detail_create_toggle_delete_task() {
    let fixture = Fixture::new();
    let groceries = fixture.seed("Groceries", &[]);
    let list_id = groceries.id.unwrap();

    let mut detail = fixture.detail();
    assert!(!detail.state().command("CreateTask").unwrap().is_enabled());
    detail.enter(Some(&Parameter::Id(list_id))).unwrap();
    assert_eq!(detail.list_name(), "Groceries");
    assert!(detail.state().command("CreateTask").unwrap().is_enabled());

    detail
        .execute("CreateTask", Some(&Parameter::Text("  Milk ".to_string())))
        .unwrap();
    assert_eq!(detail.items().len(), 1);
    assert_eq!(detail.items()[0].name, "Milk");
    let milk_id = detail.items()[0].id.unwrap();

    detail
        .execute("ToggleTask", Some(&Parameter::Id(milk_id)))
        .unwrap();
    assert!(detail.items()[0].is_completed);
    let persisted = fixture.lists().get_list(Some(list_id)).unwrap().unwrap();
    assert!(persisted.items[0].is_completed);

    detail
        .execute("DeleteTask", Some(&Parameter::Id(milk_id)))
        .unwrap();
    assert!(detail.items().is_empty());
    assert!(fixture.store.get_all::<TodoItem>().unwrap().is_empty());
}

#[test]
fn detail_rejects_blank_task_names() {
    let fixture = Fixture::new();
    let list = fixture.seed("Groceries", &[]);
    let mut detail = fixture.detail();
    detail.enter(Some(&Parameter::Id(list.id.unwrap()))).unwrap();

    let err = detail
        .execute("CreateTask", Some(&Parameter::Text("   ".to_string())))
        .unwrap_err();
    assert!(matches!(err, ViewStateError::InvalidParameter(_)));
    assert!(detail.items().is_empty());
}

#[test]
fn detail_for_missing_list_disables_task_creation() {
    let fixture = Fixture::new();
    let mut detail = fixture.detail();
    detail.enter(Some(&Parameter::Id(99))).unwrap();

    assert_eq!(detail.selected_list_id(), None);
    let err = detail
        .execute("CreateTask", Some(&Parameter::Text("Milk".to_string())))
        .unwrap_err();
    assert!(matches!(err, ViewStateError::CommandDisabled("CreateTask")));
}

#[test]
fn editor_creates_new_list_and_returns_to_overview() {
    let fixture = Fixture::new();
    let mut editor = fixture.editor();
    editor.enter(None).unwrap();

    assert!(editor.original_list().is_none());
    assert!(editor.field_errors().iter().all(|(key, _)| *key != LIST_COLOR_HEX.name()));
    assert!(!editor.state().command("Save").unwrap().is_enabled());

    editor.set_title("Garden");
    assert!(!editor.state().command("Save").unwrap().is_enabled());
    editor.set_subtitle("Spring");
    assert!(editor.state().command("Save").unwrap().is_enabled());

    editor.execute("Save", None).unwrap();
    assert_eq!(fixture.navigator.visits(), vec![(Screen::ListsOverview, None)]);

    let saved = editor.original_list().cloned().unwrap();
    assert!(saved.id.is_some());
    let stored = fixture.lists().get_lists().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Garden");
    assert_eq!(stored[0].color, editor.color_hex());
}

#[test]
fn editor_edits_existing_list_and_keeps_items() {
    let fixture = Fixture::new();
    let trip = fixture.seed("Trip", &["Passport"]);
    let mut editor = fixture.editor();
    editor.enter(Some(&Parameter::Id(trip.id.unwrap()))).unwrap();

    assert_eq!(editor.title(), "Trip");
    assert_eq!(editor.subtitle(), "seeded");
    assert_eq!(editor.color_hex(), "#40739e");

    editor.set_title("Road trip");
    let saved = editor.save().unwrap();
    assert_eq!(saved.id, trip.id);

    let stored = fixture.lists().get_list(trip.id).unwrap().unwrap();
    assert_eq!(stored.title, "Road trip");
    assert_eq!(stored.items.len(), 1);
    assert_eq!(fixture.lists().get_lists().unwrap().len(), 1);
}

#[test]
fn editor_rejects_malformed_color() {
    let fixture = Fixture::new();
    let mut editor = fixture.editor();
    editor.enter(None).unwrap();
    editor.set_title("Garden");
    editor.set_subtitle("Spring");
    editor.set_color_hex("green");

    assert!(editor
        .field_errors()
        .iter()
        .any(|(key, _)| *key == LIST_COLOR_HEX.name()));
    let err = editor.execute("Save", None).unwrap_err();
    assert!(matches!(err, ViewStateError::InvalidParameter(_)));
    assert!(fixture.navigator.visits().is_empty());
    assert!(fixture.lists().get_lists().unwrap().is_empty());
}

#[test]
fn editor_trims_color_consistently() {
    let fixture = Fixture::new();
    let mut editor = fixture.editor();
    editor.enter(None).unwrap();
    editor.set_title("Garden");
    editor.set_subtitle("Spring");
    editor.set_color_hex(" #fff ");

    assert!(editor
        .field_errors()
        .iter()
        .all(|(key, _)| *key != LIST_COLOR_HEX.name()));
    let saved = editor.save().unwrap();
    assert_eq!(saved.color, "#fff");
    assert_eq!(fixture.lists().get_lists().unwrap()[0].color, "#fff");
}

#[test]
fn equal_writes_do_not_notify() {
    let fixture = Fixture::new();
    let mut editor = fixture.editor();
    let events = record_events(&mut editor);

    editor.set_title("Garden");
    editor.set_title("Garden");
    editor.set_subtitle("");

    let changes = events
        .lock()
        .unwrap()
        .iter()
        .filter(|event| matches!(event, StateEvent::PropertyChanged(_)))
        .count();
    assert_eq!(changes, 1);
}
