//! Todo store example: actions, selections and a store method

use cachet::{state, Action, ActionWith, ReactiveStore, Selection, Store};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq)]
struct TodoItem {
    id: usize,
    text: String,
    completed: bool,
}

state! {
    #[derive(Clone, Debug, PartialEq)]
    struct AppState / AppPatch {
        todos: Vec<TodoItem>,
        filter: String,
    }
}

struct Actions {
    add: ActionWith<String>,
    complete: ActionWith<usize>,
    clear_completed: Action,
}

struct TodoStore {
    store: Store<AppState>,
    active_count: Selection<AppState, usize>,
    actions: Actions,
}

impl TodoStore {
    fn new() -> Self {
        let store = Store::named(
            "app",
            AppState {
                todos: vec![],
                filter: "all".to_string(),
            },
        );
        let actions = Actions {
            add: ActionWith::named("add"),
            complete: ActionWith::named("complete"),
            clear_completed: Action::named("clear_completed"),
        };

        let handle = store.clone();
        actions
            .add
            .listen()
            .subscribe(move |text: &String| {
                handle.update(|state| {
                    let mut todos = state.todos.clone();
                    todos.push(TodoItem {
                        id: todos.len() + 1,
                        text: text.clone(),
                        completed: false,
                    });
                    AppPatch::default().todos(todos)
                })
            })
            .detach();

        let handle = store.clone();
        actions
            .complete
            .listen()
            .subscribe(move |id: &usize| {
                handle.update(|state| {
                    let todos = state
                        .todos
                        .iter()
                        .cloned()
                        .map(|todo| TodoItem {
                            completed: todo.completed || todo.id == *id,
                            ..todo
                        })
                        .collect();
                    AppPatch::default().todos(todos)
                })
            })
            .detach();

        let handle = store.clone();
        actions
            .clear_completed
            .listen()
            .subscribe(move |_| {
                handle.update(|state| {
                    let todos = state.todos.iter().filter(|t| !t.completed).cloned().collect();
                    AppPatch::default().todos(todos)
                })
            })
            .detach();

        let active_count =
            store.select(|state| state.todos.iter().filter(|t| !t.completed).count());

        Self {
            store,
            active_count,
            actions,
        }
    }

    fn set_filter(&self, filter: &str) {
        self.set(AppPatch::default().filter(filter.to_string()));
    }
}

impl ReactiveStore for TodoStore {
    type State = AppState;

    fn store(&self) -> &Store<AppState> {
        &self.store
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Todo Store Example ===\n");

    let app = TodoStore::new();

    // Only fires when the number of active todos changes
    let _active = app.active_count.subscribe(|count| {
        println!("Active todos: {count}");
    });
    let _titles = app
        .select(|state| state.todos.iter().map(|t| t.text.clone()).collect::<Vec<_>>())
        .subscribe(|titles| println!("Titles: {titles:?}"));
    let _filter = app
        .select(|state| state.filter.clone())
        .subscribe(|filter| println!("Filter: {filter}"));

    println!("Adding todos...");
    app.actions.add.execute("Learn Cachet".to_string());
    app.actions.add.execute("Write docs".to_string());

    println!("\nChanging filter (no active-count change)...");
    app.set_filter("active");

    println!("\nCompleting todo 1...");
    app.actions.complete.execute(1);

    println!("\nClearing completed...");
    app.actions.clear_completed.execute();

    println!("\nFinal state: {:#?}", app.values());
}
