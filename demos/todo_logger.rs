//! Todo store with a logging listener
//!
//! Run with `RUST_LOG=info cargo run --example todo_logger`.

use tinstore::todo::{Todo, TodoAction, TodoReducer};
use tinstore::{create_store, DispatchError};

fn main() {
    env_logger::init();

    let store = create_store(TodoReducer, None);

    let subscription = store.subscribe({
        let store = store.clone();
        move || {
            log::info!("The new state is: {:?}", store.get_state());
        }
    });

    store
        .dispatch(TodoAction::AddTodo {
            todo: Todo::new(0, "Learn Redux"),
        })
        .unwrap();
    store
        .dispatch(TodoAction::AddTodo {
            todo: Todo::new(1, "Go shopping"),
        })
        .unwrap();
    store.dispatch(TodoAction::ToggleTodo { id: 0 }).unwrap();

    match store.dispatch(TodoAction::AddTodo {
        todo: Todo::new(1, "Go shopping again"),
    }) {
        Err(DispatchError::Reducer(err)) => log::warn!("Rejected: {}", err),
        other => log::error!("Unexpected dispatch result: {:?}", other),
    }

    subscription.unsubscribe();
    store.dispatch(TodoAction::RemoveTodo { id: 1 }).unwrap();

    println!("Final state: {:#?}", store.get_state());
}
