//! Integration tests for Tinstore

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::thread;

use tinstore::todo::{Todo, TodoAction, TodoError, TodoList, TodoReducer};
use tinstore::{create_store, DispatchError, Store};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn learn_redux() -> Todo {
    Todo::new(0, "Learn Redux")
}

#[test]
fn todo_scenario() {
    init_logging();
    let store = create_store(TodoReducer, None);
    assert!(store.get_state().is_empty());

    store
        .dispatch(TodoAction::AddTodo {
            todo: learn_redux(),
        })
        .unwrap();
    assert_eq!(*store.get_state(), vec![learn_redux()]);

    store.dispatch(TodoAction::ToggleTodo { id: 0 }).unwrap();
    assert_eq!(
        *store.get_state(),
        vec![Todo {
            id: 0,
            name: "Learn Redux".to_string(),
            complete: true,
        }]
    );

    store.dispatch(TodoAction::RemoveTodo { id: 0 }).unwrap();
    assert!(store.get_state().is_empty());

    let empty = store.get_state();
    store.dispatch(TodoAction::RemoveTodo { id: 99 }).unwrap();
    assert!(Arc::ptr_eq(&empty, &store.get_state()));
}

#[test]
fn earlier_states_are_never_mutated() {
    init_logging();
    let store: Store<TodoList, TodoAction, _> = Store::new(TodoReducer);

    store
        .dispatch(TodoAction::AddTodo {
            todo: learn_redux(),
        })
        .unwrap();
    let after_add = store.get_state();
    let after_add_copy = (*after_add).clone();

    store.dispatch(TodoAction::ToggleTodo { id: 0 }).unwrap();
    store
        .dispatch(TodoAction::AddTodo {
            todo: Todo::new(1, "Write tests"),
        })
        .unwrap();
    store.dispatch(TodoAction::RemoveTodo { id: 0 }).unwrap();

    assert_eq!(*after_add, after_add_copy);
    assert!(!after_add[0].complete);
}

#[test]
fn reducer_is_deterministic() {
    use tinstore::Reducer;

    let state = Arc::new(vec![learn_redux(), Todo::new(1, "Write tests")]);
    for action in [
        TodoAction::ToggleTodo { id: 1 },
        TodoAction::RemoveTodo { id: 0 },
        TodoAction::AddTodo {
            todo: Todo::new(2, "Ship"),
        },
    ] {
        let first = TodoReducer.reduce(&state, action.clone()).unwrap();
        let second = TodoReducer.reduce(&state, action).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn duplicate_id_is_rejected_without_notifying() {
    init_logging();
    let store = create_store(TodoReducer, Some(vec![learn_redux()]));
    let calls = Arc::new(AtomicUsize::new(0));
    let _sub = store.subscribe({
        let calls = calls.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    });
    let before = store.get_state();

    let err = store
        .dispatch(TodoAction::AddTodo {
            todo: Todo::new(0, "Again"),
        })
        .unwrap_err();

    assert_eq!(
        err.into_reducer_error(),
        Some(TodoError::DuplicateId { id: 0 })
    );
    assert!(Arc::ptr_eq(&before, &store.get_state()));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn every_listener_fires_once_per_dispatch_in_order() {
    init_logging();
    let store = create_store(TodoReducer, None);
    let order = Arc::new(Mutex::new(Vec::new()));

    let subscriptions: Vec<_> = (0..5)
        .map(|i| {
            let order = order.clone();
            store.subscribe(move || order.lock().unwrap().push(i))
        })
        .collect();

    store
        .dispatch(TodoAction::AddTodo {
            todo: learn_redux(),
        })
        .unwrap();

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    assert_eq!(subscriptions.len(), 5);
}

#[test]
fn same_listener_twice_is_two_registrations() {
    let store = create_store(TodoReducer, None);
    let calls = Arc::new(AtomicUsize::new(0));
    let listener = {
        let calls = calls.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    };

    let first = store.subscribe(listener.clone());
    let _second = store.subscribe(listener);

    store.dispatch(TodoAction::RemoveTodo { id: 1 }).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    first.unsubscribe();
    store.dispatch(TodoAction::RemoveTodo { id: 1 }).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn unsubscribe_twice_does_not_affect_others() {
    let store = create_store(TodoReducer, None);
    let a_calls = Arc::new(AtomicUsize::new(0));
    let b_calls = Arc::new(AtomicUsize::new(0));

    let a = store.subscribe({
        let a_calls = a_calls.clone();
        move || {
            a_calls.fetch_add(1, Ordering::SeqCst);
        }
    });
    let _b = store.subscribe({
        let b_calls = b_calls.clone();
        move || {
            b_calls.fetch_add(1, Ordering::SeqCst);
        }
    });

    a.unsubscribe();
    a.unsubscribe();
    assert!(!a.is_active());

    store.dispatch(TodoAction::ToggleTodo { id: 0 }).unwrap();
    assert_eq!(a_calls.load(Ordering::SeqCst), 0);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn unsubscribe_after_store_dropped() {
    let store = create_store(TodoReducer, None);
    let subscription = store.subscribe(|| {});
    drop(store);

    subscription.unsubscribe();
    assert!(!subscription.is_active());
}

#[test]
fn guard_removes_listener_at_end_of_scope() {
    let store = create_store(TodoReducer, None);
    let calls = Arc::new(AtomicUsize::new(0));
    {
        let _guard = store
            .subscribe({
                let calls = calls.clone();
                move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                }
            })
            .into_guard();
        store.dispatch(TodoAction::RemoveTodo { id: 0 }).unwrap();
    }
    store.dispatch(TodoAction::RemoveTodo { id: 0 }).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn listener_reads_new_state() {
    init_logging();
    let store = create_store(TodoReducer, None);
    let lengths = Arc::new(Mutex::new(Vec::new()));
    let _sub = store.subscribe({
        let store = store.clone();
        let lengths = lengths.clone();
        move || lengths.lock().unwrap().push(store.get_state().len())
    });

    for id in 0..3 {
        store
            .dispatch(TodoAction::AddTodo {
                todo: Todo::new(id, format!("todo {id}")),
            })
            .unwrap();
    }

    assert_eq!(*lengths.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn nested_dispatch_from_listener_fails() {
    init_logging();
    let store = create_store(TodoReducer, None);
    let nested_errors = Arc::new(AtomicUsize::new(0));
    let _sub = store.subscribe({
        let store = store.clone();
        let nested_errors = nested_errors.clone();
        move || {
            if let Err(DispatchError::ReentrantDispatch) =
                store.dispatch(TodoAction::RemoveTodo { id: 0 })
            {
                nested_errors.fetch_add(1, Ordering::SeqCst);
            }
        }
    });

    store
        .dispatch(TodoAction::AddTodo {
            todo: learn_redux(),
        })
        .unwrap();

    assert_eq!(nested_errors.load(Ordering::SeqCst), 1);
    assert_eq!(store.get_state().len(), 1);
}

#[test]
fn dispatches_from_many_threads_are_serialised() {
    init_logging();
    let store = create_store(TodoReducer, None);
    let notifications = Arc::new(AtomicUsize::new(0));
    let _sub = store.subscribe({
        let notifications = notifications.clone();
        move || {
            notifications.fetch_add(1, Ordering::SeqCst);
        }
    });

    let handles: Vec<_> = (0..4u64)
        .map(|worker| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..25u64 {
                    store
                        .dispatch(TodoAction::AddTodo {
                            todo: Todo::new(worker * 100 + i, "parallel"),
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let state = store.get_state();
    assert_eq!(state.len(), 100);
    assert_eq!(notifications.load(Ordering::SeqCst), 100);

    let mut ids: Vec<u64> = state.iter().map(|t| t.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 100);
}
