use std::sync::Arc;

use thiserror::Error;

use crate::reducer::Reducer;

/// A single todo entry. `id` is unique within a [`TodoList`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Todo {
    pub id: u64,
    pub name: String,
    pub complete: bool,
}

impl Todo {
    /// A new, incomplete todo.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            complete: false,
        }
    }

    fn toggled(&self) -> Self {
        Self {
            complete: !self.complete,
            ..self.clone()
        }
    }
}

pub type TodoList = Vec<Todo>;

/// Transitions understood by [`TodoReducer`].
///
/// With the `serde` feature enabled actions use the conventional
/// `{"type": "ADD_TODO", ...}` shape.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum TodoAction {
    /// Append `todo` to the end of the list.
    AddTodo { todo: Todo },
    /// Drop every entry with this id.
    RemoveTodo { id: u64 },
    /// Flip `complete` on the entry with this id.
    ToggleTodo { id: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("a todo with id {id} already exists")]
    DuplicateId { id: u64 },
}

/// Reducer for a [`TodoList`].
///
/// Lists are never modified in place. Removing or toggling an id that is not
/// in the list returns the input `Arc` itself.
///
/// # Examples
///
/// ```
/// use tinstore::todo::{Todo, TodoAction, TodoList, TodoReducer};
/// use tinstore::Store;
///
/// let store: Store<TodoList, TodoAction, _> = Store::new(TodoReducer);
/// store
///     .dispatch(TodoAction::AddTodo { todo: Todo::new(0, "Learn Redux") })
///     .unwrap();
/// store.dispatch(TodoAction::ToggleTodo { id: 0 }).unwrap();
///
/// assert!(store.get_state()[0].complete);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl Reducer<TodoList, TodoAction> for TodoReducer {
    type Error = TodoError;

    fn reduce(
        &self,
        state: &Arc<TodoList>,
        action: TodoAction,
    ) -> Result<Arc<TodoList>, TodoError> {
        match action {
            TodoAction::AddTodo { todo } => {
                if state.iter().any(|existing| existing.id == todo.id) {
                    return Err(TodoError::DuplicateId { id: todo.id });
                }
                let mut next = Vec::with_capacity(state.len() + 1);
                next.extend(state.iter().cloned());
                next.push(todo);
                Ok(Arc::new(next))
            }
            TodoAction::RemoveTodo { id } => {
                if !state.iter().any(|todo| todo.id == id) {
                    return Ok(Arc::clone(state));
                }
                Ok(Arc::new(
                    state.iter().filter(|todo| todo.id != id).cloned().collect(),
                ))
            }
            TodoAction::ToggleTodo { id } => {
                if !state.iter().any(|todo| todo.id == id) {
                    return Ok(Arc::clone(state));
                }
                Ok(Arc::new(
                    state
                        .iter()
                        .map(|todo| if todo.id == id { todo.toggled() } else { todo.clone() })
                        .collect(),
                ))
            }
        }
    }
}
