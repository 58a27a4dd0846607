//! A todo list, the reference example of a reducer.

mod todo;

pub use todo::{Todo, TodoAction, TodoError, TodoList, TodoReducer};
