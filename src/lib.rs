//! # Tinstore
//!
//! A small, predictable state container for Rust.
//!
//! All application state lives in one [`Store`]. The only way to change it is
//! to [`dispatch`](Store::dispatch) an action, which the store hands to a pure
//! [`Reducer`] together with the current state. The reducer's result replaces
//! the stored state, and every subscribed listener is then called
//! synchronously.
//!
//! - `Store<S, A, E>` - Owns the state and listeners, serialises dispatches
//! - `Reducer<S, A>` - Pure `(state, action) -> state` transition
//! - `Subscription` - Handle for removing a listener again
//!
//! The [`todo`] module contains a complete example reducer.
//!
//! ## Example
//!
//! ```
//! use tinstore::todo::{Todo, TodoAction, TodoReducer};
//! use tinstore::create_store;
//!
//! let store = create_store(TodoReducer, None);
//! let _subscription = store.subscribe({
//!     let store = store.clone();
//!     move || println!("The new state is: {:?}", store.get_state())
//! });
//!
//! store
//!     .dispatch(TodoAction::AddTodo { todo: Todo::new(0, "Learn Redux") })
//!     .unwrap();
//! assert_eq!(store.get_state().len(), 1);
//! ```

pub mod error;
pub mod reducer;
pub mod store;
pub mod todo;

// Re-export main types for convenience
pub use error::{DispatchError, ListenerError};
pub use reducer::{fallible, Fallible, Reducer};
pub use store::{create_store, Store, Subscription, SubscriptionGuard};
