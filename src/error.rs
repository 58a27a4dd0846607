//! Error types surfaced by [`Store::dispatch`](crate::Store::dispatch).

use thiserror::Error;

/// Error returned by a fallible listener.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Why a dispatch did not complete.
///
/// `E` is the error type of the store's reducer; it is
/// [`Infallible`](std::convert::Infallible) for reducers that cannot fail.
#[derive(Debug, Error)]
pub enum DispatchError<E> {
    /// The reducer rejected the action. The stored state is unchanged and no
    /// listener was notified.
    #[error("reducer rejected the action: {0}")]
    Reducer(#[source] E),

    /// A listener failed while being notified. The new state has already been
    /// committed; listeners after the failing one were not called.
    #[error("listener failed during notification: {0}")]
    Listener(#[source] ListenerError),

    /// `dispatch` was called from inside a reducer or listener of the same store.
    #[error("dispatch called while the store is already dispatching")]
    ReentrantDispatch,
}

impl<E> DispatchError<E> {
    /// Returns the reducer's error, if this dispatch failed in the reducer.
    pub fn into_reducer_error(self) -> Option<E> {
        match self {
            DispatchError::Reducer(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_reentrant(&self) -> bool {
        matches!(self, DispatchError::ReentrantDispatch)
    }
}
