use std::cell::Cell;
use std::convert::Infallible;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};

use super::subscription::{Listener, ListenerRegistry, Subscription};
use crate::error::{DispatchError, ListenerError};
use crate::reducer::Reducer;

struct Core<S, A, E> {
    reducer: Box<dyn Reducer<S, A, Error = E>>,
    state: RwLock<Arc<S>>,
    // Held for the whole reduce/commit/notify sequence. The flag is set while
    // that sequence runs so a nested call on the same thread can be refused.
    dispatching: ReentrantMutex<Cell<bool>>,
}

/// A single-state container updated only through its reducer.
///
/// `Store` is a cheap handle: clones share the same state and listeners, so
/// pass it to whatever needs it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tinstore::Store;
///
/// fn counter(state: &Arc<i32>, delta: i32) -> Arc<i32> {
///     Arc::new(**state + delta)
/// }
///
/// let store = Store::new(counter);
/// let subscription = store.subscribe({
///     let store = store.clone();
///     move || println!("count is now {}", store.get_state())
/// });
///
/// store.dispatch(5).unwrap();
/// assert_eq!(*store.get_state(), 5);
///
/// subscription.unsubscribe();
/// ```
pub struct Store<S, A, E = Infallible> {
    core: Arc<Core<S, A, E>>,
    listeners: Arc<ListenerRegistry>,
}

impl<S, A, E> Store<S, A, E>
where
    S: 'static,
    A: 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Create a store whose state starts as `S::default()`.
    ///
    /// The default value stands for "no prior state"; the reducer is not
    /// invoked until the first dispatch.
    pub fn new<R>(reducer: R) -> Self
    where
        R: Reducer<S, A, Error = E> + 'static,
        S: Default,
    {
        Self::with_state(reducer, S::default())
    }

    /// Create a store with an explicit initial state.
    pub fn with_state<R>(reducer: R, initial: S) -> Self
    where
        R: Reducer<S, A, Error = E> + 'static,
    {
        Self {
            core: Arc::new(Core {
                reducer: Box::new(reducer),
                state: RwLock::new(Arc::new(initial)),
                dispatching: ReentrantMutex::new(Cell::new(false)),
            }),
            listeners: Arc::new(ListenerRegistry::new()),
        }
    }

    /// The current state.
    ///
    /// The returned `Arc` is a snapshot: later dispatches replace the store's
    /// state but never change a value already handed out.
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&self.core.state.read())
    }

    /// Read the current state with a function.
    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.get_state();
        f(&state)
    }

    /// Subscribe to state changes.
    ///
    /// The listener runs after every successful dispatch, in subscription
    /// order. It receives no arguments; call [`get_state`](Self::get_state)
    /// from inside it to see the new state. Subscribing the same closure twice
    /// creates two independent registrations.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let callback: Listener = Arc::new(move || -> Result<(), ListenerError> {
            listener();
            Ok(())
        });
        self.listeners.register(callback)
    }

    /// Subscribe a listener that can fail.
    ///
    /// An error stops the notification of the remaining listeners and is
    /// returned from [`dispatch`](Self::dispatch) as
    /// [`DispatchError::Listener`].
    pub fn try_subscribe<F, LE>(&self, listener: F) -> Subscription
    where
        F: Fn() -> Result<(), LE> + Send + Sync + 'static,
        LE: Into<ListenerError>,
    {
        let callback: Listener =
            Arc::new(move || -> Result<(), ListenerError> { listener().map_err(Into::into) });
        self.listeners.register(callback)
    }

    /// Run the reducer, commit its result, then notify listeners.
    ///
    /// If the reducer fails (or panics) the state is left as it was and no
    /// listener runs. If a listener fails the new state stays committed and
    /// the listeners after it are skipped for this dispatch.
    ///
    /// Dispatches from different threads are serialised. Dispatching from
    /// inside a reducer or listener of the same store returns
    /// [`DispatchError::ReentrantDispatch`] without affecting the outer call.
    pub fn dispatch(&self, action: A) -> Result<(), DispatchError<E>> {
        let dispatching = self.core.dispatching.lock();
        if dispatching.replace(true) {
            log::warn!("store::dispatch: rejected nested dispatch");
            return Err(DispatchError::ReentrantDispatch);
        }
        let _reset = scopeguard::guard(&*dispatching, |flag| flag.set(false));

        let current = self.get_state();
        let next = self
            .core
            .reducer
            .reduce(&current, action)
            .map_err(DispatchError::Reducer)?;
        log::trace!(
            "store::dispatch: committing state (changed: {})",
            !Arc::ptr_eq(&current, &next)
        );
        *self.core.state.write() = next;

        self.notify().map_err(DispatchError::Listener)
    }

    fn notify(&self) -> Result<(), ListenerError> {
        let snapshot = self.listeners.snapshot();
        log::trace!("store::dispatch: notifying {} listener(s)", snapshot.len());

        for registration in &snapshot {
            // Unsubscribed after the snapshot was taken.
            if !registration.is_active() {
                continue;
            }
            if let Err(err) = registration.call() {
                log::warn!("store::dispatch: listener failed: {}", err);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether a dispatch is in progress, on this or any other thread.
    pub fn is_dispatching(&self) -> bool {
        match self.core.dispatching.try_lock() {
            Some(flag) => flag.get(),
            None => true,
        }
    }
}

impl<S, A, E> Clone for Store<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<S: std::fmt::Debug, A, E> std::fmt::Debug for Store<S, A, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.core.state.read())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Create a store from a reducer and an optional initial state.
///
/// Without an initial state the store starts from `S::default()`, the value
/// the reducer treats as "no prior state".
pub fn create_store<S, A, R>(reducer: R, initial: Option<S>) -> Store<S, A, R::Error>
where
    S: Default + 'static,
    A: 'static,
    R: Reducer<S, A> + 'static,
{
    Store::with_state(reducer, initial.unwrap_or_default())
}
