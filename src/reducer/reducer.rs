use std::convert::Infallible;
use std::sync::Arc;

/// A pure transition from `(state, action)` to the next state.
///
/// State is passed behind an [`Arc`] so that a reducer which leaves the state
/// alone can hand back the very same allocation. Callers can then detect
/// "nothing changed" with [`Arc::ptr_eq`] instead of a deep comparison.
///
/// Implementations must not have side effects and must return equivalent
/// results for equivalent inputs. The store cannot check this.
///
/// Any `Fn(&Arc<S>, A) -> Arc<S>` is a reducer that never fails:
///
/// ```
/// use std::sync::Arc;
/// use tinstore::Reducer;
///
/// fn counter(state: &Arc<i64>, delta: i64) -> Arc<i64> {
///     if delta == 0 {
///         return Arc::clone(state);
///     }
///     Arc::new(**state + delta)
/// }
///
/// let start = Arc::new(1);
/// assert_eq!(*counter.reduce(&start, 2).unwrap(), 3);
/// assert!(Arc::ptr_eq(&counter.reduce(&start, 0).unwrap(), &start));
/// ```
pub trait Reducer<S, A>: Send + Sync {
    /// Error returned when the reducer rejects an action.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Compute the next state. `state` must be left untouched.
    fn reduce(&self, state: &Arc<S>, action: A) -> Result<Arc<S>, Self::Error>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&Arc<S>, A) -> Arc<S> + Send + Sync,
{
    type Error = Infallible;

    fn reduce(&self, state: &Arc<S>, action: A) -> Result<Arc<S>, Infallible> {
        Ok(self(state, action))
    }
}

/// Reducer built from a closure that may reject actions. See [`fallible`].
#[derive(Clone, Copy, Debug)]
pub struct Fallible<F>(F);

impl<S, A, E, F> Reducer<S, A> for Fallible<F>
where
    F: Fn(&Arc<S>, A) -> Result<Arc<S>, E> + Send + Sync,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn reduce(&self, state: &Arc<S>, action: A) -> Result<Arc<S>, E> {
        (self.0)(state, action)
    }
}

/// Turn a closure returning `Result` into a [`Reducer`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tinstore::{fallible, Reducer};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("balance would go negative")]
/// struct Overdraft;
///
/// fn withdraw(balance: &Arc<u64>, amount: u64) -> Result<Arc<u64>, Overdraft> {
///     balance.checked_sub(amount).map(Arc::new).ok_or(Overdraft)
/// }
///
/// let reducer = fallible(withdraw);
/// assert_eq!(*reducer.reduce(&Arc::new(10), 4).unwrap(), 6);
/// assert!(reducer.reduce(&Arc::new(3), 4).is_err());
/// ```
pub fn fallible<F>(f: F) -> Fallible<F> {
    Fallible(f)
}
