//! The store: one state value, one reducer, and the listeners to notify.
//!
//! State only changes through [`Store::dispatch`], which runs the reducer,
//! commits the result and then calls every subscribed listener synchronously.

mod store;
mod subscription;

pub use store::{create_store, Store};
pub use subscription::{Subscription, SubscriptionGuard};
