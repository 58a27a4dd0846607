//! The reducer contract.
//!
//! A reducer is a pure function from the current state and an action to the
//! next state. Stores never mutate state themselves; every transition goes
//! through a reducer.

mod reducer;

pub use reducer::{fallible, Fallible, Reducer};
