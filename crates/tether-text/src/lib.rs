#![deny(missing_docs)]

//! Safe wrappers that register their lifetimes and contents with the
//! [`tether`] engine.
//!
//! Every wrapper owns a [`Tracked`] registration, notifies the engine on
//! mutation and destruction, and validates before handing data out, so a
//! use of a stale reference turns into a violation report instead of a
//! silent read of outdated state.
//!
//! [`TrackedCell`] and [`CellRef`] are the general value/reference pair;
//! [`Text`] with its [`Cursor`] and [`CharRef`] demonstrates the same
//! conventions on a container whose iterators go stale on mutation.

mod cell;
mod text;
mod tracked;

pub use cell::{CellRef, TrackedCell};
pub use text::{CharRef, Cursor, Text};
pub use tracked::Tracked;
