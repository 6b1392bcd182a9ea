#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod edge;
mod handle;
mod object;
mod registry;
mod splay;
mod violation;

pub mod global;

pub use edge::DepKind;
pub use handle::ObjectId;
pub use registry::Registry;
pub use violation::{AbortHandler, RecordingHandler, ViolationHandler};
