//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They live here (in `app`) so that both the use-case layer and
//! the adapter layer can depend on them without creating circular
//! dependencies.

pub mod model;

pub use model::{Model, ModelSource};
