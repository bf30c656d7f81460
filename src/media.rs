//! Platform media seam and the binding that owns the live handle.
//!
//! The player never touches a handle directly: it goes through
//! [`MediaBinding`], which keeps exactly one handle per bound url and drops
//! events from handles that have been torn down.

mod backend;
mod binding;
mod rodio_backend;
#[cfg(test)]
pub mod scripted;

pub use backend::{EventTap, HandleId, MediaBackend, MediaEvent, MediaEventKind, MediaHandle};
pub use binding::{BindOutcome, MediaBinding};
pub use rodio_backend::RodioBackend;
