//! Track catalog: the `Track` model and the sources that produce tracks.
//!
//! Tracks come either from the assistant backend's practice listing (a JSON
//! document) or from scanning a local directory of audio/video files.

mod catalog;
mod display;
mod model;
mod scan;

pub use catalog::{DirectoryCatalog, JsonCatalog, PracticeGroup, PracticeSource, flatten, open_source};
pub use display::format_clock;
pub use model::{MediaKind, Track};
