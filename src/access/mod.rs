//! Path tracking for mapping diagnostics.

mod path;

pub use path::{MappingPath, PathPart};
