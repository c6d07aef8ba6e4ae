//! The writer engine: recursive object → JSON conversion.

mod driver;

pub use driver::{WriteDriver, to_json, to_json_value};
