//! The reader engine: recursive, type-directed JSON → object conversion.

mod driver;
mod resolve;

pub use driver::{ReadDriver, from_json, from_json_array, from_json_map, from_json_nullable};
