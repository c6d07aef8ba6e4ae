#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Modules

pub mod access;
pub mod de;
pub mod error;
pub mod info;
pub mod registry;
pub mod ser;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use access::MappingPath;
pub use de::{ReadDriver, from_json, from_json_array, from_json_map, from_json_nullable};
pub use error::{ErrorKind, MappingError};
pub use info::{ClassRef, TypeArg, TypeInfo};
pub use ser::{WriteDriver, to_json, to_json_value};
pub use value::{Instance, JsonValue, OrderedMap, Value};
