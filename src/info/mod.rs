//! Type descriptors that drive JSON → object conversion.

mod type_info;

pub use type_info::{ClassRef, TypeArg, TypeInfo};
