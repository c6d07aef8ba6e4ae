//! The read-only store of per-class mapping schemas.

mod class_meta;
mod class_registry;

pub use class_meta::{
    ClassMeta, ClassSchema, Discriminator, PropertySchema, PropertyType, ReadHook,
    SubtypeResolver, WriteHook,
};
pub use class_registry::{ClassBuilder, ClassRegistry, ClassRegistryBuilder};
