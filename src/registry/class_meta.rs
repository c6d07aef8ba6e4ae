use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::access::MappingPath;
use crate::error::MappingError;
use crate::info::{ClassRef, TypeArg, TypeInfo};
use crate::value::{Instance, JsonValue, Value};

// -----------------------------------------------------------------------------
// Hooks

/// A custom reader taking over the whole conversion of one class.
///
/// Receives the read-only path context and the raw JSON value (which may be
/// any shape, not necessarily an object) and returns the finished value.
pub type ReadHook =
    Box<dyn Fn(&MappingPath, &JsonValue) -> Result<Value, MappingError> + Send + Sync>;

/// A custom writer taking over the whole conversion of one class.
pub type WriteHook =
    Box<dyn Fn(&MappingPath, &Instance) -> Result<JsonValue, MappingError> + Send + Sync>;

/// Resolves the derived class to continue a polymorphic read with.
///
/// Invoked after all of the declaring class's own properties have been
/// mapped, with the partially-populated instance. The returned class must be
/// a strict descendant of the declaring class.
pub type SubtypeResolver =
    Box<dyn Fn(&MappingPath, &Instance) -> Result<ClassRef, MappingError> + Send + Sync>;

/// Computes a property's concrete type from sibling data.
///
/// Invoked with the path context, the enclosing instance with every earlier
/// property already assigned, and the raw JSON value of this property (if
/// present). Building the returned [`TypeArg`] from a bare [`TypeInfo`]
/// disallows `null`; use [`TypeArg::nullable`] to allow it.
pub type Discriminator = Box<
    dyn Fn(&MappingPath, &Instance, Option<&JsonValue>) -> Result<TypeArg, MappingError>
        + Send
        + Sync,
>;

// -----------------------------------------------------------------------------
// ClassSchema

/// Per-class mapping configuration: the optional hooks that replace or
/// extend default property-by-property mapping.
pub struct ClassSchema {
    pub(crate) reader: Option<ReadHook>,
    pub(crate) writer: Option<WriteHook>,
    pub(crate) subtype: Option<SubtypeResolver>,
}

impl ClassSchema {
    pub(crate) fn new() -> Self {
        Self {
            reader: None,
            writer: None,
            subtype: None,
        }
    }

    /// The custom reader hook, if one is configured.
    #[inline]
    pub fn reader(&self) -> Option<&ReadHook> {
        self.reader.as_ref()
    }

    /// The custom writer hook, if one is configured.
    #[inline]
    pub fn writer(&self) -> Option<&WriteHook> {
        self.writer.as_ref()
    }

    /// The polymorphic subtype resolver, if one is configured.
    #[inline]
    pub fn subtype(&self) -> Option<&SubtypeResolver> {
        self.subtype.as_ref()
    }
}

impl fmt::Debug for ClassSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassSchema")
            .field("reader", &self.reader.is_some())
            .field("writer", &self.writer.is_some())
            .field("subtype", &self.subtype.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// PropertySchema

/// Where a property's type comes from at read time.
#[derive(Debug)]
pub enum PropertyType {
    /// A type declared directly on the property.
    Static(TypeInfo),
    /// A position into the enclosing class reference's type arguments.
    Arg(usize),
    /// A declaration-site union the schema has not disambiguated. Reading
    /// such a property fails; the schema must supply a static type, a type
    /// argument position or a discriminator.
    Union,
}

/// Per-property mapping configuration.
///
/// A property resolves its concrete type in a fixed precedence order: a
/// [discriminator] if one is configured, then the declared [`PropertyType`].
/// The `required` override, when set, wins over whatever requiredness that
/// resolution produced.
///
/// # Examples
///
/// ```
/// use jsonmap::registry::PropertySchema;
/// use jsonmap::TypeInfo;
///
/// let id = PropertySchema::new("id", TypeInfo::Number);
/// let note = PropertySchema::new("note", TypeInfo::String).optional();
/// let tag = PropertySchema::new("tag", TypeInfo::String).movable(false);
/// let item = PropertySchema::generic("item", 0);
///
/// assert_eq!(id.name(), "id");
/// assert!(note.is_optional());
/// assert!(!tag.is_movable());
/// assert_eq!(item.name(), "item");
/// ```
///
/// [discriminator]: Discriminator
pub struct PropertySchema {
    pub(crate) name: Cow<'static, str>,
    pub(crate) ty: PropertyType,
    pub(crate) discriminator: Option<Discriminator>,
    pub(crate) required: Option<bool>,
    pub(crate) optional: bool,
    pub(crate) movable: bool,
}

impl PropertySchema {
    fn with_type(name: impl Into<Cow<'static, str>>, ty: PropertyType) -> Self {
        Self {
            name: name.into(),
            ty,
            discriminator: None,
            required: None,
            optional: false,
            movable: true,
        }
    }

    /// A property with an explicitly declared type.
    pub fn new(name: impl Into<Cow<'static, str>>, info: TypeInfo) -> Self {
        Self::with_type(name, PropertyType::Static(info))
    }

    /// A property whose type is the enclosing class's type argument at
    /// `index`.
    pub fn generic(name: impl Into<Cow<'static, str>>, index: usize) -> Self {
        Self::with_type(name, PropertyType::Arg(index))
    }

    /// A property whose declared type is an undisambiguated union. Reading
    /// it fails until the schema is corrected; this exists so that an
    /// incomplete schema is representable and diagnosable rather than
    /// silently skipped.
    pub fn union(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_type(name, PropertyType::Union)
    }

    /// A property whose type is computed per value by `discriminator`.
    pub fn discriminated(
        name: impl Into<Cow<'static, str>>,
        discriminator: impl Fn(&MappingPath, &Instance, Option<&JsonValue>) -> Result<TypeArg, MappingError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        let mut prop = Self::with_type(name, PropertyType::Union);
        prop.discriminator = Some(Box::new(discriminator));
        prop
    }

    /// Overrides the resolved requiredness: `true` rejects `null`, `false`
    /// accepts it, regardless of what type resolution decided.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Marks the property as optional: an absent value is skipped instead
    /// of failing.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Controls whether the property is copied onto a derived instance
    /// during polymorphic mapping (default `true`). Pass `false` for
    /// properties the derived class fills in itself.
    pub fn movable(mut self, movable: bool) -> Self {
        self.movable = movable;
        self
    }

    /// The property name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an absent value is skipped instead of failing.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the property is copied onto derived instances.
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.movable
    }
}

impl fmt::Debug for PropertySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySchema")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("discriminator", &self.discriminator.is_some())
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("movable", &self.movable)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ClassMeta

/// One chain entry: a property plus the inheritance depth of the class that
/// declared it, so stop-bounded lookups are a filter rather than a walk.
#[derive(Debug)]
pub(crate) struct ChainProp {
    pub(crate) depth: usize,
    pub(crate) prop: Arc<PropertySchema>,
}

/// Everything the registry stores for one class: its schema, its place in
/// the inheritance chain, and the precomputed property chain.
///
/// The chain is deduplicated by property name with the most-derived
/// declaration winning, ordered most-derived-first, and computed once at
/// registry build time.
#[derive(Debug)]
pub struct ClassMeta {
    pub(crate) name: Cow<'static, str>,
    pub(crate) parent: Option<Cow<'static, str>>,
    pub(crate) depth: usize,
    pub(crate) schema: ClassSchema,
    pub(crate) chain: Vec<ChainProp>,
}

impl ClassMeta {
    /// The registered class name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent class name, if this class extends one.
    #[inline]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// The class's mapping schema (hooks).
    #[inline]
    pub fn schema(&self) -> &ClassSchema {
        &self.schema
    }

    /// The full deduplicated property chain, most-derived-first.
    pub fn properties(&self) -> impl Iterator<Item = &PropertySchema> {
        self.chain.iter().map(|entry| &*entry.prop)
    }
}
