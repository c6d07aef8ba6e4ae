use std::borrow::Cow;
use std::fmt;

// -----------------------------------------------------------------------------
// TypeInfo

/// A descriptor of the type a JSON value should be converted to.
///
/// The reader walks a `TypeInfo` in lockstep with the input tree: scalar
/// kinds demand the matching JSON scalar, [`Array`] and [`Map`] recurse with
/// their [`TypeArg`], and [`Class`] looks the referenced class up in the
/// registry and maps its properties. Descriptors are plain values; they are
/// built once when a schema is declared and cloned freely.
///
/// The writer never consults a `TypeInfo`; it dispatches on the runtime
/// shape of the value being written.
///
/// # Examples
///
/// ```
/// use jsonmap::{TypeArg, TypeInfo};
///
/// // Map<String, Array<String>>
/// let ty = TypeInfo::map(TypeInfo::String, TypeInfo::array(TypeInfo::String));
/// assert_eq!(ty.to_string(), "map");
///
/// // Container<Number>, with a nullable argument
/// let ty = TypeInfo::class_with("Container", [TypeArg::nullable(TypeInfo::Number)]);
/// assert_eq!(ty.to_string(), "class `Container`");
/// ```
///
/// [`Array`]: TypeInfo::Array
/// [`Map`]: TypeInfo::Map
/// [`Class`]: TypeInfo::Class
#[derive(Debug, Clone, PartialEq)]
pub enum TypeInfo {
    /// The type that only `null` inhabits.
    Null,
    /// A JSON boolean.
    Boolean,
    /// A JSON number.
    Number,
    /// A JSON string.
    String,
    /// A calendar timestamp, carried in JSON as an RFC 3339 string.
    Date,
    /// An array with a single element type.
    Array {
        /// Element type and its null policy.
        element: Box<TypeArg>,
    },
    /// A map from string keys to a single value type.
    ///
    /// The key descriptor exists so that a schema declaring a non-string
    /// key is representable; the reader rejects it as a configuration
    /// error. JSON itself only ever supplies string keys.
    Map {
        /// Declared key type; anything but [`TypeInfo::String`] is rejected.
        key: Box<TypeInfo>,
        /// Value type and its null policy.
        value: Box<TypeArg>,
    },
    /// An instance of a registered class, possibly with type arguments.
    Class(ClassRef),
}

impl TypeInfo {
    /// An array of the given element type (element required, non-null).
    pub fn array(element: impl Into<TypeArg>) -> Self {
        Self::Array {
            element: Box::new(element.into()),
        }
    }

    /// A map with the given key type and value type (value required).
    pub fn map(key: TypeInfo, value: impl Into<TypeArg>) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value.into()),
        }
    }

    /// A reference to the class registered under `name`.
    pub fn class(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Class(ClassRef::new(name))
    }

    /// A reference to a generic class instantiated with `args`.
    pub fn class_with(
        name: impl Into<Cow<'static, str>>,
        args: impl IntoIterator<Item = TypeArg>,
    ) -> Self {
        Self::Class(ClassRef::with_args(name, args))
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.pad("null"),
            Self::Boolean => f.pad("boolean"),
            Self::Number => f.pad("number"),
            Self::String => f.pad("string"),
            Self::Date => f.pad("date"),
            Self::Array { .. } => f.pad("array"),
            Self::Map { .. } => f.pad("map"),
            Self::Class(class) => write!(f, "class `{}`", class.name),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeArg

/// A type argument: a [`TypeInfo`] plus whether `null` is rejected there.
///
/// Converting from a bare `TypeInfo` produces the required (non-null) form,
/// matching the convention that an unadorned type argument disallows `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeArg {
    /// The argument's type.
    pub info: TypeInfo,
    /// Whether `null` is rejected for this position.
    pub required: bool,
}

impl TypeArg {
    /// A required (non-null) argument of the given type.
    #[inline]
    pub fn of(info: TypeInfo) -> Self {
        Self {
            info,
            required: true,
        }
    }

    /// An argument of the given type that also accepts `null`.
    #[inline]
    pub fn nullable(info: TypeInfo) -> Self {
        Self {
            info,
            required: false,
        }
    }

    /// An argument with an explicit null policy.
    #[inline]
    pub fn new(info: TypeInfo, required: bool) -> Self {
        Self { info, required }
    }
}

impl From<TypeInfo> for TypeArg {
    #[inline]
    fn from(info: TypeInfo) -> Self {
        Self::of(info)
    }
}

// -----------------------------------------------------------------------------
// ClassRef

/// A reference to a registered class, with the type arguments (if any) the
/// enclosing declaration instantiates it with.
///
/// Properties of the referenced class that declare a positional type
/// argument resolve against `args`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRef {
    /// Registered name of the class.
    pub name: Cow<'static, str>,
    /// Type arguments for a generic class; empty for plain classes.
    pub args: Vec<TypeArg>,
}

impl ClassRef {
    /// A reference to a non-generic class.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A reference to a generic class instantiated with `args`.
    pub fn with_args(
        name: impl Into<Cow<'static, str>>,
        args: impl IntoIterator<Item = TypeArg>,
    ) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_argument_is_required() {
        let arg = TypeArg::from(TypeInfo::Number);
        assert!(arg.required);
        assert_eq!(arg.info, TypeInfo::Number);

        assert!(!TypeArg::nullable(TypeInfo::String).required);
    }

    #[test]
    fn display_names() {
        assert_eq!(TypeInfo::Boolean.to_string(), "boolean");
        assert_eq!(TypeInfo::array(TypeInfo::Number).to_string(), "array");
        assert_eq!(
            TypeInfo::map(TypeInfo::String, TypeInfo::Null).to_string(),
            "map"
        );
        assert_eq!(TypeInfo::class("Point").to_string(), "class `Point`");
    }

    #[test]
    fn class_with_args() {
        let TypeInfo::Class(class) =
            TypeInfo::class_with("Pair", [TypeArg::of(TypeInfo::String), TypeArg::nullable(TypeInfo::Number)])
        else {
            panic!("expected a class descriptor");
        };

        assert_eq!(class.name, "Pair");
        assert_eq!(class.args.len(), 2);
        assert!(class.args[0].required);
        assert!(!class.args[1].required);
    }
}
