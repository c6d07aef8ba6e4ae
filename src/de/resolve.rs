//! Per-property type resolution.

use crate::access::MappingPath;
use crate::error::MappingError;
use crate::info::{TypeArg, TypeInfo};
use crate::registry::{PropertySchema, PropertyType};
use crate::value::{Instance, JsonValue};

/// Determines the concrete `(type, required)` pair for one property of a
/// class conversion.
///
/// Resolution runs in a fixed precedence order:
///
/// 1. a configured discriminator, invoked with the instance as mapped so
///    far and the property's raw JSON value;
/// 2. a statically declared type (required unless overridden);
/// 3. a positional type argument of the enclosing class reference, which
///    must actually be supplied;
/// 4. otherwise the property is an undisambiguated union and resolution
///    fails.
///
/// A `required` override on the property always wins over whatever the
/// mechanism above produced.
pub(crate) fn resolve_property(
    path: &MappingPath,
    prop: &PropertySchema,
    instance: &Instance,
    raw: Option<&JsonValue>,
    args: &[TypeArg],
) -> Result<(TypeInfo, bool), MappingError> {
    let (info, mut required) = if let Some(discriminator) = &prop.discriminator {
        let arg = discriminator(path, instance, raw)?;
        (arg.info, arg.required)
    } else {
        match &prop.ty {
            PropertyType::Static(info) => (info.clone(), true),
            PropertyType::Arg(index) => match args.get(*index) {
                Some(arg) => (arg.info.clone(), arg.required),
                None => {
                    return Err(MappingError::NoTypeArgument {
                        path: path.current_path(),
                        index: *index,
                    });
                }
            },
            PropertyType::Union => {
                return Err(MappingError::AmbiguousUnion {
                    path: path.current_path(),
                });
            }
        }
    };

    if let Some(value) = prop.required {
        required = value;
    }

    Ok((info, required))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ctx() -> (MappingPath, Instance) {
        (MappingPath::new(), Instance::new("Test"))
    }

    #[test]
    fn static_types_are_required_by_default() {
        let (path, instance) = ctx();
        let prop = PropertySchema::new("a", TypeInfo::Number);

        let (info, required) = resolve_property(&path, &prop, &instance, None, &[]).unwrap();
        assert_eq!(info, TypeInfo::Number);
        assert!(required);
    }

    #[test]
    fn required_override_wins() {
        let (path, instance) = ctx();
        let prop = PropertySchema::new("a", TypeInfo::Number).required(false);

        let (_, required) = resolve_property(&path, &prop, &instance, None, &[]).unwrap();
        assert!(!required);
    }

    #[test]
    fn positional_argument_resolution() {
        let (path, instance) = ctx();
        let prop = PropertySchema::generic("a", 1);
        let args = [
            TypeArg::of(TypeInfo::String),
            TypeArg::nullable(TypeInfo::Number),
        ];

        let (info, required) = resolve_property(&path, &prop, &instance, None, &args).unwrap();
        assert_eq!(info, TypeInfo::Number);
        assert!(!required);
    }

    #[test]
    fn missing_argument_slot() {
        let (path, instance) = ctx();
        let prop = PropertySchema::generic("a", 2);
        let args = [TypeArg::of(TypeInfo::String)];

        let err = resolve_property(&path, &prop, &instance, None, &args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoTypeArgument);
    }

    #[test]
    fn union_without_discriminator_is_ambiguous() {
        let (path, instance) = ctx();
        let prop = PropertySchema::union("a");

        let err = resolve_property(&path, &prop, &instance, None, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousUnion);
    }

    #[test]
    fn discriminator_takes_precedence() {
        let (path, instance) = ctx();
        let prop = PropertySchema::discriminated("a", |_, _, raw| {
            Ok(match raw {
                Some(JsonValue::Number(_)) => TypeArg::of(TypeInfo::Number),
                _ => TypeArg::nullable(TypeInfo::String),
            })
        });

        let number = serde_json::json!(5);
        let (info, required) =
            resolve_property(&path, &prop, &instance, Some(&number), &[]).unwrap();
        assert_eq!(info, TypeInfo::Number);
        assert!(required);

        let (info, required) = resolve_property(&path, &prop, &instance, None, &[]).unwrap();
        assert_eq!(info, TypeInfo::String);
        assert!(!required);
    }
}
