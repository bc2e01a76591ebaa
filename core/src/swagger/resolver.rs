#![deny(missing_docs)]

//! # Type Resolver
//!
//! Maps [`TypeDescriptor`]s onto Swagger schema fragments.
//! Scalars go through a fixed primitive table; containers and references
//! resolve structurally. Resolution is total: unknown scalars degrade to a
//! sentinel `UNKNOWN` format instead of failing.

use crate::spec::TypeDescriptor;
use crate::swagger::models::SchemaObject;

/// Format emitted for scalars missing from the primitive table.
pub const UNKNOWN_FORMAT: &str = "UNKNOWN";

/// Go scalar name -> (Swagger type, format).
const PRIMITIVE_TYPES: &[(&str, &str, Option<&str>)] = &[
    ("string", "string", None),
    ("bool", "boolean", Some("boolean")),
    ("int", "integer", Some("int32")),
    ("int8", "integer", Some("int8")),
    ("int16", "integer", Some("int16")),
    ("int32", "integer", Some("int32")),
    ("int64", "integer", Some("int64")),
    ("uint", "integer", Some("uint32")),
    ("uint8", "integer", Some("uint8")),
    ("uint16", "integer", Some("uint16")),
    ("uint32", "integer", Some("uint32")),
    ("uint64", "integer", Some("uint64")),
    ("byte", "integer", Some("uint8")),
    ("rune", "integer", Some("int32")),
    ("float32", "number", Some("float")),
    ("float64", "number", Some("double")),
];

/// Looks up a scalar in the primitive table.
pub fn primitive_type(name: &str) -> Option<(&'static str, Option<&'static str>)> {
    PRIMITIVE_TYPES
        .iter()
        .find(|(go, _, _)| *go == name)
        .map(|(_, kind, format)| (*kind, *format))
}

/// Trait for converting declared member types into schema fragments.
pub trait TypeResolver {
    /// Resolves a descriptor into a schema fragment.
    fn resolve(&self, ty: &TypeDescriptor) -> SchemaObject;
}

/// The standard resolver for Go-flavoured descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoTypeResolver;

impl TypeResolver for GoTypeResolver {
    fn resolve(&self, ty: &TypeDescriptor) -> SchemaObject {
        match ty {
            TypeDescriptor::Pointer(inner) => self.resolve(inner),
            TypeDescriptor::Scalar(name) => scalar_schema(name),
            TypeDescriptor::Array(inner) => SchemaObject::array(self.resolve(inner)),
            // No property introspection for maps and dynamic values.
            TypeDescriptor::Map(_, _) | TypeDescriptor::DynamicAny => SchemaObject::object(),
            TypeDescriptor::Reference(name) => SchemaObject::reference(name),
        }
    }
}

fn scalar_schema(name: &str) -> SchemaObject {
    match primitive_type(name) {
        Some((kind, format)) => SchemaObject::primitive(kind, format),
        None => {
            tracing::warn!(scalar = name, "unknown scalar type, emitting UNKNOWN format");
            SchemaObject::primitive(name, Some(UNKNOWN_FORMAT))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolve(input: &str) -> SchemaObject {
        GoTypeResolver.resolve(&input.parse().unwrap())
    }

    #[test]
    fn test_integer_widths_have_distinct_formats() {
        let cases = [
            ("int8", "int8"),
            ("int16", "int16"),
            ("int32", "int32"),
            ("int64", "int64"),
            ("uint8", "uint8"),
            ("uint16", "uint16"),
            ("uint32", "uint32"),
            ("uint64", "uint64"),
        ];
        for (go, format) in cases {
            let schema = resolve(go);
            assert_eq!(schema.kind.as_deref(), Some("integer"), "{}", go);
            assert_eq!(schema.format.as_deref(), Some(format), "{}", go);
        }
    }

    #[test]
    fn test_other_primitives() {
        assert_eq!(resolve("string"), SchemaObject::primitive("string", None));
        assert_eq!(resolve("bool"), SchemaObject::primitive("boolean", Some("boolean")));
        assert_eq!(resolve("float32"), SchemaObject::primitive("number", Some("float")));
        assert_eq!(resolve("float64"), SchemaObject::primitive("number", Some("double")));
    }

    #[test]
    fn test_pointer_is_transparent() {
        assert_eq!(resolve("**int64"), resolve("int64"));
        assert_eq!(resolve("*User"), SchemaObject::reference("User"));
    }

    #[test]
    fn test_arrays_recurse() {
        assert_eq!(
            resolve("[]*Item"),
            SchemaObject::array(SchemaObject::reference("Item"))
        );
        assert_eq!(
            resolve("[][]string"),
            SchemaObject::array(SchemaObject::array(SchemaObject::primitive("string", None)))
        );
    }

    #[test]
    fn test_maps_and_any_collapse_to_object() {
        assert_eq!(resolve("map[string]Item"), SchemaObject::object());
        assert_eq!(resolve("interface{}"), SchemaObject::object());
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_unknown_scalar_degrades() {
        let schema = resolve("time.Time");
        assert_eq!(schema.kind.as_deref(), Some("time.Time"));
        assert_eq!(schema.format.as_deref(), Some(UNKNOWN_FORMAT));
        assert!(logs_contain("unknown scalar type"));
    }
}
