//! The [`Wire`] trait: typed values ↔ JSON values.
//!
//! Every type that can appear in a message implements [`Wire`]. Primitive
//! and container impls live here; records, enums and unions get theirs
//! from the declaration macros in [`crate::macros`], which call the
//! helper functions at the bottom of this module.
//!
//! Decoding is strict about kinds and lenient about presence: a field
//! that is absent (or `null`) takes the type's zero value when it has
//! one, and unknown keys are ignored so the server can add fields
//! without breaking older clients.

use serde_json::{Map, Value};

use crate::schema::{Primitive, SchemaNode};
use crate::DecodeError;

/// A value with a static schema and a JSON representation.
pub trait Wire: Sized {
    /// The schema node describing this type where it is used as a field
    /// or list element. Declared types answer with a reference to their
    /// registered name.
    fn schema() -> SchemaNode;

    /// Decodes a value, failing on the first mismatch.
    fn decode(value: &Value) -> Result<Self, DecodeError>;

    /// Encodes a value. Infallible: a Rust value of this type is always
    /// well-formed.
    fn encode(&self) -> Value;

    /// The value an absent field takes, or `None` when the field is
    /// required (records, unions and enums have no zero value).
    fn zero() -> Option<Self> {
        None
    }
}

/// A type registered by name in the schema registry.
pub trait Declared: Wire {
    /// The registered name.
    const NAME: &'static str;

    /// The full record, enum or union declaration.
    fn declaration() -> SchemaNode;
}

/// A declared record, with the literal fields it always carries.
pub trait WireRecord: Declared {
    /// `(key, literal)` pairs emitted on every encode. For union members
    /// this includes the discriminant.
    const FIXED: &'static [(&'static str, &'static str)];
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

impl Wire for i64 {
    fn schema() -> SchemaNode {
        SchemaNode::Primitive(Primitive::Int)
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_i64()
            .ok_or_else(|| DecodeError::type_mismatch("int", value))
    }

    fn encode(&self) -> Value {
        Value::from(*self)
    }

    fn zero() -> Option<Self> {
        Some(0)
    }
}

impl Wire for String {
    fn schema() -> SchemaNode {
        SchemaNode::Primitive(Primitive::String)
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        expect_str(value).map(str::to_owned)
    }

    fn encode(&self) -> Value {
        Value::String(self.clone())
    }

    fn zero() -> Option<Self> {
        Some(String::new())
    }
}

impl Wire for bool {
    fn schema() -> SchemaNode {
        SchemaNode::Primitive(Primitive::Bool)
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_bool()
            .ok_or_else(|| DecodeError::type_mismatch("bool", value))
    }

    fn encode(&self) -> Value {
        Value::Bool(*self)
    }

    fn zero() -> Option<Self> {
        Some(false)
    }
}

/// Opaque maps are passed through untouched.
impl Wire for Map<String, Value> {
    fn schema() -> SchemaNode {
        SchemaNode::Primitive(Primitive::Map)
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        expect_object(value).cloned()
    }

    fn encode(&self) -> Value {
        Value::Object(self.clone())
    }

    fn zero() -> Option<Self> {
        Some(Map::new())
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

impl<T: Wire> Wire for Vec<T> {
    fn schema() -> SchemaNode {
        SchemaNode::List(Box::new(T::schema()))
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let Value::Array(items) = value else {
            return Err(DecodeError::type_mismatch("array", value));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::decode(item).map_err(|e| e.at_index(i)))
            .collect()
    }

    fn encode(&self) -> Value {
        Value::Array(self.iter().map(Wire::encode).collect())
    }

    fn zero() -> Option<Self> {
        Some(Vec::new())
    }
}

/// `null` ↔ `None`.
impl<T: Wire> Wire for Option<T> {
    fn schema() -> SchemaNode {
        SchemaNode::Nullable(Box::new(T::schema()))
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }

    fn encode(&self) -> Value {
        match self {
            Some(inner) => inner.encode(),
            None => Value::Null,
        }
    }

    fn zero() -> Option<Self> {
        Some(None)
    }
}

// ---------------------------------------------------------------------------
// Helpers used by the declaration macros
// ---------------------------------------------------------------------------

/// Requires `value` to be a JSON object.
pub fn expect_object(value: &Value) -> Result<&Map<String, Value>, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::type_mismatch("object", value))
}

/// Requires `value` to be a JSON string.
pub fn expect_str(value: &Value) -> Result<&str, DecodeError> {
    value
        .as_str()
        .ok_or_else(|| DecodeError::type_mismatch("string", value))
}

/// Decodes the record field `name`, injecting the zero value when it is
/// absent or `null`.
pub fn decode_field<T: Wire>(
    object: &Map<String, Value>,
    name: &'static str,
) -> Result<T, DecodeError> {
    match object.get(name) {
        None | Some(Value::Null) => {
            T::zero().ok_or_else(|| DecodeError::missing_field(name))
        }
        Some(value) => T::decode(value).map_err(|e| e.at_field(name)),
    }
}

/// Reads a union's discriminant string.
pub fn decode_discriminant<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(DecodeError::missing_field(field)),
        Some(value) => expect_str(value).map_err(|e| e.at_field(field)),
    }
}

/// Looks up the literal a record fixes for `key`.
pub fn fixed_literal(
    fixed: &'static [(&'static str, &'static str)],
    key: &str,
) -> Option<&'static str> {
    fixed
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, literal)| *literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_rejects_strings_and_floats() {
        assert_eq!(i64::decode(&json!(7)), Ok(7));
        assert!(matches!(
            i64::decode(&json!("7")),
            Err(DecodeError::TypeMismatch { expected: "int", .. })
        ));
        assert!(matches!(
            i64::decode(&json!(7.5)),
            Err(DecodeError::TypeMismatch { found: "float", .. })
        ));
    }

    #[test]
    fn test_list_reports_first_failing_index() {
        let err = Vec::<i64>::decode(&json!([1, 2, "three", "four"]))
            .unwrap_err();
        assert_eq!(err.path().to_string(), "$[2]");
    }

    #[test]
    fn test_list_requires_array() {
        assert!(matches!(
            Vec::<bool>::decode(&json!({"0": true})),
            Err(DecodeError::TypeMismatch { expected: "array", .. })
        ));
    }

    #[test]
    fn test_option_maps_null_to_none() {
        assert_eq!(Option::<i64>::decode(&json!(null)), Ok(None));
        assert_eq!(Option::<i64>::decode(&json!(3)), Ok(Some(3)));
        assert_eq!(Option::<i64>::None.encode(), json!(null));
    }

    #[test]
    fn test_opaque_map_passes_through() {
        let value = json!({"aliveCount": 4, "nested": {"a": [1]}});
        let map = Map::<String, Value>::decode(&value).unwrap();
        assert_eq!(map.encode(), value);
    }

    #[test]
    fn test_decode_field_injects_zero_values() {
        let object = json!({"present": 5, "nulled": null});
        let object = object.as_object().unwrap();

        assert_eq!(decode_field::<i64>(object, "present"), Ok(5));
        assert_eq!(decode_field::<i64>(object, "absent"), Ok(0));
        assert_eq!(decode_field::<i64>(object, "nulled"), Ok(0));
        assert_eq!(decode_field::<String>(object, "absent"), Ok(String::new()));
        assert_eq!(decode_field::<Vec<i64>>(object, "absent"), Ok(vec![]));
        assert_eq!(decode_field::<Option<i64>>(object, "nulled"), Ok(None));
    }

    #[test]
    fn test_decode_field_prefixes_path() {
        let object = json!({"hp": "full"});
        let err = decode_field::<i64>(object.as_object().unwrap(), "hp")
            .unwrap_err();
        assert_eq!(err.path().to_string(), "$.hp");
    }

    #[test]
    fn test_discriminant_must_be_a_string() {
        let object = json!({"type": 3});
        let err = decode_discriminant(object.as_object().unwrap(), "type")
            .unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { .. }));
        assert_eq!(err.path().to_string(), "$.type");

        let object = json!({});
        let err = decode_discriminant(object.as_object().unwrap(), "type")
            .unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { .. }));
    }

    #[test]
    fn test_fixed_literal_lookup() {
        const FIXED: &[(&str, &str)] =
            &[("type", "link"), ("clientType", "agent")];
        assert_eq!(fixed_literal(FIXED, "clientType"), Some("agent"));
        assert_eq!(fixed_literal(FIXED, "action"), None);
    }
}
