//! Error types for the protocol layer.
//!
//! Decoding failures carry a [`WirePath`] pointing at the offending value
//! (`$.state.player.inventory[2].type`), so a dropped message can be
//! diagnosed from a single log line.

use std::collections::VecDeque;
use std::fmt;

use serde_json::Value;

// ---------------------------------------------------------------------------
// WirePath
// ---------------------------------------------------------------------------

/// One step from a parent value to a child value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    /// An object key.
    Field(&'static str),
    /// An array index.
    Index(usize),
}

/// Location of a value inside a wire document, rooted at `$`.
///
/// Paths are built inside-out: the innermost decoder reports the failure
/// and each enclosing record or list prepends its own segment while the
/// error propagates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WirePath(VecDeque<PathSegment>);

impl WirePath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// A path consisting of a single object key.
    pub fn field(name: &'static str) -> Self {
        Self(VecDeque::from([PathSegment::Field(name)]))
    }

    /// Prepends a segment (the parent of the current path).
    pub fn push_front(&mut self, segment: PathSegment) {
        self.0.push_front(segment);
    }

    /// The segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.0.iter()
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for WirePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// A wire value did not match the schema it was decoded against.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The JSON kind (object, array, string, ...) is not the declared one.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: WirePath,
        expected: &'static str,
        found: &'static str,
    },

    /// A string is not one of the enum's wire literals.
    #[error("unknown value {value:?} for enum {schema} at {path}")]
    UnknownEnumValue {
        path: WirePath,
        schema: &'static str,
        value: String,
    },

    /// A field without a zero value (record, union, enum) is absent.
    #[error("missing field at {path}")]
    MissingField { path: WirePath },

    /// A union discriminant names no registered member.
    #[error("unknown variant {value:?} for union {schema} at {path}")]
    UnknownVariant {
        path: WirePath,
        schema: &'static str,
        value: String,
    },
}

impl DecodeError {
    /// `expected` kind, but `found` this value.
    pub fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            path: WirePath::root(),
            expected,
            found: kind_of(found),
        }
    }

    /// The field `name` of the current object is absent.
    pub fn missing_field(name: &'static str) -> Self {
        Self::MissingField {
            path: WirePath::field(name),
        }
    }

    /// `value` is not a literal of the enum `schema`.
    pub fn unknown_enum_value(schema: &'static str, value: &str) -> Self {
        Self::UnknownEnumValue {
            path: WirePath::root(),
            schema,
            value: value.to_owned(),
        }
    }

    /// `value` is not a discriminant of the union `schema`.
    pub fn unknown_variant(schema: &'static str, value: &str) -> Self {
        Self::UnknownVariant {
            path: WirePath::root(),
            schema,
            value: value.to_owned(),
        }
    }

    /// Where in the document the failure occurred.
    pub fn path(&self) -> &WirePath {
        match self {
            Self::TypeMismatch { path, .. }
            | Self::UnknownEnumValue { path, .. }
            | Self::MissingField { path }
            | Self::UnknownVariant { path, .. } => path,
        }
    }

    fn path_mut(&mut self) -> &mut WirePath {
        match self {
            Self::TypeMismatch { path, .. }
            | Self::UnknownEnumValue { path, .. }
            | Self::MissingField { path }
            | Self::UnknownVariant { path, .. } => path,
        }
    }

    /// Re-roots the error under the object key `name`.
    pub fn at_field(mut self, name: &'static str) -> Self {
        self.path_mut().push_front(PathSegment::Field(name));
        self
    }

    /// Re-roots the error under the array index `index`.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path_mut().push_front(PathSegment::Index(index));
        self
    }
}

/// Human name of a JSON value's kind, for diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// The static schema declarations are inconsistent.
///
/// These are programming errors in the declarations, so the client treats
/// any of them as fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two declarations share a name.
    #[error("type {0} is registered twice")]
    DuplicateType(&'static str),

    /// Only records, enums and unions can be registered by name.
    #[error("only record, enum and union schemas can be registered")]
    Unnamed,

    /// A field or member refers to a name that was never registered.
    #[error("{referenced_by} refers to unregistered type {name}")]
    UnresolvedType {
        referenced_by: &'static str,
        name: &'static str,
    },

    /// A union member is not a record.
    #[error("member {member} of union {union} is not a record")]
    NotARecord {
        union: &'static str,
        member: &'static str,
    },

    /// A union member does not fix the union's discriminant field.
    #[error("member {member} of union {union} has no fixed {discriminant:?} field")]
    MissingDiscriminant {
        union: &'static str,
        member: &'static str,
        discriminant: &'static str,
    },

    /// Two members of a union use the same discriminant literal.
    #[error("union {union} has two members tagged {literal:?}")]
    DuplicateVariant {
        union: &'static str,
        literal: &'static str,
    },

    /// Two members of an enum use the same wire literal.
    #[error("enum {name} maps {literal:?} twice")]
    DuplicateEnumLiteral {
        name: &'static str,
        literal: &'static str,
    },

    /// A record key is declared twice, or both fixed and per-instance.
    #[error("record {record} declares key {field:?} more than once")]
    FieldCollision {
        record: &'static str,
        field: &'static str,
    },

    /// Required record fields form a cycle no value could ever close.
    #[error("type {name} contains itself through required fields")]
    UnboundedCycle { name: &'static str },
}

// ---------------------------------------------------------------------------
// ProtocolError
// ---------------------------------------------------------------------------

/// Errors that can occur while turning text into messages and back.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing a wire value to text failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The text is not valid JSON.
    #[error("malformed JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The JSON does not match the message schema.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
