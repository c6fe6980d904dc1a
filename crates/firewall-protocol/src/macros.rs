//! Declaration macros.
//!
//! Each macro takes one type declaration and expands it into the Rust
//! type, its [`Wire`](crate::wire::Wire) impl and its
//! [`Declared`](crate::wire::Declared) schema node, so the codec and the
//! registry can never disagree about a type's shape.
//!
//! ```
//! use firewall_protocol::{wire_enum, wire_record, wire_union};
//!
//! wire_enum! {
//!     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//!     pub enum Light {
//!         Red = "red",
//!         Green = "green",
//!     }
//! }
//!
//! wire_record! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub struct Switch ["kind" = "switch"] {
//!         pub light: Light = "light",
//!         pub blink_ticks: i64 = "blinkTicks",
//!     }
//! }
//!
//! wire_record! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub struct Wait ["kind" = "wait"] {}
//! }
//!
//! wire_union! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub enum Command on "kind" {
//!         Switch(Switch),
//!         Wait(Wait),
//!     }
//! }
//! ```

/// Declares a record: a struct whose fields map to object keys.
///
/// Each field names its wire key after `=`. An optional bracket group after
/// the struct name lists literal `key = "value"` pairs written on every
/// encode; union members use it for their discriminant.
#[macro_export]
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $([ $($fixed_key:literal = $fixed_value:literal),* $(,)? ])? {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty = $key:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::wire::WireRecord for $name {
            const FIXED: &'static [(&'static str, &'static str)] =
                &[ $( $( ($fixed_key, $fixed_value), )* )? ];
        }

        impl $crate::wire::Declared for $name {
            const NAME: &'static str = stringify!($name);

            fn declaration() -> $crate::schema::SchemaNode {
                $crate::schema::SchemaNode::Record($crate::schema::RecordSchema {
                    name: <Self as $crate::wire::Declared>::NAME,
                    fields: vec![
                        $(
                            $crate::schema::FieldSchema::new(
                                $key,
                                <$ty as $crate::wire::Wire>::schema(),
                            ),
                        )*
                    ],
                    fixed: <Self as $crate::wire::WireRecord>::FIXED.to_vec(),
                })
            }
        }

        impl $crate::wire::Wire for $name {
            fn schema() -> $crate::schema::SchemaNode {
                $crate::schema::SchemaNode::Ref(stringify!($name))
            }

            #[allow(unused_variables)]
            fn decode(
                value: &$crate::__private::Value,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                let object = $crate::wire::expect_object(value)?;
                Ok(Self {
                    $( $field: $crate::wire::decode_field::<$ty>(object, $key)?, )*
                })
            }

            fn encode(&self) -> $crate::__private::Value {
                let mut object = $crate::__private::Map::new();
                for (key, literal) in <Self as $crate::wire::WireRecord>::FIXED {
                    object.insert(
                        (*key).to_owned(),
                        $crate::__private::Value::from(*literal),
                    );
                }
                $(
                    object.insert(
                        $key.to_owned(),
                        $crate::wire::Wire::encode(&self.$field),
                    );
                )*
                $crate::__private::Value::Object(object)
            }
        }
    };
}

/// Declares an enum whose unit variants map one-to-one onto string
/// literals.
///
/// Besides the `Wire` impl, the expansion provides `ALL`, `as_wire`,
/// `from_wire` and a `Display` impl printing the wire literal.
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $literal:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )* ];

            /// The literal this variant is written as.
            pub fn as_wire(&self) -> &'static str {
                match self {
                    $( Self::$variant => $literal, )*
                }
            }

            /// The variant written as `literal`, if any.
            pub fn from_wire(literal: &str) -> ::std::option::Option<Self> {
                match literal {
                    $( $literal => ::std::option::Option::Some(Self::$variant), )*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_wire())
            }
        }

        impl $crate::wire::Declared for $name {
            const NAME: &'static str = stringify!($name);

            fn declaration() -> $crate::schema::SchemaNode {
                $crate::schema::SchemaNode::Enum($crate::schema::EnumSchema {
                    name: <Self as $crate::wire::Declared>::NAME,
                    members: vec![
                        $(
                            $crate::schema::EnumMember::new(
                                stringify!($variant),
                                $literal,
                            ),
                        )*
                    ],
                })
            }
        }

        impl $crate::wire::Wire for $name {
            fn schema() -> $crate::schema::SchemaNode {
                $crate::schema::SchemaNode::Ref(stringify!($name))
            }

            fn decode(
                value: &$crate::__private::Value,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                let literal = $crate::wire::expect_str(value)?;
                Self::from_wire(literal).ok_or_else(|| {
                    $crate::DecodeError::unknown_enum_value(
                        <Self as $crate::wire::Declared>::NAME,
                        literal,
                    )
                })
            }

            fn encode(&self) -> $crate::__private::Value {
                $crate::__private::Value::from(self.as_wire())
            }
        }
    };
}

/// Declares a tagged union over records declared with [`wire_record!`].
///
/// `on "field"` names the discriminant; every member must fix that field
/// to a distinct literal (checked by the registry). Each variant wraps
/// exactly one member record, and a `From` impl is generated per member.
#[macro_export]
macro_rules! wire_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident on $discriminant:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($member:ty)
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant($member),
            )*
        }

        impl $name {
            /// The key holding the member tag.
            pub const DISCRIMINANT: &'static str = $discriminant;

            /// The tag of the wrapped member.
            pub fn tag(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant(_) => $crate::wire::fixed_literal(
                            <$member as $crate::wire::WireRecord>::FIXED,
                            $discriminant,
                        )
                        .unwrap_or_default(),
                    )*
                }
            }
        }

        $(
            impl ::std::convert::From<$member> for $name {
                fn from(member: $member) -> Self {
                    Self::$variant(member)
                }
            }
        )*

        impl $crate::wire::Declared for $name {
            const NAME: &'static str = stringify!($name);

            fn declaration() -> $crate::schema::SchemaNode {
                $crate::schema::SchemaNode::Union($crate::schema::UnionSchema {
                    name: <Self as $crate::wire::Declared>::NAME,
                    discriminant: $discriminant,
                    members: vec![
                        $( <$member as $crate::wire::Declared>::NAME, )*
                    ],
                })
            }
        }

        impl $crate::wire::Wire for $name {
            fn schema() -> $crate::schema::SchemaNode {
                $crate::schema::SchemaNode::Ref(stringify!($name))
            }

            fn decode(
                value: &$crate::__private::Value,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                let object = $crate::wire::expect_object(value)?;
                let tag = $crate::wire::decode_discriminant(object, $discriminant)?;
                $(
                    if $crate::wire::fixed_literal(
                        <$member as $crate::wire::WireRecord>::FIXED,
                        $discriminant,
                    ) == ::std::option::Option::Some(tag)
                    {
                        return <$member as $crate::wire::Wire>::decode(value)
                            .map(Self::$variant);
                    }
                )*
                Err($crate::DecodeError::unknown_variant(
                    <Self as $crate::wire::Declared>::NAME,
                    tag,
                )
                .at_field($discriminant))
            }

            fn encode(&self) -> $crate::__private::Value {
                match self {
                    $( Self::$variant(member) => $crate::wire::Wire::encode(member), )*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::schema::{Registry, SchemaNode};
    use crate::wire::{Declared, Wire};
    use crate::DecodeError;

    crate::wire_enum! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Shape {
            Round = "round",
            Flat = "flatTop",
        }
    }

    crate::wire_record! {
        #[derive(Debug, Clone, PartialEq)]
        struct Pin ["kind" = "pin"] {
            shape: Shape = "shape",
            depth: i64 = "pinDepth",
        }
    }

    crate::wire_record! {
        #[derive(Debug, Clone, PartialEq)]
        struct Hole ["kind" = "hole", "version" = "2"] {}
    }

    crate::wire_union! {
        #[derive(Debug, Clone, PartialEq)]
        enum Part on "kind" {
            Pin(Pin),
            Hole(Hole),
        }
    }

    #[test]
    fn test_enum_literals_are_bidirectional() {
        assert_eq!(Shape::ALL, &[Shape::Round, Shape::Flat]);
        assert_eq!(Shape::Flat.as_wire(), "flatTop");
        assert_eq!(Shape::from_wire("flatTop"), Some(Shape::Flat));
        assert_eq!(Shape::from_wire("Flat"), None);
        assert_eq!(Shape::Round.to_string(), "round");
    }

    #[test]
    fn test_record_emits_fixed_fields_and_wire_keys() {
        let pin = Pin {
            shape: Shape::Round,
            depth: 3,
        };
        assert_eq!(
            pin.encode(),
            json!({"kind": "pin", "shape": "round", "pinDepth": 3})
        );
        assert_eq!(
            Hole {}.encode(),
            json!({"kind": "hole", "version": "2"})
        );
    }

    #[test]
    fn test_union_dispatches_on_discriminant() {
        let part = Part::decode(&json!({"kind": "pin", "shape": "flatTop"})).unwrap();
        assert_eq!(
            part,
            Part::Pin(Pin {
                shape: Shape::Flat,
                depth: 0
            })
        );
        assert_eq!(part.tag(), "pin");
        assert_eq!(Part::from(Hole {}).tag(), "hole");
    }

    #[test]
    fn test_union_rejects_unknown_tag_at_discriminant_path() {
        let err = Part::decode(&json!({"kind": "screw"})).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnknownVariant { schema: "Part", ref value, .. } if value == "screw"
        ));
        assert_eq!(err.path().to_string(), "$.kind");
    }

    #[test]
    fn test_missing_enum_field_is_not_defaulted() {
        let err = Pin::decode(&json!({"kind": "pin", "pinDepth": 1})).unwrap_err();
        assert_eq!(err, DecodeError::missing_field("shape"));
    }

    #[test]
    fn test_declarations_build_a_valid_registry() {
        let registry = Registry::builder()
            .register::<Shape>()
            .register::<Pin>()
            .register::<Hole>()
            .register::<Part>()
            .build()
            .unwrap();
        assert_eq!(registry.len(), 4);

        let Some(SchemaNode::Record(pin)) = registry.get(Pin::NAME) else {
            panic!("Pin should be a record");
        };
        assert_eq!(pin.fixed_value("kind"), Some("pin"));
        assert_eq!(pin.fields[1].name, "pinDepth");
        assert_eq!(pin.fields[0].node, SchemaNode::Ref("Shape"));
    }
}
