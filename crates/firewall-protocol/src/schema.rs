//! Schema nodes and the registry that checks them.
//!
//! The declaration macros produce one [`SchemaNode`] per record, enum and
//! union. At startup every node is handed to a [`RegistryBuilder`]; its
//! [`build`](RegistryBuilder::build) resolves cross references and rejects
//! inconsistent declarations before the first message is decoded.
//!
//! ```text
//! register(Vector) ─┐
//! register(Action) ─┼─→ build() ──→ Registry (read-only, shared)
//! register(...)    ─┘      │
//!                          └──→ RegistryError (fatal)
//! ```

use std::collections::{BTreeMap, HashSet};

use crate::wire::Declared;
use crate::RegistryError;

// ---------------------------------------------------------------------------
// Schema nodes
// ---------------------------------------------------------------------------

/// Scalar kinds understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    String,
    Bool,
    /// An object passed through without inspection.
    Map,
}

/// The shape of a type on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Primitive(Primitive),
    /// A reference to a registered record, enum or union.
    Ref(&'static str),
    List(Box<SchemaNode>),
    /// The inner node, or `null`.
    Nullable(Box<SchemaNode>),
    Record(RecordSchema),
    Enum(EnumSchema),
    Union(UnionSchema),
}

impl SchemaNode {
    /// The registered name of a declaration node.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Record(r) => Some(r.name),
            Self::Enum(e) => Some(e.name),
            Self::Union(u) => Some(u.name),
            Self::Primitive(_) | Self::Ref(_) | Self::List(_) | Self::Nullable(_) => None,
        }
    }
}

/// An ordered field list plus the literal fields every instance carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    pub name: &'static str,
    pub fields: Vec<FieldSchema>,
    pub fixed: Vec<(&'static str, &'static str)>,
}

impl RecordSchema {
    /// The literal this record fixes for `key`, if any.
    pub fn fixed_value(&self, key: &str) -> Option<&'static str> {
        self.fixed
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

/// One per-instance record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// The key on the wire.
    pub name: &'static str,
    pub node: SchemaNode,
}

impl FieldSchema {
    pub fn new(name: &'static str, node: SchemaNode) -> Self {
        Self { name, node }
    }
}

/// A bidirectional mapping between Rust variant names and wire literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    pub name: &'static str,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMember {
    /// The Rust variant name.
    pub token: &'static str,
    /// The string used on the wire.
    pub wire: &'static str,
}

impl EnumMember {
    pub fn new(token: &'static str, wire: &'static str) -> Self {
        Self { token, wire }
    }
}

/// A set of records told apart by the literal in `discriminant`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionSchema {
    pub name: &'static str,
    pub discriminant: &'static str,
    /// Names of the member records.
    pub members: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// RegistryBuilder
// ---------------------------------------------------------------------------

/// Collects declarations; [`build`](Self::build) validates them all at once
/// so declarations can reference each other in any order.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    nodes: Vec<SchemaNode>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a declaration node.
    pub fn register_node(mut self, node: SchemaNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Registers the declaration of `T`.
    pub fn register<T: Declared>(self) -> Self {
        self.register_node(T::declaration())
    }

    /// Resolves every reference and checks the declarations.
    ///
    /// # Errors
    /// Returns the first [`RegistryError`] found.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut nodes = BTreeMap::new();
        for node in self.nodes {
            let name = node.name().ok_or(RegistryError::Unnamed)?;
            if nodes.insert(name, node).is_some() {
                return Err(RegistryError::DuplicateType(name));
            }
        }

        let registry = Registry { nodes };
        for node in registry.nodes.values() {
            registry.check(node)?;
        }
        registry.check_cycles()?;

        Ok(registry)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Validated, immutable set of declarations.
#[derive(Debug, Clone)]
pub struct Registry {
    nodes: BTreeMap<&'static str, SchemaNode>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Looks up a declaration by name.
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.nodes.get(name)
    }

    /// Follows a `Ref` to its declaration. Other nodes resolve to themselves.
    pub fn resolve<'a>(&'a self, node: &'a SchemaNode) -> Option<&'a SchemaNode> {
        match node {
            SchemaNode::Ref(name) => self.get(name),
            other => Some(other),
        }
    }

    /// Whether an absent field of this shape decodes to a zero value
    /// instead of failing with `MissingField`.
    pub fn is_defaultable(&self, node: &SchemaNode) -> bool {
        match node {
            SchemaNode::Primitive(_) | SchemaNode::List(_) | SchemaNode::Nullable(_) => true,
            SchemaNode::Ref(_)
            | SchemaNode::Record(_)
            | SchemaNode::Enum(_)
            | SchemaNode::Union(_) => false,
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.nodes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks one declaration against the rest of the registry.
    fn check(&self, node: &SchemaNode) -> Result<(), RegistryError> {
        match node {
            SchemaNode::Record(record) => {
                let mut seen = HashSet::new();
                let fixed_keys = record.fixed.iter().map(|(k, _)| *k);
                let field_keys = record.fields.iter().map(|f| f.name);
                for key in fixed_keys.chain(field_keys) {
                    if !seen.insert(key) {
                        return Err(RegistryError::FieldCollision {
                            record: record.name,
                            field: key,
                        });
                    }
                }
                for field in &record.fields {
                    self.check_refs(record.name, &field.node)?;
                }
                Ok(())
            }
            SchemaNode::Enum(schema) => {
                let mut seen = HashSet::new();
                for member in &schema.members {
                    if !seen.insert(member.wire) {
                        return Err(RegistryError::DuplicateEnumLiteral {
                            name: schema.name,
                            literal: member.wire,
                        });
                    }
                }
                Ok(())
            }
            SchemaNode::Union(union) => self.check_union(union),
            SchemaNode::Primitive(_)
            | SchemaNode::Ref(_)
            | SchemaNode::List(_)
            | SchemaNode::Nullable(_) => Err(RegistryError::Unnamed),
        }
    }

    fn check_union(&self, union: &UnionSchema) -> Result<(), RegistryError> {
        let mut literals = HashSet::new();
        for &member in &union.members {
            let record = match self.get(member) {
                Some(SchemaNode::Record(record)) => record,
                Some(_) => {
                    return Err(RegistryError::NotARecord {
                        union: union.name,
                        member,
                    });
                }
                None => {
                    return Err(RegistryError::UnresolvedType {
                        referenced_by: union.name,
                        name: member,
                    });
                }
            };
            let literal = record.fixed_value(union.discriminant).ok_or(
                RegistryError::MissingDiscriminant {
                    union: union.name,
                    member,
                    discriminant: union.discriminant,
                },
            )?;
            if !literals.insert(literal) {
                return Err(RegistryError::DuplicateVariant {
                    union: union.name,
                    literal,
                });
            }
        }
        Ok(())
    }

    fn check_refs(
        &self,
        owner: &'static str,
        node: &SchemaNode,
    ) -> Result<(), RegistryError> {
        match node {
            SchemaNode::Ref(name) if self.get(name).is_none() => {
                Err(RegistryError::UnresolvedType {
                    referenced_by: owner,
                    name,
                })
            }
            SchemaNode::List(inner) | SchemaNode::Nullable(inner) => {
                self.check_refs(owner, inner)
            }
            _ => Ok(()),
        }
    }

    /// Rejects cycles made only of required record/union edges.
    ///
    /// Lists and nullable fields can be empty, so a cycle through one of
    /// them is bottomed out and allowed.
    fn check_cycles(&self) -> Result<(), RegistryError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit(
            registry: &Registry,
            name: &'static str,
            marks: &mut BTreeMap<&'static str, Mark>,
        ) -> Result<(), RegistryError> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => {
                    return Err(RegistryError::UnboundedCycle { name });
                }
                None => {}
            }
            marks.insert(name, Mark::InProgress);
            for next in registry.required_edges(name) {
                visit(registry, next, marks)?;
            }
            marks.insert(name, Mark::Done);
            Ok(())
        }

        let mut marks = BTreeMap::new();
        for name in self.names() {
            visit(self, name, &mut marks)?;
        }
        Ok(())
    }

    /// Declarations that every value of `name` must contain.
    fn required_edges(&self, name: &str) -> Vec<&'static str> {
        match self.get(name) {
            Some(SchemaNode::Record(record)) => record
                .fields
                .iter()
                .filter_map(|f| match f.node {
                    SchemaNode::Ref(target) => Some(target),
                    _ => None,
                })
                .collect(),
            Some(SchemaNode::Union(union)) => union.members.clone(),
            _ => Vec::new(),
        }
    }
}
