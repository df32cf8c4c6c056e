//! The schema model: a closed set of JSON Schema shapes that
//! the compilers pattern-match on.

mod lower;
mod map;

pub use lower::lower;
pub use map::SchemaMap;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::parse::ComponentRef;

/// One parsed unit of a schema definition.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaNode<'a> {
    pub kind: SchemaKind<'a>,
    /// Whether `null` is accepted in addition to `kind`.
    pub nullable: bool,
    pub description: Option<&'a str>,
}

impl<'a> SchemaNode<'a> {
    #[inline]
    pub fn new(kind: SchemaKind<'a>) -> Self {
        Self {
            kind,
            nullable: false,
            description: None,
        }
    }

    /// Returns this node with nullability set.
    #[inline]
    pub fn nullable(self, nullable: bool) -> Self {
        Self { nullable, ..self }
    }

    /// Returns a node that accepts any value.
    #[inline]
    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    /// Returns the direct children of this node: array items,
    /// object properties and typed catch-alls, and composition members.
    /// References are leaves.
    pub fn children(&self) -> impl Iterator<Item = &SchemaNode<'a>> {
        let children: Box<dyn Iterator<Item = &SchemaNode<'a>> + '_> = match &self.kind {
            SchemaKind::Array(array) => match &array.items {
                ArrayItems::Any => Box::new(std::iter::empty()),
                ArrayItems::Single(item) => Box::new(std::iter::once(&**item)),
                ArrayItems::Tuple(items) => Box::new(items.iter()),
            },
            SchemaKind::Object(object) => Box::new(itertools::chain!(
                object.properties.values(),
                match &object.additional {
                    AdditionalProperties::Schema(node) => Some(&**node),
                    _ => None,
                },
            )),
            SchemaKind::Composition(_, members) => Box::new(members.iter()),
            SchemaKind::String(_)
            | SchemaKind::Number(_)
            | SchemaKind::Integer(_)
            | SchemaKind::Boolean
            | SchemaKind::Null
            | SchemaKind::Ref(_)
            | SchemaKind::Enum(_)
            | SchemaKind::Const(_)
            | SchemaKind::Any => Box::new(std::iter::empty()),
        };
        children
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SchemaKind<'a> {
    String(StringNode<'a>),
    Number(NumberNode),
    Integer(NumberNode),
    Boolean,
    Null,
    Array(ArrayNode<'a>),
    Object(ObjectNode<'a>),
    /// A reference to another named schema.
    Ref(&'a ComponentRef),
    Composition(Composition, Vec<SchemaNode<'a>>),
    /// One of a fixed set of literal values.
    Enum(Vec<&'a Value>),
    /// Exactly one literal value.
    Const(&'a Value),
    /// Any JSON value. Shapes that can't be represented more precisely
    /// lower to this variant.
    Any,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Composition {
    AllOf,
    OneOf,
    AnyOf,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StringNode<'a> {
    pub format: Option<StringFormat>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<&'a str>,
}

/// String formats with a dedicated validator.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StringFormat {
    DateTime,
    Date,
    Time,
    Duration,
    Email,
    Url,
    Uuid,
    Ipv4,
    Ipv6,
    Base64,
}

/// Numeric constraints. Exclusive bounds are normalized to their
/// standalone form, whichever OpenAPI version spelled them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NumberNode {
    pub format: Option<NumberFormat>,
    pub minimum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NumberFormat {
    Int32,
    Int64,
    Float,
    Double,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayNode<'a> {
    pub items: ArrayItems<'a>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArrayItems<'a> {
    /// No `items`; any element is allowed.
    Any,
    /// A homogeneous array.
    Single(Box<SchemaNode<'a>>),
    /// A fixed-arity tuple, one schema per position.
    Tuple(Vec<SchemaNode<'a>>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectNode<'a> {
    pub properties: IndexMap<&'a str, SchemaNode<'a>>,
    pub required: IndexSet<&'a str>,
    pub additional: AdditionalProperties<'a>,
}

impl ObjectNode<'_> {
    #[inline]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AdditionalProperties<'a> {
    /// No `additionalProperties` keyword.
    Unspecified,
    /// `additionalProperties: true` or `false`.
    Allowed(bool),
    /// A typed catch-all for unlisted properties.
    Schema(Box<SchemaNode<'a>>),
}
