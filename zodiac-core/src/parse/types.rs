use std::str::FromStr;

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Deserializer};

use crate::error::SerdeError;

/// An OpenAPI document.
#[derive(Debug, Deserialize)]
pub struct Document {
    pub openapi: String,
    pub info: Info,
    #[serde(default)]
    pub components: Option<Components>,
}

impl Document {
    /// Parse an OpenAPI document from a YAML or JSON string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SerdeError> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml);
        let result = serde_path_to_error::deserialize(deserializer)?;
        Ok(result)
    }

    /// Returns an iterator over all named schemas in this document,
    /// in declaration order.
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &RefOrSchema)> {
        self.components
            .iter()
            .flat_map(|components| components.schemas.iter())
            .map(|(name, schema)| (name.as_str(), schema))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Info {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
}

/// Components section containing reusable schemas.
#[derive(Debug, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, RefOrSchema>,
}

/// Either a reference to a component or an inline component definition.
///
/// The [`RefOr::Ref`] variant holds a `$ref` to a named schema;
/// the [`RefOr::Other`] variant holds an inline definition. Deserialization
/// tries the reference first, so a schema object with a `$ref` key is
/// always a reference, and its sibling keys are ignored.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// A reference to a component definition via `$ref`.
    Ref(Ref),
    /// An inline component definition.
    Other(T),
}

/// Either a reference or a schema definition.
pub type RefOrSchema = RefOr<Box<Schema>>;

/// A reference to another schema.
#[derive(Debug, Clone, Deserialize)]
pub struct Ref {
    #[serde(rename = "$ref")]
    pub path: ComponentRef,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Ty {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[serde(rename = "date-time")]
    DateTime,
    Date,
    Time,
    Duration,
    Email,
    Uri,
    Url,
    Uuid,
    Ipv4,
    Ipv6,
    Byte,
    Base64,
    Binary,
    Int32,
    Int64,
    Float,
    Double,
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    RefOrSchema(RefOrSchema),
}

/// The `items` of an array schema: a single schema for homogeneous
/// arrays, or a list of schemas for a fixed-arity tuple.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Tuple(Vec<RefOrSchema>),
    Bool(bool),
    Single(RefOrSchema),
}

/// An `exclusiveMinimum` or `exclusiveMaximum`. OpenAPI 3.0 spells these
/// as flags that modify `minimum` and `maximum`; OpenAPI 3.1 spells them
/// as standalone bounds.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ExclusiveBound {
    Flag(bool),
    Value(f64),
}

/// An OpenAPI schema definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", default, deserialize_with = "deserialize_type")]
    pub ty: Vec<Ty>,
    #[serde(default)]
    pub format: Option<Format>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub nullable: bool,

    // Object properties.
    #[serde(default)]
    pub properties: Option<IndexMap<String, RefOrSchema>>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub additional_properties: Option<AdditionalProperties>,

    // Array items.
    #[serde(default)]
    pub items: Option<Items>,
    #[serde(default)]
    pub prefix_items: Option<Vec<RefOrSchema>>,
    #[serde(default)]
    pub min_items: Option<u64>,
    #[serde(default)]
    pub max_items: Option<u64>,

    // String constraints.
    #[serde(default)]
    pub min_length: Option<u64>,
    #[serde(default)]
    pub max_length: Option<u64>,
    #[serde(default)]
    pub pattern: Option<String>,

    // Numeric constraints.
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub exclusive_minimum: Option<ExclusiveBound>,
    #[serde(default)]
    pub exclusive_maximum: Option<ExclusiveBound>,
    #[serde(default)]
    pub multiple_of: Option<f64>,

    // Literals.
    #[serde(rename = "enum", default)]
    pub variants: Option<Vec<serde_json::Value>>,
    #[serde(rename = "const", default, deserialize_with = "deserialize_present")]
    pub constant: Option<serde_json::Value>,

    // Composition.
    #[serde(default)]
    pub all_of: Option<Vec<RefOrSchema>>,
    #[serde(default)]
    pub one_of: Option<Vec<RefOrSchema>>,
    #[serde(default)]
    pub any_of: Option<Vec<RefOrSchema>>,
}

/// A `$ref` to a named schema.
///
/// The name is decoded once, when the reference is parsed: it's the
/// trailing segment after the last `/`, percent-decoded, with
/// JSON Pointer escapes (`~1` and `~0`) undone.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ComponentRef {
    raw: String,
    name: String,
}

impl ComponentRef {
    /// Returns the reference exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the decoded name of the referenced schema.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for ComponentRef {
    type Err = BadComponentRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let segment = match trimmed.rfind('/') {
            Some(index) => &trimmed[index + 1..],
            None => trimmed.trim_start_matches('#'),
        };
        if segment.is_empty() {
            return Err(BadComponentRef::Empty(s.to_owned()));
        }
        let decoded = percent_decode_str(segment)
            .decode_utf8()
            .map_err(|_| BadComponentRef::Encoding(s.to_owned()))?;
        let name = decoded.replace("~1", "/").replace("~0", "~");
        Ok(Self {
            raw: s.to_owned(),
            name,
        })
    }
}

impl<'de> Deserialize<'de> for ComponentRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;
        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = ComponentRef;
            fn expecting(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str("a component reference")
            }
            fn visit_str<E: ::serde::de::Error>(self, s: &str) -> Result<Self::Value, E> {
                s.parse().map_err(E::custom)
            }
        }
        deserializer.deserialize_str(Visitor)
    }
}

fn deserialize_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Ty>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TypesOr {
        /// An OpenAPI 3.1-style `type` array.
        Types(Vec<Ty>),
        /// A single `type`.
        Type(Ty),
    }
    Ok(match TypesOr::deserialize(deserializer)? {
        TypesOr::Types(types) => types,
        TypesOr::Type(ty) => vec![ty],
    })
}

/// Distinguishes an explicit `const: null` from an absent `const`.
fn deserialize_present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<serde_json::Value>, D::Error> {
    serde_json::Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, thiserror::Error)]
pub enum BadComponentRef {
    #[error("reference `{0}` doesn't name a schema")]
    Empty(String),
    #[error("reference `{0}` isn't valid percent-encoded UTF-8")]
    Encoding(String),
}
