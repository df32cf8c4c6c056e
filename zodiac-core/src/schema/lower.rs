use itertools::Itertools;

use crate::parse::{
    self, ExclusiveBound, Format, Items, RefOr, RefOrSchema, Schema, Ty,
};

use super::{
    AdditionalProperties, ArrayItems, ArrayNode, Composition, NumberFormat, NumberNode,
    ObjectNode, SchemaKind, SchemaNode, StringFormat, StringNode,
};

/// Lowers a parsed schema into a [`SchemaNode`].
///
/// Lowering never fails: a schema without a recognizable shape
/// lowers to [`SchemaKind::Any`].
#[inline]
pub fn lower<'a>(schema: &'a RefOrSchema) -> SchemaNode<'a> {
    match schema {
        RefOr::Ref(r) => SchemaNode::new(SchemaKind::Ref(&r.path)),
        RefOr::Other(schema) => Lowerer::new(schema).lower(),
    }
}

#[derive(Debug)]
struct Lowerer<'a> {
    schema: &'a Schema,
}

impl<'a> Lowerer<'a> {
    fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    fn lower(self) -> SchemaNode<'a> {
        let schema = self.schema;
        let nullable = schema.nullable || schema.ty.contains(&Ty::Null);

        // A schema can combine its own shape with composition keywords,
        // as in `allOf: [Base]` next to `properties`. Each part lowers
        // separately, and multiple parts intersect.
        let mut parts = Vec::new();
        if let Some(all_of) = &schema.all_of {
            parts.extend(all_of.iter().map(lower));
        }
        if let Some(own) = self.own_shape() {
            parts.push(SchemaNode::new(own));
        }
        if let Some(one_of) = &schema.one_of {
            parts.push(union(Composition::OneOf, one_of));
        }
        if let Some(any_of) = &schema.any_of {
            parts.push(union(Composition::AnyOf, any_of));
        }

        let node = match parts.len() {
            0 => SchemaNode::any(),
            1 => parts.pop().unwrap_or_else(SchemaNode::any),
            _ => SchemaNode::new(SchemaKind::Composition(Composition::AllOf, parts)),
        };
        SchemaNode {
            nullable: node.nullable || nullable,
            description: schema.description.as_deref().or(node.description),
            ..node
        }
    }

    /// Lowers this schema's own shape, ignoring composition keywords.
    fn own_shape(&self) -> Option<SchemaKind<'a>> {
        self.try_const()
            .or_else(|| self.try_enum())
            .or_else(|| self.try_types())
    }

    fn try_const(&self) -> Option<SchemaKind<'a>> {
        self.schema.constant.as_ref().map(SchemaKind::Const)
    }

    fn try_enum(&self) -> Option<SchemaKind<'a>> {
        let variants = self.schema.variants.as_ref()?;
        Some(SchemaKind::Enum(variants.iter().collect()))
    }

    fn try_types(&self) -> Option<SchemaKind<'a>> {
        let schema = self.schema;
        let tys = schema
            .ty
            .iter()
            .copied()
            .filter(|&ty| ty != Ty::Null)
            .collect_vec();
        match &*tys {
            [] if schema.ty.contains(&Ty::Null) => Some(SchemaKind::Null),
            [] if schema.properties.is_some() || schema.additional_properties.is_some() => {
                Some(self.kind_for(Ty::Object))
            }
            [] if schema.items.is_some() || schema.prefix_items.is_some() => {
                Some(self.kind_for(Ty::Array))
            }
            [] => None,
            &[ty] => Some(self.kind_for(ty)),
            // An OpenAPI 3.1 schema with multiple types in its `type` field
            // accepts any of them, with the same constraints.
            tys => Some(SchemaKind::Composition(
                Composition::AnyOf,
                tys.iter()
                    .map(|&ty| SchemaNode::new(self.kind_for(ty)))
                    .collect(),
            )),
        }
    }

    fn kind_for(&self, ty: Ty) -> SchemaKind<'a> {
        let schema = self.schema;
        match ty {
            Ty::String => SchemaKind::String(StringNode {
                format: schema.format.and_then(string_format),
                min_length: schema.min_length,
                max_length: schema.max_length,
                pattern: schema.pattern.as_deref(),
            }),
            Ty::Number => SchemaKind::Number(self.number()),
            Ty::Integer => SchemaKind::Integer(self.number()),
            Ty::Boolean => SchemaKind::Boolean,
            Ty::Null => SchemaKind::Null,
            Ty::Array => {
                let items = match (&schema.prefix_items, &schema.items) {
                    (Some(prefix), _) | (None, Some(Items::Tuple(prefix))) => {
                        ArrayItems::Tuple(prefix.iter().map(lower).collect())
                    }
                    (None, Some(Items::Single(item))) => ArrayItems::Single(lower(item).into()),
                    (None, Some(Items::Bool(_)) | None) => ArrayItems::Any,
                };
                SchemaKind::Array(ArrayNode {
                    items,
                    min_items: schema.min_items,
                    max_items: schema.max_items,
                })
            }
            Ty::Object => SchemaKind::Object(ObjectNode {
                properties: schema
                    .properties
                    .iter()
                    .flatten()
                    .map(|(name, schema)| (name.as_str(), lower(schema)))
                    .collect(),
                required: schema.required.iter().map(String::as_str).collect(),
                additional: match &schema.additional_properties {
                    None => AdditionalProperties::Unspecified,
                    Some(parse::AdditionalProperties::Bool(allowed)) => {
                        AdditionalProperties::Allowed(*allowed)
                    }
                    Some(parse::AdditionalProperties::RefOrSchema(schema)) => {
                        AdditionalProperties::Schema(lower(schema).into())
                    }
                },
            }),
        }
    }

    fn number(&self) -> NumberNode {
        let schema = self.schema;
        let (minimum, exclusive_minimum) = bounds(schema.minimum, schema.exclusive_minimum);
        let (maximum, exclusive_maximum) = bounds(schema.maximum, schema.exclusive_maximum);
        NumberNode {
            format: schema.format.and_then(number_format),
            minimum,
            exclusive_minimum,
            maximum,
            exclusive_maximum,
            multiple_of: schema.multiple_of,
        }
    }
}

/// Lowers the members of a `oneOf` or `anyOf`. `null` members
/// make the union nullable instead of becoming their own branch.
fn union<'a>(composition: Composition, members: &'a [RefOrSchema]) -> SchemaNode<'a> {
    let (nulls, mut members): (Vec<_>, Vec<_>) = members
        .iter()
        .map(lower)
        .partition(|node| matches!(node.kind, SchemaKind::Null));
    let nullable = !nulls.is_empty();
    match members.len() {
        0 if nullable => SchemaNode::new(SchemaKind::Null),
        1 => {
            let member = members.pop().unwrap_or_else(SchemaNode::any);
            SchemaNode {
                nullable: member.nullable || nullable,
                ..member
            }
        }
        _ => SchemaNode::new(SchemaKind::Composition(composition, members)).nullable(nullable),
    }
}

/// Splits an inclusive bound and an OpenAPI 3.0 or 3.1 exclusive bound
/// into `(inclusive, exclusive)`.
fn bounds(inclusive: Option<f64>, exclusive: Option<ExclusiveBound>) -> (Option<f64>, Option<f64>) {
    match (inclusive, exclusive) {
        (Some(value), Some(ExclusiveBound::Flag(true))) => (None, Some(value)),
        (inclusive, Some(ExclusiveBound::Value(value))) => (inclusive, Some(value)),
        (inclusive, _) => (inclusive, None),
    }
}

fn string_format(format: Format) -> Option<StringFormat> {
    Some(match format {
        Format::DateTime => StringFormat::DateTime,
        Format::Date => StringFormat::Date,
        Format::Time => StringFormat::Time,
        Format::Duration => StringFormat::Duration,
        Format::Email => StringFormat::Email,
        Format::Uri | Format::Url => StringFormat::Url,
        Format::Uuid => StringFormat::Uuid,
        Format::Ipv4 => StringFormat::Ipv4,
        Format::Ipv6 => StringFormat::Ipv6,
        Format::Byte | Format::Base64 => StringFormat::Base64,
        _ => return None,
    })
}

fn number_format(format: Format) -> Option<NumberFormat> {
    Some(match format {
        Format::Int32 => NumberFormat::Int32,
        Format::Int64 => NumberFormat::Int64,
        Format::Float => NumberFormat::Float,
        Format::Double => NumberFormat::Double,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::tests::{assert_matches, doc};

    fn only_schema(doc: &parse::Document) -> &RefOrSchema {
        let (_, schema) = doc.schemas().exactly_one().ok().unwrap();
        schema
    }

    #[test]
    fn test_lower_nullable_type_array() {
        let doc = doc(indoc::indoc! {"
            openapi: 3.1.0
            info:
              title: Test API
              version: 1.0.0
            components:
              schemas:
                Name:
                  type: [string, 'null']
                  maxLength: 10
        "});

        let node = lower(only_schema(&doc));
        assert!(node.nullable);
        assert_matches!(
            node.kind,
            SchemaKind::String(StringNode {
                max_length: Some(10),
                ..
            })
        );
    }

    #[test]
    fn test_lower_open_api_3_0_exclusive_minimum() {
        let doc = doc(indoc::indoc! {"
            openapi: 3.0.0
            info:
              title: Test API
              version: 1.0.0
            components:
              schemas:
                Price:
                  type: number
                  minimum: 0
                  exclusiveMinimum: true
                  maximum: 100
        "});

        let node = lower(only_schema(&doc));
        let SchemaKind::Number(number) = node.kind else {
            panic!("expected number; got `{:?}`", node.kind);
        };
        assert_eq!(number.minimum, None);
        assert_eq!(number.exclusive_minimum, Some(0.0));
        assert_eq!(number.maximum, Some(100.0));
    }

    #[test]
    fn test_lower_all_of_with_own_properties() {
        let doc = doc(indoc::indoc! {"
            openapi: 3.0.0
            info:
              title: Test API
              version: 1.0.0
            components:
              schemas:
                Dog:
                  allOf:
                    - $ref: '#/components/schemas/Animal'
                  properties:
                    bark:
                      type: boolean
        "});

        let node = lower(only_schema(&doc));
        let SchemaKind::Composition(Composition::AllOf, members) = &node.kind else {
            panic!("expected `allOf`; got `{:?}`", node.kind);
        };
        assert_matches!(
            &**members,
            [
                SchemaNode {
                    kind: SchemaKind::Ref(_),
                    ..
                },
                SchemaNode {
                    kind: SchemaKind::Object(_),
                    ..
                },
            ]
        );
    }

    #[test]
    fn test_lower_one_of_with_null_member() {
        let doc = doc(indoc::indoc! {"
            openapi: 3.1.0
            info:
              title: Test API
              version: 1.0.0
            components:
              schemas:
                MaybePet:
                  oneOf:
                    - $ref: '#/components/schemas/Pet'
                    - type: 'null'
        "});

        let node = lower(only_schema(&doc));
        assert!(node.nullable);
        assert_matches!(node.kind, SchemaKind::Ref(r) if r.name() == "Pet");
    }

    #[test]
    fn test_lower_tuple_items() {
        let doc = doc(indoc::indoc! {"
            openapi: 3.1.0
            info:
              title: Test API
              version: 1.0.0
            components:
              schemas:
                Point:
                  type: array
                  prefixItems:
                    - type: number
                    - type: number
        "});

        let node = lower(only_schema(&doc));
        assert_matches!(
            node.kind,
            SchemaKind::Array(ArrayNode {
                items: ArrayItems::Tuple(ref items),
                ..
            }) if items.len() == 2
        );
    }

    #[test]
    fn test_lower_unrecognized_shape_is_any() {
        let doc = doc(indoc::indoc! {"
            openapi: 3.0.0
            info:
              title: Test API
              version: 1.0.0
            components:
              schemas:
                Anything:
                  description: Whatever you like.
        "});

        let node = lower(only_schema(&doc));
        assert_eq!(node.kind, SchemaKind::Any);
        assert_eq!(node.description, Some("Whatever you like."));
    }
}
