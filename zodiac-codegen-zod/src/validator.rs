use itertools::Itertools;
use serde_json::Value;
use zodiac_core::schema::{
    AdditionalProperties, ArrayItems, ArrayNode, Composition, NumberFormat, NumberNode,
    ObjectNode, SchemaKind, SchemaNode, StringFormat, StringNode,
};

use super::{
    emit::{self, literal},
    naming::{CodegenNames, property_key},
};

/// Compiles a schema node into a Zod validator expression.
///
/// Compilation is total: shapes that Zod can't express more precisely
/// compile to `z.unknown()`. References compile to the referenced
/// schema's identifier, without checking that the schema exists.
pub fn compile_validator(node: &SchemaNode<'_>) -> String {
    ValidatorCompiler::new(&CodegenNames::default()).expr(node)
}

/// Compiles validators, resolving references through a table
/// of unique identifiers.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ValidatorCompiler<'c> {
    names: &'c CodegenNames<'c>,
}

impl<'c> ValidatorCompiler<'c> {
    pub fn new(names: &'c CodegenNames<'c>) -> Self {
        Self { names }
    }

    pub fn expr(&self, node: &SchemaNode<'_>) -> String {
        let expr = match &node.kind {
            SchemaKind::String(string) => zod_string(string),
            SchemaKind::Number(number) => zod_number(number),
            SchemaKind::Integer(number) => zod_integer(number),
            SchemaKind::Boolean => "z.boolean()".to_owned(),
            SchemaKind::Null => return "z.null()".to_owned(),
            SchemaKind::Array(array) => self.array(array),
            SchemaKind::Object(object) => self.object(object),
            SchemaKind::Ref(r) => self.names.ident(r.name()).to_schema_name(),
            SchemaKind::Composition(composition, members) => {
                self.composition(*composition, members)
            }
            SchemaKind::Enum(values) => return zod_enum(values, node.nullable),
            SchemaKind::Const(value) => match literal(value) {
                Some(lit) => format!("z.literal({lit})"),
                None if value.is_null() => return "z.null()".to_owned(),
                None => "z.unknown()".to_owned(),
            },
            SchemaKind::Any => return "z.unknown()".to_owned(),
        };
        if node.nullable {
            format!("{expr}.nullable()")
        } else {
            expr
        }
    }

    fn array(&self, array: &ArrayNode<'_>) -> String {
        match &array.items {
            ArrayItems::Tuple(items) => format!(
                "z.tuple([{}])",
                items.iter().map(|item| self.expr(item)).format(", ")
            ),
            ArrayItems::Single(item) => format!(
                "z.array({}){}",
                self.expr(item),
                lengths(array.min_items, array.max_items)
            ),
            ArrayItems::Any => format!(
                "z.array(z.unknown()){}",
                lengths(array.min_items, array.max_items)
            ),
        }
    }

    fn object(&self, object: &ObjectNode<'_>) -> String {
        if object.properties.is_empty()
            && let AdditionalProperties::Schema(value) = &object.additional
        {
            return format!("z.record(z.string(), {})", self.expr(value));
        }

        let ctor = match object.additional {
            AdditionalProperties::Allowed(false) => "z.strictObject",
            AdditionalProperties::Allowed(true) => "z.looseObject",
            AdditionalProperties::Unspecified | AdditionalProperties::Schema(_) => "z.object",
        };
        let shape = if object.properties.is_empty() {
            "{}".to_owned()
        } else {
            let fields = object.properties.iter().map(|(&name, node)| {
                let value = self.expr(node);
                if object.is_required(name) {
                    format!("{}: {value}", property_key(name))
                } else {
                    format!("{}: {value}.optional()", property_key(name))
                }
            });
            format!("{{ {} }}", fields.format(", "))
        };
        match &object.additional {
            AdditionalProperties::Schema(value) => {
                format!("{ctor}({shape}).catchall({})", self.expr(value))
            }
            _ => format!("{ctor}({shape})"),
        }
    }

    fn composition(&self, composition: Composition, members: &[SchemaNode<'_>]) -> String {
        let mut members = members.iter().map(|member| self.expr(member));
        match (composition, members.len()) {
            (_, 0) => "z.unknown()".to_owned(),
            (_, 1) => members.next().unwrap_or_else(|| "z.unknown()".to_owned()),
            (Composition::OneOf | Composition::AnyOf, _) => {
                format!("z.union([{}])", members.format(", "))
            }
            (Composition::AllOf, _) => members
                .reduce(|left, right| format!("z.intersection({left}, {right})"))
                .unwrap_or_else(|| "z.unknown()".to_owned()),
        }
    }
}

fn zod_string(string: &StringNode<'_>) -> String {
    let mut expr = match string.format {
        None => "z.string()",
        Some(StringFormat::DateTime) => "z.iso.datetime()",
        Some(StringFormat::Date) => "z.iso.date()",
        Some(StringFormat::Time) => "z.iso.time()",
        Some(StringFormat::Duration) => "z.iso.duration()",
        Some(StringFormat::Email) => "z.email()",
        Some(StringFormat::Url) => "z.url()",
        Some(StringFormat::Uuid) => "z.uuid()",
        Some(StringFormat::Ipv4) => "z.ipv4()",
        Some(StringFormat::Ipv6) => "z.ipv6()",
        Some(StringFormat::Base64) => "z.base64()",
    }
    .to_owned();
    expr.push_str(&lengths(string.min_length, string.max_length));
    if let Some(pattern) = string.pattern {
        expr.push_str(&format!(".regex({})", emit::regex(pattern)));
    }
    expr
}

fn zod_number(number: &NumberNode) -> String {
    let base = match number.format {
        Some(NumberFormat::Float) => "z.float32()",
        Some(NumberFormat::Double) => "z.float64()",
        _ => "z.number()",
    };
    format!("{base}{}", bounds(number))
}

fn zod_integer(number: &NumberNode) -> String {
    let base = match number.format {
        Some(NumberFormat::Int32) => "z.int32()",
        _ => "z.int()",
    };
    format!("{base}{}", bounds(number))
}

/// Returns the chained bound checks for a number. When an inclusive and
/// an exclusive bound on the same side coexist, only the stricter one
/// is kept; at equal values, the exclusive bound is stricter.
///
/// Infinite bounds don't constrain anything, so they're dropped.
fn bounds(number: &NumberNode) -> String {
    let finite = |bound: Option<f64>| bound.filter(|bound| bound.is_finite());
    let mut checks = String::new();
    match (finite(number.minimum), finite(number.exclusive_minimum)) {
        (Some(min), Some(gt)) if min > gt => {
            checks.push_str(&format!(".min({})", emit::number(min)))
        }
        (_, Some(gt)) => checks.push_str(&format!(".gt({})", emit::number(gt))),
        (Some(min), None) => checks.push_str(&format!(".min({})", emit::number(min))),
        (None, None) => {}
    }
    match (finite(number.maximum), finite(number.exclusive_maximum)) {
        (Some(max), Some(lt)) if max < lt => {
            checks.push_str(&format!(".max({})", emit::number(max)))
        }
        (_, Some(lt)) => checks.push_str(&format!(".lt({})", emit::number(lt))),
        (Some(max), None) => checks.push_str(&format!(".max({})", emit::number(max))),
        (None, None) => {}
    }
    if let Some(step) = finite(number.multiple_of) {
        checks.push_str(&format!(".multipleOf({})", emit::number(step)));
    }
    checks
}

/// Returns the chained length checks for a string or an array.
fn lengths(min: Option<u64>, max: Option<u64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) if min == max => format!(".length({min})"),
        (min, max) => {
            let min = min.map(|min| format!(".min({min})"));
            let max = max.map(|max| format!(".max({max})"));
            min.into_iter().chain(max).collect()
        }
    }
}

/// Compiles an `enum`. A `null` value makes the result nullable,
/// regardless of the node's own nullability.
fn zod_enum(values: &[&Value], nullable: bool) -> String {
    let (nulls, values) = values
        .iter()
        .copied()
        .partition::<Vec<&Value>, _>(|value| value.is_null());
    let nullable = nullable || !nulls.is_empty();
    let expr = match &*values {
        [] if nullable => return "z.null()".to_owned(),
        [] => return "z.never()".to_owned(),
        [value] => match literal(value) {
            Some(lit) => format!("z.literal({lit})"),
            None => "z.unknown()".to_owned(),
        },
        values if values.iter().all(|value| value.is_string()) => format!(
            "z.enum([{}])",
            values.iter().filter_map(|value| literal(value)).format(", ")
        ),
        values => format!(
            "z.union([{}])",
            values
                .iter()
                .map(|value| match literal(value) {
                    Some(lit) => format!("z.literal({lit})"),
                    None => "z.unknown()".to_owned(),
                })
                .format(", ")
        ),
    };
    if nullable {
        format!("{expr}.nullable()")
    } else {
        expr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use zodiac_core::{parse::Document, schema::SchemaMap};

    use crate::tests::schemas_doc;

    /// Compiles the validator for the named schema in a document.
    fn compile(doc: &Document, name: &str) -> String {
        let map = SchemaMap::from_doc(doc);
        compile_validator(&map.schemas[name])
    }

    // MARK: Primitives

    #[test]
    fn test_string_with_constraints() {
        let doc = schemas_doc(indoc::indoc! {"
            Code:
              type: string
              minLength: 2
              maxLength: 8
              pattern: '^[A-Z/]+$'
        "});
        assert_eq!(
            compile(&doc, "Code"),
            r#"z.string().min(2).max(8).regex(/^[A-Z\/]+$/)"#
        );
    }

    #[test]
    fn test_string_with_equal_lengths() {
        let doc = schemas_doc(indoc::indoc! {"
            Iso:
              type: string
              minLength: 3
              maxLength: 3
        "});
        assert_eq!(compile(&doc, "Iso"), "z.string().length(3)");
    }

    #[test]
    fn test_string_with_empty_pattern() {
        let doc = schemas_doc(indoc::indoc! {"
            Anything:
              type: string
              pattern: ''
        "});
        assert_eq!(compile(&doc, "Anything"), "z.string().regex(/(?:)/)");
    }

    #[test]
    fn test_string_formats() {
        let doc = schemas_doc(indoc::indoc! {"
            Email:
              type: string
              format: email
            When:
              type: string
              format: date-time
            Id:
              type: string
              format: uuid
            Other:
              type: string
              format: hostname
        "});
        assert_eq!(compile(&doc, "Email"), "z.email()");
        assert_eq!(compile(&doc, "When"), "z.iso.datetime()");
        assert_eq!(compile(&doc, "Id"), "z.uuid()");
        assert_eq!(compile(&doc, "Other"), "z.string()");
    }

    #[test]
    fn test_integer_and_number_formats() {
        let doc = schemas_doc(indoc::indoc! {"
            Small:
              type: integer
              format: int32
            Big:
              type: integer
              format: int64
            Ratio:
              type: number
              format: double
        "});
        assert_eq!(compile(&doc, "Small"), "z.int32()");
        assert_eq!(compile(&doc, "Big"), "z.int()");
        assert_eq!(compile(&doc, "Ratio"), "z.float64()");
    }

    #[test]
    fn test_numeric_bounds() {
        let doc = schemas_doc(indoc::indoc! {"
            Percent:
              type: number
              minimum: 0
              maximum: 100
              multipleOf: 0.5
            Positive:
              type: integer
              exclusiveMinimum: 0
        "});
        assert_eq!(
            compile(&doc, "Percent"),
            "z.number().min(0).max(100).multipleOf(0.5)"
        );
        assert_eq!(compile(&doc, "Positive"), "z.int().gt(0)");
    }

    #[test]
    fn test_redundant_numeric_bounds_keep_the_stricter() {
        let doc = schemas_doc(indoc::indoc! {"
            Looser:
              type: number
              minimum: 0
              exclusiveMinimum: 5
              maximum: 10
              exclusiveMaximum: 20
            Equal:
              type: number
              minimum: 1
              exclusiveMinimum: 1
              maximum: 9
              exclusiveMaximum: 9
        "});
        assert_eq!(compile(&doc, "Looser"), "z.number().gt(5).max(10)");
        assert_eq!(compile(&doc, "Equal"), "z.number().gt(1).lt(9)");
    }

    #[test]
    fn test_infinite_bounds_are_dropped() {
        let doc = schemas_doc(indoc::indoc! {"
            Unbounded:
              type: number
              minimum: -.inf
              exclusiveMaximum: .inf
            HalfBounded:
              type: integer
              minimum: 0
              maximum: .inf
        "});
        assert_eq!(compile(&doc, "Unbounded"), "z.number()");
        assert_eq!(compile(&doc, "HalfBounded"), "z.int().min(0)");
    }

    #[test]
    fn test_nullable_primitive() {
        let doc = schemas_doc(indoc::indoc! {"
            Name:
              type: [string, 'null']
        "});
        assert_eq!(compile(&doc, "Name"), "z.string().nullable()");
    }

    // MARK: Containers

    #[test]
    fn test_array() {
        let doc = schemas_doc(indoc::indoc! {"
            Tags:
              type: array
              items:
                type: string
              minItems: 1
            Anything:
              type: array
            Point:
              type: array
              prefixItems:
                - type: number
                - type: number
        "});
        assert_eq!(compile(&doc, "Tags"), "z.array(z.string()).min(1)");
        assert_eq!(compile(&doc, "Anything"), "z.array(z.unknown())");
        assert_eq!(compile(&doc, "Point"), "z.tuple([z.number(), z.number()])");
    }

    #[test]
    fn test_object_with_required_and_optional_properties() {
        let doc = schemas_doc(indoc::indoc! {"
            Pet:
              type: object
              required: [name]
              properties:
                name:
                  type: string
                age:
                  type: integer
                content-type:
                  type: string
        "});
        assert_eq!(
            compile(&doc, "Pet"),
            r#"z.object({ name: z.string(), age: z.int().optional(), "content-type": z.string().optional() })"#
        );
    }

    #[test]
    fn test_object_additional_properties() {
        let doc = schemas_doc(indoc::indoc! {"
            Closed:
              type: object
              properties:
                id:
                  type: string
              required: [id]
              additionalProperties: false
            Open:
              type: object
              additionalProperties: true
            Catchall:
              type: object
              properties:
                id:
                  type: string
              required: [id]
              additionalProperties:
                type: string
            Map:
              type: object
              additionalProperties:
                type: integer
        "});
        assert_eq!(compile(&doc, "Closed"), "z.strictObject({ id: z.string() })");
        assert_eq!(compile(&doc, "Open"), "z.looseObject({})");
        assert_eq!(
            compile(&doc, "Catchall"),
            "z.object({ id: z.string() }).catchall(z.string())"
        );
        assert_eq!(compile(&doc, "Map"), "z.record(z.string(), z.int())");
    }

    // MARK: Compositions

    #[test]
    fn test_compositions() {
        let doc = schemas_doc(indoc::indoc! {"
            Either:
              oneOf:
                - type: string
                - type: integer
            Both:
              allOf:
                - $ref: '#/components/schemas/A'
                - $ref: '#/components/schemas/B'
                - $ref: '#/components/schemas/C'
            Single:
              anyOf:
                - $ref: '#/components/schemas/A'
        "});
        assert_eq!(compile(&doc, "Either"), "z.union([z.string(), z.int()])");
        assert_eq!(
            compile(&doc, "Both"),
            "z.intersection(z.intersection(ASchema, BSchema), CSchema)"
        );
        assert_eq!(compile(&doc, "Single"), "ASchema");
    }

    #[test]
    fn test_nullable_union() {
        let doc = schemas_doc(indoc::indoc! {"
            MaybeId:
              oneOf:
                - type: string
                - type: integer
                - type: 'null'
        "});
        assert_eq!(
            compile(&doc, "MaybeId"),
            "z.union([z.string(), z.int()]).nullable()"
        );
    }

    // MARK: Literals

    #[test]
    fn test_enums() {
        let doc = schemas_doc(indoc::indoc! {"
            Status:
              type: string
              enum: [active, inactive]
            Level:
              enum: [1, 2, 'three']
            Only:
              enum: [only]
            MaybeStatus:
              enum: [small, large, null]
        "});
        assert_eq!(compile(&doc, "Status"), r#"z.enum(["active", "inactive"])"#);
        assert_eq!(
            compile(&doc, "Level"),
            r#"z.union([z.literal(1), z.literal(2), z.literal("three")])"#
        );
        assert_eq!(compile(&doc, "Only"), r#"z.literal("only")"#);
        assert_eq!(
            compile(&doc, "MaybeStatus"),
            r#"z.enum(["small", "large"]).nullable()"#
        );
    }

    #[test]
    fn test_consts() {
        let doc = schemas_doc(indoc::indoc! {"
            Kind:
              const: dog
            Answer:
              const: 42
            Nothing:
              const: null
            Shape:
              const: {a: 1}
        "});
        assert_eq!(compile(&doc, "Kind"), r#"z.literal("dog")"#);
        assert_eq!(compile(&doc, "Answer"), "z.literal(42)");
        assert_eq!(compile(&doc, "Nothing"), "z.null()");
        assert_eq!(compile(&doc, "Shape"), "z.unknown()");
    }

    // MARK: References

    #[test]
    fn test_ref_compiles_to_identifier() {
        let doc = schemas_doc(indoc::indoc! {"
            Owner:
              type: object
              required: [pet]
              properties:
                pet:
                  $ref: '#/components/schemas/pet-store'
        "});
        assert_eq!(
            compile(&doc, "Owner"),
            "z.object({ pet: PetStoreSchema })"
        );
    }

    #[test]
    fn test_unrecognized_is_unknown() {
        let doc = schemas_doc(indoc::indoc! {"
            Anything:
              description: Whatever.
        "});
        assert_eq!(compile(&doc, "Anything"), "z.unknown()");
    }
}
