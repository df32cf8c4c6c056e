use indexmap::IndexSet;
use zodiac_core::schema::{
    AdditionalProperties, ArrayItems, Composition, ObjectNode, SchemaKind, SchemaNode,
};

use super::{
    emit::{TsProperty, TsType},
    naming::CodegenNames,
};

/// Compiles a schema node into a TypeScript type expression that
/// matches the type of [`compile_validator`][super::compile_validator]'s
/// output.
///
/// References to `self_name`, or to any schema in `cyclic_group`,
/// compile to that schema's declared recursive type, like `NodeType`.
/// Other references compile to the type inferred from the
/// referenced validator.
pub fn compile_type(node: &SchemaNode<'_>, self_name: &str, cyclic_group: &IndexSet<&str>) -> String {
    TypeCompiler::new(&CodegenNames::default(), self_name, cyclic_group)
        .ty(node)
        .to_string()
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TypeCompiler<'c> {
    names: &'c CodegenNames<'c>,
    self_name: &'c str,
    cyclic_group: &'c IndexSet<&'c str>,
}

impl<'c> TypeCompiler<'c> {
    pub fn new(
        names: &'c CodegenNames<'c>,
        self_name: &'c str,
        cyclic_group: &'c IndexSet<&'c str>,
    ) -> Self {
        Self {
            names,
            self_name,
            cyclic_group,
        }
    }

    pub fn ty(&self, node: &SchemaNode<'_>) -> TsType {
        let ty = match &node.kind {
            SchemaKind::String(_) => TsType::string(),
            SchemaKind::Number(_) | SchemaKind::Integer(_) => TsType::number(),
            SchemaKind::Boolean => TsType::boolean(),
            SchemaKind::Null => return TsType::null(),
            SchemaKind::Array(array) => match &array.items {
                ArrayItems::Any => TsType::array(TsType::unknown()),
                ArrayItems::Single(item) => TsType::array(self.ty(item)),
                ArrayItems::Tuple(items) => {
                    TsType::Tuple(items.iter().map(|item| self.ty(item)).collect())
                }
            },
            SchemaKind::Object(object) => self.object(object),
            SchemaKind::Ref(r) => self.reference(r.name()),
            SchemaKind::Composition(composition, members) => {
                let members = members.iter().map(|member| self.ty(member));
                match composition {
                    Composition::OneOf | Composition::AnyOf => TsType::union(members),
                    Composition::AllOf => TsType::intersection(members),
                }
            }
            SchemaKind::Enum(values) => {
                TsType::union(values.iter().map(|&value| TsType::literal(value)))
            }
            SchemaKind::Const(value) => TsType::literal(value),
            SchemaKind::Any => return TsType::unknown(),
        };
        if node.nullable { ty.nullable() } else { ty }
    }

    fn reference(&self, name: &str) -> TsType {
        let ident = self.names.ident(name);
        if name == self.self_name || self.cyclic_group.contains(name) {
            TsType::Ref(ident.to_recursive_type_name())
        } else {
            TsType::Infer(ident.to_schema_name())
        }
    }

    fn object(&self, object: &ObjectNode<'_>) -> TsType {
        if object.properties.is_empty()
            && let AdditionalProperties::Schema(value) = &object.additional
        {
            return TsType::record(self.ty(value));
        }

        let props = TsType::Object(
            object
                .properties
                .iter()
                .map(|(&name, node)| TsProperty {
                    name: name.to_owned(),
                    optional: !object.is_required(name),
                    ty: self.ty(node),
                })
                .collect(),
        );
        match &object.additional {
            AdditionalProperties::Allowed(true) => {
                TsType::intersection([props, TsType::record(TsType::unknown())])
            }
            AdditionalProperties::Schema(value) => {
                TsType::intersection([props, TsType::record(self.ty(value))])
            }
            AdditionalProperties::Unspecified | AdditionalProperties::Allowed(false) => props,
        }
    }
}
