use indexmap::IndexSet;
use itertools::Itertools;

use super::{
    config::CodegenConfig,
    graph::CodegenGraph,
    schema::{SchemaDecl, TsCode, base_import},
};

/// Generates a single TypeScript module with every schema,
/// each declared after all its dependencies.
#[derive(Debug)]
pub struct CodegenAggregateModule<'a> {
    graph: &'a CodegenGraph<'a>,
    config: &'a CodegenConfig,
    order: Vec<&'a str>,
}

impl<'a> CodegenAggregateModule<'a> {
    /// Creates a module that declares schemas in the given `order`,
    /// which should come from
    /// [`emission_order`][zodiac_core::graph::DependencyGraph::emission_order].
    pub fn new(graph: &'a CodegenGraph<'a>, config: &'a CodegenConfig, order: Vec<&'a str>) -> Self {
        Self {
            graph,
            config,
            order,
        }
    }

    /// Generates the module and returns it as a [`TsCode`].
    pub fn into_code(self) -> TsCode {
        // A strict order has no cycles, so only a schema that mentions
        // its own identifier is wrapped in `z.lazy`.
        let empty = IndexSet::new();
        let decls = self
            .order
            .iter()
            .filter_map(|&name| Some((name, self.graph.map().get(name)?)))
            .map(|(name, node)| {
                SchemaDecl::compile(self.graph.names(), name, node, &empty, false)
            })
            .map(|decl| decl.render(self.config.export_types))
            .join("\n");

        let mut content = base_import(self.config);
        if !decls.is_empty() {
            content.push('\n');
            content.push_str(&decls);
        }
        TsCode::new(self.config.aggregate_file.clone(), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use zodiac_core::{codegen::Code, schema::SchemaMap};

    use crate::tests::schemas_doc;

    #[test]
    fn test_aggregate_module_orders_dependencies_first() {
        let doc = schemas_doc(indoc::indoc! {"
            Test:
              type: object
              required: [example]
              properties:
                example:
                  $ref: '#/components/schemas/Example'
            Example:
              type: string
              format: email
        "});
        let map = SchemaMap::from_doc(&doc);
        let graph = CodegenGraph::new(&map);
        let config = CodegenConfig::default();

        let order = graph.emission_order().unwrap();
        let code = CodegenAggregateModule::new(&graph, &config, order).into_code();
        assert_eq!(code.path(), "schemas.ts");
        assert_eq!(
            code.content(),
            indoc::indoc! {r#"
                import { z } from "zod";

                export const ExampleSchema = z.email();
                export type Example = z.infer<typeof ExampleSchema>;

                export const TestSchema = z.object({ example: ExampleSchema });
                export type Test = z.infer<typeof TestSchema>;
            "#}
        );
    }

    #[test]
    fn test_aggregate_module_with_custom_import_and_no_types() {
        let doc = schemas_doc(indoc::indoc! {"
            Id:
              type: integer
              minimum: 1
        "});
        let map = SchemaMap::from_doc(&doc);
        let graph = CodegenGraph::new(&map);
        let config = CodegenConfig {
            export_types: false,
            zod_import: "zod/v4".to_owned(),
            aggregate_file: "models.ts".to_owned(),
            ..Default::default()
        };

        let order = graph.emission_order().unwrap();
        let code = CodegenAggregateModule::new(&graph, &config, order).into_code();
        assert_eq!(code.path(), "models.ts");
        assert_eq!(
            code.content(),
            indoc::indoc! {r#"
                import { z } from "zod/v4";

                export const IdSchema = z.int().min(1);
            "#}
        );
    }
}
