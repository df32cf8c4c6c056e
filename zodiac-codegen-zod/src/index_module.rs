use itertools::Itertools;
use zodiac_core::codegen::Code;

use super::{
    graph::CodegenGraph,
    naming::quote,
    schema::TsCode,
};

/// Generates the barrel `index.ts` that re-exports every schema module.
#[derive(Debug)]
pub struct CodegenIndexModule<'a> {
    graph: &'a CodegenGraph<'a>,
}

impl<'a> CodegenIndexModule<'a> {
    pub fn new(graph: &'a CodegenGraph<'a>) -> Self {
        Self { graph }
    }

    fn render(&self) -> String {
        self.graph
            .schemas()
            .map(|(name, _)| name)
            .sorted()
            .map(|name| {
                let file = self.graph.ident(name).to_file_name();
                format!("export * from {};\n", quote(&format!("./{file}")))
            })
            .collect()
    }
}

impl Code for CodegenIndexModule<'_> {
    fn path(&self) -> &str {
        "index.ts"
    }

    fn into_string(self) -> miette::Result<String> {
        Ok(self.render())
    }
}

/// Converts a [`CodegenIndexModule`] into a [`TsCode`].
impl<'a> From<CodegenIndexModule<'a>> for TsCode {
    fn from(module: CodegenIndexModule<'a>) -> Self {
        let path = module.path().to_owned();
        TsCode::new(path, module.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use zodiac_core::schema::SchemaMap;

    use crate::tests::schemas_doc;

    #[test]
    fn test_index_module_sorted_by_name() {
        let doc = schemas_doc(indoc::indoc! {"
            Pet:
              type: object
              properties:
                name:
                  type: string
            Status:
              type: string
              enum: [active, inactive]
            Order:
              type: object
              properties:
                id:
                  type: string
            order-line:
              type: string
        "});
        let map = SchemaMap::from_doc(&doc);
        let graph = CodegenGraph::new(&map);

        let content = CodegenIndexModule::new(&graph).into_string().unwrap();
        assert_eq!(
            content,
            indoc::indoc! {r#"
                export * from "./order";
                export * from "./pet";
                export * from "./status";
                export * from "./order_line";
            "#}
        );
    }
}
