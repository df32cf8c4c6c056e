use std::fmt::Write;

use indexmap::IndexSet;
use itertools::Itertools;
use zodiac_core::{codegen::Code, schema::SchemaNode};

use super::{
    config::CodegenConfig,
    emit::mentions_ident,
    graph::CodegenGraph,
    naming::{CodegenIdent, CodegenNames, quote},
    types::TypeCompiler,
    validator::ValidatorCompiler,
};

/// A generated TypeScript file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TsCode {
    path: String,
    content: String,
}

impl TsCode {
    pub(crate) fn new(path: String, content: String) -> Self {
        Self { path, content }
    }

    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Code for TsCode {
    fn path(&self) -> &str {
        &self.path
    }

    fn into_string(self) -> miette::Result<String> {
        Ok(self.content)
    }
}

/// Generates a TypeScript module for one named schema, importing only
/// the sibling modules that its declaration actually mentions.
#[derive(Debug)]
pub struct CodegenSchemaModule<'a> {
    graph: &'a CodegenGraph<'a>,
    config: &'a CodegenConfig,
    name: &'a str,
    node: &'a SchemaNode<'a>,
}

impl<'a> CodegenSchemaModule<'a> {
    pub fn new(
        graph: &'a CodegenGraph<'a>,
        config: &'a CodegenConfig,
        name: &'a str,
        node: &'a SchemaNode<'a>,
    ) -> Self {
        Self {
            graph,
            config,
            name,
            node,
        }
    }

    /// Generates the module and returns it as a [`TsCode`].
    pub fn into_code(self) -> TsCode {
        let group = self.graph.group(self.name);
        let recursive = self.graph.class(self.name).is_recursive();
        let decl = SchemaDecl::compile(
            self.graph.names(),
            self.name,
            self.node,
            &group,
            recursive,
        );

        let mut content = base_import(self.config);
        for dep in self.graph.dependencies(self.name).sorted() {
            if dep == self.name {
                continue;
            }
            let ident = self.graph.ident(dep);
            let mut names = vec![];
            let schema_name = ident.to_schema_name();
            if decl.mentions(&schema_name) {
                names.push(schema_name);
            }
            let type_name = ident.to_recursive_type_name();
            if decl.ty.as_deref().is_some_and(|ty| mentions_ident(ty, &type_name)) {
                names.push(format!("type {type_name}"));
            }
            if !names.is_empty() {
                let _ = writeln!(
                    content,
                    "import {{ {} }} from {};",
                    names.iter().format(", "),
                    quote(&format!("./{}", ident.to_file_name()))
                );
            }
        }
        content.push('\n');
        content.push_str(&decl.render(self.config.export_types));

        let path = format!("{}.ts", self.graph.ident(self.name).to_file_name());
        TsCode::new(path, content)
    }
}

/// Returns the statement that imports `z`.
pub(crate) fn base_import(config: &CodegenConfig) -> String {
    format!("import {{ z }} from {};\n", quote(&config.zod_import))
}

/// The compiled validator and, for a recursive schema, the compiled type
/// of one named schema.
#[derive(Debug)]
pub(crate) struct SchemaDecl<'a> {
    ident: CodegenIdent,
    description: Option<&'a str>,
    validator: String,
    /// The declared type, present only if the schema must be
    /// wrapped in `z.lazy`.
    ty: Option<String>,
}

impl<'a> SchemaDecl<'a> {
    /// Compiles a schema's declaration. The validator is wrapped in
    /// `z.lazy` if the schema is `recursive`, or if its compiled
    /// validator mentions its own identifier.
    pub fn compile(
        names: &CodegenNames<'_>,
        name: &str,
        node: &SchemaNode<'a>,
        cyclic_group: &IndexSet<&str>,
        recursive: bool,
    ) -> Self {
        let ident = names.ident(name);
        let validator = ValidatorCompiler::new(names).expr(node);
        let lazy = recursive || mentions_ident(&validator, &ident.to_schema_name());
        let ty = lazy.then(|| {
            tracing::debug!(schema = name, recursive, "wrapping schema in `z.lazy`");
            TypeCompiler::new(names, name, cyclic_group)
                .ty(node)
                .to_string()
        });
        Self {
            ident,
            description: node.description,
            validator,
            ty,
        }
    }

    /// Returns `true` if the compiled validator or type mentions `ident`.
    pub fn mentions(&self, ident: &str) -> bool {
        mentions_ident(&self.validator, ident)
            || self.ty.as_deref().is_some_and(|ty| mentions_ident(ty, ident))
    }

    /// Renders the exported declarations.
    pub fn render(&self, export_types: bool) -> String {
        let schema_name = self.ident.to_schema_name();
        let type_name = self.ident.to_type_name();
        let mut out = String::new();
        if let Some(description) = self.description {
            out.push_str(&jsdoc(description));
        }
        match &self.ty {
            Some(ty) => {
                let recursive_name = self.ident.to_recursive_type_name();
                let _ = writeln!(out, "export type {recursive_name} = {ty};");
                let _ = writeln!(
                    out,
                    "export const {schema_name}: z.ZodType<{recursive_name}> = z.lazy(() => {});",
                    self.validator
                );
                if export_types {
                    let _ = writeln!(out, "export type {type_name} = {recursive_name};");
                }
            }
            None => {
                let _ = writeln!(out, "export const {schema_name} = {};", self.validator);
                if export_types {
                    let _ = writeln!(
                        out,
                        "export type {type_name} = z.infer<typeof {schema_name}>;"
                    );
                }
            }
        }
        out
    }
}

/// Formats a description as a JSDoc comment.
fn jsdoc(description: &str) -> String {
    let description = description.trim().replace("*/", "*\\/");
    match description.lines().collect_vec().as_slice() {
        [] => String::new(),
        [line] => format!("/** {line} */\n"),
        lines => {
            let mut out = "/**\n".to_owned();
            for line in lines {
                match line.trim_end() {
                    "" => out.push_str(" *\n"),
                    line => {
                        let _ = writeln!(out, " * {line}");
                    }
                }
            }
            out.push_str(" */\n");
            out
        }
    }
}
