use std::ops::Deref;

use indexmap::IndexSet;
use zodiac_core::{
    graph::{CycleClass, CycleClassification, DependencyGraph},
    schema::{SchemaMap, SchemaNode},
};

use super::naming::{CodegenIdent, CodegenNames};

/// Decorates a [`DependencyGraph`] with the cycle classification
/// and the unique identifiers that Zod code generation needs.
#[derive(Debug)]
pub struct CodegenGraph<'a> {
    graph: DependencyGraph<'a>,
    classes: CycleClassification<'a>,
    names: CodegenNames<'a>,
}

impl<'a> CodegenGraph<'a> {
    pub fn new(map: &'a SchemaMap<'a>) -> Self {
        let graph = DependencyGraph::new(map);
        let classes = graph.classify();
        for (name, class) in classes.iter() {
            if class.is_recursive() {
                tracing::debug!(schema = name, ?class, "found recursive schema");
            }
        }
        let names = CodegenNames::new(map.names());
        Self {
            graph,
            classes,
            names,
        }
    }

    /// Returns the table of unique identifiers for this run.
    #[inline]
    pub fn names(&self) -> &CodegenNames<'a> {
        &self.names
    }

    /// Returns the unique identifier for the named schema.
    #[inline]
    pub fn ident(&self, name: &str) -> CodegenIdent {
        self.names.ident(name)
    }

    /// Returns an iterator over all schemas, in declaration order.
    #[inline]
    pub fn schemas(&self) -> impl Iterator<Item = (&'a str, &'a SchemaNode<'a>)> + '_ {
        self.graph.map().iter()
    }

    #[inline]
    pub fn class(&self, name: &str) -> CycleClass {
        self.classes.class(name)
    }

    /// Returns the members of the named schema's cyclic group,
    /// including the schema itself, or an empty set if the schema
    /// isn't in one.
    #[inline]
    pub fn group(&self, name: &str) -> IndexSet<&'a str> {
        self.classes.group(name).unwrap_or_default()
    }
}

impl<'a> Deref for CodegenGraph<'a> {
    type Target = DependencyGraph<'a>;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}
