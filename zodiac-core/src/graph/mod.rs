//! Schema dependency analysis.
//!
//! A [`DependencyGraph`] maps each schema in a [`SchemaMap`] to the
//! schemas it references directly. From there, it can build a strict
//! dependency-first emission order, or classify schemas by how they
//! participate in reference cycles.

mod cycles;
mod order;
mod refs;


pub use cycles::{CycleClass, CycleClassification, classify_cycles};
pub use order::OrderBuilder;
pub use refs::{Visitor, extract_refs};

use indexmap::{IndexMap, IndexSet};

use crate::{
    error::{CyclicDependency, Warning},
    schema::SchemaMap,
};

/// The direct reference edges between the schemas in a map.
///
/// References to names that aren't in the map are dropped from the
/// edges, and reported once per `(from, to)` pair as
/// [`Warning::MissingReference`].
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    map: &'a SchemaMap<'a>,
    edges: IndexMap<&'a str, IndexSet<&'a str>>,
    warnings: Vec<Warning>,
}

impl<'a> DependencyGraph<'a> {
    pub fn new(map: &'a SchemaMap<'a>) -> Self {
        let mut warnings = Vec::new();
        let edges = map
            .iter()
            .map(|(from, node)| {
                let (known, missing): (IndexSet<_>, IndexSet<_>) = extract_refs(node)
                    .into_iter()
                    .partition(|&to| map.contains(to));
                for to in missing {
                    tracing::warn!(%from, %to, "schema references unknown schema");
                    warnings.push(Warning::MissingReference {
                        from: from.to_owned(),
                        to: to.to_owned(),
                    });
                }
                (from, known)
            })
            .collect();
        Self {
            map,
            edges,
            warnings,
        }
    }

    /// Returns the schema map that this graph was built from.
    #[inline]
    pub fn map(&self) -> &'a SchemaMap<'a> {
        self.map
    }

    /// Returns the names of the known schemas that `name`
    /// references directly, in the order they're first referenced.
    #[inline]
    pub fn dependencies(&self, name: &str) -> impl Iterator<Item = &'a str> + '_ {
        self.edges.get(name).into_iter().flatten().copied()
    }

    #[inline]
    pub fn edges(&self) -> &IndexMap<&'a str, IndexSet<&'a str>> {
        &self.edges
    }

    /// Returns the warnings found while building this graph.
    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns every schema in the map, each after all its dependencies.
    /// Roots are visited in declaration order.
    ///
    /// Fails if any schema is part of a cycle, including
    /// a schema that references itself.
    pub fn emission_order(&self) -> Result<Vec<&'a str>, CyclicDependency> {
        let mut builder = OrderBuilder::new(&self.edges);
        for name in self.map.names() {
            builder.visit(name)?;
        }
        let order = builder.finish();
        tracing::debug!(schemas = order.len(), "built emission order");
        Ok(order)
    }

    /// Returns `root` and its transitive dependencies, each after all
    /// its dependencies. An unknown `root` yields an empty order.
    pub fn emission_order_for(&self, root: &str) -> Result<Vec<&'a str>, CyclicDependency> {
        let Some((&root, _)) = self.edges.get_key_value(root) else {
            return Ok(vec![]);
        };
        let mut builder = OrderBuilder::new(&self.edges);
        builder.visit(root)?;
        Ok(builder.finish())
    }

    /// Classifies every schema in the map by cycle participation.
    /// Classification never fails.
    #[inline]
    pub fn classify(&self) -> CycleClassification<'a> {
        classify_cycles(self.map.names(), &self.edges)
    }
}
