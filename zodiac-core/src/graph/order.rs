use indexmap::{IndexMap, IndexSet};

use crate::error::CyclicDependency;

/// Builds a dependency-first emission order with a depth-first walk.
///
/// The builder is strict: reaching a schema that's still being visited,
/// including a schema that references itself, fails with
/// [`CyclicDependency`]. Use [`classify_cycles`][super::classify_cycles]
/// to find cycles without failing.
#[derive(Debug)]
pub struct OrderBuilder<'g, 'a> {
    edges: &'g IndexMap<&'a str, IndexSet<&'a str>>,
    visited: IndexSet<&'a str>,
    in_progress: IndexSet<&'a str>,
    order: Vec<&'a str>,
}

impl<'g, 'a> OrderBuilder<'g, 'a> {
    #[inline]
    pub fn new(edges: &'g IndexMap<&'a str, IndexSet<&'a str>>) -> Self {
        Self {
            edges,
            visited: IndexSet::new(),
            in_progress: IndexSet::new(),
            order: Vec::new(),
        }
    }

    /// Visits `name` and all its transitive dependencies, appending each
    /// to the order after its dependencies. Names that were already
    /// visited are skipped. Names without an entry in the edge map
    /// are treated as unknown, and skipped too.
    pub fn visit(&mut self, name: &'a str) -> Result<(), CyclicDependency> {
        if self.in_progress.contains(name) {
            return Err(CyclicDependency {
                name: name.to_owned(),
            });
        }
        if self.visited.contains(name) {
            return Ok(());
        }
        let edges = self.edges;
        let Some(deps) = edges.get(name) else {
            return Ok(());
        };

        self.in_progress.insert(name);
        for &dep in deps {
            self.visit(dep)?;
        }
        self.in_progress.shift_remove(name);

        self.visited.insert(name);
        self.order.push(name);
        Ok(())
    }

    /// Returns `true` if `name` has been fully visited.
    #[inline]
    pub fn is_visited(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    /// Consumes the builder, returning the order so far.
    #[inline]
    pub fn finish(self) -> Vec<&'a str> {
        self.order
    }
}
