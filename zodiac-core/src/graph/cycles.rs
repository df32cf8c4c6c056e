use indexmap::{IndexMap, IndexSet};
use petgraph::{algo::tarjan_scc, graph::DiGraph};

/// How a schema participates in reference cycles.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CycleClass {
    /// The schema isn't part of any cycle.
    Acyclic,
    /// The schema references itself, and isn't part of a larger cycle.
    SelfReferential,
    /// The schema is part of a strongly connected component with
    /// at least two members. Members of the same component share an ID.
    CyclicGroup(usize),
}

impl CycleClass {
    /// Returns `true` if emitting the schema needs deferred evaluation.
    #[inline]
    pub fn is_recursive(self) -> bool {
        !matches!(self, Self::Acyclic)
    }
}

/// The cycle class of every schema in a graph.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CycleClassification<'a> {
    classes: IndexMap<&'a str, CycleClass>,
}

impl<'a> CycleClassification<'a> {
    /// Returns the class of the named schema. Unknown names are acyclic.
    #[inline]
    pub fn class(&self, name: &str) -> CycleClass {
        self.classes
            .get(name)
            .copied()
            .unwrap_or(CycleClass::Acyclic)
    }

    #[inline]
    pub fn is_recursive(&self, name: &str) -> bool {
        self.class(name).is_recursive()
    }

    /// Returns the members of the named schema's cyclic group,
    /// or `None` if the schema isn't in one.
    pub fn group(&self, name: &str) -> Option<IndexSet<&'a str>> {
        let CycleClass::CyclicGroup(id) = self.class(name) else {
            return None;
        };
        Some(
            self.classes
                .iter()
                .filter(|&(_, &class)| class == CycleClass::CyclicGroup(id))
                .map(|(&name, _)| name)
                .collect(),
        )
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, CycleClass)> {
        self.classes.iter().map(|(&name, &class)| (name, class))
    }
}

/// Classifies every schema in `names` by finding the strongly
/// connected components of the reference graph.
///
/// Unlike [`OrderBuilder`][super::OrderBuilder], classification never fails.
/// Edges to names that aren't in `names` are ignored.
pub fn classify_cycles<'a>(
    names: impl IntoIterator<Item = &'a str>,
    edges: &IndexMap<&'a str, IndexSet<&'a str>>,
) -> CycleClassification<'a> {
    let mut graph = DiGraph::<&'a str, ()>::new();
    let mut indices = IndexMap::new();
    for name in names {
        indices
            .entry(name)
            .or_insert_with(|| graph.add_node(name));
    }
    for (&from, tos) in edges {
        let Some(&a) = indices.get(from) else {
            continue;
        };
        for &to in tos {
            if let Some(&b) = indices.get(to) {
                graph.add_edge(a, b, ());
            }
        }
    }

    let mut classes: IndexMap<_, _> = indices
        .keys()
        .map(|&name| (name, CycleClass::Acyclic))
        .collect();
    let mut next_group = 0;
    for scc in tarjan_scc(&graph) {
        match &*scc {
            [] => {}
            &[index] => {
                if graph.contains_edge(index, index)
                    && let Some(class) = classes.get_mut(graph[index])
                {
                    *class = CycleClass::SelfReferential;
                }
            }
            members => {
                for &index in members {
                    if let Some(class) = classes.get_mut(graph[index]) {
                        *class = CycleClass::CyclicGroup(next_group);
                    }
                }
                next_group += 1;
            }
        }
    }

    CycleClassification { classes }
}
