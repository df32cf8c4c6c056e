use indexmap::IndexMap;

use crate::parse::Document;

use super::{SchemaNode, lower};

/// An ordered map of schema names to their definitions.
///
/// The map is immutable once built; every compiler borrows it
/// for the duration of a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaMap<'a> {
    pub schemas: IndexMap<&'a str, SchemaNode<'a>>,
}

impl<'a> SchemaMap<'a> {
    /// Lowers all the named schemas in a document.
    pub fn from_doc(doc: &'a Document) -> Self {
        doc.schemas()
            .map(|(name, schema)| (name, lower(schema)))
            .collect()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&SchemaNode<'a>> {
        self.schemas.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns an iterator over all schema names, in declaration order.
    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.schemas.keys().copied()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &SchemaNode<'a>)> {
        self.schemas.iter().map(|(&name, node)| (name, node))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, SchemaNode<'a>)> for SchemaMap<'a> {
    fn from_iter<I: IntoIterator<Item = (&'a str, SchemaNode<'a>)>>(iter: I) -> Self {
        Self {
            schemas: iter.into_iter().collect(),
        }
    }
}
