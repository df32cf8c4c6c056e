use indexmap::IndexSet;

use crate::schema::{SchemaKind, SchemaNode};

/// Returns the names of all the schemas that `node` references directly,
/// in the order they're first found.
///
/// References are leaves: a referenced schema is resolved by name,
/// so its own references aren't included.
pub fn extract_refs<'a>(node: &SchemaNode<'a>) -> IndexSet<&'a str> {
    Visitor::new(node)
        .filter_map(|node| match node.kind {
            SchemaKind::Ref(r) => Some(r.name()),
            _ => None,
        })
        .collect()
}

/// A depth-first, pre-order walk over a node and all its descendants.
#[derive(Debug)]
pub struct Visitor<'n, 'a> {
    stack: Vec<&'n SchemaNode<'a>>,
}

impl<'n, 'a> Visitor<'n, 'a> {
    #[inline]
    pub fn new(root: &'n SchemaNode<'a>) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'n, 'a> Iterator for Visitor<'n, 'a> {
    type Item = &'n SchemaNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let top = self.stack.pop()?;
        // Push children in reverse, so that they're visited
        // in declaration order.
        let children: Vec<_> = top.children().collect();
        self.stack.extend(children.into_iter().rev());
        Some(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use crate::{schema::SchemaMap, tests::doc};

    #[test]
    fn test_extract_refs_from_nested_containers() {
        let doc = doc(indoc::indoc! {"
            openapi: 3.0.0
            info:
              title: Test API
              version: 1.0.0
            components:
              schemas:
                Zoo:
                  type: object
                  properties:
                    keeper:
                      $ref: '#/components/schemas/Keeper'
                    animals:
                      type: array
                      items:
                        oneOf:
                          - $ref: '#/components/schemas/Lion'
                          - $ref: '#/components/schemas/Tiger'
                    tags:
                      type: object
                      additionalProperties:
                        $ref: '#/components/schemas/Tag'
                    backup:
                      $ref: '#/components/schemas/Keeper'
        "});

        let map = SchemaMap::from_doc(&doc);
        let refs = extract_refs(&map.schemas["Zoo"]);
        assert_eq!(refs.into_iter().collect_vec(), vec!["Keeper", "Lion", "Tiger", "Tag"]);
    }

    #[test]
    fn test_extract_refs_decodes_names() {
        let doc = doc(indoc::indoc! {"
            openapi: 3.0.0
            info:
              title: Test API
              version: 1.0.0
            components:
              schemas:
                Pair:
                  type: array
                  items:
                    - $ref: '#/components/schemas/Pet%20Store'
                    - $ref: '#/components/schemas/a~1b'
        "});

        let map = SchemaMap::from_doc(&doc);
        let refs = extract_refs(&map.schemas["Pair"]);
        assert_eq!(refs.into_iter().collect_vec(), vec!["Pet Store", "a/b"]);
    }

    #[test]
    fn test_extract_refs_from_leaves_is_empty() {
        let doc = doc(indoc::indoc! {"
            openapi: 3.0.0
            info:
              title: Test API
              version: 1.0.0
            components:
              schemas:
                Name:
                  type: string
                Count:
                  type: integer
                Status:
                  enum: [active, inactive]
                Anything: {}
        "});

        let map = SchemaMap::from_doc(&doc);
        for (name, node) in map.iter() {
            assert!(extract_refs(node).is_empty(), "expected no refs for `{name}`");
        }
    }

    #[test]
    fn test_extract_refs_from_top_level_alias() {
        let doc = doc(indoc::indoc! {"
            openapi: 3.0.0
            info:
              title: Test API
              version: 1.0.0
            components:
              schemas:
                Alias:
                  $ref: '#/components/schemas/Target'
        "});

        let map = SchemaMap::from_doc(&doc);
        let refs = extract_refs(&map.schemas["Alias"]);
        assert_eq!(refs.into_iter().collect_vec(), vec!["Target"]);
    }
}
